use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parse::{
    parse_configuration_details, parse_facilities, parse_landmark_distances, ConfigurationDetail,
    LandmarkDistances,
};

/// One listing as it comes out of the dataset: identity plus raw string fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// Unique, non-empty
    pub name: String,
    pub sub_name: String,
    /// Free-text blurb about the neighbourhood
    pub nearby_locations: String,
    /// Quoted pseudo-list, e.g. `['Gym', 'Swimming Pool']`
    pub top_facilities: String,
    /// JSON-like object keyed by configuration label
    pub price_details: String,
    /// Python-literal mapping of landmark → distance string
    pub location_advantages: String,
}

impl PropertyRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_sub_name(mut self, sub_name: impl Into<String>) -> Self {
        self.sub_name = sub_name.into();
        self
    }

    #[must_use]
    pub fn with_nearby_locations(mut self, text: impl Into<String>) -> Self {
        self.nearby_locations = text.into();
        self
    }

    #[must_use]
    pub fn with_top_facilities(mut self, raw: impl Into<String>) -> Self {
        self.top_facilities = raw.into();
        self
    }

    #[must_use]
    pub fn with_price_details(mut self, raw: impl Into<String>) -> Self {
        self.price_details = raw.into();
        self
    }

    #[must_use]
    pub fn with_location_advantages(mut self, raw: impl Into<String>) -> Self {
        self.location_advantages = raw.into();
        self
    }

    /// Run every field parser. Never fails: unreadable fields come back empty.
    pub fn parse(&self) -> ParsedProperty {
        ParsedProperty {
            facilities: parse_facilities(&self.top_facilities),
            configurations: parse_configuration_details(&self.price_details),
            landmarks: parse_landmark_distances(&self.location_advantages),
        }
    }
}

/// Structured view of a [`PropertyRecord`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedProperty {
    pub facilities: Vec<String>,
    pub configurations: BTreeMap<String, ConfigurationDetail>,
    pub landmarks: LandmarkDistances,
}
