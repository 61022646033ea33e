//! Feature-space schema definitions
//!
//! The configuration space has an explicit, versioned column contract: a
//! fixed label set and a fixed sub-feature order per label. Any change to
//! either bumps [`ConfigurationSchema::version`], which also invalidates
//! cached snapshots built under the old layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration labels known to the dataset
pub const DEFAULT_LABELS: [&str; 8] = [
    "1 BHK", "2 BHK", "3 BHK", "4 BHK", "5 BHK", "6 BHK", "1 RK", "Land",
];

/// Numeric sub-features per label, in column order
pub const NUMERIC_FEATURES: [NumericFeature; 4] = [
    NumericFeature::AreaLow,
    NumericFeature::AreaHigh,
    NumericFeature::PriceLow,
    NumericFeature::PriceHigh,
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NumericFeature {
    AreaLow,
    AreaHigh,
    PriceLow,
    PriceHigh,
}

impl NumericFeature {
    pub fn column_name(self, label: &str) -> String {
        let prefix = match self {
            NumericFeature::AreaLow => "area low",
            NumericFeature::AreaHigh => "area high",
            NumericFeature::PriceLow => "price low",
            NumericFeature::PriceHigh => "price high",
        };
        format!("{} {}", prefix, label)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Schema has no configuration labels")]
    EmptySchema,

    #[error("Configuration label listed twice: {0}")]
    DuplicateLabel(String),

    #[error("Fusion weight for {0} must be finite and non-negative")]
    InvalidWeight(&'static str),

    #[error("All fusion weights are zero")]
    ZeroTotalWeight,
}

/// Configuration feature space schema, version 1
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigurationSchema {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Labels in column order
    pub labels: Vec<String>,
}

fn default_version() -> u32 {
    1
}

impl Default for ConfigurationSchema {
    fn default() -> Self {
        Self::new(DEFAULT_LABELS.iter().map(|l| l.to_string()).collect())
    }
}

impl ConfigurationSchema {
    pub fn new(labels: Vec<String>) -> Self {
        Self { version: 1, labels }
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.labels.is_empty() {
            return Err(SchemaError::EmptySchema);
        }
        for (i, label) in self.labels.iter().enumerate() {
            if self.labels[..i].contains(label) {
                return Err(SchemaError::DuplicateLabel(label.clone()));
            }
        }
        Ok(())
    }

    /// Width of the numeric block
    pub fn numeric_width(&self) -> usize {
        self.labels.len() * NUMERIC_FEATURES.len()
    }

    /// Numeric column names, label-major
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.labels
            .iter()
            .flat_map(|label| NUMERIC_FEATURES.iter().map(move |f| f.column_name(label)))
            .collect()
    }

    pub fn building_type_column(label: &str, category: &str) -> String {
        format!("building type_{}_{}", label, category)
    }
}

/// Weights of the three similarity spaces in the fused score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FusionWeights {
    pub facility: f64,
    pub configuration: f64,
    pub landmark: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            facility: 30.0,
            configuration: 20.0,
            landmark: 8.0,
        }
    }
}

impl FusionWeights {
    pub fn new(facility: f64, configuration: f64, landmark: f64) -> Self {
        Self {
            facility,
            configuration,
            landmark,
        }
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        for (name, w) in [
            ("facility", self.facility),
            ("configuration", self.configuration),
            ("landmark", self.landmark),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(SchemaError::InvalidWeight(name));
            }
        }
        if self.facility + self.configuration + self.landmark <= 0.0 {
            return Err(SchemaError::ZeroTotalWeight);
        }
        Ok(())
    }

    /// Upper bound of the fused score (every space at similarity 1.0)
    pub fn total(&self) -> f64 {
        self.facility + self.configuration + self.landmark
    }
}
