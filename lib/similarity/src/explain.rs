//! Result shaping
//!
//! Query output types: the public fields of a matched listing plus the score
//! or distance that placed it, and for recommendations the per-space breakdown.

use serde::{Deserialize, Serialize};

use crate::rerank::ScoreBreakdown;

/// Characters of the nearby-locations blurb shown per result
pub const EXCERPT_CHARS: usize = 100;

/// Facilities listed per recommendation
pub const TOP_FACILITIES: usize = 5;

/// One recommended listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborSummary {
    pub property_name: String,
    pub sub_name: String,
    pub nearby_locations_excerpt: String,
    /// At most [`TOP_FACILITIES`]
    pub top_facilities: Vec<String>,
    /// Ranking signal, not a percentage
    pub fused_score: f64,
    pub breakdown: ScoreBreakdown,
}

/// One listing inside a radius
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximitySummary {
    pub property_name: String,
    pub sub_name: String,
    pub nearby_locations_excerpt: String,
    pub distance_km: f64,
}

/// First [`EXCERPT_CHARS`] characters, never splitting a code point
pub fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
