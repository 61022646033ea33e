//! Feature Builder
//!
//! Turns parsed listings into the three numeric feature spaces:
//!
//! - facility space: TF-IDF rows over 1/2-gram facility phrases
//! - configuration space: per-label area/price block plus one-hot building types, standardized
//! - landmark space: meters to every known landmark, raw and standardized
//!
//! Row `i` of every space is listing `i` of the input; no row is ever skipped.

use std::collections::BTreeSet;

use ahash::AHashMap;
use homex_core::{
    DenseMatrix, ParsedProperty, PropertyRecord, Result, SparseVector, StandardScaler,
    TfidfVectorizer,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schema::{ConfigurationSchema, NumericFeature, NUMERIC_FEATURES};

/// Distance assumed for a landmark a listing has no data for
pub const SENTINEL_DISTANCE_M: f64 = 54_000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilitySpace {
    pub vectorizer: TfidfVectorizer,
    pub rows: Vec<SparseVector>,
}

impl FacilitySpace {
    pub fn vocabulary(&self) -> &[String] {
        self.vectorizer.vocabulary()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationSpace {
    /// Column names, numeric block first then building-type indicators
    pub columns: Vec<String>,
    /// Standardized rows
    pub matrix: DenseMatrix,
    pub scaler: StandardScaler,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkSpace {
    /// Column order: first appearance in the corpus
    pub landmarks: Vec<String>,
    /// Meters, sentinel-filled. Used for radius queries.
    pub raw_meters: DenseMatrix,
    /// Row-major, same shape as `raw_meters`: true where the listing gave a readable distance
    pub known: Vec<bool>,
    /// Standardized copy for similarity
    pub standardized: DenseMatrix,
}

impl LandmarkSpace {
    pub fn column_of(&self, landmark: &str) -> Option<usize> {
        self.landmarks.iter().position(|l| l == landmark)
    }

    /// False when the cell holds the sentinel rather than a listed distance
    #[inline]
    pub fn is_known(&self, row: usize, col: usize) -> bool {
        self.known
            .get(row * self.raw_meters.n_cols() + col)
            .copied()
            .unwrap_or(false)
    }
}

/// All three spaces for one corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpaces {
    pub facility: FacilitySpace,
    pub configuration: ConfigurationSpace,
    pub landmark: LandmarkSpace,
}

/// Run the Field Parser over every record. Rows are independent.
pub fn parse_records(records: &[PropertyRecord]) -> Vec<ParsedProperty> {
    records.par_iter().map(PropertyRecord::parse).collect()
}

/// Fit the facility vocabulary on the whole corpus and vectorize every row.
pub fn build_facility_space(parsed: &[ParsedProperty]) -> FacilitySpace {
    let docs: Vec<String> = parsed.iter().map(|p| p.facilities.join(" ")).collect();
    let (vectorizer, rows) = TfidfVectorizer::fit_transform(&docs);
    debug!(
        rows = rows.len(),
        vocabulary = vectorizer.len(),
        "facility space built"
    );
    FacilitySpace { vectorizer, rows }
}

fn numeric_value(p: &ParsedProperty, label: &str, feature: NumericFeature) -> f64 {
    let Some(detail) = p.configurations.get(label) else {
        return 0.0;
    };
    match feature {
        NumericFeature::AreaLow => detail.area_low,
        NumericFeature::AreaHigh => detail.area_high,
        NumericFeature::PriceLow => detail.price_low,
        NumericFeature::PriceHigh => detail.price_high,
    }
    .unwrap_or(0.0)
}

/// Flatten, one-hot encode and standardize the per-configuration details.
pub fn build_configuration_space(
    parsed: &[ParsedProperty],
    schema: &ConfigurationSchema,
) -> Result<ConfigurationSpace> {
    // Indicator columns per label: observed building types, sorted, first dropped
    let mut columns = schema.numeric_column_names();
    let mut indicators: Vec<(usize, String)> = Vec::new();
    for (li, label) in schema.labels.iter().enumerate() {
        let categories: BTreeSet<&str> = parsed
            .iter()
            .filter_map(|p| p.configurations.get(label))
            .filter_map(|d| d.building_type.as_deref())
            .collect();
        for category in categories.into_iter().skip(1) {
            columns.push(ConfigurationSchema::building_type_column(label, category));
            indicators.push((li, category.to_string()));
        }
    }

    let width = columns.len();
    let rows: Vec<Vec<f64>> = parsed
        .par_iter()
        .map(|p| {
            let mut row = Vec::with_capacity(width);
            for label in &schema.labels {
                for feature in NUMERIC_FEATURES {
                    row.push(numeric_value(p, label, feature));
                }
            }
            for (li, category) in &indicators {
                let label = &schema.labels[*li];
                let hit = p
                    .configurations
                    .get(label)
                    .and_then(|d| d.building_type.as_deref())
                    == Some(category.as_str());
                row.push(if hit { 1.0 } else { 0.0 });
            }
            row
        })
        .collect();

    let raw = DenseMatrix::from_rows(rows, width)?;
    let (scaler, matrix) = StandardScaler::fit_transform(&raw);
    debug!(rows = matrix.n_rows(), columns = width, "configuration space built");

    Ok(ConfigurationSpace {
        columns,
        matrix,
        scaler,
    })
}

/// Union all landmarks into columns, fill gaps with the sentinel, and keep
/// both the raw meters and a standardized copy.
pub fn build_landmark_space(parsed: &[ParsedProperty]) -> Result<LandmarkSpace> {
    let mut landmarks: Vec<String> = Vec::new();
    let mut index: AHashMap<String, usize> = AHashMap::new();
    for p in parsed {
        for name in p.landmarks.names() {
            if !index.contains_key(name) {
                index.insert(name.to_string(), landmarks.len());
                landmarks.push(name.to_string());
            }
        }
    }

    let width = landmarks.len();
    let (rows, masks): (Vec<Vec<f64>>, Vec<Vec<bool>>) = parsed
        .par_iter()
        .map(|p| {
            let mut row = vec![SENTINEL_DISTANCE_M; width];
            let mut mask = vec![false; width];
            for (name, meters) in p.landmarks.known() {
                if let Some(&col) = index.get(name) {
                    row[col] = meters;
                    mask[col] = true;
                }
            }
            (row, mask)
        })
        .unzip();

    let raw_meters = DenseMatrix::from_rows(rows, width)?;
    let known: Vec<bool> = masks.into_iter().flatten().collect();
    let (_, standardized) = StandardScaler::fit_transform(&raw_meters);
    debug!(rows = raw_meters.n_rows(), landmarks = width, "landmark space built");

    Ok(LandmarkSpace {
        landmarks,
        raw_meters,
        known,
        standardized,
    })
}

/// Builds every feature space from raw records under one schema
#[derive(Debug, Clone, Default)]
pub struct FeatureBuilder {
    schema: ConfigurationSchema,
}

impl FeatureBuilder {
    pub fn new(schema: ConfigurationSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &ConfigurationSchema {
        &self.schema
    }

    pub fn build(&self, records: &[PropertyRecord]) -> Result<FeatureSpaces> {
        let parsed = parse_records(records);
        self.build_parsed(&parsed)
    }

    pub fn build_parsed(&self, parsed: &[ParsedProperty]) -> Result<FeatureSpaces> {
        Ok(FeatureSpaces {
            facility: build_facility_space(parsed),
            configuration: build_configuration_space(parsed, &self.schema)?,
            landmark: build_landmark_space(parsed)?,
        })
    }
}
