//! Catalog snapshot
//!
//! One immutable, fully built artifact set for a catalog version: the records,
//! their feature spaces and the similarity matrices. A snapshot is never
//! mutated after [`CatalogSnapshot::build`]; a changed catalog gets a new one.

use std::time::Instant;

use ahash::AHashMap;
use homex_core::{Error, PropertyRecord, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::embedder::{parse_records, FeatureBuilder, FeatureSpaces};
use crate::explain::TOP_FACILITIES;
use crate::rerank::SimilarityEngine;
use crate::schema::{ConfigurationSchema, FusionWeights};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    schema: ConfigurationSchema,
    records: Vec<PropertyRecord>,
    /// Parsed facility lists, truncated for display
    top_facilities: Vec<Vec<String>>,
    spaces: FeatureSpaces,
    engine: SimilarityEngine,
    #[serde(skip)]
    name_index: AHashMap<String, usize>,
}

impl CatalogSnapshot {
    /// Parse, build features and compute similarity for `records`.
    ///
    /// Fails with `BuildPrecondition` on an empty catalog or when property
    /// names are empty or repeated; nothing is published in that case.
    pub fn build(
        records: Vec<PropertyRecord>,
        schema: ConfigurationSchema,
        weights: FusionWeights,
    ) -> Result<Self> {
        let started = Instant::now();

        if records.is_empty() {
            return Err(Error::BuildPrecondition(
                "catalog has no usable rows".to_string(),
            ));
        }
        schema
            .validate()
            .map_err(|e| Error::BuildPrecondition(e.to_string()))?;

        let name_index = Self::index_names(&records)?;

        let parsed = parse_records(&records);
        let spaces = FeatureBuilder::new(schema.clone()).build_parsed(&parsed)?;
        let engine = SimilarityEngine::build(&spaces, weights)?;

        let top_facilities = parsed
            .into_iter()
            .map(|p| p.facilities.into_iter().take(TOP_FACILITIES).collect())
            .collect();

        info!(
            properties = records.len(),
            vocabulary = spaces.facility.vectorizer.len(),
            configuration_columns = spaces.configuration.columns.len(),
            landmarks = spaces.landmark.landmarks.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog snapshot built"
        );

        Ok(Self {
            schema,
            records,
            top_facilities,
            spaces,
            engine,
            name_index,
        })
    }

    fn index_names(records: &[PropertyRecord]) -> Result<AHashMap<String, usize>> {
        let mut index = AHashMap::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            if r.name.trim().is_empty() {
                return Err(Error::BuildPrecondition(format!(
                    "row {} has an empty property name",
                    i
                )));
            }
            if index.insert(r.name.clone(), i).is_some() {
                return Err(Error::BuildPrecondition(format!(
                    "duplicate property name: {}",
                    r.name
                )));
            }
        }
        Ok(index)
    }

    /// Restore lookup tables that are not serialized
    pub fn rehydrate(&mut self) -> Result<()> {
        self.name_index = Self::index_names(&self.records)?;
        self.spaces.facility.vectorizer.reindex();
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn schema(&self) -> &ConfigurationSchema {
        &self.schema
    }

    pub fn weights(&self) -> FusionWeights {
        self.engine.weights()
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&PropertyRecord> {
        self.records.get(index)
    }

    pub fn top_facilities(&self, index: usize) -> &[String] {
        self.top_facilities
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    pub fn spaces(&self) -> &FeatureSpaces {
        &self.spaces
    }

    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }
}
