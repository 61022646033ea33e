//! Similarity Engine
//!
//! Owns the three per-space similarity matrices and fuses them into one
//! ranking score. The fused score only orders neighbors within a single query;
//! it is not a normalized similarity.

use std::cmp::Ordering;

use homex_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::distance::{cosine_similarity_matrix, sparse_cosine_similarity_matrix, SimilarityMatrix};
use crate::embedder::FeatureSpaces;
use crate::schema::FusionWeights;

/// Weighted contribution of each space; the three sum to the fused score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub facility: f64,
    pub configuration: f64,
    pub landmark: f64,
}

impl ScoreBreakdown {
    #[inline]
    pub fn total(&self) -> f64 {
        self.facility + self.configuration + self.landmark
    }
}

/// One ranked neighbor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Catalog row
    pub index: usize,
    pub fused_score: f64,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityEngine {
    facility: SimilarityMatrix,
    configuration: SimilarityMatrix,
    landmark: SimilarityMatrix,
    weights: FusionWeights,
}

impl SimilarityEngine {
    /// Compute the three similarity matrices for a built set of feature spaces
    pub fn build(spaces: &FeatureSpaces, weights: FusionWeights) -> Result<Self> {
        weights
            .validate()
            .map_err(|e| Error::InvalidArgument(e.to_string()))?;

        let engine = Self {
            facility: sparse_cosine_similarity_matrix(&spaces.facility.rows),
            configuration: cosine_similarity_matrix(&spaces.configuration.matrix),
            landmark: cosine_similarity_matrix(&spaces.landmark.standardized),
            weights,
        };

        let n = engine.facility.len();
        if engine.configuration.len() != n || engine.landmark.len() != n {
            return Err(Error::InvalidDimension {
                expected: n,
                actual: engine.configuration.len().min(engine.landmark.len()),
            });
        }
        Ok(engine)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.facility.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.facility.is_empty()
    }

    pub fn weights(&self) -> FusionWeights {
        self.weights
    }

    pub fn facility_similarity(&self) -> &SimilarityMatrix {
        &self.facility
    }

    pub fn configuration_similarity(&self) -> &SimilarityMatrix {
        &self.configuration
    }

    pub fn landmark_similarity(&self) -> &SimilarityMatrix {
        &self.landmark
    }

    pub fn breakdown(&self, i: usize, j: usize) -> ScoreBreakdown {
        ScoreBreakdown {
            facility: self.weights.facility * self.facility.get(i, j),
            configuration: self.weights.configuration * self.configuration.get(i, j),
            landmark: self.weights.landmark * self.landmark.get(i, j),
        }
    }

    #[inline]
    pub fn fused_score(&self, i: usize, j: usize) -> f64 {
        self.breakdown(i, j).total()
    }

    /// The `k` highest fused scores against `index`, itself excluded.
    /// Equal scores keep catalog order.
    pub fn top_k_neighbors(&self, index: usize, k: usize) -> Result<Vec<Neighbor>> {
        let n = self.len();
        if index >= n {
            return Err(Error::InvalidArgument(format!(
                "row {} out of range for catalog of {}",
                index, n
            )));
        }

        let mut candidates: Vec<Neighbor> = (0..n)
            .filter(|&j| j != index)
            .map(|j| {
                let breakdown = self.breakdown(index, j);
                Neighbor {
                    index: j,
                    fused_score: breakdown.total(),
                    breakdown,
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.fused_score
                .partial_cmp(&a.fused_score)
                .unwrap_or(Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        candidates.truncate(k);
        Ok(candidates)
    }
}
