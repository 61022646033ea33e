//! Proximity Index
//!
//! Radius queries answered straight from the raw-meters landmark matrix.
//! Standardized values never enter here: a radius is a true distance.

use std::cmp::Ordering;

use homex_core::{DenseMatrix, Error, Result};

use crate::embedder::LandmarkSpace;

/// Borrowing view over the landmark space
#[derive(Debug, Clone, Copy)]
pub struct ProximityIndex<'a> {
    space: &'a LandmarkSpace,
}

impl<'a> ProximityIndex<'a> {
    pub fn new(space: &'a LandmarkSpace) -> Self {
        Self { space }
    }

    fn raw(&self) -> &'a DenseMatrix {
        &self.space.raw_meters
    }

    /// Rows strictly closer than `radius_meters` to `landmark`, nearest first.
    /// Equal distances keep catalog order. Rows without a listed distance
    /// (sentinel cells) are never returned, whatever the radius.
    pub fn within_radius(&self, landmark: &str, radius_meters: f64) -> Result<Vec<(usize, f64)>> {
        let col = self
            .space
            .column_of(landmark)
            .ok_or_else(|| Error::LandmarkNotFound(landmark.to_string()))?;

        let mut hits: Vec<(usize, f64)> = self
            .raw()
            .column(col)
            .into_iter()
            .enumerate()
            .filter(|&(row, meters)| self.space.is_known(row, col) && meters < radius_meters)
            .collect();

        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        Ok(hits)
    }

    /// Distance in meters from row `index` to `landmark`, sentinel included
    pub fn distance(&self, index: usize, landmark: &str) -> Option<f64> {
        let col = self.space.column_of(landmark)?;
        (index < self.raw().n_rows()).then(|| self.raw().get(index, col))
    }
}
