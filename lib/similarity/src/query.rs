//! Query Façade
//!
//! The two read queries (recommend, search nearby) plus the listings a
//! picker needs. Holds only a shared reference to one snapshot, so concurrent
//! callers need no locking.

use std::sync::Arc;

use homex_core::{Error, Result};
use tracing::debug;

use crate::catalog::CatalogSnapshot;
use crate::explain::{excerpt, NeighborSummary, ProximitySummary};
use crate::proximity::ProximityIndex;

pub const DEFAULT_K: usize = 5;
pub const DEFAULT_RADIUS_KM: f64 = 20.0;
pub const MIN_RADIUS_KM: f64 = 1.0;
pub const MAX_RADIUS_KM: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct QueryFacade {
    snapshot: Arc<CatalogSnapshot>,
}

impl QueryFacade {
    pub fn new(snapshot: Arc<CatalogSnapshot>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Arc<CatalogSnapshot> {
        &self.snapshot
    }

    /// The `k` listings most similar to `property_name`, best first
    pub fn recommend(&self, property_name: &str, k: usize) -> Result<Vec<NeighborSummary>> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be at least 1".to_string()));
        }
        let index = self
            .snapshot
            .index_of(property_name)
            .ok_or_else(|| Error::PropertyNotFound(property_name.to_string()))?;

        let neighbors = self.snapshot.engine().top_k_neighbors(index, k)?;
        debug!(property = property_name, k, found = neighbors.len(), "recommend");

        Ok(neighbors
            .into_iter()
            .filter_map(|n| {
                let record = self.snapshot.record(n.index)?;
                Some(NeighborSummary {
                    property_name: record.name.clone(),
                    sub_name: record.sub_name.clone(),
                    nearby_locations_excerpt: excerpt(&record.nearby_locations),
                    top_facilities: self.snapshot.top_facilities(n.index).to_vec(),
                    fused_score: n.fused_score,
                    breakdown: n.breakdown,
                })
            })
            .collect())
    }

    /// Listings strictly within `radius_km` of `landmark`, nearest first
    pub fn search_nearby(&self, landmark: &str, radius_km: f64) -> Result<Vec<ProximitySummary>> {
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius_km) {
            return Err(Error::InvalidArgument(format!(
                "radius_km must be within [{}, {}], got {}",
                MIN_RADIUS_KM, MAX_RADIUS_KM, radius_km
            )));
        }

        let hits = ProximityIndex::new(&self.snapshot.spaces().landmark)
            .within_radius(landmark, radius_km * 1000.0)?;
        debug!(landmark, radius_km, found = hits.len(), "search nearby");

        Ok(hits
            .into_iter()
            .filter_map(|(index, meters)| {
                let record = self.snapshot.record(index)?;
                Some(ProximitySummary {
                    property_name: record.name.clone(),
                    sub_name: record.sub_name.clone(),
                    nearby_locations_excerpt: excerpt(&record.nearby_locations),
                    distance_km: meters / 1000.0,
                })
            })
            .collect())
    }

    /// Landmark names, sorted for display
    pub fn landmarks(&self) -> Vec<String> {
        let mut names = self.snapshot.spaces().landmark.landmarks.clone();
        names.sort();
        names
    }

    /// Property names in catalog order
    pub fn property_names(&self) -> Vec<String> {
        self.snapshot.records().iter().map(|r| r.name.clone()).collect()
    }
}
