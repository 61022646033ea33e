//! # homex Similarity
//!
//! Feature spaces, similarity fusion and proximity search over a property catalog.
//!
//! ## Features
//!
//! - **Feature Builder**: facility TF-IDF, standardized configuration block, landmark distances
//! - **Similarity Engine**: per-space cosine matrices fused with fixed weights (30/20/8)
//! - **Proximity Index**: radius queries on true meter distances
//! - **Query Façade**: `recommend` and `search_nearby` over an immutable [`CatalogSnapshot`]
//! - **Explainability**: per-space score breakdown for every recommendation
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use homex_core::PropertyRecord;
//! use homex_similarity::{CatalogSnapshot, ConfigurationSchema, FusionWeights, QueryFacade};
//!
//! let records = vec![
//!     PropertyRecord::new("A").with_top_facilities("['Gym', 'Pool']"),
//!     PropertyRecord::new("B").with_top_facilities("['Gym', 'Pool']"),
//!     PropertyRecord::new("C").with_top_facilities("['Helipad']"),
//! ];
//! let snapshot = CatalogSnapshot::build(records, ConfigurationSchema::default(), FusionWeights::default()).unwrap();
//! let facade = QueryFacade::new(Arc::new(snapshot));
//! let top = facade.recommend("A", 1).unwrap();
//! assert_eq!(top[0].property_name, "B");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │   Records   │────>│  Embedder   │────>│ FeatureSpaces│
//! │ (raw text)  │     │ (parse→rows)│     │  (3 spaces)  │
//! └─────────────┘     └─────────────┘     └──────────────┘
//!                                           │          │
//!                      ┌─────────────┐      │          │
//!                      │  Reranker   │<─────┘          │
//!                      │ (fused top-k)│                │
//!                      └─────────────┘                 │
//!                             │          ┌─────────────┐
//!                      ┌─────────────┐   │  Proximity  │
//!                      │ QueryFacade │<──│ (raw meters)│
//!                      └─────────────┘   └─────────────┘
//! ```

pub mod catalog;
pub mod distance;
pub mod embedder;
pub mod explain;
pub mod proximity;
pub mod query;
pub mod rerank;
pub mod schema;

// Re-export main types for convenience
pub use catalog::CatalogSnapshot;
pub use distance::{cosine_similarity_matrix, sparse_cosine_similarity_matrix, SimilarityMatrix};
pub use embedder::{
    build_configuration_space, build_facility_space, build_landmark_space, ConfigurationSpace,
    FacilitySpace, FeatureBuilder, FeatureSpaces, LandmarkSpace, SENTINEL_DISTANCE_M,
};
pub use explain::{NeighborSummary, ProximitySummary};
pub use proximity::ProximityIndex;
pub use query::{QueryFacade, DEFAULT_K, DEFAULT_RADIUS_KM, MAX_RADIUS_KM, MIN_RADIUS_KM};
pub use rerank::{Neighbor, ScoreBreakdown, SimilarityEngine};
pub use schema::{ConfigurationSchema, FusionWeights, SchemaError, DEFAULT_LABELS};
