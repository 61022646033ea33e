//! # homex
//!
//! Similar-listing recommendations and landmark proximity search over an
//! apartment catalog.
//!
//! homex turns loosely formatted listing fields (quoted facility lists,
//! per-configuration price/area blobs, landmark distance mappings) into three
//! feature spaces, fuses their cosine similarities into one ranking score, and
//! answers radius queries on true landmark distances.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! homex serve --dataset data/appartments.csv --cache-dir ./cache --http-port 8501
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use homex::prelude::*;
//!
//! let manager = CatalogManager::open(
//!     CatalogConfig::new("data/appartments.csv").with_cache_dir("./cache"),
//! )?;
//! let facade = manager.facade();
//!
//! for n in facade.recommend("Sky Heights", DEFAULT_K)? {
//!     println!("{} ({:.2})", n.property_name, n.fused_score);
//! }
//! for p in facade.search_nearby("Cyber City", DEFAULT_RADIUS_KM)? {
//!     println!("{} {:.1} km", p.property_name, p.distance_km);
//! }
//! # Ok::<(), homex::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! - `homex-core` - records, Field Parser, TF-IDF, scaling, vector math
//! - `homex-similarity` - feature spaces, fused similarity, proximity, query façade
//! - `homex-storage` - CSV loading, snapshot cache, atomic snapshot swaps
//! - `homex-api` - REST API

// Re-export core types
pub use homex_core::{
    ConfigurationDetail, DenseMatrix, Error, LandmarkDistances, ParseFailure, PropertyRecord,
    Result, SparseVector, StandardScaler, TfidfVectorizer, Vector,
};

// Re-export the similarity layer
pub use homex_similarity::{
    CatalogSnapshot, ConfigurationSchema, FeatureBuilder, FusionWeights, NeighborSummary,
    ProximityIndex, ProximitySummary, QueryFacade, ScoreBreakdown, SimilarityEngine,
    DEFAULT_K, DEFAULT_RADIUS_KM, SENTINEL_DISTANCE_M,
};

// Re-export storage
pub use homex_storage::{CatalogConfig, CatalogManager};

// Re-export API
pub use homex_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CatalogConfig, CatalogManager, CatalogSnapshot, ConfigurationSchema, Error,
        FusionWeights, NeighborSummary, PropertyRecord, ProximitySummary, QueryFacade, Result,
        RestApi, DEFAULT_K, DEFAULT_RADIUS_KM,
    };
}

/// Field parsers
pub mod parse {
    pub use homex_core::parse::{
        distance_to_meters, parse_configuration_details, parse_facilities,
        parse_landmark_distances, try_parse_area, try_parse_price_range,
    };
}
