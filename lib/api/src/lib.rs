//! HTTP surface over the catalog: listings, recommendations, nearby search, reload.

pub mod rest;

pub use rest::{routes, RestApi, DEFAULT_NEARBY_LIMIT};
