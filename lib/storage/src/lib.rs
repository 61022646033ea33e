pub mod cache;
pub mod loader;
pub mod manager;

pub use cache::SnapshotCache;
pub use loader::{load_records, read_records, MALFORMED_ROW};
pub use manager::{CatalogConfig, CatalogManager};
