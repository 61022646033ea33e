use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use homex_core::Result;
use homex_similarity::{CatalogSnapshot, ConfigurationSchema, FusionWeights, QueryFacade};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::{fingerprint, SnapshotCache};
use crate::loader::{read_records, MALFORMED_ROW};

/// Where the catalog comes from and how it is built
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub dataset: PathBuf,
    /// Snapshot cache directory; no caching when unset
    pub cache_dir: Option<PathBuf>,
    /// Data row dropped before parsing
    pub drop_row: Option<usize>,
    pub schema: ConfigurationSchema,
    pub weights: FusionWeights,
}

impl CatalogConfig {
    pub fn new<P: AsRef<Path>>(dataset: P) -> Self {
        Self {
            dataset: dataset.as_ref().to_path_buf(),
            cache_dir: None,
            drop_row: Some(MALFORMED_ROW),
            schema: ConfigurationSchema::default(),
            weights: FusionWeights::default(),
        }
    }

    #[must_use]
    pub fn with_cache_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cache_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn with_drop_row(mut self, row: Option<usize>) -> Self {
        self.drop_row = row;
        self
    }
}

/// Holds the current catalog snapshot and swaps it atomically on reload.
///
/// Readers take an `Arc` clone and keep using it for as long as they like;
/// a reload never touches a published snapshot.
pub struct CatalogManager {
    config: CatalogConfig,
    cache: Option<SnapshotCache>,
    current: RwLock<Arc<CatalogSnapshot>>,
    /// Held across build and swap so reloads publish in the order they ran
    reload_lock: Mutex<()>,
    generation: AtomicU64,
}

impl CatalogManager {
    pub fn open(config: CatalogConfig) -> Result<Self> {
        let cache = config.cache_dir.as_ref().and_then(|dir| match SnapshotCache::new(dir) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(dir = %dir.display(), "snapshot cache disabled: {}", e);
                None
            }
        });

        let snapshot = Self::load_or_build(&config, cache.as_ref())?;
        info!(
            dataset = %config.dataset.display(),
            properties = snapshot.len(),
            "catalog opened"
        );

        Ok(Self {
            config,
            cache,
            current: RwLock::new(Arc::new(snapshot)),
            reload_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        })
    }

    fn load_or_build(config: &CatalogConfig, cache: Option<&SnapshotCache>) -> Result<CatalogSnapshot> {
        let started = Instant::now();
        let bytes = std::fs::read(&config.dataset)?;
        let key = fingerprint(&bytes, config.drop_row, &config.schema, &config.weights);

        if let Some(cache) = cache {
            match cache.load(&key) {
                Ok(Some(snapshot)) => return Ok(snapshot),
                Ok(None) => debug!("snapshot cache miss"),
                Err(e) => warn!("discarding unreadable snapshot cache: {}", e),
            }
        }

        let records = read_records(bytes.as_slice(), config.drop_row)?;
        let snapshot = CatalogSnapshot::build(records, config.schema.clone(), config.weights)?;

        if let Some(cache) = cache {
            if let Err(e) = cache.save(&key, &snapshot) {
                warn!("failed to save snapshot cache: {}", e);
            }
        }

        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "catalog built");
        Ok(snapshot)
    }

    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().clone()
    }

    /// Query façade over the current snapshot
    pub fn facade(&self) -> QueryFacade {
        QueryFacade::new(self.snapshot())
    }

    /// Rebuild from the dataset file and publish the result.
    /// On failure the previous snapshot stays in place. Concurrent reloads
    /// run one at a time; readers are never blocked by the build.
    pub fn reload(&self) -> Result<Arc<CatalogSnapshot>> {
        let _guard = self.reload_lock.lock();
        let snapshot = match Self::load_or_build(&self.config, self.cache.as_ref()) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                warn!("reload failed, keeping current snapshot: {}", e);
                return Err(e);
            }
        };

        *self.current.write() = snapshot.clone();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation, properties = snapshot.len(), "catalog snapshot swapped");
        Ok(snapshot)
    }

    /// Number of successful reloads since open
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}
