// On-disk cache of built catalog snapshots
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use atomicwrites::{AllowOverwrite, AtomicFile};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use homex_similarity::{CatalogSnapshot, ConfigurationSchema, FusionWeights};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Bumped whenever the encoded layout changes
const CACHE_FORMAT: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheHeader {
    pub format: u32,
    pub fingerprint: String,
    pub created_at: DateTime<Utc>,
    pub properties: usize,
}

#[derive(Serialize)]
struct CacheEntryRef<'a> {
    header: CacheHeader,
    snapshot: &'a CatalogSnapshot,
}

#[derive(Deserialize)]
struct CacheEntry {
    header: CacheHeader,
    snapshot: CatalogSnapshot,
}

/// SHA-256 over the dataset bytes and every build input that shapes the snapshot
pub fn fingerprint(
    dataset: &[u8],
    drop_row: Option<usize>,
    schema: &ConfigurationSchema,
    weights: &FusionWeights,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(dataset);
    match drop_row {
        Some(row) => hasher.update((row as u64).to_le_bytes()),
        None => hasher.update(u64::MAX.to_le_bytes()),
    }
    hasher.update(schema.version.to_le_bytes());
    for label in &schema.labels {
        hasher.update(label.as_bytes());
        hasher.update([0u8]);
    }
    for w in [weights.facility, weights.configuration, weights.landmark] {
        hasher.update(w.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Directory of gzip-compressed, bincode-encoded snapshots keyed by fingerprint
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, fingerprint: &str) -> PathBuf {
        let prefix: String = fingerprint.chars().take(16).collect();
        self.dir.join(format!("catalog-{}.cache", prefix))
    }

    /// `Ok(None)` when no cache exists for this fingerprint or the file on
    /// disk belongs to another one. A file that cannot be decoded is an error.
    pub fn load(&self, fingerprint: &str) -> Result<Option<CatalogSnapshot>> {
        let path = self.path_for(fingerprint);
        if !path.exists() {
            debug!(path = %path.display(), "no cached snapshot");
            return Ok(None);
        }

        let mut decoder = GzDecoder::new(BufReader::new(File::open(&path)?));
        let mut data = Vec::new();
        decoder.read_to_end(&mut data)?;

        let entry: CacheEntry = bincode::deserialize(&data)
            .map_err(|e| anyhow!("Failed to decode cache {}: {}", path.display(), e))?;

        if entry.header.format != CACHE_FORMAT || entry.header.fingerprint != fingerprint {
            debug!(path = %path.display(), "cached snapshot is stale");
            return Ok(None);
        }

        let mut snapshot = entry.snapshot;
        snapshot
            .rehydrate()
            .map_err(|e| anyhow!("Cached snapshot is inconsistent: {}", e))?;

        info!(
            path = %path.display(),
            created_at = %entry.header.created_at,
            properties = entry.header.properties,
            "loaded cached snapshot"
        );
        Ok(Some(snapshot))
    }

    /// Write atomically; readers never observe a half-written file
    pub fn save(&self, fingerprint: &str, snapshot: &CatalogSnapshot) -> Result<PathBuf> {
        let path = self.path_for(fingerprint);
        let entry = CacheEntryRef {
            header: CacheHeader {
                format: CACHE_FORMAT,
                fingerprint: fingerprint.to_string(),
                created_at: Utc::now(),
                properties: snapshot.len(),
            },
            snapshot,
        };
        let data = bincode::serialize(&entry)
            .map_err(|e| anyhow!("Failed to encode snapshot: {}", e))?;

        AtomicFile::new(&path, AllowOverwrite)
            .write(|f| {
                let mut encoder = GzEncoder::new(f, Compression::default());
                encoder.write_all(&data)?;
                encoder.finish()?;
                Ok::<(), std::io::Error>(())
            })
            .map_err(|e| anyhow!("Failed to write cache {}: {}", path.display(), e))?;

        info!(path = %path.display(), bytes = data.len(), "saved snapshot cache");
        Ok(path)
    }
}
