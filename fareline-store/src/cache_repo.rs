use crate::backend::{read_json, write_json, StorageBackend};
use fareline_shared::models::CacheEntry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, warn};

/// The generated-data cache record: a map from caller-chosen keys to
/// `{data, timestamp}` entries, persisted whole.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn load(&self) -> HashMap<String, CacheEntry> {
        match read_json(self.backend.as_ref(), &self.key) {
            Ok(Some(entries)) => entries,
            Ok(None) => HashMap::new(),
            Err(err) => {
                warn!(%err, "failed to load cache, starting empty");
                HashMap::new()
            }
        }
    }

    pub fn save(&self, entries: &HashMap<String, CacheEntry>) -> bool {
        match write_json(self.backend.as_ref(), &self.key, entries) {
            Ok(()) => true,
            Err(err) => {
                error!(%err, "failed to save cache");
                false
            }
        }
    }

    pub fn clear(&self) {
        if let Err(err) = self.backend.remove(&self.key) {
            error!(%err, "failed to clear cache");
        }
    }

    /// Serialized size of the stored cache record, for the settings
    /// screen. Absent or unreadable reads as zero.
    pub fn size_bytes(&self) -> u64 {
        match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw.len() as u64,
            Ok(None) => 0,
            Err(_) => 0,
        }
    }
}
