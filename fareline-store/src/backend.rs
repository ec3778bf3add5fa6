use serde::de::DeserializeOwned;
use serde::Serialize;

/// Failures of the underlying store. These never cross the persistence
/// boundary: repositories absorb them into empty defaults (reads) or a
/// `false` return (writes) and log the cause.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupted payload: {0}")]
    Corrupted(#[from] serde_json::Error),
}

/// Synchronous string key-value storage.
///
/// Models browser local storage: fast, unreliable, whole-value writes,
/// last writer wins. Implementations must not panic on contention or
/// quota pressure; they report `StorageError` instead.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub(crate) fn read_json<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match backend.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub(crate) fn write_json<T: Serialize>(
    backend: &dyn StorageBackend,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    backend.set(key, &raw)
}
