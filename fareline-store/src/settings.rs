use crate::backend::StorageBackend;
use std::sync::Arc;
use tracing::warn;

/// Durable user flags, one string record per flag.
///
/// A flag reads as `true` only when stored exactly as `"true"`; an absent
/// or unreadable record falls back to the flag's default.
#[derive(Clone)]
pub struct SettingsStore {
    backend: Arc<dyn StorageBackend>,
    persistence_key: String,
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn StorageBackend>, persistence_key: impl Into<String>) -> Self {
        Self {
            backend,
            persistence_key: persistence_key.into(),
        }
    }

    /// Gate for ticket writes and statistics reads. Defaults to enabled.
    pub fn is_persistence_enabled(&self) -> bool {
        self.flag(&self.persistence_key, true)
    }

    pub fn set_persistence_enabled(&self, enabled: bool) {
        self.set_flag(&self.persistence_key, enabled);
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.backend.get(key) {
            Ok(Some(raw)) => raw == "true",
            Ok(None) => default,
            Err(err) => {
                warn!(key, %err, "failed to read settings flag, using default");
                default
            }
        }
    }

    pub fn set_flag(&self, key: &str, value: bool) {
        let raw = if value { "true" } else { "false" };
        if let Err(err) = self.backend.set(key, raw) {
            warn!(key, %err, "failed to persist settings flag");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    fn store() -> SettingsStore {
        SettingsStore::new(Arc::new(MemoryBackend::new()), "storage_enabled")
    }

    #[test]
    fn test_persistence_defaults_to_enabled() {
        assert!(store().is_persistence_enabled());
    }

    #[test]
    fn test_toggle_round_trip() {
        let settings = store();

        settings.set_persistence_enabled(false);
        assert!(!settings.is_persistence_enabled());

        settings.set_persistence_enabled(true);
        assert!(settings.is_persistence_enabled());
    }

    #[test]
    fn test_garbage_value_reads_as_disabled() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set("storage_enabled", "yes please").unwrap();

        let settings = SettingsStore::new(backend, "storage_enabled");
        assert!(!settings.is_persistence_enabled());
    }

    #[test]
    fn test_named_flag_with_false_default() {
        let settings = store();
        assert!(!settings.flag("offline_mode_enabled", false));

        settings.set_flag("offline_mode_enabled", true);
        assert!(settings.flag("offline_mode_enabled", false));
    }
}
