use crate::backend::{read_json, write_json, StorageBackend};
use crate::settings::SettingsStore;
use fareline_shared::models::{Ticket, TicketRecord};
use std::sync::Arc;
use tracing::{debug, error, info};

/// The ticket record set: loaded whole, written whole, newest first.
#[derive(Clone)]
pub struct TicketStore {
    backend: Arc<dyn StorageBackend>,
    settings: SettingsStore,
    key: String,
}

impl TicketStore {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        settings: SettingsStore,
        key: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            settings,
            key: key.into(),
        }
    }

    /// Load every ticket, upgrading legacy single-serial records in place.
    ///
    /// An absent or corrupted record set degrades to an empty archive.
    /// When at least one record needed upgrading, the normalized set is
    /// written back immediately (subject to the persistence gate) so the
    /// migration runs once per install, not once per read.
    pub fn load(&self) -> Vec<Ticket> {
        let records: Vec<TicketRecord> = match read_json(self.backend.as_ref(), &self.key) {
            Ok(Some(records)) => records,
            Ok(None) => return Vec::new(),
            Err(err) => {
                error!(%err, "failed to load tickets, falling back to empty archive");
                return Vec::new();
            }
        };

        let migrated_count = records.iter().filter(|r| r.is_legacy()).count();
        let tickets: Vec<Ticket> = records.into_iter().map(TicketRecord::into_current).collect();

        if migrated_count > 0 {
            info!(migrated_count, "upgraded legacy ticket records");
            self.save(&tickets);
        }

        tickets
    }

    /// Persist the whole ticket set. Returns false without writing when
    /// the user has disabled persistence (the data is dropped, not
    /// queued) or when the backend rejects the write.
    pub fn save(&self, tickets: &[Ticket]) -> bool {
        if !self.settings.is_persistence_enabled() {
            debug!("persistence disabled, dropping ticket write");
            return false;
        }

        match write_json(self.backend.as_ref(), &self.key, &tickets) {
            Ok(()) => true,
            Err(err) => {
                error!(%err, "failed to save tickets");
                false
            }
        }
    }

    pub fn clear(&self) {
        if let Err(err) = self.backend.remove(&self.key) {
            error!(%err, "failed to clear ticket archive");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use chrono::Utc;

    fn ticket(id: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            serial_numbers: vec!["123456789".to_string()],
            transport_number: "10".to_string(),
            passengers: 1,
            purchase_time: Utc::now(),
            duration: 3600,
            is_expired: false,
        }
    }

    fn stores() -> (Arc<MemoryBackend>, TicketStore) {
        let backend = Arc::new(MemoryBackend::new());
        let settings = SettingsStore::new(backend.clone(), "storage_enabled");
        let store = TicketStore::new(backend.clone(), settings, "transport_tickets");
        (backend, store)
    }

    #[test]
    fn test_load_empty_archive() {
        let (_, store) = stores();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let (_, store) = stores();

        assert!(store.save(&[ticket("a"), ticket("b")]));
        let loaded = store.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "a");
    }

    #[test]
    fn test_corrupted_payload_degrades_to_empty() {
        let (backend, store) = stores();
        backend.set("transport_tickets", "{not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_disabled_persistence_drops_writes() {
        let (backend, store) = stores();
        assert!(store.save(&[ticket("kept")]));

        store.settings.set_persistence_enabled(false);
        assert!(!store.save(&[ticket("dropped")]));

        // the stored set still holds the pre-toggle write
        let raw = backend.get("transport_tickets").unwrap().unwrap();
        assert!(raw.contains("kept"));
        assert!(!raw.contains("dropped"));
    }

    #[test]
    fn test_legacy_records_migrate_and_persist() {
        let (backend, store) = stores();
        let raw = r#"[
            {"id": "new1", "serialNumbers": ["111111111", "222222222"], "transportNumber": "5",
             "passengers": 2, "purchaseTime": "2025-06-01T08:00:00Z", "duration": 3600, "isExpired": false},
            {"id": "old1", "serialNumber": "333333333", "transportNumber": "7",
             "purchaseTime": "2025-05-01T08:00:00Z", "duration": 3600, "isExpired": true}
        ]"#;
        backend.set("transport_tickets", raw).unwrap();

        let tickets = store.load();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[1].serial_numbers, vec!["333333333".to_string()]);
        assert_eq!(tickets[1].passengers, 1);

        // normalized shape was written back
        let persisted = backend.get("transport_tickets").unwrap().unwrap();
        assert!(!persisted.contains("serialNumber\""));
        assert!(persisted.contains("serialNumbers"));
    }

    #[test]
    fn test_migration_is_idempotent() {
        let (backend, store) = stores();
        let raw = r#"[{"id": "old1", "serialNumber": "333333333", "transportNumber": "7",
            "purchaseTime": "2025-05-01T08:00:00Z", "duration": 3600, "isExpired": false}]"#;
        backend.set("transport_tickets", raw).unwrap();

        let first = store.load();
        let after_first = backend.get("transport_tickets").unwrap().unwrap();
        let second = store.load();
        let after_second = backend.get("transport_tickets").unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(after_first, after_second);
    }
}
