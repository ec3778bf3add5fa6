pub mod app_config;
pub mod backend;
pub mod cache_repo;
pub mod file;
pub mod memory;
pub mod settings;
pub mod stats_repo;
pub mod ticket_repo;

pub use app_config::{AppConfig, CacheRules, StorageKeys, TicketRules};
pub use backend::{StorageBackend, StorageError};
pub use cache_repo::CacheStore;
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use settings::SettingsStore;
pub use stats_repo::StatisticsStore;
pub use ticket_repo::TicketStore;

use std::sync::Arc;

/// Every record set behind one handle, sharing a backend and the
/// persistence gate.
#[derive(Clone)]
pub struct Stores {
    pub tickets: TicketStore,
    pub statistics: StatisticsStore,
    pub cache: CacheStore,
    pub settings: SettingsStore,
}

impl Stores {
    pub fn new(backend: Arc<dyn StorageBackend>, keys: &StorageKeys) -> Self {
        let settings = SettingsStore::new(backend.clone(), keys.persistence_enabled.clone());
        Self {
            tickets: TicketStore::new(backend.clone(), settings.clone(), keys.tickets.clone()),
            statistics: StatisticsStore::new(backend.clone(), keys.statistics.clone()),
            cache: CacheStore::new(backend, keys.cache.clone()),
            settings,
        }
    }

    /// Drop the ticket archive; with `clear_all`, drop statistics and
    /// cache along with it. Tickets and statistics are otherwise
    /// independent records.
    pub fn clear_history(&self, clear_all: bool) {
        self.tickets.clear();
        if clear_all {
            self.statistics.clear();
            self.cache.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fareline_shared::models::{CacheEntry, StatisticsEntry, Ticket};
    use std::collections::HashMap;

    fn seeded_stores() -> Stores {
        let stores = Stores::new(
            Arc::new(MemoryBackend::new()),
            &StorageKeys::default(),
        );

        stores.tickets.save(&[Ticket {
            id: "t1".to_string(),
            serial_numbers: vec!["987654321".to_string()],
            transport_number: "8".to_string(),
            passengers: 1,
            purchase_time: Utc::now(),
            duration: 3600,
            is_expired: false,
        }]);
        stores.statistics.append(StatisticsEntry {
            purchase_time: Utc::now(),
            passengers: 1,
        });
        let mut cache = HashMap::new();
        cache.insert(
            "payment_card_data".to_string(),
            CacheEntry::new(serde_json::json!({"balance": "7.00"}), Utc::now()),
        );
        stores.cache.save(&cache);

        stores
    }

    #[test]
    fn test_clear_tickets_keeps_statistics_and_cache() {
        let stores = seeded_stores();

        stores.clear_history(false);

        assert!(stores.tickets.load().is_empty());
        assert_eq!(stores.statistics.load().tickets.len(), 1);
        assert_eq!(stores.cache.load().len(), 1);
    }

    #[test]
    fn test_clear_all_empties_every_record_set() {
        let stores = seeded_stores();

        stores.clear_history(true);

        assert!(stores.tickets.load().is_empty());
        assert!(stores.statistics.load().is_empty());
        assert!(stores.cache.load().is_empty());
    }
}
