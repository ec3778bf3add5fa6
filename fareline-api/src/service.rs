use fareline_cache::TtlCache;
use fareline_core::CardProfile;
use fareline_shared::models::Ticket;
use fareline_shared::Clock;
use fareline_stats::{StatisticsAggregator, TicketStatistics};
use fareline_store::{AppConfig, SettingsStore, StorageBackend, Stores};
use fareline_ticket::{TicketEngine, TicketError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Key the purchase screen's cosmetic card data is cached under.
const CARD_PROFILE_KEY: &str = "payment_card_data";

/// The one handle a UI layer talks to: ticket lifecycle, statistics,
/// the TTL cache and the persistence toggle, wired over a shared
/// backend and clock.
pub struct Ticketing {
    engine: TicketEngine,
    statistics: StatisticsAggregator,
    cache: TtlCache,
    settings: SettingsStore,
}

impl Ticketing {
    pub fn new(config: AppConfig, backend: Arc<dyn StorageBackend>, clock: Arc<dyn Clock>) -> Self {
        let stores = Stores::new(backend, &config.storage);
        let settings = stores.settings.clone();

        let statistics = StatisticsAggregator::new(
            stores.statistics.clone(),
            settings.clone(),
            clock.clone(),
            config.ticket.unit_price,
        );
        let cache = TtlCache::new(stores.cache.clone(), clock.clone(), config.cache.ttl_seconds);
        let engine = TicketEngine::new(stores, clock, config.ticket);

        Self {
            engine,
            statistics,
            cache,
            settings,
        }
    }

    pub fn create_ticket(
        &self,
        transport_number: &str,
        passengers: u32,
    ) -> Result<Ticket, TicketError> {
        self.engine.create_ticket(transport_number, passengers)
    }

    pub fn list_tickets(&self) -> Vec<Ticket> {
        self.engine.list_tickets()
    }

    pub fn remaining_seconds(&self, ticket: &Ticket) -> u64 {
        self.engine.remaining_seconds(ticket)
    }

    pub fn mark_expired_if_due(&self, ticket_id: &str) {
        self.engine.mark_expired_if_due(ticket_id);
    }

    pub fn clear_history(&self, clear_all: bool) {
        self.engine.clear_history(clear_all);
    }

    pub fn compute_statistics(&self) -> TicketStatistics {
        self.statistics.compute()
    }

    pub fn get_or_generate_cached<T, F>(&self, key: &str, generate: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        self.cache.get_or_generate(key, generate)
    }

    pub fn try_get_or_generate_cached<T, E, F>(&self, key: &str, generate: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        self.cache.try_get_or_generate(key, generate)
    }

    /// Cosmetic card data for the purchase screen, stable for a day
    /// rather than regenerated per render.
    pub fn card_profile(&self) -> CardProfile {
        self.cache
            .get_or_generate(CARD_PROFILE_KEY, CardProfile::generate)
    }

    pub fn sweep_expired_cache(&self) -> usize {
        self.cache.sweep_expired()
    }

    pub fn cache_size_bytes(&self) -> u64 {
        self.cache.size_bytes()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Backfill the statistics feed from a pre-statistics ticket
    /// archive; a no-op otherwise.
    pub fn sync_statistics(&self) {
        self.engine.sync_statistics();
    }

    pub fn set_persistence_enabled(&self, enabled: bool) {
        self.settings.set_persistence_enabled(enabled);
    }

    pub fn is_persistence_enabled(&self) -> bool {
        self.settings.is_persistence_enabled()
    }
}
