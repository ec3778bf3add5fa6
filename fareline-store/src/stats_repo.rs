use crate::backend::{read_json, write_json, StorageBackend};
use fareline_shared::models::{StatisticsEntry, StatisticsFeed, Ticket};
use std::sync::Arc;
use tracing::{error, info};

/// The append-only statistics feed.
///
/// The persistence flag gates ticket writes and statistics reads; feed
/// writes are not gated.
#[derive(Clone)]
pub struct StatisticsStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
}

impl StatisticsStore {
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn load(&self) -> StatisticsFeed {
        match read_json(self.backend.as_ref(), &self.key) {
            Ok(Some(feed)) => feed,
            Ok(None) => StatisticsFeed::default(),
            Err(err) => {
                error!(%err, "failed to load statistics, falling back to empty feed");
                StatisticsFeed::default()
            }
        }
    }

    pub fn save(&self, feed: &StatisticsFeed) -> bool {
        match write_json(self.backend.as_ref(), &self.key, feed) {
            Ok(()) => true,
            Err(err) => {
                error!(%err, "failed to save statistics");
                false
            }
        }
    }

    pub fn append(&self, entry: StatisticsEntry) {
        let mut feed = self.load();
        feed.record(entry);
        self.save(&feed);
    }

    /// Rebuild an empty feed from an existing ticket archive, for
    /// installs that predate separate statistics storage.
    pub fn sync_from_tickets(&self, tickets: &[Ticket]) {
        if tickets.is_empty() || !self.load().is_empty() {
            return;
        }

        let feed = StatisticsFeed {
            tickets: tickets
                .iter()
                .map(|t| StatisticsEntry {
                    purchase_time: t.purchase_time,
                    passengers: t.passengers,
                })
                .collect(),
        };
        info!(entries = feed.tickets.len(), "rebuilt statistics feed from ticket archive");
        self.save(&feed);
    }

    pub fn clear(&self) {
        if let Err(err) = self.backend.remove(&self.key) {
            error!(%err, "failed to clear statistics feed");
        }
    }
}
