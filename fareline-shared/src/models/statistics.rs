use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimal projection of a purchase kept for aggregate reporting.
///
/// Stored in its own record set so clearing the ticket archive does not
/// erase historical counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsEntry {
    pub purchase_time: DateTime<Utc>,
    pub passengers: u32,
}

/// The append-only statistics feed as persisted: `{"tickets": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatisticsFeed {
    pub tickets: Vec<StatisticsEntry>,
}

impl StatisticsFeed {
    pub fn record(&mut self, entry: StatisticsEntry) {
        self.tickets.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}
