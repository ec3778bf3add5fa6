use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use fareline_shared::Clock;
use fareline_store::{SettingsStore, StatisticsStore};
use serde::Serialize;
use std::sync::Arc;

/// Aggregate ride counts and spend derived from the statistics feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TicketStatistics {
    pub today: u32,
    pub week: u32,
    pub month: u32,
    pub total: u32,
    pub total_spent: f64,
}

impl TicketStatistics {
    pub fn zero() -> Self {
        Self {
            today: 0,
            week: 0,
            month: 0,
            total: 0,
            total_spent: 0.0,
        }
    }
}

/// Computes reporting windows over the durable statistics feed.
///
/// Derives purely from the feed: the ticket archive is never read, so
/// clearing ticket history leaves these numbers intact.
pub struct StatisticsAggregator {
    statistics: StatisticsStore,
    settings: SettingsStore,
    clock: Arc<dyn Clock>,
    unit_price: f64,
}

impl StatisticsAggregator {
    pub fn new(
        statistics: StatisticsStore,
        settings: SettingsStore,
        clock: Arc<dyn Clock>,
        unit_price: f64,
    ) -> Self {
        Self {
            statistics,
            settings,
            clock,
            unit_price,
        }
    }

    /// All-window statistics at this instant.
    ///
    /// With persistence disabled this returns zeros without touching the
    /// feed at all. "Today" starts at local midnight and "month" at the
    /// local first-of-month, while "week" is a rolling 168-hour window;
    /// the mixed boundary rules are kept as-is. All boundaries are
    /// inclusive.
    pub fn compute(&self) -> TicketStatistics {
        if !self.settings.is_persistence_enabled() {
            return TicketStatistics::zero();
        }

        let feed = self.statistics.load();
        let now = self.clock.now();

        let today_start = local_midnight(now.with_timezone(&Local).date_naive(), now);
        let week_start = now - Duration::days(7);
        let month_start = month_start(now);

        let mut stats = TicketStatistics::zero();
        for entry in &feed.tickets {
            stats.total += entry.passengers;
            stats.total_spent += entry.passengers as f64 * self.unit_price;

            if entry.purchase_time >= today_start {
                stats.today += entry.passengers;
            }
            if entry.purchase_time >= week_start {
                stats.week += entry.passengers;
            }
            if entry.purchase_time >= month_start {
                stats.month += entry.passengers;
            }
        }

        stats.total_spent = (stats.total_spent * 100.0).round() / 100.0;
        stats
    }
}

fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let local_day = now.with_timezone(&Local).date_naive();
    let first = local_day.with_day(1).unwrap_or(local_day);
    local_midnight(first, now)
}

/// Local midnight of `day` as a UTC instant. A midnight skipped or
/// doubled by a DST transition resolves to the earliest valid instant,
/// falling back to `now` if the offset cannot be resolved at all.
fn local_midnight(day: NaiveDate, now: DateTime<Utc>) -> DateTime<Utc> {
    day.and_hms_opt(0, 0, 0)
        .and_then(|t| t.and_local_timezone(Local).earliest())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fareline_shared::models::StatisticsEntry;
    use fareline_shared::ManualClock;
    use fareline_store::MemoryBackend;

    fn aggregator(unit_price: f64) -> (Arc<ManualClock>, StatisticsStore, StatisticsAggregator) {
        let backend = Arc::new(MemoryBackend::new());
        let statistics = StatisticsStore::new(backend.clone(), "transport_statistics");
        let settings = SettingsStore::new(backend, "storage_enabled");
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let aggregator = StatisticsAggregator::new(
            statistics.clone(),
            settings,
            clock.clone(),
            unit_price,
        );
        (clock, statistics, aggregator)
    }

    fn entry(at: DateTime<Utc>, passengers: u32) -> StatisticsEntry {
        StatisticsEntry {
            purchase_time: at,
            passengers,
        }
    }

    #[test]
    fn test_empty_feed_is_all_zero() {
        let (_, _, aggregator) = aggregator(12.0);
        assert_eq!(aggregator.compute(), TicketStatistics::zero());
    }

    #[test]
    fn test_windows_partition_the_feed() {
        let (clock, statistics, aggregator) = aggregator(12.0);
        let now = clock.now();

        // bought this instant: counts everywhere
        statistics.append(entry(now, 2));
        // two days back: inside week and (usually) month, never today
        statistics.append(entry(now - Duration::days(2), 1));
        // forty days back: before any window
        statistics.append(entry(now - Duration::days(40), 3));

        let stats = aggregator.compute();
        assert_eq!(stats.today, 2);
        assert_eq!(stats.week, 3);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.total_spent, 72.0);
    }

    #[test]
    fn test_week_is_a_rolling_window() {
        let (clock, statistics, aggregator) = aggregator(12.0);
        let now = clock.now();

        statistics.append(entry(now - Duration::days(6), 1));
        statistics.append(entry(now - Duration::days(8), 1));

        let stats = aggregator.compute();
        assert_eq!(stats.week, 1);
        assert_eq!(stats.total, 2);
    }

    #[test]
    fn test_spend_rounds_to_cents() {
        let (clock, statistics, aggregator) = aggregator(0.1);
        let now = clock.now();

        for _ in 0..3 {
            statistics.append(entry(now, 1));
        }

        // 3 * 0.1 accumulates float error without the final rounding
        assert_eq!(aggregator.compute().total_spent, 0.3);
    }

    #[test]
    fn test_disabled_persistence_reads_as_zero() {
        let (clock, statistics, aggregator) = aggregator(12.0);
        statistics.append(entry(clock.now(), 5));

        aggregator.settings.set_persistence_enabled(false);
        assert_eq!(aggregator.compute(), TicketStatistics::zero());

        // the feed itself is untouched; re-enabling restores the numbers
        aggregator.settings.set_persistence_enabled(true);
        assert_eq!(aggregator.compute().total, 5);
    }
}
