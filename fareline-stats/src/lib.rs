pub mod aggregator;

pub use aggregator::{StatisticsAggregator, TicketStatistics};
