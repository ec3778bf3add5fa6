pub mod cache;
pub mod statistics;
pub mod ticket;

pub use cache::CacheEntry;
pub use statistics::{StatisticsEntry, StatisticsFeed};
pub use ticket::{LegacyTicketRecord, Ticket, TicketRecord};
