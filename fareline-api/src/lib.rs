pub mod service;
pub mod timers;

pub use service::Ticketing;
pub use timers::TimerGroup;

// The surface a UI layer needs, re-exported so collaborators depend on
// this crate alone.
pub use fareline_core::CardProfile;
pub use fareline_shared::models::Ticket;
pub use fareline_shared::{Clock, ManualClock, SystemClock};
pub use fareline_stats::TicketStatistics;
pub use fareline_store::{AppConfig, FileBackend, MemoryBackend, StorageBackend};
pub use fareline_ticket::TicketError;
