pub mod engine;

pub use engine::{TicketEngine, TicketError};
