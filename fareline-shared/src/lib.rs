pub mod clock;
pub mod models;
pub mod time;

pub use clock::{Clock, ManualClock, SystemClock};
