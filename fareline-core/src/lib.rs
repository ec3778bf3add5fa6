pub mod cards;
pub mod identity;

pub use cards::CardProfile;
pub use identity::{new_serial, new_serials, new_ticket_id};
