use fareline_core::{new_serials, new_ticket_id};
use fareline_shared::models::{StatisticsEntry, Ticket};
use fareline_shared::Clock;
use fareline_store::{Stores, TicketRules};
use std::sync::Arc;
use tracing::info;

/// Drives every ticket through its one-way lifecycle: Active → Expired.
///
/// The engine computes expiration on demand from the injected clock and
/// mirrors state changes into storage; it owns no timers.
pub struct TicketEngine {
    stores: Stores,
    clock: Arc<dyn Clock>,
    rules: TicketRules,
}

#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("transport number must not be empty")]
    EmptyTransportNumber,

    #[error("transport number must contain digits only: {0}")]
    NonNumericTransportNumber(String),

    #[error("passenger count must be at least 1")]
    NoPassengers,
}

impl TicketEngine {
    pub fn new(stores: Stores, clock: Arc<dyn Clock>, rules: TicketRules) -> Self {
        Self {
            stores,
            clock,
            rules,
        }
    }

    /// Create, persist and register a new ticket.
    ///
    /// Validation runs before anything is constructed; a rejected input
    /// writes no partial state. The new ticket goes to the head of the
    /// archive and a projection of it is appended to the statistics
    /// feed.
    pub fn create_ticket(
        &self,
        transport_number: &str,
        passengers: u32,
    ) -> Result<Ticket, TicketError> {
        let transport_number = transport_number.trim();
        if transport_number.is_empty() {
            return Err(TicketError::EmptyTransportNumber);
        }
        if !transport_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(TicketError::NonNumericTransportNumber(
                transport_number.to_string(),
            ));
        }
        if passengers < 1 {
            return Err(TicketError::NoPassengers);
        }

        let now = self.clock.now();
        let ticket = Ticket {
            id: new_ticket_id(now),
            serial_numbers: new_serials(passengers),
            transport_number: transport_number.to_string(),
            passengers,
            purchase_time: now,
            duration: self.rules.duration_seconds,
            is_expired: false,
        };

        let mut tickets = self.stores.tickets.load();
        tickets.insert(0, ticket.clone());
        self.stores.tickets.save(&tickets);

        self.stores.statistics.append(StatisticsEntry {
            purchase_time: now,
            passengers,
        });

        info!(ticket_id = %ticket.id, passengers, "ticket created");
        Ok(ticket)
    }

    /// The full archive, newest first.
    pub fn list_tickets(&self) -> Vec<Ticket> {
        self.stores.tickets.load()
    }

    /// Seconds of validity left right now; never negative.
    pub fn remaining_seconds(&self, ticket: &Ticket) -> u64 {
        ticket.remaining_at(self.clock.now())
    }

    /// Flip the stored record to expired once its window has elapsed.
    ///
    /// Idempotent: a ticket already marked expired, still valid, or
    /// unknown leaves storage untouched.
    pub fn mark_expired_if_due(&self, ticket_id: &str) {
        let now = self.clock.now();
        let mut tickets = self.stores.tickets.load();

        let Some(ticket) = tickets.iter_mut().find(|t| t.id == ticket_id) else {
            return;
        };
        if ticket.is_expired || !ticket.is_due_at(now) {
            return;
        }

        ticket.is_expired = true;
        self.stores.tickets.save(&tickets);
        info!(ticket_id, "ticket expired");
    }

    /// Rebuild the statistics feed from the archive when the feed is
    /// empty, for installs that predate separate statistics storage.
    pub fn sync_statistics(&self) {
        let tickets = self.stores.tickets.load();
        self.stores.statistics.sync_from_tickets(&tickets);
    }

    pub fn clear_history(&self, clear_all: bool) {
        self.stores.clear_history(clear_all);
    }
}
