use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single-use transit ticket with a fixed validity window.
///
/// Persisted field names stay camelCase so stored records from earlier
/// releases deserialize unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    /// One serial per passenger; `serial_numbers.len() == passengers`
    /// for every ticket created by the engine.
    pub serial_numbers: Vec<String>,
    pub transport_number: String,
    pub passengers: u32,
    pub purchase_time: DateTime<Utc>,
    /// Validity window in seconds, fixed at creation.
    pub duration: u64,
    pub is_expired: bool,
}

impl Ticket {
    /// Seconds of validity left at `now`, clamped to zero.
    ///
    /// Recomputed on demand from the purchase instant; the stored
    /// `is_expired` flag is a persisted side effect, not the authority.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> u64 {
        let elapsed = (now - self.purchase_time).num_seconds();
        if elapsed <= 0 {
            return self.duration;
        }
        self.duration.saturating_sub(elapsed as u64)
    }

    /// Whether the validity window has fully elapsed at `now`.
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.remaining_at(now) == 0
    }
}

/// Pre-multi-passenger record shape: a single scalar serial and an
/// optional passenger count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTicketRecord {
    pub id: String,
    pub serial_number: String,
    pub transport_number: String,
    #[serde(default)]
    pub passengers: Option<u32>,
    pub purchase_time: DateTime<Utc>,
    pub duration: u64,
    pub is_expired: bool,
}

/// Every record shape the ticket set may contain on disk.
///
/// Current records carry `serialNumbers`; legacy ones carry a scalar
/// `serialNumber`, which is what the untagged match keys on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TicketRecord {
    Current(Ticket),
    Legacy(LegacyTicketRecord),
}

impl TicketRecord {
    pub fn is_legacy(&self) -> bool {
        matches!(self, TicketRecord::Legacy(_))
    }

    /// Normalize to the current shape. Upgrading a legacy record wraps
    /// its serial into a one-element list and defaults `passengers` to 1;
    /// current records pass through untouched, so the upgrade is
    /// idempotent.
    pub fn into_current(self) -> Ticket {
        match self {
            TicketRecord::Current(ticket) => ticket,
            TicketRecord::Legacy(legacy) => Ticket {
                id: legacy.id,
                serial_numbers: vec![legacy.serial_number],
                transport_number: legacy.transport_number,
                passengers: legacy.passengers.unwrap_or(1),
                purchase_time: legacy.purchase_time,
                duration: legacy.duration,
                is_expired: legacy.is_expired,
            },
        }
    }
}
