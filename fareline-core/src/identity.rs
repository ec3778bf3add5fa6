use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

/// Opaque ticket id: hex-encoded creation millis plus a random suffix.
///
/// Process-unique with negligible collision probability; not meant to be
/// cryptographically strong.
pub fn new_ticket_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().max(0);
    format!("{:x}{}", millis, Uuid::new_v4().simple())
}

/// A 9-digit printed serial in [100000000, 999999999].
pub fn new_serial() -> String {
    rand::thread_rng()
        .gen_range(100_000_000u32..=999_999_999)
        .to_string()
}

/// One independently generated serial per passenger. `count` must be at
/// least 1; the engine never calls with 0.
pub fn new_serials(count: u32) -> Vec<String> {
    (0..count).map(|_| new_serial()).collect()
}
