use chrono::{DateTime, Local, Utc};

/// Format a timestamp as DD.MM.YYYY in the local timezone.
pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d.%m.%Y").to_string()
}

/// Format a timestamp as HH:MM:SS in the local timezone.
pub fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Format a countdown as MM:SS. Negative input renders as 00:00.
pub fn format_timer(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Whole seconds elapsed between two instants.
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - start).num_seconds()
}

/// Join serials two per line, the layout printed on a ticket card.
pub fn format_serials(serials: &[String]) -> String {
    serials
        .chunks(2)
        .map(|pair| pair.join(", "))
        .collect::<Vec<_>>()
        .join(",\n")
}
