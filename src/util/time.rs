use chrono::{DateTime, Utc};

// Wall-clock stamp used on fetch results, e.g. "2024-05-01 12:00:00 UTC".
pub fn fetch_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

// Opaque per-fetch key for the viewer store; second granularity.
pub fn session_key(at: DateTime<Utc>) -> String {
    at.timestamp().to_string()
}
