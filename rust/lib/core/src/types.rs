use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new record ID (UUIDv7, no dashes).
///
/// UUIDv7 is time-ordered: within one process, IDs generated later compare
/// greater as strings.
pub fn new_id() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Current UTC time.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
