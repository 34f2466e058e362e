//! Timestamp formatting shared by result shapes

use chrono::{SecondsFormat, Utc};

/// Current time as an ISO-8601 / RFC 3339 UTC string with millisecond
/// precision, e.g. `2026-08-23T12:34:56.789Z`.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
