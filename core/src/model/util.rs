use chrono::{DateTime, TimeZone, Utc};
use eyre::{eyre, Context, Result};

/// milliseconds since UNIX epoch
pub fn datetime_to_db_repr(d: &DateTime<Utc>) -> i64 {
    d.timestamp_millis()
}

/// From milliseconds since UNIX epoch
pub fn datetime_from_db_repr(unix_millis: i64) -> Result<DateTime<Utc>> {
    match Utc.timestamp_millis_opt(unix_millis) {
        chrono::LocalResult::Single(dt) => Ok(dt),
        _ => Err(eyre!(
            "error converting unix millis epoch to DateTime: {}",
            unix_millis
        )),
    }
}

/// JSON blobs are stored as text
pub fn json_to_db_repr(value: &serde_json::Value) -> Result<String> {
    serde_json::to_string(value).wrap_err("could not serialize json column")
}

pub fn json_from_db_repr(s: &str) -> Result<serde_json::Value> {
    serde_json::from_str(s).wrap_err("could not parse json column")
}
