use chrono::{DateTime, Local, TimeZone, Utc};

/// Splits epoch millis into whole seconds and the leftover microseconds and
/// builds a local timestamp from them. Out-of-range values fall back to the epoch.
pub fn millis_to_local(millis: i64) -> DateTime<Local> {
    let secs = millis.div_euclid(1000);
    let micros = millis.rem_euclid(1000) * 1000;
    Local
        .timestamp_opt(secs, (micros * 1000) as u32)
        .single()
        .unwrap_or_else(|| DateTime::<Local>::from(DateTime::<Utc>::UNIX_EPOCH))
}
