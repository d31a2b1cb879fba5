//! Timestamp parsing and time-zone conversion with chrono + chrono-tz.
//!
//! Zone-less local times are resolved against a named IANA zone. Resolution
//! is not always clean: a local time can fall in a daylight-saving gap (it
//! never happened) or an overlap (it happened twice). The gap is an error;
//! the overlap resolves to the earlier offset.

use crate::error::{Error, Result};
use chrono::offset::LocalResult;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// `Wed Jan 9 13:17:22 +0530 2019`
pub const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parses a timestamp carrying its own UTC offset.
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>> {
    Ok(DateTime::parse_from_str(input, TIMESTAMP_FORMAT)?)
}

/// Parses a zone-less local time and resolves it in `tz`.
pub fn parse_local(input: &str, format: &str, tz: Tz) -> Result<DateTime<Tz>> {
    let naive = NaiveDateTime::parse_from_str(input, format)?;
    resolve_local(naive, tz)
}

/// Resolves a naive local time against a zone.
///
/// A time inside a DST gap does not exist and is refused outright rather
/// than silently shifted. An ambiguous time maps to the earlier offset.
pub fn resolve_local(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, latest) => {
            tracing::debug!(%naive, %earliest, %latest, "ambiguous local time, taking earlier offset");
            Ok(earliest)
        }
        LocalResult::None => Err(Error::NonexistentLocalTime(naive, tz)),
    }
}

/// Re-expresses an instant in another zone.
pub fn convert_zone<T: TimeZone>(dt: DateTime<T>, tz: Tz) -> DateTime<Tz> {
    dt.with_timezone(&tz)
}
