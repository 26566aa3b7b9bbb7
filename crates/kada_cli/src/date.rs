//! Local date-time parsing for command arguments.

use chrono::{Local, NaiveDateTime, TimeZone};
use kada_core::Timestamp;
use thiserror::Error;

/// Accepted date-time layout, interpreted in the local time zone.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors produced while parsing a date argument.
#[derive(Debug, Error)]
pub enum DateError {
    /// The input does not follow [`DATE_FORMAT`].
    #[error("invalid date {input:?}, expected YYYY-MM-DD HH:MM:SS: {source}")]
    Malformed {
        /// The rejected input.
        input: String,
        /// Underlying parse error.
        source: chrono::ParseError,
    },

    /// The local time is skipped or repeated by a zone transition.
    #[error("date {input:?} is ambiguous or does not exist in the local time zone")]
    NotLocal {
        /// The rejected input.
        input: String,
    },
}

/// Parses `input` as a local date-time.
pub fn parse_local(input: &str) -> Result<Timestamp, DateError> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), DATE_FORMAT).map_err(|source| {
        DateError::Malformed {
            input: input.to_string(),
            source,
        }
    })?;

    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| DateError::NotLocal {
            input: input.to_string(),
        })
}
