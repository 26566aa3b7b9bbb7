//! Spans: named intervals between two marks.

use crate::mark::{Mark, Timestamp};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Seconds between 0001-01-01T00:00:00Z and the Unix epoch.
const EPOCH_OFFSET_SECS: i64 = 62_135_596_800;

/// Binary layout version for whole-minute zone offsets.
const INSTANT_V1: u8 = 1;

/// Binary layout version carrying leftover offset seconds.
const INSTANT_V2: u8 = 2;

/// Storage identity of a span.
///
/// The key is the span name followed by the URL-safe base64 of the SHA-256
/// of the start instant's binary form (see [`instant_bytes`]). Spans with the
/// same name but different start times therefore never share a file, and
/// closing a span keeps its key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpanKey(String);

impl SpanKey {
    /// Derives the key for a span called `name` starting at `start`.
    #[must_use]
    pub fn derive(name: &str, start: &Timestamp) -> Self {
        let hash = Sha256::digest(instant_bytes(start));
        Self(format!("{name}{}", URL_SAFE.encode(hash)))
    }

    /// Wraps an already derived key, e.g. one read back from a file name.
    #[must_use]
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SpanKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical fixed-width binary form of an instant.
///
/// Layout (big-endian):
///
/// | bytes | field                                        |
/// |-------|----------------------------------------------|
/// | 1     | version (1, or 2 for sub-minute offsets)     |
/// | 8     | seconds since 0001-01-01T00:00:00Z           |
/// | 4     | nanoseconds within the second                |
/// | 2     | zone offset in minutes                       |
/// | 1     | leftover offset seconds (version 2 only)     |
#[must_use]
pub fn instant_bytes(instant: &Timestamp) -> Vec<u8> {
    let offset = instant.offset().local_minus_utc();
    let offset_min = i16::try_from(offset / 60).unwrap_or(i16::MAX);
    let offset_sec = i8::try_from(offset % 60).unwrap_or(0);
    let secs = instant.timestamp() + EPOCH_OFFSET_SECS;
    let nanos = i32::try_from(instant.timestamp_subsec_nanos()).unwrap_or(i32::MAX);

    let version = if offset_sec == 0 { INSTANT_V1 } else { INSTANT_V2 };

    let mut buf = Vec::with_capacity(16);
    buf.push(version);
    buf.extend_from_slice(&secs.to_be_bytes());
    buf.extend_from_slice(&nanos.to_be_bytes());
    buf.extend_from_slice(&offset_min.to_be_bytes());
    if version == INSTANT_V2 {
        buf.extend_from_slice(&offset_sec.to_be_bytes());
    }
    buf
}

/// A named interval bounded by a start mark and an optional end mark.
///
/// A span without an end mark is *open*: the activity is still in progress
/// and a matching `<name>-start` mark is stored alongside it.
///
/// On disk a span is an object with the fields `Start`, `End` (null while
/// open) and `Name`. The `parent` link is navigational only and is not
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Span {
    /// Key of an enclosing span, if any. Not persisted.
    #[serde(skip)]
    pub parent: Option<SpanKey>,
    /// The mark that opened the span.
    pub start: Mark,
    /// The mark that closed the span, `None` while open.
    pub end: Option<Mark>,
    /// Base name shared by the start and end marks.
    pub name: String,
}

impl Span {
    /// Creates a span named after the base name of `start`.
    #[must_use]
    pub fn new(parent: Option<SpanKey>, start: Mark, end: Option<Mark>) -> Self {
        let name = start.base_name().to_string();
        Self {
            parent,
            start,
            end,
            name,
        }
    }

    /// Creates an open span.
    #[must_use]
    pub fn open(start: Mark) -> Self {
        Self::new(None, start, None)
    }

    /// Creates a closed span.
    #[must_use]
    pub fn closed(start: Mark, end: Mark) -> Self {
        Self::new(None, start, Some(end))
    }

    /// Returns the storage key, derived from the name and start timestamp only.
    #[must_use]
    pub fn key(&self) -> SpanKey {
        SpanKey::derive(&self.name, &self.start.timestamp)
    }

    /// Returns true while the span has no end mark.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Returns how long the span lasted, or `None` if it is still open.
    #[must_use]
    pub fn duration(&self) -> Option<TimeDelta> {
        self.end
            .as_ref()
            .map(|end| end.timestamp - self.start.timestamp)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const FORMAT: &str = "%d/%m/%Y %H:%M:%S";

        write!(
            f,
            "{}: started at {}",
            self.name,
            self.start.timestamp.format(FORMAT)
        )?;

        match &self.end {
            Some(end) => write!(f, " and ended at {}", end.timestamp.format(FORMAT)),
            None => f.write_str(" and still going"),
        }
    }
}
