//! Marks: named points in time.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instant type used for every mark.
pub type Timestamp = DateTime<Local>;

/// Suffix tagging a mark that opens an activity.
pub const START_SUFFIX: &str = "-start";

/// Suffix tagging a mark that closes an activity.
pub const END_SUFFIX: &str = "-end";

/// A named, timestamped point event.
///
/// The name may carry one role suffix, [`START_SUFFIX`] or [`END_SUFFIX`].
/// The name with any suffix removed is the mark's *base name*, which is what
/// spans are named after.
///
/// On disk a mark is an object with the fields `Timestamp` (RFC 3339),
/// `Name` and `Description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Mark {
    /// When the event happened.
    pub timestamp: Timestamp,
    /// Name, including any role suffix.
    pub name: String,
    /// Free-text description, possibly empty.
    pub description: String,
}

impl Mark {
    /// Creates an untagged mark stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// Replaces the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Returns a copy tagged as the start of an activity.
    ///
    /// Any existing role suffix is replaced, so a mark never carries both.
    #[must_use]
    pub fn as_start(&self) -> Self {
        self.with_suffix(START_SUFFIX)
    }

    /// Returns a copy tagged as the end of an activity.
    #[must_use]
    pub fn as_end(&self) -> Self {
        self.with_suffix(END_SUFFIX)
    }

    /// Returns a copy with the role suffix removed.
    #[must_use]
    pub fn without_suffix(&self) -> Self {
        Self {
            name: self.base_name().to_string(),
            ..self.clone()
        }
    }

    /// Returns the name without its role suffix.
    #[must_use]
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    /// Returns true if the mark opens an activity.
    #[must_use]
    pub fn is_start(&self) -> bool {
        self.name.ends_with(START_SUFFIX)
    }

    /// Returns true if the mark closes an activity.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.name.ends_with(END_SUFFIX)
    }

    fn with_suffix(&self, suffix: &str) -> Self {
        Self {
            name: format!("{}{suffix}", self.base_name()),
            ..self.clone()
        }
    }
}

/// Strips one role suffix from `name`, `-start` taking precedence.
#[must_use]
pub fn base_name(name: &str) -> &str {
    name.strip_suffix(START_SUFFIX)
        .or_else(|| name.strip_suffix(END_SUFFIX))
        .unwrap_or(name)
}

/// Returns the name of the mark that opens the activity `name`.
#[must_use]
pub fn start_name(name: &str) -> String {
    format!("{}{START_SUFFIX}", base_name(name))
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = if self.description.is_empty() {
            "<empty>"
        } else {
            self.description.as_str()
        };

        write!(
            f,
            "Mark {{name: {}, timestamp: {}, description: {}}}",
            self.name,
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.f %:z"),
            description
        )
    }
}
