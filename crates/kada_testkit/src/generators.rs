//! Property-based test generators using proptest.
//!
//! Provides strategies for generating marks, timestamps and activity
//! operation sequences that maintain the store's invariants.

use chrono::{DateTime, Local};
use kada_core::{Mark, Timestamp};
use proptest::prelude::*;

/// Strategy for generating activity names.
///
/// Names never end in a role suffix and are always valid storage keys.
pub fn activity_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for generating free-text descriptions, including empty ones.
pub fn description_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        3 => ".{1,64}",
    ]
}

/// Strategy for generating local timestamps between 1970 and 2100 with
/// nanosecond precision.
pub fn timestamp_strategy() -> impl Strategy<Value = Timestamp> {
    (0i64..4_102_444_800, 0u32..1_000_000_000).prop_map(|(secs, nanos)| {
        DateTime::from_timestamp(secs, nanos)
            .expect("Timestamp in range")
            .with_timezone(&Local)
    })
}

/// Strategy for generating untagged marks.
pub fn mark_strategy() -> impl Strategy<Value = Mark> {
    (
        activity_name_strategy(),
        description_strategy(),
        timestamp_strategy(),
    )
        .prop_map(|(name, description, timestamp)| {
            Mark::new(name, description).with_timestamp(timestamp)
        })
}

/// An operation against the activity lifecycle.
#[derive(Debug, Clone)]
pub enum ActivityOperation {
    /// Open an activity.
    Start {
        /// Activity name.
        name: String,
    },
    /// Close an open activity.
    End {
        /// Activity name.
        name: String,
    },
    /// Backfill a closed span.
    Add {
        /// Activity name.
        name: String,
    },
    /// Delete the only span with this name.
    Remove {
        /// Span name.
        name: String,
    },
}

/// Strategy for generating lifecycle operations over a small set of names,
/// so that operations collide often.
pub fn activity_operation_strategy() -> impl Strategy<Value = ActivityOperation> {
    let name = || prop::sample::select(vec!["coding", "reading", "writing"]).prop_map(String::from);

    prop_oneof![
        3 => name().prop_map(|name| ActivityOperation::Start { name }),
        3 => name().prop_map(|name| ActivityOperation::End { name }),
        1 => name().prop_map(|name| ActivityOperation::Add { name }),
        2 => name().prop_map(|name| ActivityOperation::Remove { name }),
    ]
}

/// Strategy for generating a sequence of lifecycle operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<ActivityOperation>> {
    prop::collection::vec(activity_operation_strategy(), min_ops..max_ops)
}
