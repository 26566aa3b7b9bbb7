//! Lifecycle harness for cross-crate integration testing.
//!
//! [`LifecycleHarness`] applies [`ActivityOperation`]s to a real store and
//! to a small reference model side by side, asserting that every outcome
//! and the final state agree.

use crate::fixtures::{local_time, mark_at, TestDb};
use crate::generators::ActivityOperation;
use chrono::TimeDelta;
use kada_core::{start_name, CoreError, Timestamp};
use std::collections::BTreeMap;

/// Reference model of one activity name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct ActivityModel {
    open: bool,
    closed: usize,
}

impl ActivityModel {
    fn spans(&self) -> usize {
        self.closed + usize::from(self.open)
    }
}

/// A test harness driving the activity lifecycle.
pub struct LifecycleHarness {
    /// The store under test.
    pub db: TestDb,
    model: BTreeMap<String, ActivityModel>,
    clock: Timestamp,
}

impl LifecycleHarness {
    /// Creates a harness over an in-memory store.
    pub fn new() -> Self {
        Self::with_db(TestDb::memory())
    }

    /// Creates a harness over a temp-dir store.
    pub fn file() -> Self {
        Self::with_db(TestDb::file())
    }

    fn with_db(db: TestDb) -> Self {
        Self {
            db,
            model: BTreeMap::new(),
            clock: local_time(2024, 1, 1, 0, 0, 0),
        }
    }

    /// Advances the harness clock so every operation gets a distinct instant.
    fn tick(&mut self) -> Timestamp {
        self.clock += TimeDelta::minutes(1);
        self.clock
    }

    /// Applies one operation to the store and the model, asserting that
    /// the store's outcome matches the model's expectation.
    pub fn apply(&mut self, op: &ActivityOperation) {
        match op {
            ActivityOperation::Start { name } => {
                let ts = self.tick();
                let result = self.db.start_activity(mark_at(name, ts));
                let entry = self.model.entry(name.clone()).or_default();

                if entry.open {
                    let err = result.expect_err("Starting an open activity should fail");
                    assert!(err.is_already_exists(), "unexpected error: {err}");
                } else {
                    let span = result.expect("Failed to start activity");
                    assert!(span.is_open());
                    entry.open = true;
                }
            }
            ActivityOperation::End { name } => {
                let ts = self.tick();
                let result = self.db.end_activity(mark_at(name, ts));
                let entry = self.model.entry(name.clone()).or_default();

                if entry.open {
                    let span = result.expect("Failed to end activity");
                    assert!(!span.is_open());
                    entry.open = false;
                    entry.closed += 1;
                } else {
                    let err = result.expect_err("Ending an idle activity should fail");
                    assert!(err.is_not_found(), "unexpected error: {err}");
                }
            }
            ActivityOperation::Add { name } => {
                let start = self.tick();
                let end = self.tick();
                self.db
                    .add_span(mark_at(name, start), mark_at(name, end))
                    .expect("Failed to add span");
                self.model.entry(name.clone()).or_default().closed += 1;
            }
            ActivityOperation::Remove { name } => {
                let result = self.db.delete_span(name);
                let entry = self.model.entry(name.clone()).or_default();

                match entry.spans() {
                    0 => {
                        let err = result.expect_err("Removing a missing span should fail");
                        assert!(err.is_not_found(), "unexpected error: {err}");
                    }
                    1 => {
                        result.expect("Failed to remove span");
                        *entry = ActivityModel::default();
                    }
                    count => {
                        let err = result.expect_err("Removing an ambiguous span should fail");
                        assert!(
                            matches!(err, CoreError::AmbiguousSpan { count: c, .. } if c == count),
                            "unexpected error: {err}"
                        );
                    }
                }
            }
        }
    }

    /// Verifies the store's full contents against the model.
    pub fn verify(&self) {
        let marks = self.db.get_all_marks().expect("Failed to list marks");
        let spans = self.db.get_all_spans().expect("Failed to list spans");

        let mut expected_marks: Vec<String> = self
            .model
            .iter()
            .filter(|(_, activity)| activity.open)
            .map(|(name, _)| start_name(name))
            .collect();
        expected_marks.sort();
        let mut actual_marks: Vec<String> = marks.into_iter().map(|mark| mark.name).collect();
        actual_marks.sort();
        assert_eq!(actual_marks, expected_marks, "open marks differ");

        for (name, activity) in &self.model {
            let named: Vec<_> = spans.iter().filter(|span| &span.name == name).collect();
            assert_eq!(named.len(), activity.spans(), "span count differs for {name}");
            assert_eq!(
                named.iter().filter(|span| span.is_open()).count(),
                usize::from(activity.open),
                "open span count differs for {name}"
            );
        }

        let modelled: usize = self.model.values().map(ActivityModel::spans).sum();
        assert_eq!(spans.len(), modelled, "unexpected extra spans");
    }
}

impl Default for LifecycleHarness {
    fn default() -> Self {
        Self::new()
    }
}
