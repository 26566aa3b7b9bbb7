//! Test fixtures and store helpers.

use chrono::{Local, TimeZone};
use kada_core::{Config, Db, Mark, Timestamp};
use std::path::Path;
use tempfile::TempDir;

/// A test store with automatic cleanup.
pub struct TestDb {
    /// The store instance.
    pub db: Db,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: Option<TempDir>,
}

impl TestDb {
    /// Creates a new in-memory test store.
    pub fn memory() -> Self {
        Self {
            db: Db::in_memory(),
            temp_dir: None,
        }
    }

    /// Creates a new store in a fresh temporary directory, already set up.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Db::open(&Config::new(temp_dir.path()));
        db.setup().expect("Failed to set up store");

        Self {
            db,
            temp_dir: Some(temp_dir),
        }
    }

    /// Returns the storage root if file-based, None if in-memory.
    pub fn root(&self) -> Option<&Path> {
        self.temp_dir.as_ref().map(TempDir::path)
    }
}

impl std::ops::Deref for TestDb {
    type Target = Db;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary in-memory store.
pub fn with_temp_db<F, R>(f: F) -> R
where
    F: FnOnce(&Db) -> R,
{
    let test_db = TestDb::memory();
    f(&test_db.db)
}

/// Runs a test with a store in a temporary directory.
pub fn with_file_db<F, R>(f: F) -> R
where
    F: FnOnce(&Db, &Path) -> R,
{
    let test_db = TestDb::file();
    let root = test_db.root().expect("File store should have a root");
    f(&test_db.db, root)
}

/// Builds a local timestamp, panicking on invalid or ambiguous input.
pub fn local_time(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Timestamp {
    Local
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
        .expect("Invalid local time")
}

/// Builds an untagged mark at `timestamp`.
pub fn mark_at(name: &str, timestamp: Timestamp) -> Mark {
    Mark::new(name, "").with_timestamp(timestamp)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use chrono::TimeDelta;

    /// Creates a store with `count` closed one-hour spans called `name`,
    /// one per day starting 2024-01-01 09:00.
    pub fn closed_spans(name: &str, count: u32) -> TestDb {
        let test_db = TestDb::memory();
        let first = local_time(2024, 1, 1, 9, 0, 0);

        for day in 0..count {
            let start = first + TimeDelta::days(i64::from(day));
            let end = start + TimeDelta::hours(1);
            test_db
                .add_span(mark_at(name, start), mark_at(name, end))
                .expect("Failed to add span");
        }

        test_db
    }

    /// Creates a store with one open activity per name, started 2024-01-01 09:00.
    pub fn open_activities(names: &[&str]) -> TestDb {
        let test_db = TestDb::memory();
        let start = local_time(2024, 1, 1, 9, 0, 0);

        for name in names {
            test_db
                .start_activity(mark_at(name, start))
                .expect("Failed to start activity");
        }

        test_db
    }
}
