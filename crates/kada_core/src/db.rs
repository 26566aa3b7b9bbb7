//! The mark and span entity store.

use crate::config::Config;
use crate::error::{CoreError, CoreResult, EntityKind};
use crate::mark::{start_name, Mark};
use crate::span::{Span, SpanKey};
use crate::store::RecordStore;
use kada_codec::{Codec, JsonCodec};
use kada_storage::{DirBackend, InMemoryBackend, StorageBackend};
use tracing::{debug, warn};

/// The entity store for marks and spans.
///
/// `Db` composes two record stores, one per record type, and enforces the
/// rules that tie them together:
///
/// - at most one mark per exact name may exist at a time
/// - a span's storage key depends only on its name and start timestamp
/// - deleting an open span also deletes its open mark
///
/// # Activity lifecycle
///
/// ```text
/// Idle --start_activity--> Open --end_activity--> Closed
///   \______________________add_span_______________/
/// ```
///
/// An open activity is an open span plus a `<name>-start` mark. Ending it
/// deletes the mark and rewrites the span in place with its end mark set.
///
/// # Concurrency
///
/// Every operation is a sequence of blocking filesystem calls. Only mark
/// creation is guarded against another process; multi-step operations are
/// not transactional and may leave partial state behind when a later step
/// fails.
///
/// # Example
///
/// ```rust
/// use kada_core::{Db, Mark};
///
/// let db = Db::in_memory();
/// db.start_activity(Mark::new("coding", "")).unwrap();
/// let span = db.end_activity(Mark::new("coding", "")).unwrap();
/// assert!(!span.is_open());
/// assert!(db.get_all_marks().unwrap().is_empty());
/// ```
pub struct Db<C = JsonCodec> {
    marks: RecordStore<Mark, C>,
    spans: RecordStore<Span, C>,
}

impl Db<JsonCodec> {
    /// Opens a JSON store rooted at `config.root`.
    ///
    /// Nothing is created on disk until [`Db::setup`] is called.
    #[must_use]
    pub fn open(config: &Config) -> Self {
        Self::open_with_codec(config, JsonCodec)
    }

    /// Opens a JSON store that lives entirely in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_backends(
            Box::new(InMemoryBackend::new()),
            Box::new(InMemoryBackend::new()),
            JsonCodec,
        )
    }
}

impl<C> Db<C>
where
    C: Codec<Mark> + Codec<Span> + Clone,
{
    /// Opens a store rooted at `config.root` using `codec`.
    ///
    /// Record files use `config.extension`, or the codec's own extension.
    #[must_use]
    pub fn open_with_codec(config: &Config, codec: C) -> Self {
        let extension = config
            .extension
            .clone()
            .unwrap_or_else(|| <C as Codec<Mark>>::extension(&codec).to_string());

        Self::with_backends(
            Box::new(DirBackend::new(&config.marks_dir(), &extension)),
            Box::new(DirBackend::new(&config.spans_dir(), &extension)),
            codec,
        )
    }

    /// Builds a store over explicit backends.
    #[must_use]
    pub fn with_backends(
        marks: Box<dyn StorageBackend>,
        spans: Box<dyn StorageBackend>,
        codec: C,
    ) -> Self {
        Self {
            marks: RecordStore::new(marks, codec.clone()),
            spans: RecordStore::new(spans, codec),
        }
    }

    /// Ensures both record directories exist. Idempotent.
    pub fn setup(&self) -> CoreResult<()> {
        self.marks.setup()?;
        self.spans.setup()?;
        Ok(())
    }

    // ========================================================================
    // Marks
    // ========================================================================

    /// Stores a new mark under its exact name.
    ///
    /// The name is reserved with an exclusive create before the mark is
    /// written, so two opens of the same name cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if a mark with this exact name is stored.
    pub fn create_mark(&self, mark: &Mark) -> CoreResult<()> {
        if mark.base_name().is_empty() {
            return Err(CoreError::InvalidName {
                name: mark.name.clone(),
                reason: "mark name is empty",
            });
        }

        self.marks
            .create_exclusive(&mark.name)
            .map_err(|err| err.for_record(EntityKind::Mark, &mark.name))?;
        self.marks.put(&mark.name, mark)?;

        debug!(mark = %mark.name, "created mark");
        Ok(())
    }

    /// Reads the mark stored under `name`.
    pub fn get_mark(&self, name: &str) -> CoreResult<Mark> {
        self.marks
            .get(name)
            .map_err(|err| err.for_record(EntityKind::Mark, name))
    }

    /// Deletes the mark stored under `name`.
    pub fn delete_mark(&self, name: &str) -> CoreResult<()> {
        self.marks
            .delete(name)
            .map_err(|err| err.for_record(EntityKind::Mark, name))?;

        debug!(mark = %name, "deleted mark");
        Ok(())
    }

    /// Reads every stored mark.
    pub fn get_all_marks(&self) -> CoreResult<Vec<Mark>> {
        self.marks.list_all()
    }

    // ========================================================================
    // Spans
    // ========================================================================

    /// Stores a new span under its derived key.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if a span with the same name and start
    /// timestamp is stored.
    pub fn create_span(&self, span: &Span) -> CoreResult<()> {
        let key = span.key();
        if self.spans.exists(key.as_str())? {
            return Err(CoreError::already_exists(EntityKind::Span, &span.name));
        }

        self.spans.put(key.as_str(), span)?;
        debug!(span = %span.name, key = %key, open = span.is_open(), "created span");
        Ok(())
    }

    /// Rewrites an existing span in place.
    ///
    /// The key is recomputed from the start timestamp, which does not change
    /// when a span is closed, so the same record is overwritten.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no span is stored under the derived key.
    pub fn update_span(&self, span: &Span) -> CoreResult<()> {
        let key = span.key();
        if !self.spans.exists(key.as_str())? {
            return Err(CoreError::not_found(EntityKind::Span, &span.name));
        }

        self.spans.put(key.as_str(), span)?;
        debug!(span = %span.name, key = %key, open = span.is_open(), "updated span");
        Ok(())
    }

    /// Reads the span stored under `key`.
    pub fn get_span(&self, key: &SpanKey) -> CoreResult<Span> {
        self.spans
            .get(key.as_str())
            .map_err(|err| err.for_record(EntityKind::Span, key.as_str()))
    }

    /// Deletes the only span called `name`.
    ///
    /// All spans are scanned; names are not disambiguated by start time. If
    /// the span is still open, its start mark is deleted first.
    ///
    /// # Errors
    ///
    /// - `AmbiguousSpan` if more than one span is called `name`; nothing is deleted
    /// - `NotFound` if no span is called `name`
    pub fn delete_span(&self, name: &str) -> CoreResult<()> {
        let mut matching: Vec<Span> = self
            .get_all_spans()?
            .into_iter()
            .filter(|span| span.name == name)
            .collect();

        if matching.len() > 1 {
            return Err(CoreError::ambiguous_span(name, matching.len()));
        }

        let span = matching
            .pop()
            .ok_or_else(|| CoreError::not_found(EntityKind::Span, name))?;

        if span.is_open() {
            self.delete_mark(&span.start.name)?;
        }

        let key = span.key();
        self.spans.delete(key.as_str()).map_err(|err| {
            if span.is_open() {
                warn!(span = %name, "start mark deleted but span record was not");
            }
            err.for_record(EntityKind::Span, name)
        })?;

        debug!(span = %name, key = %key, "deleted span");
        Ok(())
    }

    /// Reads every stored span, ordered by key.
    pub fn get_all_spans(&self) -> CoreResult<Vec<Span>> {
        self.spans.list_all()
    }

    // ========================================================================
    // Activities
    // ========================================================================

    /// Opens an activity: stores `mark` tagged as a start mark and an open
    /// span for it.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if an activity with the same name is open, or
    /// if a span with the same name already starts at the same instant. In
    /// both cases nothing is written.
    pub fn start_activity(&self, mark: Mark) -> CoreResult<Span> {
        let start = mark.as_start();
        let span = Span::open(start);
        if self.spans.exists(span.key().as_str())? {
            return Err(CoreError::already_exists(EntityKind::Span, &span.name));
        }

        self.create_mark(&span.start)?;
        if let Err(err) = self.create_span(&span) {
            warn!(span = %span.name, error = %err, "start mark stored without its span");
            return Err(err);
        }

        Ok(span)
    }

    /// Closes the open activity named after `end`'s base name.
    ///
    /// The open start mark is deleted and the span is rewritten with `end`,
    /// tagged as an end mark.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such activity is open.
    pub fn end_activity(&self, end: Mark) -> CoreResult<Span> {
        let start = self.get_mark(&start_name(&end.name))?;
        self.delete_mark(&start.name)?;

        let span = Span::closed(start, end.as_end());
        if let Err(err) = self.update_span(&span) {
            warn!(span = %span.name, error = %err, "start mark deleted but span not closed");
            return Err(err);
        }

        Ok(span)
    }

    /// Records a finished activity in one step, without any open mark.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if a span with the same name and start
    /// timestamp is stored.
    pub fn add_span(&self, start: Mark, end: Mark) -> CoreResult<Span> {
        let span = Span::closed(start, end);
        self.create_span(&span)?;
        Ok(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::Timestamp;
    use chrono::{Local, TimeZone};
    use kada_codec::CborCodec;
    use kada_storage::StorageError;
    use tempfile::tempdir;

    fn at(h: u32, m: u32, s: u32) -> Timestamp {
        Local.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    fn mark(name: &str, ts: Timestamp) -> Mark {
        Mark::new(name, "").with_timestamp(ts)
    }

    fn disk_db(root: &std::path::Path) -> Db {
        let db = Db::open(&Config::new(root));
        db.setup().unwrap();
        db
    }

    #[test]
    fn setup_is_idempotent() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("kada");
        let db = Db::open(&Config::new(&root));

        db.setup().unwrap();
        db.setup().unwrap();
        assert!(root.join("marks").is_dir());
        assert!(root.join("spans").is_dir());
    }

    #[test]
    fn create_mark_twice_fails() {
        let db = Db::in_memory();
        let first = Mark::new("coding-start", "first");

        db.create_mark(&first).unwrap();
        let err = db.create_mark(&Mark::new("coding-start", "second")).unwrap_err();

        assert!(matches!(
            err,
            CoreError::AlreadyExists { kind: EntityKind::Mark, .. }
        ));
        assert_eq!(db.get_mark("coding-start").unwrap(), first);
    }

    #[test]
    fn create_mark_rejects_empty_name() {
        let db = Db::in_memory();
        assert!(matches!(
            db.create_mark(&Mark::new("", "")),
            Err(CoreError::InvalidName { .. })
        ));
        assert!(matches!(
            db.create_mark(&Mark::new("-start", "")),
            Err(CoreError::InvalidName { .. })
        ));
    }

    #[test]
    fn mark_names_with_separators_are_rejected() {
        let db = Db::in_memory();
        assert!(db.create_mark(&Mark::new("../escape", "")).is_err());
        assert!(db.get_all_marks().unwrap().is_empty());
    }

    #[test]
    fn delete_then_get_mark() {
        let db = Db::in_memory();
        let m = Mark::new("coding-start", "");

        db.create_mark(&m).unwrap();
        db.delete_mark(&m.name).unwrap();

        let err = db.get_mark(&m.name).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: EntityKind::Mark, .. }));
        assert!(db.delete_mark(&m.name).unwrap_err().is_not_found());
    }

    #[test]
    fn mark_can_be_recreated_after_delete() {
        let db = Db::in_memory();
        let m = Mark::new("coding-start", "");

        db.create_mark(&m).unwrap();
        db.delete_mark(&m.name).unwrap();
        db.create_mark(&m).unwrap();
        assert_eq!(db.get_all_marks().unwrap().len(), 1);
    }

    #[test]
    fn create_span_twice_fails() {
        let db = Db::in_memory();
        let span = Span::open(mark("coding", at(9, 0, 0)).as_start());

        db.create_span(&span).unwrap();
        let err = db.create_span(&span).unwrap_err();
        assert!(matches!(
            err,
            CoreError::AlreadyExists { kind: EntityKind::Span, .. }
        ));
    }

    #[test]
    fn update_missing_span_fails() {
        let db = Db::in_memory();
        let span = Span::closed(
            mark("coding", at(9, 0, 0)).as_start(),
            mark("coding", at(10, 0, 0)).as_end(),
        );

        let err = db.update_span(&span).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: EntityKind::Span, .. }));
        assert!(db.get_all_spans().unwrap().is_empty());
    }

    #[test]
    fn update_span_closes_in_place() {
        let db = Db::in_memory();
        let start = mark("coding", at(9, 0, 0)).as_start();

        db.create_span(&Span::open(start.clone())).unwrap();
        let spans = db.get_all_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "coding");
        assert!(spans[0].end.is_none());

        let closed = Span::closed(start, mark("coding", at(10, 0, 0)).as_end());
        db.update_span(&closed).unwrap();

        let spans = db.get_all_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0], closed);
        assert_eq!(db.get_span(&closed.key()).unwrap(), closed);
    }

    #[test]
    fn get_span_missing() {
        let db = Db::in_memory();
        let key = Span::open(mark("coding", at(9, 0, 0))).key();
        assert!(db.get_span(&key).unwrap_err().is_not_found());
    }

    #[test]
    fn delete_open_span_removes_mark() {
        let db = Db::in_memory();
        db.start_activity(mark("coding", at(9, 0, 0))).unwrap();
        assert!(db.get_mark("coding-start").is_ok());

        db.delete_span("coding").unwrap();

        assert!(db.get_mark("coding-start").unwrap_err().is_not_found());
        assert!(db.get_all_spans().unwrap().is_empty());
    }

    #[test]
    fn delete_closed_span_leaves_marks_alone() {
        let db = Db::in_memory();
        db.add_span(mark("coding", at(9, 0, 0)), mark("coding", at(10, 0, 0)))
            .unwrap();
        db.create_mark(&Mark::new("reading-start", "")).unwrap();

        db.delete_span("coding").unwrap();

        assert!(db.get_all_spans().unwrap().is_empty());
        assert_eq!(db.get_all_marks().unwrap().len(), 1);
    }

    #[test]
    fn delete_ambiguous_span_deletes_nothing() {
        let db = Db::in_memory();
        db.add_span(mark("coding", at(9, 0, 0)), mark("coding", at(10, 0, 0)))
            .unwrap();
        db.start_activity(mark("coding", at(11, 0, 0))).unwrap();

        let err = db.delete_span("coding").unwrap_err();
        assert!(matches!(err, CoreError::AmbiguousSpan { count: 2, .. }));
        assert_eq!(db.get_all_spans().unwrap().len(), 2);
        assert!(db.get_mark("coding-start").is_ok());
    }

    #[test]
    fn delete_open_span_without_mark_keeps_span() {
        let db = Db::in_memory();
        let open = Span::open(mark("coding", at(9, 0, 0)).as_start());
        db.create_span(&open).unwrap();

        let err = db.delete_span("coding").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: EntityKind::Mark, .. }));
        assert_eq!(db.get_all_spans().unwrap(), vec![open]);
    }

    #[test]
    fn delete_missing_span() {
        let db = Db::in_memory();
        db.add_span(mark("reading", at(9, 0, 0)), mark("reading", at(10, 0, 0)))
            .unwrap();

        let err = db.delete_span("coding").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: EntityKind::Span, .. }));
        assert_eq!(db.get_all_spans().unwrap().len(), 1);
    }

    #[test]
    fn start_then_end_activity() {
        let db = Db::in_memory();

        let open = db.start_activity(mark("coding", at(9, 0, 0))).unwrap();
        assert!(open.is_open());
        assert_eq!(open.start.name, "coding-start");

        let closed = db.end_activity(mark("coding", at(10, 0, 0))).unwrap();
        assert_eq!(closed.key(), open.key());
        assert_eq!(closed.end.as_ref().unwrap().name, "coding-end");

        assert!(db.get_all_marks().unwrap().is_empty());
        assert_eq!(db.get_all_spans().unwrap(), vec![closed]);
    }

    #[test]
    fn start_activity_twice_fails() {
        let db = Db::in_memory();
        db.start_activity(mark("coding", at(9, 0, 0))).unwrap();

        let err = db.start_activity(mark("coding", at(9, 30, 0))).unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(db.get_all_spans().unwrap().len(), 1);
    }

    #[test]
    fn start_activity_over_existing_span_writes_nothing() {
        let db = Db::in_memory();
        let finished = db
            .add_span(mark("coding", at(9, 0, 0)), mark("coding", at(10, 0, 0)))
            .unwrap();

        let err = db.start_activity(mark("coding", at(9, 0, 0))).unwrap_err();
        assert!(matches!(
            err,
            CoreError::AlreadyExists { kind: EntityKind::Span, .. }
        ));
        assert!(db.get_all_marks().unwrap().is_empty());

        // With no start mark left behind, closing cannot touch the finished span.
        let err = db.end_activity(mark("coding", at(17, 0, 0))).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: EntityKind::Mark, .. }));
        assert_eq!(db.get_all_spans().unwrap(), vec![finished]);
    }

    #[test]
    fn end_without_start_fails() {
        let db = Db::in_memory();
        let err = db.end_activity(mark("coding", at(10, 0, 0))).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: EntityKind::Mark, .. }));
    }

    #[test]
    fn name_reusable_after_close() {
        let db = Db::in_memory();
        db.start_activity(mark("coding", at(9, 0, 0))).unwrap();
        db.end_activity(mark("coding", at(10, 0, 0))).unwrap();
        db.start_activity(mark("coding", at(11, 0, 0))).unwrap();

        assert_eq!(db.get_all_spans().unwrap().len(), 2);
        assert_eq!(db.get_all_marks().unwrap().len(), 1);
    }

    #[test]
    fn add_span_duplicate_fails() {
        let db = Db::in_memory();
        db.add_span(mark("coding", at(9, 0, 0)), mark("coding", at(10, 0, 0)))
            .unwrap();

        let err = db
            .add_span(mark("coding", at(9, 0, 0)), mark("coding", at(11, 0, 0)))
            .unwrap_err();
        assert!(err.is_already_exists());
    }

    #[test]
    fn create_mark_without_setup_is_io_error() {
        let dir = tempdir().unwrap();
        let db = Db::open(&Config::new(dir.path().join("never-setup")));

        let err = db.create_mark(&Mark::new("coding-start", "")).unwrap_err();
        assert!(matches!(err, CoreError::Storage(StorageError::Io(_))));
        assert!(!err.is_not_found());
    }

    #[test]
    fn files_on_disk() {
        let dir = tempdir().unwrap();
        let db = disk_db(dir.path());

        let span = db.start_activity(mark("coding", at(9, 0, 0))).unwrap();

        assert!(dir.path().join("marks").join("coding-start.json").is_file());
        let span_file = dir
            .path()
            .join("spans")
            .join(format!("{}.json", span.key()));
        assert!(span_file.is_file());

        db.end_activity(mark("coding", at(10, 0, 0))).unwrap();
        assert!(!dir.path().join("marks").join("coding-start.json").exists());
        assert!(span_file.is_file());
    }

    #[test]
    fn reopen_sees_previous_records() {
        let dir = tempdir().unwrap();
        {
            let db = disk_db(dir.path());
            db.start_activity(mark("coding", at(9, 0, 0))).unwrap();
        }

        let db = disk_db(dir.path());
        let closed = db.end_activity(mark("coding", at(10, 0, 0))).unwrap();
        assert_eq!(db.get_all_spans().unwrap(), vec![closed]);
    }

    #[test]
    fn custom_extension() {
        let dir = tempdir().unwrap();
        let db = Db::open(&Config::new(dir.path()).extension("txt"));
        db.setup().unwrap();

        db.create_mark(&Mark::new("coding-start", "")).unwrap();
        assert!(dir.path().join("marks").join("coding-start.txt").is_file());
    }

    #[test]
    fn cbor_store() {
        let dir = tempdir().unwrap();
        let db = Db::open_with_codec(&Config::new(dir.path()), CborCodec);
        db.setup().unwrap();

        let span = db.start_activity(mark("coding", at(9, 0, 0))).unwrap();
        assert!(dir.path().join("marks").join("coding-start.cbor").is_file());
        assert_eq!(db.get_all_spans().unwrap(), vec![span]);
    }
}
