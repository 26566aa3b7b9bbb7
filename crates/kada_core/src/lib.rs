//! # kada core
//!
//! Mark and span entity store for kada.
//!
//! This crate provides:
//! - [`Mark`] - a named, timestamped point event
//! - [`Span`] - a named interval between a start mark and an optional end mark
//! - [`RecordStore`] - a typed store joining a storage backend with a codec
//! - [`Db`] - the entity store enforcing the mark/span lifecycle
//!
//! ## Example
//!
//! ```rust,no_run
//! use kada_core::{Config, Db, Mark};
//!
//! let db = Db::open(&Config::new("/home/me/.local/share/kada"));
//! db.setup()?;
//!
//! db.start_activity(Mark::new("coding", "kada storage layer"))?;
//! // ... later
//! let span = db.end_activity(Mark::new("coding", ""))?;
//! println!("{span}");
//! # Ok::<(), kada_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod db;
mod error;
mod mark;
mod span;
mod store;

pub use config::{Config, MARKS_DIR, SPANS_DIR};
pub use db::Db;
pub use error::{CoreError, CoreResult, EntityKind};
pub use mark::{base_name, start_name, Mark, Timestamp, END_SUFFIX, START_SUFFIX};
pub use span::{instant_bytes, Span, SpanKey};
pub use store::RecordStore;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
