//! # kada testkit
//!
//! Test utilities for kada.
//!
//! This crate provides:
//! - Test fixtures: in-memory and temp-dir stores
//! - Property-based test generators using proptest
//! - A lifecycle harness checking the store against a reference model
//!
//! ## Usage
//!
//! ```rust
//! use kada_testkit::prelude::*;
//! use kada_core::Mark;
//!
//! with_temp_db(|db| {
//!     db.start_activity(Mark::new("coding", "")).unwrap();
//!     assert_eq!(db.get_all_marks().unwrap().len(), 1);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
