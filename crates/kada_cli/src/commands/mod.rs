//! CLI command implementations.

pub mod end;
pub mod marks;
pub mod span;
pub mod start;
