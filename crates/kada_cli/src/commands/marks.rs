//! Marks command implementation.

use kada_codec::Codec;
use kada_core::{Db, Mark, Span};

/// Prints every open mark.
pub fn run<C>(db: &Db<C>) -> Result<(), Box<dyn std::error::Error>>
where
    C: Codec<Mark> + Codec<Span> + Clone,
{
    let marks = db.get_all_marks()?;
    if marks.is_empty() {
        println!("No open activities");
    }

    for mark in &marks {
        println!("{mark}");
    }
    Ok(())
}
