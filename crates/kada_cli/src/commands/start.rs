//! Start command implementation.

use crate::date::parse_local;
use kada_codec::Codec;
use kada_core::{Db, Mark, Span};
use tracing::info;

/// Opens the activity `name`, at `date` if given or now.
pub fn run<C>(
    db: &Db<C>,
    name: &str,
    description: String,
    date: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>>
where
    C: Codec<Mark> + Codec<Span> + Clone,
{
    let mut mark = Mark::new(name, description);
    if let Some(date) = date {
        mark = mark.with_timestamp(parse_local(date)?);
    }

    let span = db.start_activity(mark)?;
    info!(activity = %span.name, key = %span.key(), "activity started");

    println!("{span}");
    Ok(())
}
