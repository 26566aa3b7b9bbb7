//! Span command implementations.

use crate::commands::end::format_duration;
use crate::date::parse_local;
use kada_codec::Codec;
use kada_core::{Db, Mark, Span};
use tracing::info;

/// Prints every span, oldest first.
pub fn list<C>(db: &Db<C>) -> Result<(), Box<dyn std::error::Error>>
where
    C: Codec<Mark> + Codec<Span> + Clone,
{
    let mut spans = db.get_all_spans()?;
    spans.sort_by_key(|span| span.start.timestamp);

    if spans.is_empty() {
        println!("No spans recorded");
    }

    for span in &spans {
        match span.duration() {
            Some(duration) => println!("{span} ({})", format_duration(duration.num_seconds())),
            None => println!("{span}"),
        }
    }
    Ok(())
}

/// Records a finished activity between `start` and `end`.
pub fn add<C>(db: &Db<C>, name: &str, start: &str, end: &str) -> Result<(), Box<dyn std::error::Error>>
where
    C: Codec<Mark> + Codec<Span> + Clone,
{
    let start = Mark::new(name, "").with_timestamp(parse_local(start)?);
    let end = Mark::new(name, "").with_timestamp(parse_local(end)?);

    let span = db.add_span(start, end)?;
    info!(span = %span.name, key = %span.key(), "span added");

    println!("{span}");
    Ok(())
}

/// Removes the only span called `name`.
pub fn remove<C>(db: &Db<C>, name: &str) -> Result<(), Box<dyn std::error::Error>>
where
    C: Codec<Mark> + Codec<Span> + Clone,
{
    db.delete_span(name)?;
    info!(span = %name, "span removed");

    println!("Successfully deleted span '{name}'");
    Ok(())
}
