//! End command implementation.

use kada_codec::Codec;
use kada_core::{Db, Mark, Span};
use tracing::info;

/// Closes the open activity `name` now.
pub fn run<C>(db: &Db<C>, name: &str, description: String) -> Result<(), Box<dyn std::error::Error>>
where
    C: Codec<Mark> + Codec<Span> + Clone,
{
    let span = db.end_activity(Mark::new(name, description))?;
    info!(activity = %span.name, key = %span.key(), "activity ended");

    println!("{span}");
    if let Some(duration) = span.duration() {
        println!("  Duration: {}", format_duration(duration.num_seconds()));
    }
    Ok(())
}

/// Renders a second count as `1h 05m 09s`.
pub fn format_duration(total_secs: i64) -> String {
    let sign = if total_secs < 0 { "-" } else { "" };
    let secs = total_secs.unsigned_abs();
    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);

    if hours > 0 {
        format!("{sign}{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m {seconds:02}s")
    } else {
        format!("{sign}{seconds}s")
    }
}
