//! Output formatting module
//!
//! Renderers are pure functions of a [`CheckedServer`], the current time
//! (for day counts) and, for text, whether colors are enabled:
//! - multi-line text report
//! - short summary line
//! - JSON
//! - CSV row

pub mod csv;
pub mod dates;
pub mod json;
pub mod palette;
pub mod text;

pub use self::csv::{as_csv, CSV_HEADER};
pub use dates::{display_date, duration_days, number_of_days};
pub use json::{as_json, JSON_ERROR_ENVELOPE};
pub use palette::{Palette, Tone};
pub use text::{as_short_text, as_text, summary_line};

use crate::cli::OutputFormat;
use crate::models::CheckedServer;
use chrono::{DateTime, Utc};

/// Render a result in the requested format; `None` for [`OutputFormat::None`]
pub fn render(
    server: &CheckedServer,
    format: OutputFormat,
    color: bool,
    now: DateTime<Utc>,
) -> Option<String> {
    let palette = Palette::new(color);
    match format {
        OutputFormat::Text => Some(as_text(server, palette, now)),
        OutputFormat::Short => Some(as_short_text(server, palette)),
        OutputFormat::Json => Some(as_json(server)),
        OutputFormat::Csv => Some(as_csv(server, now)),
        OutputFormat::None => None,
    }
}
