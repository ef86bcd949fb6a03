//! HTML rendering: escaping, formatting, incident rows and the page shell.

pub mod escape;
pub mod format;
pub mod page;
pub mod row;

pub use escape::escape;
pub use format::{format_instant, humanize_duration};
pub use row::{render_detail_panel, render_summary_row};
