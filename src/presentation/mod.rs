//! Terminal rendering.
//!
//! Pure formatting: every function takes already-fetched data and returns
//! text. No chain access happens here.

pub mod card;
pub mod status;

pub use card::{format_issue_date, render_card, render_report, short_address};
pub use status::{render_error, render_info, render_status};
