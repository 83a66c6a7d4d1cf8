//! Plain-text and JSON renderings of diff and reconciliation results.

pub mod json;
pub mod text;

pub use json::format_json;
pub use text::{format_reconciliation_summary, format_summary, format_unified};
