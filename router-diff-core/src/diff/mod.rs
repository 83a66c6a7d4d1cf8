//! Line-based diff of normalized running configs.

pub mod engine;
pub mod result;

pub use engine::{diff, diff_with_options, DiffOptions};
pub use result::{DiffHunk, DiffLine, LineDiff, LineTag};
