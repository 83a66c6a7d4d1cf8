//! Drift detection primitives for router running-config text.
//!
//! Raw device output goes through [`normalize`] first. From there it either
//! feeds the line diff ([`diff()`]) for whole-config comparison, or the NAT
//! pipeline: [`nat_lines`] → [`build_index`] → [`reconcile`].

pub mod diff;
pub mod format;
pub mod nat;
pub mod normalize;

pub use diff::{diff, diff_with_options, DiffHunk, DiffLine, DiffOptions, LineDiff, LineTag};
pub use format::{format_json, format_reconciliation_summary, format_summary, format_unified};
pub use nat::{
    build_index, count_nat_lines, nat_lines, parse, reconcile, Conflict, NatRecord, ParseError, PublicIndex,
    ReconciliationResult, ShadowedRecord, NAT_MATCH,
};
pub use normalize::{normalize, ConfigLine};
