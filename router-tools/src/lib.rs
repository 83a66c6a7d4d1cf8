//! Router pair drift detection.
//!
//! Collaborators around the pure comparison logic in `router-diff-core`:
//!
//! - [`settings`] — endpoints, credentials and timeouts, validated once
//! - [`transport`] — "run this command on that device" over SSH or from captures
//! - [`fetch`] — the two-device fetch barrier with independent failures
//! - [`compare`] — the three operator modes built on top of the above
//! - [`report`] — terminal rendering of mode results

pub mod compare;
pub mod fetch;
pub mod report;
pub mod settings;
pub mod transport;
