//! Static NAT parity between two routers.
//!
//! Entries are compared by public address, not by raw line text, so token
//! order or trailing options never register as drift. The only unsafe case
//! is one public address pointing at two different inside hosts.

pub mod index;
pub mod reconcile;
pub mod record;

pub use index::{build_index, count_nat_lines, nat_lines, PublicIndex, ShadowedRecord};
pub use reconcile::{reconcile, Conflict, ReconciliationResult};
pub use record::{parse, NatRecord, ParseError};

/// Command prefix of an IOS static inside-source NAT entry.
pub const NAT_MATCH: &str = "ip nat inside source static";
