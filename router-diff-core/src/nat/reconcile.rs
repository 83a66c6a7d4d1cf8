use serde::Serialize;

use super::index::PublicIndex;
use super::record::NatRecord;

/// One public address mapped to different inside hosts on the two devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub public_address: String,
    pub record_a: NatRecord,
    pub record_b: NatRecord,
}

/// Outcome of comparing two devices' static NAT tables by public address.
///
/// Every list is sorted ascending by public address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    /// Present on B, absent on A: safe to add to A.
    pub missing_on_a: Vec<NatRecord>,
    /// Present on A, absent on B: safe to add to B.
    pub missing_on_b: Vec<NatRecord>,
    pub conflicts: Vec<Conflict>,
    /// Addresses present on both sides with the same inside host.
    pub in_sync: usize,
}

impl ReconciliationResult {
    /// True when no action is needed on either device.
    pub fn is_clean(&self) -> bool {
        self.missing_on_a.is_empty() && self.missing_on_b.is_empty() && self.conflicts.is_empty()
    }
}

/// Classify every public address of `a` and `b`.
///
/// Cannot fail: both indices already parsed cleanly.
pub fn reconcile(a: &PublicIndex, b: &PublicIndex) -> ReconciliationResult {
    let mut out = ReconciliationResult {
        missing_on_a: absent_from(b, a),
        missing_on_b: absent_from(a, b),
        ..ReconciliationResult::default()
    };

    for record_a in a.records() {
        let Some(record_b) = b.get(&record_a.public_address) else {
            continue;
        };
        if record_a.inside_address == record_b.inside_address {
            out.in_sync += 1;
            continue;
        }
        out.conflicts.push(Conflict {
            public_address: record_a.public_address.clone(),
            record_a: record_a.clone(),
            record_b: record_b.clone(),
        });
    }

    out
}

/// Records of `from` whose public address `other` lacks, in key order.
fn absent_from(from: &PublicIndex, other: &PublicIndex) -> Vec<NatRecord> {
    from.records()
        .filter(|record| !other.contains(&record.public_address))
        .cloned()
        .collect()
}
