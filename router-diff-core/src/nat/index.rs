use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::warn;

use super::record::{parse, NatRecord, ParseError};
use super::NAT_MATCH;
use crate::normalize::normalize;

/// A record dropped by first-seen-wins that maps its public address to a
/// different inside host than the record that was kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShadowedRecord {
    pub public_address: String,
    pub kept: NatRecord,
    pub shadowed: NatRecord,
}

/// Per-device map from public address to the first record seen for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublicIndex {
    entries: BTreeMap<String, NatRecord>,
    shadowed: Vec<ShadowedRecord>,
}

impl PublicIndex {
    pub fn get(&self, public_address: &str) -> Option<&NatRecord> {
        self.entries.get(public_address)
    }

    pub fn contains(&self, public_address: &str) -> bool {
        self.entries.contains_key(public_address)
    }

    /// Records in ascending public-address order.
    pub fn records(&self) -> impl Iterator<Item = &NatRecord> {
        self.entries.values()
    }

    pub fn public_addresses(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Same-device duplicates whose inside address disagrees with the kept record.
    ///
    /// Harmless exact duplicates are not listed.
    pub fn shadowed(&self) -> &[ShadowedRecord] {
        &self.shadowed
    }
}

/// Extract the static NAT lines from raw device output.
///
/// Lines are trimmed, deduplicated, and returned sorted.
pub fn nat_lines(raw: &str) -> Vec<String> {
    normalize(raw)
        .iter()
        .map(|line| line.as_str().trim())
        .filter(|line| line.starts_with(NAT_MATCH))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Count static NAT lines in raw device output, duplicates included.
///
/// Lines are split exactly as [`nat_lines`] splits them, so both agree on
/// the same capture whatever its line endings.
pub fn count_nat_lines(raw: &str) -> usize {
    normalize(raw)
        .iter()
        .filter(|line| line.as_str().trim().starts_with(NAT_MATCH))
        .count()
}

/// Build a [`PublicIndex`] from lines already filtered to [`NAT_MATCH`].
///
/// Any line that fails to parse aborts the build; skipping it could hide a
/// real entry and turn it into a false "safe to copy".
pub fn build_index<I, S>(lines: I) -> Result<PublicIndex, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let unique: BTreeSet<String> = lines
        .into_iter()
        .map(|line| line.as_ref().to_string())
        .collect();

    let mut index = PublicIndex::default();
    for line in &unique {
        let record = parse(line)?;
        match index.entries.entry(record.public_address.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(slot) => {
                let kept = slot.get();
                if kept.inside_address != record.inside_address {
                    warn!(
                        public = %record.public_address,
                        kept = %kept.inside_address,
                        ignored = %record.inside_address,
                        "public address mapped twice on one device; keeping first"
                    );
                    index.shadowed.push(ShadowedRecord {
                        public_address: record.public_address.clone(),
                        kept: kept.clone(),
                        shadowed: record,
                    });
                }
            }
        }
    }

    Ok(index)
}
