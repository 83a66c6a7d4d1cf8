use serde::Serialize;

/// Role of a line inside a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineTag {
    /// Unchanged line shown around a change.
    Context,
    /// Present only in the right-hand sequence.
    Added,
    /// Present only in the left-hand sequence.
    Removed,
}

impl LineTag {
    /// Unified-diff prefix character.
    pub fn marker(self) -> char {
        match self {
            LineTag::Context => ' ',
            LineTag::Added => '+',
            LineTag::Removed => '-',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub tag: LineTag,
    pub text: String,
}

/// A run of changes plus surrounding context.
///
/// Starts are zero-based indices into the compared sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub lines: Vec<DiffLine>,
}

/// Full diff result. Empty means the sequences are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineDiff {
    pub hunks: Vec<DiffHunk>,
}

impl LineDiff {
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Every tagged line across all hunks, in order.
    pub fn lines(&self) -> impl Iterator<Item = &DiffLine> {
        self.hunks.iter().flat_map(|hunk| hunk.lines.iter())
    }

    pub fn count(&self, tag: LineTag) -> usize {
        self.lines().filter(|line| line.tag == tag).count()
    }
}
