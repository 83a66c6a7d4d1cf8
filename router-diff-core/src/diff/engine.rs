use similar::{capture_diff_slices, group_diff_ops, Algorithm, DiffOp, DiffTag};

use crate::diff::result::{DiffHunk, DiffLine, LineDiff, LineTag};
use crate::normalize::ConfigLine;

/// Configures line diff behavior.
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Unchanged lines kept on each side of a change.
    pub context: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self { context: 3 }
    }
}

/// Diff two normalized configs with default options.
pub fn diff(left: &[ConfigLine], right: &[ConfigLine]) -> LineDiff {
    diff_with_options(left, right, &DiffOptions::default())
}

/// Diff two normalized configs with custom options.
pub fn diff_with_options(left: &[ConfigLine], right: &[ConfigLine], opts: &DiffOptions) -> LineDiff {
    let ops = capture_diff_slices(Algorithm::Myers, left, right);
    let hunks = group_diff_ops(ops, opts.context)
        .into_iter()
        .filter(|group| group.iter().any(|op| op.tag() != DiffTag::Equal))
        .filter_map(|group| build_hunk(&group, left, right))
        .collect();

    LineDiff { hunks }
}

fn build_hunk(group: &[DiffOp], left: &[ConfigLine], right: &[ConfigLine]) -> Option<DiffHunk> {
    let first = group.first()?;
    let last = group.last()?;
    let old_start = first.old_range().start;
    let new_start = first.new_range().start;

    let mut lines = Vec::new();
    for op in group {
        let (tag, old, new) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => push_lines(&mut lines, LineTag::Context, &left[old]),
            DiffTag::Delete => push_lines(&mut lines, LineTag::Removed, &left[old]),
            DiffTag::Insert => push_lines(&mut lines, LineTag::Added, &right[new]),
            DiffTag::Replace => {
                push_lines(&mut lines, LineTag::Removed, &left[old]);
                push_lines(&mut lines, LineTag::Added, &right[new]);
            }
        }
    }

    Some(DiffHunk {
        old_start,
        old_len: last.old_range().end - old_start,
        new_start,
        new_len: last.new_range().end - new_start,
        lines,
    })
}

fn push_lines(out: &mut Vec<DiffLine>, tag: LineTag, src: &[ConfigLine]) {
    out.extend(src.iter().map(|line| DiffLine {
        tag,
        text: line.to_string(),
    }));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{diff, diff_with_options, DiffOptions};
    use crate::diff::result::LineTag;
    use crate::normalize::normalize;

    #[test]
    fn replaced_line_is_removed_then_added() {
        let left = normalize("a\nb\nc\n");
        let right = normalize("a\nB\nc\n");
        let result = diff(&left, &right);

        let tags: Vec<_> = result.lines().map(|l| (l.tag, l.text.as_str())).collect();
        assert_eq!(
            tags,
            vec![
                (LineTag::Context, "a"),
                (LineTag::Removed, "b"),
                (LineTag::Added, "B"),
                (LineTag::Context, "c"),
            ]
        );
    }

    #[test]
    fn distant_changes_split_into_separate_hunks() {
        let left = normalize("1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n");
        let right = normalize("1x\n2\n3\n4\n5\n6\n7\n8\n9\n10x\n");
        let result = diff_with_options(&left, &right, &DiffOptions { context: 1 });

        assert_eq!(result.hunks.len(), 2);
        assert_eq!(result.hunks[0].old_start, 0);
        assert_eq!(result.hunks[0].old_len, 2);
        assert_eq!(result.hunks[1].old_start, 8);
        assert_eq!(result.hunks[1].new_len, 2);
    }

    #[test]
    fn zero_context_keeps_only_changes() {
        let left = normalize("a\nb\nc\n");
        let right = normalize("a\nc\n");
        let result = diff_with_options(&left, &right, &DiffOptions { context: 0 });
        assert_eq!(result.count(LineTag::Context), 0);
        assert_eq!(result.count(LineTag::Removed), 1);
    }
}
