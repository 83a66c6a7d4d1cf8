use crate::diff::result::{LineDiff, LineTag};
use crate::nat::ReconciliationResult;

/// Format a line diff as a unified diff with `---`/`+++` file headers.
///
/// Returns an empty string when there is nothing to show.
pub fn format_unified(diff: &LineDiff, from_label: &str, to_label: &str) -> String {
    if diff.is_empty() {
        return String::new();
    }

    let mut lines = vec![format!("--- {from_label}"), format!("+++ {to_label}")];
    for hunk in &diff.hunks {
        lines.push(format!(
            "@@ -{} +{} @@",
            unified_range(hunk.old_start, hunk.old_len),
            unified_range(hunk.new_start, hunk.new_len)
        ));
        for line in &hunk.lines {
            lines.push(format!("{}{}", line.tag.marker(), line.text));
        }
    }
    lines.join("\n")
}

/// Format a simple summary of diff counts.
pub fn format_summary(diff: &LineDiff) -> String {
    format!(
        "hunks={} added={} removed={}",
        diff.hunks.len(),
        diff.count(LineTag::Added),
        diff.count(LineTag::Removed)
    )
}

/// Format a simple summary of reconciliation counts.
pub fn format_reconciliation_summary(result: &ReconciliationResult) -> String {
    format!(
        "missing_on_a={} missing_on_b={} conflicts={} in_sync={}",
        result.missing_on_a.len(),
        result.missing_on_b.len(),
        result.conflicts.len(),
        result.in_sync
    )
}

// One-based start; an empty range points at the line before it.
fn unified_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{len}", start + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_unified, unified_range};
    use crate::diff::diff;
    use crate::normalize::normalize;

    #[test]
    fn ranges_follow_unified_conventions() {
        assert_eq!(unified_range(0, 3), "1,3");
        assert_eq!(unified_range(4, 1), "5");
        assert_eq!(unified_range(2, 0), "2,0");
    }

    #[test]
    fn unified_output_has_headers_and_markers() {
        let left = normalize("hostname r1\ninterface Gi0/0\n");
        let right = normalize("hostname r1\ninterface Gi0/0\n shutdown\n");
        let text = format_unified(&diff(&left, &right), "r1:running-config", "r2:running-config");

        assert_eq!(
            text,
            "--- r1:running-config\n\
             +++ r2:running-config\n\
             @@ -1,2 +1,3 @@\n \
             hostname r1\n \
             interface Gi0/0\n\
             + shutdown"
        );
    }

    #[test]
    fn equal_inputs_render_nothing() {
        let lines = normalize("a\nb\n");
        assert!(format_unified(&diff(&lines, &lines), "x", "y").is_empty());
    }
}
