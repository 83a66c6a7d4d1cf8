use colored::Colorize;
use router_diff_core::{format_unified, NatRecord};

use crate::compare::{ConfigDiffReport, DeviceSummary, NatCountReport, NatParityReport};

/// Render the single-router NAT count.
pub fn render_nat_count(report: &NatCountReport) -> String {
    let mut out = vec!["Mode:   nat-count".cyan().to_string()];
    push_router(&mut out, &report.router, report.match_prefix);
    out.join("\n")
}

/// Render NAT parity: per-router summaries, safe-missing sections, conflicts.
pub fn render_nat_parity(report: &NatParityReport) -> String {
    let [r1, r2] = &report.routers;
    let mut out = vec!["Mode:   nat-diff".cyan().to_string()];
    for router in &report.routers {
        push_router(&mut out, router, report.match_prefix);
        out.push(String::new());
    }

    for entry in &report.shadowed {
        out.push(
            format!(
                "WARNING: {} maps public {} to {} (kept) and {} (ignored)",
                entry.host,
                entry.record.public_address,
                entry.record.kept.inside_address,
                entry.record.shadowed.inside_address
            )
            .yellow()
            .to_string(),
        );
    }
    if !report.shadowed.is_empty() {
        out.push(String::new());
    }

    push_missing(
        &mut out,
        &format!(
            "SAFE MISSING on Router1 {}, present on Router2 {} (copy/paste allowed)",
            r1.host, r2.host
        ),
        &report.result.missing_on_a,
    );
    push_missing(
        &mut out,
        &format!(
            "SAFE MISSING on Router2 {}, present on Router1 {} (copy/paste allowed)",
            r2.host, r1.host
        ),
        &report.result.missing_on_b,
    );

    let conflicts = &report.result.conflicts;
    out.push(
        "CONFLICTS (same public IP, different inside IPs - DO NOT paste blindly)"
            .red()
            .bold()
            .to_string(),
    );
    out.push(format!("Count:  {}", conflicts.len()));
    if !conflicts.is_empty() {
        out.push("----".to_string());
        for conflict in conflicts {
            out.push(format!("# Router1 {}", r1.host));
            out.push(conflict.record_a.raw_line.red().to_string());
            out.push(format!("# Router2 {}", r2.host));
            out.push(conflict.record_b.raw_line.red().to_string());
            out.push(String::new());
        }
        out.push("----".to_string());
    }
    out.push(String::new());
    out.push(format!("In sync: {}", report.result.in_sync).cyan().to_string());

    out.join("\n")
}

/// Render the whole-config unified diff.
pub fn render_config_diff(report: &ConfigDiffReport) -> String {
    let mut out = vec!["Mode:     config-diff".cyan().to_string()];
    for (idx, router) in report.routers.iter().enumerate() {
        out.push(format!(
            "Router {}: {} ({} lines, {:.2}s)",
            idx + 1,
            router.host,
            router.count,
            router.elapsed_secs
        ));
    }
    out.push(String::new());

    if report.diff.is_empty() {
        out.push("Result: configs match (after cleanup).".green().to_string());
        return out.join("\n");
    }

    for line in format_unified(&report.diff, &report.from_label, &report.to_label).lines() {
        let colored = if line.starts_with("+++") || line.starts_with("---") {
            line.bold().to_string()
        } else if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else if line.starts_with("@@") {
            line.cyan().to_string()
        } else {
            line.to_string()
        };
        out.push(colored);
    }
    out.join("\n")
}

/// Render what did arrive when a two-device comparison could not run.
pub fn render_blocked(available: &[DeviceSummary], match_prefix: Option<&str>, host: &str) -> String {
    let mut out = Vec::new();
    for router in available {
        push_router(&mut out, router, match_prefix.unwrap_or("-"));
        out.push(String::new());
    }
    out.push(
        format!("Comparison blocked: {host} is unavailable")
            .red()
            .bold()
            .to_string(),
    );
    out.join("\n")
}

fn push_router(out: &mut Vec<String>, router: &DeviceSummary, match_prefix: &str) {
    out.push(format!("Router: {}", router.host));
    out.push(format!("Match:  {match_prefix}"));
    out.push(format!("Count:  {}", router.count));
    out.push(format!("Took:   {:.2}s", router.elapsed_secs));
}

fn push_missing(out: &mut Vec<String>, title: &str, records: &[NatRecord]) {
    out.push(title.green().bold().to_string());
    out.push(format!("Count:  {}", records.len()));
    if !records.is_empty() {
        out.push("----".to_string());
        for record in records {
            out.push(record.raw_line.clone());
        }
        out.push("----".to_string());
    }
    out.push(String::new());
}
