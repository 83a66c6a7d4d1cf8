use anyhow::Result;
use router_tools::compare::CompareError;
use router_tools::report::render_blocked;

use crate::cli::OutputFormat;

/// Print what is known about a blocked comparison before the error itself is
/// reported. Any other error prints nothing.
pub fn print_blocked(format: OutputFormat, err: &CompareError, match_prefix: Option<&str>) -> Result<()> {
    let CompareError::Blocked {
        host, available, ..
    } = err
    else {
        return Ok(());
    };
    match format {
        OutputFormat::Text => println!("{}\n", render_blocked(available, match_prefix, host)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "blocked_by": host,
                "available": available,
            }))?
        ),
    }
    Ok(())
}
