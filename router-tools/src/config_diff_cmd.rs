use anyhow::Result;
use router_diff_core::DiffOptions;
use router_tools::compare::config_diff;
use router_tools::report::render_config_diff;

use crate::cli::{ConfigDiffArgs, GlobalArgs, OutputFormat};
use crate::output::print_blocked;
use crate::session::Session;

pub fn run_config_diff(global: &GlobalArgs, args: &ConfigDiffArgs) -> Result<()> {
    let session = Session::open(global)?;
    session.settings.pair()?;

    let opts = DiffOptions {
        context: args.context,
    };
    let report = match config_diff(session.transport(), &session.settings, &opts) {
        Ok(report) => report,
        Err(err) => {
            print_blocked(global.format, &err, None)?;
            return Err(err.into());
        }
    };

    match global.format {
        OutputFormat::Text => println!("{}", render_config_diff(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
