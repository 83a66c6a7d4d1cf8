use anyhow::Result;
use router_diff_core::NAT_MATCH;
use router_tools::compare::nat_parity;
use router_tools::report::render_nat_parity;

use crate::cli::{GlobalArgs, OutputFormat};
use crate::output::print_blocked;
use crate::session::Session;

pub fn run_nat_diff(global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    session.settings.pair()?;

    let report = match nat_parity(session.transport(), &session.settings) {
        Ok(report) => report,
        Err(err) => {
            print_blocked(global.format, &err, Some(NAT_MATCH))?;
            return Err(err.into());
        }
    };

    match global.format {
        OutputFormat::Text => println!("{}", render_nat_parity(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
