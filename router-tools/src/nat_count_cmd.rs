use anyhow::Result;
use router_tools::compare::nat_count;
use router_tools::report::render_nat_count;

use crate::cli::{GlobalArgs, NatCountArgs, OutputFormat, Router};
use crate::session::Session;

pub fn run_nat_count(global: &GlobalArgs, args: &NatCountArgs) -> Result<()> {
    let session = Session::open(global)?;
    let report = nat_count(
        session.transport(),
        &session.settings,
        args.router == Router::Second,
    )?;

    match global.format {
        OutputFormat::Text => println!("{}\n", render_nat_count(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
