use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config_diff_cmd;
mod exit;
mod menu;
mod nat_count_cmd;
mod nat_diff_cmd;
mod output;
mod session;

use cli::{Cli, Command, GlobalArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let dotenv = load_dotenv();
    init_tracing(cli.global.verbose);
    if cli.global.no_color {
        colored::control::set_override(false);
    }
    if let Err(err) = dotenv {
        eprintln!("ERROR: {err:#}");
        return ExitCode::from(exit::code_for(&err));
    }

    let command = match cli.command {
        Some(command) => command,
        None => Command::Menu,
    };
    match run(&cli.global, command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::from(exit::code_for(&err))
        }
    }
}

fn run(global: &GlobalArgs, command: Command) -> Result<ExitCode> {
    match command {
        Command::NatDiff => nat_diff_cmd::run_nat_diff(global)?,
        Command::NatCount(args) => nat_count_cmd::run_nat_count(global, &args)?,
        Command::ConfigDiff(args) => config_diff_cmd::run_config_diff(global, &args)?,
        Command::Menu => match menu::prompt_stdio()? {
            Some(Command::Menu) | None => {
                println!("Invalid selection.");
                return Ok(ExitCode::from(exit::INVALID_SELECTION));
            }
            Some(choice) => return run(global, choice),
        },
    }
    Ok(ExitCode::SUCCESS)
}

/// Load `.env` into the environment. Existing variables always win; a
/// missing file is normal, an unreadable or malformed one is fatal.
fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err).context("failed to load .env"),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
