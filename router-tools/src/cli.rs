use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "router-tools")]
#[command(about = "Detect configuration and static NAT drift between a pair of routers")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    /// Mode to run. Without one an interactive menu is shown.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Settings TOML file. ROUTER_* environment variables override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Read captured output from <dir>/<host>.txt instead of connecting over SSH.
    #[arg(long, global = true)]
    pub snapshots: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,
    /// Debug logging on stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Reconcile static NAT entries of both routers by public address.
    NatDiff,
    /// Count static NAT entries on one router.
    NatCount(NatCountArgs),
    /// Unified diff of both routers' running configs after noise cleanup.
    ConfigDiff(ConfigDiffArgs),
    /// Pick a mode from an interactive menu.
    Menu,
}

#[derive(Parser, Debug, Clone)]
pub struct NatCountArgs {
    /// Which configured router to query.
    #[arg(long, value_enum, default_value_t = Router::First)]
    pub router: Router,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigDiffArgs {
    /// Unchanged lines shown around each change.
    #[arg(long, default_value_t = 3)]
    pub context: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum Router {
    #[value(name = "1")]
    First,
    #[value(name = "2")]
    Second,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
