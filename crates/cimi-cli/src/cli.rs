//! CLI argument definitions.

use clap::{Args, Parser};

use crate::commands::Commands;

/// Command-line client for CIMI cloud providers.
#[derive(Parser, Debug)]
#[command(name = "cimi")]
#[command(author, version = env!("CIMI_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Provider connection settings. Flags and environment win over the
/// stored configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Provider endpoint URL
    #[arg(long, env = "CIMI_ENDPOINT_URL", global = true)]
    pub endpoint: Option<String>,

    /// User name for basic authentication
    #[arg(long, env = "CIMI_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "CIMI_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,
}
