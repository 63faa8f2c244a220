//! Command-line arguments.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "unigate",
    version,
    about = "HTTP gateway for UniFi client aliases and private pre-shared keys"
)]
pub struct Cli {
    /// TOML config file with [controller] and [server] sections
    #[arg(long, short = 'c', env = "UNIGATE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Listen address, overrides the config file and UNIGATE_LISTEN
    #[arg(long, short = 'l', value_name = "ADDR")]
    pub listen: Option<SocketAddr>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, env = "UNIGATE_LOG_JSON")]
    pub log_json: bool,

    /// Print the effective configuration (secrets masked) and exit
    #[arg(long)]
    pub print_config: bool,
}
