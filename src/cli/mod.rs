//! CLI subcommand definitions and handlers.
//!
//! - `portprobe scan <host>` - Scan a port range on a host
//! - `portprobe config` - Show the settings file and effective settings
//! - `portprobe` with no subcommand prompts for host and ports interactively

mod config;
mod prompt;
mod scan;

pub use config::ConfigCommand;
pub use prompt::prompt_request;
pub use scan::{parse_port_bounds, ScanCommand};

use crate::config::AppSettings;
use crate::error::CliResult;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;

/// portprobe - a concurrent TCP port connectivity probe.
///
/// Attempts a short-timeout TCP connection to each port in a range and
/// reports every port as open, closed, or error.
#[derive(Parser, Debug)]
#[command(name = "portprobe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP port connectivity probe", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a settings file (defaults to the XDG config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a port range on a host
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Show configuration
    Config(ConfigCommand),
}

impl Cli {
    /// Load settings and run the selected command.
    pub async fn run(self) -> CliResult<()> {
        let settings = AppSettings::load(self.config.as_deref())?;

        match self.command {
            Some(Commands::Scan(cmd)) => cmd.execute(&settings, self.verbose, self.quiet).await,
            Some(Commands::Config(cmd)) => cmd.execute(&settings, self.config.as_deref()),
            None => {
                let (host, start, end) = {
                    let stdin = io::stdin();
                    let mut input = stdin.lock();
                    prompt_request(&mut input, &mut io::stderr())?
                };
                ScanCommand::interactive(host, start, end)
                    .execute(&settings, self.verbose, self.quiet)
                    .await
            }
        }
    }
}

/// Output format for results.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Plain,
    /// One "[+] Port N open" style line per port
    Lines,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Lines => write!(f, "lines"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}
