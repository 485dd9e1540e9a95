//! Config subcommand implementation.

use crate::config::{AppSettings, Paths};
use crate::error::CliResult;
use clap::Parser;
use std::path::Path;

/// Show where settings are read from and their effective values.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Only print the settings file path
    #[arg(long)]
    pub path: bool,
}

impl ConfigCommand {
    /// Execute the config command.
    pub fn execute(&self, settings: &AppSettings, explicit: Option<&Path>) -> CliResult<()> {
        let file = match explicit {
            Some(path) => path.to_path_buf(),
            None => Paths::discover()?.settings_file(),
        };

        println!("{}", file.display());
        if !self.path {
            let json = serde_json::to_string_pretty(settings).map_err(anyhow::Error::from)?;
            println!("{}", json);
        }
        Ok(())
    }
}
