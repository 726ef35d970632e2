//! Acquire command implementation.
//!
//! This module implements the `acquire` command, which hands a port to a
//! named service instance. Repeating the command for the same instance
//! returns the port it already holds.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};
use clap::Args;
use serde_json::json;

/// Acquire a port for a named service instance.
#[derive(Args)]
pub struct AcquireCommand {
    /// Service instance name
    #[arg(value_name = "INSTANCE")]
    pub instance: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AcquireCommand {
    /// Execute the acquire command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.instance.is_empty() {
            return Err(CliError::InvalidArguments(
                "Instance name must not be empty".to_string(),
            ));
        }

        let config = load_configuration(global)?;
        let mut authority = open_store(global, &config)?;

        let port = authority.acquire(&self.instance).map_err(CliError::from)?;

        if self.json {
            let output = json!({
                "instance": self.instance,
                "port": port.value(),
            });
            println!("{output}");
        } else {
            println!("{port}");
        }

        Ok(())
    }
}
