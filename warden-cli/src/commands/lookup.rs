//! Lookup command implementation.
//!
//! Prints the port held by an instance, or exits with status 1 when the
//! instance holds nothing.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};
use clap::Args;
use serde_json::json;

/// Look up the port held by a named service instance.
#[derive(Args)]
pub struct LookupCommand {
    /// Service instance name
    #[arg(value_name = "INSTANCE")]
    pub instance: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl LookupCommand {
    /// Execute the lookup command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let authority = open_store(global, &config)?;

        match authority
            .port_for_instance(&self.instance)
            .map_err(CliError::from)?
        {
            Some(port) => {
                if self.json {
                    println!(
                        "{}",
                        json!({ "instance": self.instance, "port": port.value() })
                    );
                } else {
                    println!("{port}");
                }
                Ok(())
            }
            None => Err(CliError::SemanticFailure(format!(
                "No port held by {}",
                self.instance
            ))),
        }
    }
}
