//! Owner command implementation.
//!
//! Prints the instance that holds a given port, or exits with status 1
//! when the port is unassigned.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};
use clap::Args;
use serde_json::json;
use warden::Port;

/// Look up the instance that holds a given port.
#[derive(Args)]
pub struct OwnerCommand {
    /// Port number
    #[arg(value_name = "PORT")]
    pub port: u16,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl OwnerCommand {
    /// Execute the owner command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let port =
            Port::try_from(self.port).map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let config = load_configuration(global)?;
        let authority = open_store(global, &config)?;

        match authority.instance_for_port(port).map_err(CliError::from)? {
            Some(instance) => {
                if self.json {
                    println!("{}", json!({ "instance": instance, "port": port.value() }));
                } else {
                    println!("{instance}");
                }
                Ok(())
            }
            None => Err(CliError::SemanticFailure(format!(
                "Port {port} is not assigned"
            ))),
        }
    }
}
