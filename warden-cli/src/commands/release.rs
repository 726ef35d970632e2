//! Release command implementation.
//!
//! This module implements the `release` command, which returns the port
//! held by an instance to the free pool. Releasing an instance with no
//! port is a no-op.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};
use clap::Args;

/// Release the port held by a named service instance.
#[derive(Args)]
pub struct ReleaseCommand {
    /// Service instance name
    #[arg(value_name = "INSTANCE")]
    pub instance: String,
}

impl ReleaseCommand {
    /// Execute the release command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.instance.is_empty() {
            return Err(CliError::InvalidArguments(
                "Instance name must not be empty".to_string(),
            ));
        }

        let config = load_configuration(global)?;
        let mut authority = open_store(global, &config)?;

        // Look up first only so we can report what was freed.
        let held = authority
            .port_for_instance(&self.instance)
            .map_err(CliError::from)?;

        authority.release(&self.instance).map_err(CliError::from)?;

        if !global.quiet {
            match held {
                Some(port) => println!("Released port {port} from {}", self.instance),
                None => println!("No port held by {}", self.instance),
            }
        }

        Ok(())
    }
}
