//! Assigned command implementation.
//!
//! Prints the number of ports marked as assigned, or each such port with
//! `--list`.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};
use clap::Args;
use serde_json::json;

/// Show ports currently marked as assigned.
#[derive(Args)]
pub struct AssignedCommand {
    /// List each port instead of printing the count
    #[arg(long)]
    pub list: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AssignedCommand {
    /// Execute the assigned command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let authority = open_store(global, &config)?;

        if self.list {
            let mut ports = authority.assigned_list().map_err(CliError::from)?;
            ports.sort_unstable();
            if self.json {
                let values: Vec<u16> = ports.iter().map(|p| p.value()).collect();
                println!("{}", json!({ "assigned": values }));
            } else {
                for port in ports {
                    println!("{port}");
                }
            }
        } else {
            let count = authority.assigned_count().map_err(CliError::from)?;
            if self.json {
                println!("{}", json!({ "assigned": count }));
            } else {
                println!("{count}");
            }
        }

        Ok(())
    }
}
