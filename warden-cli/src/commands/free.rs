//! Free command implementation.
//!
//! Prints the number of ports in the free pool, or each free port with
//! `--list`.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};
use clap::Args;
use serde_json::json;

/// Show free ports in the pool.
#[derive(Args)]
pub struct FreeCommand {
    /// List each port instead of printing the count
    #[arg(long)]
    pub list: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FreeCommand {
    /// Execute the free command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let authority = open_store(global, &config)?;

        if self.list {
            let mut ports = authority.free_list().map_err(CliError::from)?;
            ports.sort_unstable();
            if self.json {
                let values: Vec<u16> = ports.iter().map(|p| p.value()).collect();
                println!("{}", json!({ "free": values }));
            } else {
                for port in ports {
                    println!("{port}");
                }
            }
        } else {
            let count = authority.free_count().map_err(CliError::from)?;
            if self.json {
                println!("{}", json!({ "free": count }));
            } else {
                println!("{count}");
            }
        }

        Ok(())
    }
}
