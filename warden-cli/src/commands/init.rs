//! Init command implementation.
//!
//! This module implements the `init` command, which populates the free
//! pool with every port in the allocatable range. Running it against an
//! already-initialized store is a no-op.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};
use clap::Args;
use warden::{Error, PortRange, RangeConfig};

/// Initialize the free pool with the allocatable port range.
#[derive(Args)]
pub struct InitCommand {
    /// First port in the range (inclusive)
    #[arg(long, value_name = "PORT")]
    pub start: Option<u16>,

    /// Port after the last in the range (exclusive)
    #[arg(long, value_name = "PORT")]
    pub end: Option<u16>,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // Range priority: command flags > configuration > defaults
        let config = load_configuration(global)?;
        let configured = config.port_range().map_err(CliError::from)?;

        let (start, end) = self.effective_range(RangeConfig {
            start: configured.start(),
            end: configured.end(),
        });
        let range =
            PortRange::new(start, end).map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let mut authority = open_store(global, &config)?;
        match authority.initialize_range(range) {
            Ok(()) => {
                if !global.quiet {
                    println!(
                        "Initialized pool with {} ports ({}..{})",
                        range.len(),
                        range.start(),
                        range.end()
                    );
                }
                Ok(())
            }
            // Second init against a live store must not clobber assignments.
            Err(Error::AlreadyInitialized) => {
                if !global.quiet {
                    println!("Pool already initialized; nothing to do");
                }
                Ok(())
            }
            Err(e) => Err(CliError::from(e)),
        }
    }

    /// The effective range this command would initialize, given a
    /// configured fallback.
    pub fn effective_range(&self, fallback: RangeConfig) -> (u16, u16) {
        (
            self.start.unwrap_or(fallback.start),
            self.end.unwrap_or(fallback.end),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_range_prefers_flags() {
        let cmd = InitCommand {
            start: Some(5000),
            end: None,
        };
        let fallback = RangeConfig {
            start: 30000,
            end: 40000,
        };
        assert_eq!(cmd.effective_range(fallback), (5000, 40000));
    }
}
