//! Main entry point for the warden CLI.
//!
//! This is the command-line interface for the warden port allocation
//! service. It provides commands for managing the pool of allocatable
//! ports:
//! - `init`: Populate the free pool with the allocatable range
//! - `acquire`: Acquire a port for a named service instance
//! - `release`: Return an instance's port to the free pool
//! - `lookup` / `owner`: Query the instance-port registry
//! - `free` / `assigned`: Inspect the pool

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _logger = warden::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        store: cli.store,
        busy_timeout: cli.busy_timeout,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Acquire(cmd) => cmd.execute(&global),
        cli::Command::Release(cmd) => cmd.execute(&global),
        cli::Command::Lookup(cmd) => cmd.execute(&global),
        cli::Command::Owner(cmd) => cmd.execute(&global),
        cli::Command::Free(cmd) => cmd.execute(&global),
        cli::Command::Assigned(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
