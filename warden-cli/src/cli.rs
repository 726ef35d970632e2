//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AcquireCommand, AssignedCommand, FreeCommand, InitCommand, LookupCommand, OwnerCommand,
    ReleaseCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for allocating ports to named service instances.
#[derive(Parser)]
#[command(name = "warden")]
#[command(version, about = "Allocate ports to named service instances", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the store file location
    #[arg(long, value_name = "PATH", global = true, env = "WARDEN_STORE")]
    pub store: Option<PathBuf>,

    /// Override the default busy timeout (in milliseconds)
    #[arg(long, value_name = "MS", global = true, env = "WARDEN_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the free pool with the allocatable port range
    Init(InitCommand),

    /// Acquire a port for a named service instance
    Acquire(AcquireCommand),

    /// Release the port held by a named service instance
    Release(ReleaseCommand),

    /// Look up the port held by a named service instance
    Lookup(LookupCommand),

    /// Look up the instance that holds a given port
    Owner(OwnerCommand),

    /// Show free ports in the pool
    Free(FreeCommand),

    /// Show ports currently marked as assigned
    Assigned(AssignedCommand),
}
