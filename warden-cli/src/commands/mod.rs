//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Initialize the free pool with the allocatable port range
//! - `acquire`: Acquire a port for a named service instance
//! - `release`: Release the port held by an instance
//! - `lookup`: Look up the port held by an instance
//! - `owner`: Look up the instance that holds a port
//! - `free`: Show free ports in the pool
//! - `assigned`: Show ports currently marked as assigned

pub mod acquire;
pub mod assigned;
pub mod free;
pub mod init;
pub mod lookup;
pub mod owner;
pub mod release;

pub use acquire::AcquireCommand;
pub use assigned::AssignedCommand;
pub use free::FreeCommand;
pub use init::InitCommand;
pub use lookup::LookupCommand;
pub use owner::OwnerCommand;
pub use release::ReleaseCommand;
