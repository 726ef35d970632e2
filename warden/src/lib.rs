#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # warden
//!
//! A library for allocating TCP/UDP port numbers from a fixed range to
//! named service instances, tracking each assignment so any process sharing
//! the backing store can resolve instance↔port in both directions and
//! release ports back to the pool.
//!
//! The interesting part is the allocation protocol in [`Authority`]: a set
//! of atomic store operations that move a port between the free pool and
//! the assignment registry while keeping the instance↔port mapping a
//! bijection, even when concurrent callers race to acquire the same
//! instance name.
//!
//! ## Core Types
//!
//! - [`Port`] and [`PortRange`]: validated port types
//! - [`Store`]: the key-value primitives the protocol is built on, with
//!   [`SqliteStore`] (durable, shared) and [`MemoryStore`] backends
//! - [`PoolOps`] and [`RegistryOps`]: the free/assigned sets and the
//!   bijective registry, as extension traits over any store
//! - [`Authority`]: the allocation service
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use warden::{Authority, MemoryStore, PortRange};
//!
//! let mut authority = Authority::new(MemoryStore::new());
//! authority
//!     .initialize_range(PortRange::new(30000, 30010).unwrap())
//!     .unwrap();
//!
//! let port = authority.acquire("web-1").unwrap();
//! assert_eq!(authority.acquire("web-1").unwrap(), port);
//!
//! authority.release("web-1").unwrap();
//! assert_eq!(authority.free_count().unwrap(), 10);
//! ```

pub mod authority;
pub mod config;
pub mod error;
pub mod logging;
pub mod pool;
pub mod port;
pub mod registry;
pub mod store;

// Re-export key types at crate root for convenience
pub use authority::Authority;
pub use config::{Config, ConfigBuilder, RangeConfig};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use pool::PoolOps;
pub use port::{Port, PortRange};
pub use registry::RegistryOps;
pub use store::{DeleteOp, MemoryStore, SqliteStore, Store, StoreConfig};
