//! Error types for the warden library.
//!
//! The allocation protocol surfaces every anomaly as a typed failure from
//! this closed set; nothing is ever detected by matching message text.

use thiserror::Error;

use crate::port::Port;

/// Result type alias for operations that may fail with a warden error.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the warden library.
#[derive(Debug, Error)]
pub enum Error {
    /// The free pool already exists in the store.
    ///
    /// Returned by pool initialization to guard against re-seeding a store
    /// that already handed out ports in a previous run.
    #[error("port pool already initialized; refusing to re-seed a live pool")]
    AlreadyInitialized,

    /// Pool population finished with the wrong cardinality.
    ///
    /// The store partially failed mid-population. Fatal; an operator must
    /// investigate before the pool can be trusted.
    #[error("pool initialization integrity failure: needed {expected} ports, got {actual}")]
    InitializationIntegrity {
        /// The number of ports the range should have produced.
        expected: u64,
        /// The cardinality the store reported after population.
        actual: u64,
    },

    /// The free pool has no ports left.
    ///
    /// Terminal for the request; capacity must be grown externally. Never
    /// retried automatically.
    #[error("port pool exhausted")]
    PoolExhausted,

    /// A freshly popped port was already marked assigned and has an owner.
    ///
    /// A prior crash left the port double-booked. The acquisition is aborted
    /// rather than stealing the port from its active owner; safe to retry
    /// once the residue is resolved.
    #[error("port {port} popped from the free pool is already assigned to '{owner}'")]
    PortIntegrity {
        /// The double-booked port.
        port: Port,
        /// The instance currently recorded as owning the port.
        owner: String,
    },

    /// A port's reverse mapping already names a different instance.
    ///
    /// Two instance names now believe they own the same port. Fatal and
    /// never auto-repaired: picking a side risks evicting a live owner.
    #[error("port {port} is already mapped to another instance; refusing to bind '{instance}'")]
    PortInstanceInconsistency {
        /// The contested port.
        port: Port,
        /// The instance whose bind was rejected.
        instance: String,
    },

    /// The backing store could not be reached or opened.
    ///
    /// All operations fail fast on this; retry and backoff belong to the
    /// caller or to process supervision.
    #[error("store unavailable: {reason}")]
    StoreUnavailable {
        /// Description of the connection failure.
        reason: String,
    },

    /// A store operation failed.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Stored state could not be interpreted.
    ///
    /// For example a set member that is not a port number, or a winner
    /// mapping that vanished mid-recovery. Fatal; the store needs manual
    /// inspection.
    #[error("store state corruption: {details}")]
    StateCorruption {
        /// Details about the corrupt state.
        details: String,
    },

    /// An invalid port number was provided.
    #[error("invalid port {value}: {reason}")]
    InvalidPort {
        /// The invalid port value.
        value: u16,
        /// The reason the port is invalid.
        reason: String,
    },

    /// An invalid port range was specified.
    #[error("invalid port range {start}..{end}: {reason}")]
    InvalidPortRange {
        /// The requested start of the range.
        start: u16,
        /// The requested exclusive end of the range.
        end: u16,
        /// The reason the range is invalid.
        reason: String,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A configuration value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<crate::port::InvalidPortError> for Error {
    fn from(err: crate::port::InvalidPortError) -> Self {
        Self::InvalidPort {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl From<crate::port::InvalidPortRangeError> for Error {
    fn from(err: crate::port::InvalidPortRangeError) -> Self {
        Self::InvalidPortRange {
            start: err.start,
            end: err.end,
            reason: err.reason,
        }
    }
}

impl Error {
    /// Check if the error means the free pool ran dry.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::PoolExhausted)
    }

    /// Check if the error requires operator intervention before the store
    /// can be trusted again.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden::Error;
    ///
    /// assert!(!Error::PoolExhausted.is_fatal());
    /// assert!(Error::StateCorruption { details: "bad member".into() }.is_fatal());
    /// ```
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InitializationIntegrity { .. }
                | Self::PortInstanceInconsistency { .. }
                | Self::StateCorruption { .. }
        )
    }
}
