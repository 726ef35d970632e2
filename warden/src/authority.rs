//! The allocation service.
//!
//! [`Authority`] orchestrates the pool and registry to hand ports to named
//! instances and take them back, tolerating concurrent callers racing for
//! the same instance name. The store handle is injected at construction and
//! is the only coordination point; there are no locks and no module-level
//! state. Acquire spans up to three store round-trips and is not atomic as
//! a whole — the recovery logic in [`Authority::acquire`] is what turns the
//! individual atomic primitives into an effectively-exactly-once outcome
//! per instance name.

use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::pool::PoolOps;
use crate::port::{Port, PortRange};
use crate::registry::RegistryOps;
use crate::store::Store;

/// The allocation service over an injected store handle.
///
/// Created once at startup and passed to every request handler; concurrent
/// processes each hold their own `Authority` over the same shared store and
/// cooperate purely through the store's atomic primitives.
///
/// # Examples
///
/// ```
/// use warden::{Authority, MemoryStore, PortRange};
///
/// let mut authority = Authority::new(MemoryStore::new());
/// authority
///     .initialize_range(PortRange::new(30000, 30010).unwrap())
///     .unwrap();
///
/// let port = authority.acquire("svc-a").unwrap();
/// assert_eq!(authority.acquire("svc-a").unwrap(), port);
/// authority.release("svc-a").unwrap();
/// ```
pub struct Authority<S: Store> {
    store: S,
    logger: Logger,
}

impl<S: Store> Authority<S> {
    /// Creates an authority over the given store with a default logger.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            logger: Logger::default(),
        }
    }

    /// Creates an authority with an explicit logger.
    #[must_use]
    pub fn with_logger(store: S, logger: Logger) -> Self {
        Self { store, logger }
    }

    /// Returns a reference to the underlying store, for inspection tooling.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Seeds the free pool with every port in `range`.
    ///
    /// Invoked once at process startup. A pool that already exists is left
    /// alone and reported as [`Error::AlreadyInitialized`].
    ///
    /// # Errors
    ///
    /// See [`PoolOps::initialize_pool`].
    pub fn initialize_range(&mut self, range: PortRange) -> Result<()> {
        self.logger
            .info(&format!("initializing port pool with range {range}"));
        self.store.initialize_pool(range)
    }

    /// Acquires a port for `instance`.
    ///
    /// Idempotent: repeated calls for the same instance return the same
    /// port without consuming pool capacity. Under concurrent acquisition
    /// for the same name, exactly one port ends up durably attributed to it
    /// and every loser's port goes back to the pool.
    ///
    /// # Errors
    ///
    /// - [`Error::PoolExhausted`]: the free pool is empty; terminal for this
    ///   request, capacity must be grown externally.
    /// - [`Error::PortIntegrity`]: a popped port turned out to belong to a
    ///   live instance; aborted rather than stealing it.
    /// - [`Error::PortInstanceInconsistency`]: the reverse mapping already
    ///   names a different owner; fatal, never auto-repaired.
    pub fn acquire(&mut self, instance: &str) -> Result<Port> {
        // Idempotent fast path
        if let Some(port) = self.store.lookup(instance)? {
            self.logger.info(&format!(
                "'{instance}' already holds port {port}, returning it"
            ));
            return Ok(port);
        }

        let port = self.store.take_any()?;

        if !self.store.mark_assigned(port)? {
            // The port came out of the free pool yet was already marked
            // assigned. Residue of an interrupted operation; whether it is
            // safe to continue depends on whether anyone owns the port.
            match self.store.lookup_by_port(port)? {
                Some(owner) => {
                    self.logger.error(&format!(
                        "port {port} from the free pool is assigned to '{owner}'; \
                         aborting instead of stomping on it"
                    ));
                    return Err(Error::PortIntegrity { port, owner });
                }
                None => {
                    self.logger.warn(&format!(
                        "port {port} was in the assigned set with no owner; a previous \
                         release did not clean up, continuing"
                    ));
                }
            }
        }

        if !self.store.try_bind(instance, port)? {
            return self.recover_lost_race(instance, port);
        }

        if !self.store.try_bind_reverse(port, instance)? {
            self.logger.error(&format!(
                "port {port} is already mapped to another instance while absent from \
                 the assigned set; refusing to bind '{instance}', manual repair required"
            ));
            return Err(Error::PortInstanceInconsistency {
                port,
                instance: instance.to_string(),
            });
        }

        self.logger
            .debug(&format!("assigned port {port} to '{instance}'"));
        Ok(port)
    }

    /// Recovery path for a caller that lost the forward-bind race.
    ///
    /// The winner's mapping must only be read *after* the loser's port is
    /// back in the pool, or a third caller could observe a missing port.
    fn recover_lost_race(&mut self, instance: &str, port: Port) -> Result<Port> {
        self.store.return_port(port)?;
        // Mirror the winner's assigned-set state; a no-op when the winner
        // already got there.
        self.store.mark_assigned(port)?;

        match self.store.lookup(instance)? {
            Some(winner) => {
                self.logger.warn(&format!(
                    "lost the acquisition race for '{instance}'; returned port {port} to \
                     the pool, using the winner's port {winner}"
                ));
                Ok(winner)
            }
            None => Err(Error::StateCorruption {
                details: format!("winner mapping for '{instance}' vanished during race recovery"),
            }),
        }
    }

    /// Releases the port held by `instance`, if any.
    ///
    /// Idempotent: releasing an unbound instance is a success, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn release(&mut self, instance: &str) -> Result<()> {
        let Some(port) = self.store.lookup(instance)? else {
            self.logger
                .debug(&format!("release for unbound '{instance}' is a no-op"));
            return Ok(());
        };

        self.store.unbind(instance, port)?;
        // Returned outside the transaction: the port briefly belongs to
        // neither set, which is harmless since ports are only handed out
        // via take_any, never requested by number.
        self.store.return_port(port)?;

        self.logger
            .info(&format!("released port {port} from '{instance}'"));
        Ok(())
    }

    /// Port currently assigned to `instance`, `None` when unbound.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn port_for_instance(&self, instance: &str) -> Result<Option<Port>> {
        self.store.lookup(instance)
    }

    /// Instance currently owning `port`, `None` when unowned.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn instance_for_port(&self, port: Port) -> Result<Option<String>> {
        self.store.lookup_by_port(port)
    }

    /// Number of free ports.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn free_count(&self) -> Result<u64> {
        self.store.free_count()
    }

    /// Number of assigned ports.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn assigned_count(&self) -> Result<u64> {
        self.store.assigned_count()
    }

    /// Snapshot of the free ports.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn free_list(&self) -> Result<Vec<Port>> {
        self.store.free_list()
    }

    /// Snapshot of the assigned ports.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn assigned_list(&self) -> Result<Vec<Port>> {
        self.store.assigned_list()
    }
}
