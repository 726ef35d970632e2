//! The port pool: free and assigned port sets.
//!
//! The pool is two store-resident sets, `free_ports` and `assigned_ports`.
//! Every member lies in the configured range; at quiescence the two sets are
//! disjoint and their union is the whole range. The operations here are
//! blanket-implemented over any [`Store`], so the pool lives wherever the
//! store handle points.

use crate::error::{Error, Result};
use crate::port::{Port, PortRange};
use crate::store::Store;

/// Store key for the set of ports not currently assigned.
pub const FREE_SET: &str = "free_ports";

/// Store key for the set of ports currently considered allocated.
pub const ASSIGNED_SET: &str = "assigned_ports";

fn parse_member(member: &str, set: &str) -> Result<Port> {
    Port::from_store_member(member).map_err(|e| Error::StateCorruption {
        details: format!("bad member in {set}: {e}"),
    })
}

/// Pool operations over the free and assigned sets.
///
/// Counts and listings read the two sets independently; during a concurrent
/// acquire or release a port can transiently appear in both or neither.
pub trait PoolOps: Store {
    /// Seeds the free pool with every port in `range`.
    ///
    /// Refuses to touch an existing pool: restarting a process must not
    /// re-grant ports handed out in a previous run.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyInitialized`] if the free pool key exists.
    /// - [`Error::InitializationIntegrity`] if the resulting cardinality is
    ///   not `range.len()` (the store partially failed mid-population).
    fn initialize_pool(&mut self, range: PortRange) -> Result<()> {
        if self.set_exists(FREE_SET)? {
            return Err(Error::AlreadyInitialized);
        }
        for port in range {
            self.set_add(FREE_SET, &port.to_string())?;
        }
        let expected = u64::from(range.len());
        let actual = self.set_card(FREE_SET)?;
        if actual != expected {
            return Err(Error::InitializationIntegrity { expected, actual });
        }
        Ok(())
    }

    /// Atomically removes and returns one arbitrary free port.
    ///
    /// # Errors
    ///
    /// [`Error::PoolExhausted`] when the pool is empty; a free-pool member
    /// that is not a port number is [`Error::StateCorruption`].
    fn take_any(&mut self) -> Result<Port> {
        match self.set_pop(FREE_SET)? {
            Some(member) => parse_member(&member, FREE_SET),
            None => Err(Error::PoolExhausted),
        }
    }

    /// Adds a port back to the free pool.
    ///
    /// Idempotent at the data level. Callers should still avoid re-adding a
    /// present port; it usually points at a registry inconsistency.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    fn return_port(&mut self, port: Port) -> Result<()> {
        self.set_add(FREE_SET, &port.to_string())?;
        Ok(())
    }

    /// Marks a port as assigned, reporting whether it was newly marked.
    ///
    /// A `false` return means the port was already in the assigned set,
    /// which the acquisition protocol treats as dirty state.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    fn mark_assigned(&mut self, port: Port) -> Result<bool> {
        self.set_add(ASSIGNED_SET, &port.to_string())
    }

    /// Number of free ports.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    fn free_count(&self) -> Result<u64> {
        self.set_card(FREE_SET)
    }

    /// Number of assigned ports.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    fn assigned_count(&self) -> Result<u64> {
        self.set_card(ASSIGNED_SET)
    }

    /// Snapshot of the free ports, in no particular order.
    ///
    /// # Errors
    ///
    /// Fails on store errors or unparseable members.
    fn free_list(&self) -> Result<Vec<Port>> {
        self.set_members(FREE_SET)?
            .iter()
            .map(|m| parse_member(m, FREE_SET))
            .collect()
    }

    /// Snapshot of the assigned ports, in no particular order.
    ///
    /// # Errors
    ///
    /// Fails on store errors or unparseable members.
    fn assigned_list(&self) -> Result<Vec<Port>> {
        self.set_members(ASSIGNED_SET)?
            .iter()
            .map(|m| parse_member(m, ASSIGNED_SET))
            .collect()
    }
}

impl<S: Store + ?Sized> PoolOps for S {}

#[cfg(all(test, feature = "property-tests"))]
mod proptests;
