//! The assignment registry: the instance↔port bijection.
//!
//! Two store-resident maps, `instance_to_port` and `port_to_instance`,
//! together form a bijection: for every pair `(i, p)` in the forward map the
//! reverse map holds `(p, i)`. Pairs are only ever created whole (by the
//! two conditional binds during acquire) and destroyed whole (by the grouped
//! delete in [`RegistryOps::unbind`]); nothing is mutated in place.

use crate::error::{Error, Result};
use crate::pool::ASSIGNED_SET;
use crate::port::Port;
use crate::store::{DeleteOp, Store};

/// Store key for the instance-name → port map.
pub const INSTANCE_TO_PORT: &str = "instance_to_port";

/// Store key for the port → instance-name map.
pub const PORT_TO_INSTANCE: &str = "port_to_instance";

/// Registry operations over the two mapping tables.
pub trait RegistryOps: Store {
    /// Looks up the port assigned to an instance, `None` when unbound.
    ///
    /// # Errors
    ///
    /// Fails on store errors; a mapping value that is not a port number is
    /// [`Error::StateCorruption`].
    fn lookup(&self, instance: &str) -> Result<Option<Port>> {
        match self.hash_get(INSTANCE_TO_PORT, instance)? {
            Some(value) => Port::from_store_member(&value)
                .map(Some)
                .map_err(|e| Error::StateCorruption {
                    details: format!("bad port for instance '{instance}': {e}"),
                }),
            None => Ok(None),
        }
    }

    /// Looks up the instance owning a port, `None` when unowned.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    fn lookup_by_port(&self, port: Port) -> Result<Option<String>> {
        self.hash_get(PORT_TO_INSTANCE, &port.to_string())
    }

    /// Atomically binds `instance → port` only if the instance is unbound.
    ///
    /// Returns whether the write happened; `false` means another caller
    /// bound this instance first.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    fn try_bind(&mut self, instance: &str, port: Port) -> Result<bool> {
        self.hash_set_if_absent(INSTANCE_TO_PORT, instance, &port.to_string())
    }

    /// Atomically binds `port → instance` only if the port is unowned.
    ///
    /// The mirror half of [`RegistryOps::try_bind`].
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    fn try_bind_reverse(&mut self, port: Port, instance: &str) -> Result<bool> {
        self.hash_set_if_absent(PORT_TO_INSTANCE, &port.to_string(), instance)
    }

    /// Destroys the pair for `instance` in one grouped transaction.
    ///
    /// Removes both map halves and the port's assigned-set marker
    /// atomically. Unbinding a pair that does not exist is a no-op.
    ///
    /// # Errors
    ///
    /// Fails only on store errors; no partial removal is ever visible.
    fn unbind(&mut self, instance: &str, port: Port) -> Result<()> {
        let member = port.to_string();
        self.delete_grouped(&[
            DeleteOp::hash_field(INSTANCE_TO_PORT, instance),
            DeleteOp::hash_field(PORT_TO_INSTANCE, &member),
            DeleteOp::set_member(ASSIGNED_SET, &member),
        ])
    }
}

impl<S: Store + ?Sized> RegistryOps for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolOps;
    use crate::store::MemoryStore;

    fn port(value: u16) -> Port {
        Port::try_from(value).unwrap()
    }

    #[test]
    fn test_bind_and_lookup_both_directions() {
        let mut store = MemoryStore::new();
        assert!(store.try_bind("svcA", port(30000)).unwrap());
        assert!(store.try_bind_reverse(port(30000), "svcA").unwrap());

        assert_eq!(store.lookup("svcA").unwrap(), Some(port(30000)));
        assert_eq!(
            store.lookup_by_port(port(30000)).unwrap().as_deref(),
            Some("svcA")
        );
        assert_eq!(store.lookup("svcB").unwrap(), None);
        assert_eq!(store.lookup_by_port(port(30001)).unwrap(), None);
    }

    #[test]
    fn test_try_bind_reports_loss() {
        let mut store = MemoryStore::new();
        assert!(store.try_bind("svcA", port(30000)).unwrap());
        // Second bind for the same instance does not overwrite
        assert!(!store.try_bind("svcA", port(30001)).unwrap());
        assert_eq!(store.lookup("svcA").unwrap(), Some(port(30000)));
    }

    #[test]
    fn test_try_bind_reverse_reports_owner_conflict() {
        let mut store = MemoryStore::new();
        assert!(store.try_bind_reverse(port(30000), "svcA").unwrap());
        assert!(!store.try_bind_reverse(port(30000), "svcB").unwrap());
        assert_eq!(
            store.lookup_by_port(port(30000)).unwrap().as_deref(),
            Some("svcA")
        );
    }

    #[test]
    fn test_unbind_removes_pair_and_assigned_marker() {
        let mut store = MemoryStore::new();
        store.try_bind("svcA", port(30000)).unwrap();
        store.try_bind_reverse(port(30000), "svcA").unwrap();
        store.mark_assigned(port(30000)).unwrap();

        store.unbind("svcA", port(30000)).unwrap();

        assert_eq!(store.lookup("svcA").unwrap(), None);
        assert_eq!(store.lookup_by_port(port(30000)).unwrap(), None);
        assert_eq!(store.assigned_count().unwrap(), 0);
    }

    #[test]
    fn test_unbind_unknown_is_noop() {
        let mut store = MemoryStore::new();
        store.unbind("ghost", port(30000)).unwrap();
    }

    #[test]
    fn test_corrupt_forward_value_surfaces() {
        let mut store = MemoryStore::new();
        store
            .hash_set_if_absent(INSTANCE_TO_PORT, "svcA", "garbage")
            .unwrap();
        assert!(matches!(
            store.lookup("svcA").unwrap_err(),
            Error::StateCorruption { .. }
        ));
    }
}
