//! Property-based tests for the pool and the allocation protocol.

use proptest::prelude::*;

use super::{PoolOps, ASSIGNED_SET, FREE_SET};
use crate::authority::Authority;
use crate::port::PortRange;
use crate::store::{MemoryStore, Store};

proptest! {
    // Taking and returning ports never invents or loses a port: the union
    // of the free set and the taken ports is always the whole range.
    #[test]
    fn take_return_partitions_range(len in 1u16..64, takes in 0usize..80) {
        let range = PortRange::new(30000, 30000 + len).unwrap();
        let mut store = MemoryStore::new();
        store.initialize_pool(range).unwrap();

        let mut taken = Vec::new();
        for _ in 0..takes {
            match store.take_any() {
                Ok(port) => taken.push(port),
                Err(e) => {
                    prop_assert!(e.is_exhausted());
                    break;
                }
            }
        }

        prop_assert_eq!(
            store.free_count().unwrap() + taken.len() as u64,
            u64::from(range.len())
        );

        for port in taken {
            prop_assert!(range.contains(port));
            store.return_port(port).unwrap();
        }
        prop_assert_eq!(store.free_count().unwrap(), u64::from(range.len()));
    }

    // Arbitrary interleavings of acquire and release keep the registry a
    // bijection and keep free/assigned a partition of the range.
    #[test]
    fn acquire_release_keeps_bijection(
        len in 1u16..16,
        ops in prop::collection::vec((0u8..6, prop::bool::weighted(0.6)), 0..40),
    ) {
        let range = PortRange::new(31000, 31000 + len).unwrap();
        let mut authority = Authority::new(MemoryStore::new());
        authority.initialize_range(range).unwrap();

        for (who, is_acquire) in ops {
            let name = format!("svc-{who}");
            if is_acquire {
                match authority.acquire(&name) {
                    Ok(port) => prop_assert!(range.contains(port)),
                    Err(e) => prop_assert!(e.is_exhausted()),
                }
            } else {
                authority.release(&name).unwrap();
            }
        }

        // Bijection: every assigned port resolves to exactly one instance
        // whose forward mapping points back at it.
        let assigned = authority.assigned_list().unwrap();
        for port in &assigned {
            let owner = authority.instance_for_port(*port).unwrap();
            prop_assert!(owner.is_some());
            let owner = owner.unwrap();
            prop_assert_eq!(authority.port_for_instance(&owner).unwrap(), Some(*port));
        }

        // Partition: free and assigned are disjoint and cover the range.
        let store = authority.store();
        let free = store.set_members(FREE_SET).unwrap();
        let held = store.set_members(ASSIGNED_SET).unwrap();
        prop_assert_eq!(free.len() + held.len(), usize::from(range.len()));
        for member in &free {
            prop_assert!(!held.contains(member));
        }
    }
}
