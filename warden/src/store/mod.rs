//! Persistent store adapter for the allocation state.
//!
//! The allocation protocol depends on a small set of atomic key-value
//! primitives: set membership with atomic arbitrary-member pop, idempotent
//! add that reports whether a member was new, set-field-if-absent on maps,
//! and a grouped transaction for multi-key deletes. The [`Store`] trait
//! captures exactly that surface; everything above it (pool, registry,
//! authority) is written against the trait, never a concrete backend.
//!
//! Two backends are provided: [`SqliteStore`], the durable backend shared
//! between processes, and [`MemoryStore`], an in-process implementation for
//! tests and experimentation.

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreConfig};

use crate::error::Result;

/// One delete queued into a grouped transaction.
///
/// Used by [`Store::delete_grouped`] to remove a registry pair and its
/// assigned-set marker in a single atomic step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOp {
    /// Remove a member from a set.
    SetMember {
        /// The set key.
        key: String,
        /// The member to remove.
        member: String,
    },
    /// Remove a field from a map.
    HashField {
        /// The map key.
        map: String,
        /// The field to remove.
        field: String,
    },
}

impl DeleteOp {
    /// Builds a set-member delete.
    #[must_use]
    pub fn set_member(key: &str, member: &str) -> Self {
        Self::SetMember {
            key: key.to_string(),
            member: member.to_string(),
        }
    }

    /// Builds a map-field delete.
    #[must_use]
    pub fn hash_field(map: &str, field: &str) -> Self {
        Self::HashField {
            map: map.to_string(),
            field: field.to_string(),
        }
    }
}

/// The key-value primitives the allocation core is built on.
///
/// Every mutation here is individually atomic with respect to all other
/// callers of the same backend, including callers in other processes when
/// the backend is shared. Per-operation atomicity is the *only* ordering
/// guarantee; there is no cross-operation lock, and multi-step protocols
/// layered on top must tolerate interleaving.
///
/// A set with no members does not exist: `set_exists` reports `false` once
/// the last member is popped or removed.
pub trait Store {
    /// Reports whether the set has any members.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    fn set_exists(&self, key: &str) -> Result<bool>;

    /// Returns the number of members in the set (0 for an absent set).
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    fn set_card(&self, key: &str) -> Result<u64>;

    /// Adds a member to a set, reporting whether it was newly added.
    ///
    /// Idempotent: re-adding an existing member returns `false` and changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be written.
    fn set_add(&mut self, key: &str, member: &str) -> Result<bool>;

    /// Atomically removes and returns one arbitrary member of the set.
    ///
    /// Returns `None` when the set is empty or absent. Callers must not
    /// depend on which member is chosen.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be written.
    fn set_pop(&mut self, key: &str) -> Result<Option<String>>;

    /// Removes a member from a set. Removing an absent member is a no-op.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be written.
    fn set_remove(&mut self, key: &str, member: &str) -> Result<()>;

    /// Returns all members of the set, in no particular order.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    fn set_members(&self, key: &str) -> Result<Vec<String>>;

    /// Reads a map field, `None` when absent.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read.
    fn hash_get(&self, map: &str, field: &str) -> Result<Option<String>>;

    /// Writes a map field only if it is absent, reporting whether the write
    /// happened.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be written.
    fn hash_set_if_absent(&mut self, map: &str, field: &str, value: &str) -> Result<bool>;

    /// Applies a group of deletes in one atomic transaction.
    ///
    /// Deletes of absent members or fields are no-ops within the group.
    ///
    /// # Errors
    ///
    /// Fails if the transaction cannot be started or committed; no partial
    /// group is ever visible.
    fn delete_grouped(&mut self, ops: &[DeleteOp]) -> Result<()>;
}
