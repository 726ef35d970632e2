//! In-process store for tests and experimentation.

use std::collections::{BTreeSet, HashMap};

use crate::error::Result;

use super::{DeleteOp, Store};

/// A store held entirely in process memory.
///
/// Implements the same contract as the durable backend but shares nothing
/// and persists nothing; one handle is one universe. Useful for unit tests
/// and for exercising the allocation protocol without touching disk.
///
/// # Examples
///
/// ```
/// use warden::{MemoryStore, Store};
///
/// let mut store = MemoryStore::new();
/// assert!(store.set_add("s", "a").unwrap());
/// assert!(!store.set_add("s", "a").unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    sets: HashMap<String, BTreeSet<String>>,
    maps: HashMap<String, HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn set_exists(&self, key: &str) -> Result<bool> {
        Ok(self.sets.get(key).is_some_and(|s| !s.is_empty()))
    }

    fn set_card(&self, key: &str) -> Result<u64> {
        Ok(self.sets.get(key).map_or(0, |s| s.len() as u64))
    }

    fn set_add(&mut self, key: &str, member: &str) -> Result<bool> {
        Ok(self
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    fn set_pop(&mut self, key: &str) -> Result<Option<String>> {
        Ok(self.sets.get_mut(key).and_then(BTreeSet::pop_first))
    }

    fn set_remove(&mut self, key: &str, member: &str) -> Result<()> {
        if let Some(set) = self.sets.get_mut(key) {
            set.remove(member);
        }
        Ok(())
    }

    fn set_members(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .sets
            .get(key)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn hash_get(&self, map: &str, field: &str) -> Result<Option<String>> {
        Ok(self.maps.get(map).and_then(|m| m.get(field).cloned()))
    }

    fn hash_set_if_absent(&mut self, map: &str, field: &str, value: &str) -> Result<bool> {
        let entry = self.maps.entry(map.to_string()).or_default();
        if entry.contains_key(field) {
            Ok(false)
        } else {
            entry.insert(field.to_string(), value.to_string());
            Ok(true)
        }
    }

    fn delete_grouped(&mut self, ops: &[DeleteOp]) -> Result<()> {
        for op in ops {
            match op {
                DeleteOp::SetMember { key, member } => self.set_remove(key, member)?,
                DeleteOp::HashField { map, field } => {
                    if let Some(m) = self.maps.get_mut(map) {
                        m.remove(field);
                    }
                }
            }
        }
        Ok(())
    }
}
