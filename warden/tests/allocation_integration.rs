//! Integration tests for the allocation service over the SQLite backend.
//!
//! These exercise the full stack the way deployments use it: one store
//! file, one or more authority handles, real transactions.

use tempfile::TempDir;

use warden::{Authority, PortRange, SqliteStore, Store, StoreConfig};

struct TestStore {
    // Kept alive so the store file outlives every handle
    _dir: TempDir,
    path: std::path::PathBuf,
}

impl TestStore {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("warden.db");
        Self { _dir: dir, path }
    }

    fn open(&self) -> Authority<SqliteStore> {
        Authority::new(SqliteStore::open(StoreConfig::new(&self.path)).unwrap())
    }
}

fn range(start: u16, end: u16) -> PortRange {
    PortRange::new(start, end).unwrap()
}

#[test]
fn test_full_scenario_three_ports() {
    let store = TestStore::new();
    let mut authority = store.open();
    authority.initialize_range(range(30000, 30003)).unwrap();

    let a = authority.acquire("svcA").unwrap();
    let b = authority.acquire("svcB").unwrap();
    assert_ne!(a, b);
    assert!(range(30000, 30003).contains(a));
    assert!(range(30000, 30003).contains(b));

    // Idempotent re-acquire
    assert_eq!(authority.acquire("svcA").unwrap(), a);
    assert_eq!(authority.free_count().unwrap(), 1);

    authority.release("svcA").unwrap();
    assert_eq!(authority.free_count().unwrap(), 2);

    let c = authority.acquire("svcC").unwrap();
    assert_ne!(c, b);

    let d = authority.acquire("svcD").unwrap();
    assert_ne!(d, b);
    assert_ne!(d, c);

    assert!(authority.acquire("svcE").unwrap_err().is_exhausted());
    assert_eq!(authority.free_count().unwrap(), 0);
    assert_eq!(authority.assigned_count().unwrap(), 3);
}

#[test]
fn test_assignments_survive_reopen() {
    let store = TestStore::new();
    let port = {
        let mut authority = store.open();
        authority.initialize_range(range(30000, 30010)).unwrap();
        authority.acquire("svcA").unwrap()
    };

    let mut authority = store.open();
    assert_eq!(authority.port_for_instance("svcA").unwrap(), Some(port));
    assert_eq!(
        authority.instance_for_port(port).unwrap().as_deref(),
        Some("svcA")
    );

    // A restart must not re-seed the pool
    let err = authority.initialize_range(range(30000, 30010)).unwrap_err();
    assert!(matches!(err, warden::Error::AlreadyInitialized));
    assert_eq!(authority.free_count().unwrap(), 9);
}

#[test]
fn test_two_handles_cooperate() {
    let store = TestStore::new();
    let mut first = store.open();
    first.initialize_range(range(30000, 30004)).unwrap();

    let mut second = store.open();
    let a = first.acquire("svcA").unwrap();
    let b = second.acquire("svcB").unwrap();
    assert_ne!(a, b);

    // Either handle resolves both assignments
    assert_eq!(second.port_for_instance("svcA").unwrap(), Some(a));
    assert_eq!(first.port_for_instance("svcB").unwrap(), Some(b));

    // One handle's release is visible to the other
    second.release("svcA").unwrap();
    assert_eq!(first.port_for_instance("svcA").unwrap(), None);
    assert_eq!(first.free_count().unwrap(), 3);
}

#[test]
fn test_quiescent_partition_of_range() {
    let store = TestStore::new();
    let mut authority = store.open();
    let r = range(30000, 30008);
    authority.initialize_range(r).unwrap();

    for name in ["a", "b", "c"] {
        authority.acquire(name).unwrap();
    }
    authority.release("b").unwrap();

    let free: Vec<String> = authority
        .free_list()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    let assigned: Vec<String> = authority
        .assigned_list()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(free.len() + assigned.len(), usize::from(r.len()));
    for member in &free {
        assert!(!assigned.contains(member), "{member} in both sets");
    }
    for port in r {
        let s = port.to_string();
        assert!(
            free.contains(&s) || assigned.contains(&s),
            "{s} in neither set"
        );
    }
}

#[test]
fn test_dirty_assigned_marker_on_disk() {
    let store = TestStore::new();
    {
        let mut authority = store.open();
        authority.initialize_range(range(30000, 30001)).unwrap();
    }

    // Simulate an interrupted release: the assigned marker survived but no
    // registry pair points at the port.
    {
        let mut raw = SqliteStore::open(StoreConfig::new(&store.path)).unwrap();
        raw.set_add("assigned_ports", "30000").unwrap();
    }

    let mut authority = store.open();
    let port = authority.acquire("svcA").unwrap();
    assert_eq!(port.value(), 30000);
    assert_eq!(
        authority.instance_for_port(port).unwrap().as_deref(),
        Some("svcA")
    );
}

#[test]
fn test_pool_exhausted_changes_nothing() {
    let store = TestStore::new();
    let mut authority = store.open();
    authority.initialize_range(range(30000, 30001)).unwrap();
    authority.acquire("svcA").unwrap();

    let free_before = authority.free_count().unwrap();
    let assigned_before = authority.assigned_count().unwrap();

    assert!(authority.acquire("svcB").unwrap_err().is_exhausted());

    assert_eq!(authority.free_count().unwrap(), free_before);
    assert_eq!(authority.assigned_count().unwrap(), assigned_before);
    assert_eq!(authority.port_for_instance("svcB").unwrap(), None);
}
