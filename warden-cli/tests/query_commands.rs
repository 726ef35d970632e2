//! Integration tests for the `lookup`, `owner`, `free` and `assigned`
//! commands.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_lookup_and_owner_agree() {
    let env = TestEnv::new();
    env.init_range(30000, 30004);
    let port = env.acquire("web-1");

    env.command()
        .arg("lookup")
        .arg("web-1")
        .assert()
        .success()
        .stdout(format!("{port}\n"));

    env.command()
        .arg("owner")
        .arg(port.to_string())
        .assert()
        .success()
        .stdout("web-1\n");
}

#[test]
fn test_lookup_miss_exits_one() {
    let env = TestEnv::new();
    env.init_range(30000, 30004);

    env.command()
        .arg("lookup")
        .arg("nobody")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No port held by nobody"));
}

#[test]
fn test_owner_miss_exits_one() {
    let env = TestEnv::new();
    env.init_range(30000, 30004);

    env.command()
        .arg("owner")
        .arg("30001")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not assigned"));
}

#[test]
fn test_owner_rejects_port_zero() {
    let env = TestEnv::new();
    env.init_range(30000, 30004);

    env.command()
        .arg("owner")
        .arg("0")
        .assert()
        .failure()
        .code(5);
}

#[test]
fn test_free_list_is_sorted() {
    let env = TestEnv::new();
    env.init_range(30000, 30003);

    env.command()
        .arg("free")
        .arg("--list")
        .assert()
        .success()
        .stdout("30000\n30001\n30002\n");
}

#[test]
fn test_lookup_json_output() {
    let env = TestEnv::new();
    env.init_range(30000, 30004);
    let port = env.acquire("web-1");

    let output = env
        .command()
        .arg("lookup")
        .arg("web-1")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value =
        serde_json::from_slice(&output).expect("output is not valid JSON");
    assert_eq!(parsed["instance"], "web-1");
    assert_eq!(parsed["port"], u64::from(port));
}

#[test]
fn test_free_json_count() {
    let env = TestEnv::new();
    env.init_range(30000, 30003);

    let output = env
        .command()
        .arg("free")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value =
        serde_json::from_slice(&output).expect("output is not valid JSON");
    assert_eq!(parsed["free"], 3);
}

#[test]
fn test_assigned_tracks_acquisitions() {
    let env = TestEnv::new();
    env.init_range(30000, 30004);

    env.command()
        .arg("assigned")
        .assert()
        .success()
        .stdout("0\n");

    let a = env.acquire("a");
    let b = env.acquire("b");

    env.command()
        .arg("assigned")
        .assert()
        .success()
        .stdout("2\n");

    let mut expected = vec![a, b];
    expected.sort_unstable();
    let expected: String = expected.iter().map(|p| format!("{p}\n")).collect();
    env.command()
        .arg("assigned")
        .arg("--list")
        .assert()
        .success()
        .stdout(expected);
}
