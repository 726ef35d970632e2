//! Integration tests for the `release` command.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_release_returns_port_to_pool() {
    let env = TestEnv::new();
    env.init_range(30000, 30004);
    let port = env.acquire("web-1");

    env.command()
        .arg("release")
        .arg("web-1")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Released port {port}")));

    env.command().arg("free").assert().success().stdout("4\n");
    env.command()
        .arg("lookup")
        .arg("web-1")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_release_unknown_instance_is_a_noop() {
    let env = TestEnv::new();
    env.init_range(30000, 30004);

    env.command()
        .arg("release")
        .arg("ghost")
        .assert()
        .success()
        .stdout(predicate::str::contains("No port held by ghost"));
}

#[test]
fn test_released_port_can_be_reacquired() {
    let env = TestEnv::new();
    env.init_range(30000, 30002);
    env.acquire("a");
    env.acquire("b");

    env.command().arg("release").arg("a").assert().success();
    let port = env.acquire("c");
    assert!((30000..30002).contains(&port));
}
