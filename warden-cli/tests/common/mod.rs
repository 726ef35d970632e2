//! Common test utilities for CLI integration tests.
//!
//! Provides an isolated test environment: a temporary directory holding
//! the store file, with home and environment overrides so no test reads
//! the developer's real configuration.

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with an isolated store file.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the store file inside the temporary directory
    pub store_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store_path = temp_dir.path().join("warden.db");

        Self {
            temp_dir,
            store_path,
        }
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// The home directory is pointed into the temp dir and `WARDEN_*`
    /// variables are cleared, so configuration comes only from flags.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("warden").expect("Failed to find warden binary");
        cmd.env("HOME", self.temp_dir.path());
        cmd.env_remove("WARDEN_STORE");
        cmd.env_remove("WARDEN_PORT_START");
        cmd.env_remove("WARDEN_PORT_END");
        cmd.env_remove("WARDEN_LOG_MODE");
        cmd.env_remove("WARDEN_BUSY_TIMEOUT");
        cmd
    }

    /// Get a command builder with the store path pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--store").arg(&self.store_path);
        cmd
    }

    /// Initialize the pool with a small range, asserting success.
    pub fn init_range(&self, start: u16, end: u16) {
        self.command()
            .arg("init")
            .arg("--start")
            .arg(start.to_string())
            .arg("--end")
            .arg(end.to_string())
            .assert()
            .success();
    }

    /// Acquire a port for an instance and return it.
    pub fn acquire(&self, instance: &str) -> u16 {
        let output = self
            .command()
            .arg("acquire")
            .arg(instance)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        String::from_utf8(output)
            .expect("stdout is not UTF-8")
            .trim()
            .parse()
            .expect("acquire did not print a port")
    }
}
