//! Utility functions for CLI operations.
//!
//! Configuration loading and store opening shared across commands.

use crate::error::CliError;
use std::path::PathBuf;
use std::time::Duration;
use warden::{Authority, Config, ConfigBuilder, SqliteStore, StoreConfig};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the store file location.
    pub store: Option<PathBuf>,

    /// Override the default busy timeout (in milliseconds).
    pub busy_timeout: Option<u64>,
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables
/// 3. Configuration files
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(_global: &GlobalOptions) -> Result<Config, CliError> {
    ConfigBuilder::new()
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Resolve the store path from global options and configuration.
fn resolve_store_path(global: &GlobalOptions, config: &Config) -> Result<PathBuf, CliError> {
    // Priority: global option > config file > default
    if let Some(ref store) = global.store {
        return Ok(store.clone());
    }
    if let Some(ref store_path) = config.store_path {
        return Ok(store_path.clone());
    }

    // Default: ~/.warden/warden.db
    let home_dir = home::home_dir()
        .ok_or_else(|| CliError::Config("Could not determine home directory".to_string()))?;
    Ok(home_dir.join(".warden").join("warden.db"))
}

/// Open the store with configuration applied.
pub fn open_store(
    global: &GlobalOptions,
    config: &Config,
) -> Result<Authority<SqliteStore>, CliError> {
    let store_path = resolve_store_path(global, config)?;

    let mut store_config = StoreConfig::new(store_path);
    if let Some(timeout_ms) = global.busy_timeout {
        store_config = store_config.with_busy_timeout(Duration::from_millis(timeout_ms));
    }

    let store = SqliteStore::open(store_config).map_err(CliError::from)?;
    let logger = warden::init_logger(global.verbose, global.quiet);
    Ok(Authority::with_logger(store, logger))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_store_path_prefers_global() {
        let global = GlobalOptions {
            verbose: false,
            quiet: false,
            store: Some(PathBuf::from("/tmp/override.db")),
            busy_timeout: None,
        };
        let config = Config {
            store_path: Some(PathBuf::from("/tmp/from-config.db")),
            ..Default::default()
        };
        let path = resolve_store_path(&global, &config).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/override.db"));
    }

    #[test]
    fn test_resolve_store_path_falls_back_to_config() {
        let global = GlobalOptions {
            verbose: false,
            quiet: false,
            store: None,
            busy_timeout: None,
        };
        let config = Config {
            store_path: Some(PathBuf::from("/tmp/from-config.db")),
            ..Default::default()
        };
        let path = resolve_store_path(&global, &config).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/from-config.db"));
    }
}
