//! Configuration for the warden library and CLI.
//!
//! Layered configuration with the usual precedence (highest to lowest):
//!
//! 1. Programmatic overrides (via [`ConfigBuilder::with_config`])
//! 2. Environment variables (`WARDEN_*`)
//! 3. YAML config file (`config.yaml` in the config directory,
//!    `~/.warden` by default)
//! 4. Built-in defaults
//!
//! The original deployment pulled the port range from a remote key-value
//! config service at startup; that retrieval is out of scope here, and the
//! range arrives through this layer instead.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::port::PortRange;

/// Default start of the allocatable range.
pub const DEFAULT_RANGE_START: u16 = 30000;

/// Default exclusive end of the allocatable range.
pub const DEFAULT_RANGE_END: u16 = 40000;

/// The port range section of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeConfig {
    /// First allocatable port.
    pub start: u16,
    /// Exclusive upper bound of the allocatable range.
    pub end: u16,
}

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use warden::{Config, ConfigBuilder, RangeConfig};
///
/// let custom = Config {
///     range: Some(RangeConfig { start: 30000, end: 30010 }),
///     ..Default::default()
/// };
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(custom)
///     .build()
///     .unwrap();
/// assert_eq!(config.port_range().unwrap().len(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The allocatable port range.
    pub range: Option<RangeConfig>,
    /// Path to the store file.
    pub store_path: Option<PathBuf>,
    /// Log mode: "quiet", "normal", or "verbose".
    pub log_mode: Option<String>,
}

impl Config {
    /// Resolves the configured (or default) allocatable range.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured range is invalid.
    pub fn port_range(&self) -> Result<PortRange> {
        let range = self.range.unwrap_or(RangeConfig {
            start: DEFAULT_RANGE_START,
            end: DEFAULT_RANGE_END,
        });
        PortRange::new(range.start, range.end).map_err(Into::into)
    }
}

/// Default config directory, `~/.warden`.
///
/// # Errors
///
/// Fails when the home directory cannot be determined.
pub fn default_config_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(".warden"))
        .ok_or_else(|| Error::Validation {
            field: "config_dir".into(),
            message: "could not determine home directory".into(),
        })
}

/// Builder merging configuration sources in precedence order.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_dir: Option<PathBuf>,
    overrides: Option<Config>,
    skip_env: bool,
    skip_files: bool,
}

impl ConfigBuilder {
    /// Creates a builder that reads every source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `config.yaml` from `dir` instead of the default directory.
    #[must_use]
    pub fn with_config_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Applies programmatic overrides on top of every other source.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Skips the `WARDEN_*` environment variables.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips the config file.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Merges all enabled sources and validates the result.
    ///
    /// # Errors
    ///
    /// Returns a parse error for a malformed config file, a
    /// [`Error::Validation`] for unparseable environment values or an
    /// invalid merged range.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        if !self.skip_files {
            if let Some(file_config) = self.load_file()? {
                merge(&mut config, file_config);
            }
        }

        if !self.skip_env {
            merge(&mut config, env_config()?);
        }

        if let Some(overrides) = self.overrides {
            merge(&mut config, overrides);
        }

        validate(&config)?;
        Ok(config)
    }

    fn load_file(&self) -> Result<Option<Config>> {
        let dir = match &self.config_dir {
            Some(dir) => dir.clone(),
            None => match default_config_dir() {
                Ok(dir) => dir,
                // No home directory means no file to read
                Err(_) => return Ok(None),
            },
        };
        let path = dir.join("config.yaml");
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)?;
        let config = serde_yaml::from_str(&text)?;
        Ok(Some(config))
    }
}

fn env_port(name: &str) -> Result<Option<u16>> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u16>()
            .map(Some)
            .map_err(|_| Error::Validation {
                field: name.to_string(),
                message: format!("'{value}' is not a port number"),
            }),
        Err(_) => Ok(None),
    }
}

fn env_config() -> Result<Config> {
    let start = env_port("WARDEN_PORT_START")?;
    let end = env_port("WARDEN_PORT_END")?;
    let range = match (start, end) {
        (None, None) => None,
        (s, e) => Some(RangeConfig {
            start: s.unwrap_or(DEFAULT_RANGE_START),
            end: e.unwrap_or(DEFAULT_RANGE_END),
        }),
    };

    Ok(Config {
        range,
        store_path: env::var("WARDEN_STORE").ok().map(PathBuf::from),
        log_mode: env::var("WARDEN_LOG_MODE").ok(),
    })
}

fn merge(base: &mut Config, overlay: Config) {
    if overlay.range.is_some() {
        base.range = overlay.range;
    }
    if overlay.store_path.is_some() {
        base.store_path = overlay.store_path;
    }
    if overlay.log_mode.is_some() {
        base.log_mode = overlay.log_mode;
    }
}

fn validate(config: &Config) -> Result<()> {
    if let Some(range) = config.range {
        if range.start < 1 {
            return Err(Error::Validation {
                field: "range.start".into(),
                message: "start must be a valid port".into(),
            });
        }
        if range.end <= range.start {
            return Err(Error::Validation {
                field: "range.end".into(),
                message: format!("end ({}) must be greater than start ({})", range.end, range.start),
            });
        }
    }
    if let Some(mode) = &config.log_mode {
        crate::logging::LogLevel::parse(mode).map_err(|message| Error::Validation {
            field: "log_mode".into(),
            message,
        })?;
    }
    Ok(())
}
