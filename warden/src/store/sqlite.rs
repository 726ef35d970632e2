//! SQLite-backed store.
//!
//! The durable backend every process with access to the store file shares.
//! WAL mode plus a busy timeout lets concurrent workers interleave; each
//! primitive is a single statement (or one transaction), so the database's
//! write lock supplies the per-operation atomicity the [`Store`] contract
//! requires.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, OpenFlags, TransactionBehavior};

use crate::error::{Error, Result};

use super::schema::{
    CREATE_MAPS_TABLE, CREATE_METADATA_TABLE, CREATE_SETS_NAME_INDEX, CREATE_SETS_TABLE,
    CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION, MAP_DELETE_FIELD, MAP_GET, MAP_SET_IF_ABSENT,
    SELECT_SCHEMA_VERSION, SET_ADD, SET_CARD, SET_EXISTS, SET_MEMBERS, SET_POP, SET_REMOVE,
};
use super::{DeleteOp, Store};

/// Configuration for opening the SQLite store.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use warden::StoreConfig;
///
/// let config = StoreConfig::new("/tmp/warden.db")
///     .with_busy_timeout(Duration::from_millis(10000));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the store file.
    pub path: PathBuf,
    /// Busy timeout for write-lock contention.
    pub busy_timeout: Duration,
    /// Whether to create the store file (and parent directory) if absent.
    pub auto_create: bool,
    /// Whether to open the store read-only.
    pub read_only: bool,
}

impl StoreConfig {
    /// Creates a configuration with default settings: 5s busy timeout,
    /// auto-create on, read-write.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            read_only: false,
        }
    }

    /// Sets the busy timeout.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Disables auto-creation of a missing store file.
    #[must_use]
    pub const fn no_auto_create(mut self) -> Self {
        self.auto_create = false;
        self
    }

    /// Opens the store read-only.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// A store backed by a SQLite database file.
///
/// # Examples
///
/// ```no_run
/// use warden::{SqliteStore, StoreConfig};
///
/// let store = SqliteStore::open(StoreConfig::new("/tmp/warden.db")).unwrap();
/// ```
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    #[allow(dead_code)]
    config: StoreConfig,
}

impl SqliteStore {
    /// Opens the store with the given configuration.
    ///
    /// Creates the parent directory when auto-creating, switches the
    /// database to WAL mode, applies the busy timeout, and initializes or
    /// verifies the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the file or its directory
    /// cannot be opened, and [`Error::StateCorruption`] if the schema
    /// version does not match this client.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| Error::StoreUnavailable {
                    reason: format!("cannot create {}: {e}", parent.display()),
                })?;
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn =
            Connection::open_with_flags(&config.path, flags).map_err(|e| Error::StoreUnavailable {
                reason: format!("cannot open {}: {e}", config.path.display()),
            })?;

        // A read-only handle cannot switch journal modes; it inherits
        // whatever mode the writer established.
        if !config.read_only {
            // PRAGMA journal_mode returns a row, so it goes through query_row
            let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {}",
            config.busy_timeout.as_millis()
        ))?;

        if !config.read_only {
            check_schema_compatibility(&conn)?;
        }

        Ok(Self { conn, config })
    }

    /// Opens a private in-memory store.
    ///
    /// Useful in tests that want the real SQL backend without a file on
    /// disk. State is lost on drop and never shared between handles.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::StoreUnavailable {
            reason: format!("cannot open in-memory store: {e}"),
        })?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            config: StoreConfig::new(":memory:"),
        })
    }

    /// Returns a reference to the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Initializes the store schema on a fresh database.
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_SETS_TABLE, [])?;
    conn.execute(CREATE_MAPS_TABLE, [])?;
    conn.execute(CREATE_SETS_NAME_INDEX, [])?;
    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;
    Ok(())
}

/// Gets the schema version recorded in the database, 0 when uninitialized.
///
/// # Errors
///
/// Returns an error on store failures other than a missing metadata table.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => {
            // A missing metadata table means a fresh database
            if let rusqlite::Error::SqliteFailure(ref sqlite_err, _) = e {
                if sqlite_err.code == rusqlite::ErrorCode::Unknown {
                    return Ok(0);
                }
            }
            Err(e.into())
        }
    }
}

fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;
    match version {
        0 => initialize_schema(conn),
        v if v == CURRENT_SCHEMA_VERSION => Ok(()),
        v => Err(Error::StateCorruption {
            details: format!(
                "unsupported store schema version: expected {CURRENT_SCHEMA_VERSION}, found {v}"
            ),
        }),
    }
}

impl Store for SqliteStore {
    fn set_exists(&self, key: &str) -> Result<bool> {
        let exists: bool = self.conn.query_row(SET_EXISTS, params![key], |row| row.get(0))?;
        Ok(exists)
    }

    fn set_card(&self, key: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(SET_CARD, params![key], |row| row.get(0))?;
        #[allow(clippy::cast_sign_loss)]
        Ok(count as u64)
    }

    fn set_add(&mut self, key: &str, member: &str) -> Result<bool> {
        let changed = self.conn.execute(SET_ADD, params![key, member])?;
        Ok(changed == 1)
    }

    fn set_pop(&mut self, key: &str) -> Result<Option<String>> {
        match self.conn.query_row(SET_POP, params![key], |row| row.get(0)) {
            Ok(member) => Ok(Some(member)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_remove(&mut self, key: &str, member: &str) -> Result<()> {
        self.conn.execute(SET_REMOVE, params![key, member])?;
        Ok(())
    }

    fn set_members(&self, key: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(SET_MEMBERS)?;
        let members = stmt
            .query_map(params![key], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(members)
    }

    fn hash_get(&self, map: &str, field: &str) -> Result<Option<String>> {
        match self
            .conn
            .query_row(MAP_GET, params![map, field], |row| row.get(0))
        {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn hash_set_if_absent(&mut self, map: &str, field: &str, value: &str) -> Result<bool> {
        let changed = self.conn.execute(MAP_SET_IF_ABSENT, params![map, field, value])?;
        Ok(changed == 1)
    }

    fn delete_grouped(&mut self, ops: &[DeleteOp]) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        for op in ops {
            match op {
                DeleteOp::SetMember { key, member } => {
                    tx.execute(SET_REMOVE, params![key, member])?;
                }
                DeleteOp::HashField { map, field } => {
                    tx.execute(MAP_DELETE_FIELD, params![map, field])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}
