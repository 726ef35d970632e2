//! Schema definitions and SQL constants for the SQLite store backend.
//!
//! The backend models the key-value surface with two tables: `sets` for
//! set-of-members keys and `maps` for field/value maps, plus a `metadata`
//! table carrying the schema version.

/// Current schema version for the store.
///
/// Stored in the metadata table and checked on open so mismatched clients
/// fail loudly instead of misreading state.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the sets table.
///
/// The UNIQUE constraint makes `set_add` idempotent and lets it report
/// whether a member was newly added via the statement's change count.
pub const CREATE_SETS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS sets (
        name TEXT NOT NULL,
        member TEXT NOT NULL,
        UNIQUE (name, member)
    )";

/// SQL statement to create the maps table.
///
/// The UNIQUE constraint backs the set-field-if-absent primitive.
pub const CREATE_MAPS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS maps (
        name TEXT NOT NULL,
        field TEXT NOT NULL,
        value TEXT NOT NULL,
        UNIQUE (name, field)
    )";

/// SQL statement to create an index on set names for counts and listings.
pub const CREATE_SETS_NAME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_sets_name ON sets(name)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// SQL statement backing `set_exists`.
pub const SET_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM sets WHERE name = ?)";

/// SQL statement backing `set_card`.
pub const SET_CARD: &str = "SELECT COUNT(*) FROM sets WHERE name = ?";

/// SQL statement backing `set_add`.
pub const SET_ADD: &str = "INSERT OR IGNORE INTO sets (name, member) VALUES (?, ?)";

/// SQL statement backing `set_pop`.
///
/// A single DELETE ... RETURNING statement, atomic under the database's
/// write lock. Which member the inner SELECT picks is unspecified.
pub const SET_POP: &str = r"
    DELETE FROM sets
    WHERE name = ?1
      AND member = (SELECT member FROM sets WHERE name = ?1 LIMIT 1)
    RETURNING member
";

/// SQL statement backing `set_remove`.
pub const SET_REMOVE: &str = "DELETE FROM sets WHERE name = ? AND member = ?";

/// SQL statement backing `set_members`.
pub const SET_MEMBERS: &str = "SELECT member FROM sets WHERE name = ?";

/// SQL statement backing `hash_get`.
pub const MAP_GET: &str = "SELECT value FROM maps WHERE name = ? AND field = ?";

/// SQL statement backing `hash_set_if_absent`.
pub const MAP_SET_IF_ABSENT: &str =
    "INSERT OR IGNORE INTO maps (name, field, value) VALUES (?, ?, ?)";

/// SQL statement to delete a map field inside a grouped transaction.
pub const MAP_DELETE_FIELD: &str = "DELETE FROM maps WHERE name = ? AND field = ?";
