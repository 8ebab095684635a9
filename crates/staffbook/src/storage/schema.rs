//! `SQLite` schema definitions for staffbook.
//!
//! The schema is fixed at [`CURRENT_VERSION`]. A database stamped with a
//! newer version is refused rather than migrated.

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Error, Result};

/// The schema version this build creates.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// SQL statement to create the employees table.
///
/// `AUTOINCREMENT` keeps identifiers from ever being reused after a delete.
pub const CREATE_EMPLOYEES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    address TEXT NOT NULL,
    designation TEXT NOT NULL,
    salary REAL NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_EMPLOYEES_TABLE, CREATE_METADATA_TABLE];

/// Create the schema if needed and check the stamped version.
///
/// # Errors
///
/// Returns an error if a statement fails or the database carries a schema
/// version newer than [`CURRENT_VERSION`].
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    match schema_version(conn)? {
        None => set_schema_version(conn, CURRENT_VERSION),
        Some(found) if found > CURRENT_VERSION => Err(Error::UnsupportedSchema {
            found,
            supported: CURRENT_VERSION,
        }),
        Some(_) => Ok(()),
    }
}

/// Read the stamped schema version, if any.
///
/// # Errors
///
/// Returns an error if the query fails or the stored value is not a number.
pub fn schema_version(conn: &Connection) -> Result<Option<i32>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    value
        .map(|v| {
            v.parse()
                .map_err(|_| Error::internal(format!("invalid schema version: {v}")))
        })
        .transpose()
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}
