//! Storage layer for staffbook.
//!
//! This module provides `SQLite`-based persistent storage for employee
//! records together with a change feed that observers use to stay current
//! without polling.

pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::employee::Employee;
use crate::error::{Error, Result};

const SELECT_COLUMNS: &str =
    "SELECT id, first_name, last_name, email, phone_number, address, designation, salary FROM employees";

/// Storage engine for employee records.
///
/// Every write is committed before the call returns. Writes that change a
/// row bump a revision counter that can be observed via [`Storage::subscribe`].
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Revision counter, bumped after every effective write.
    changes: watch::Sender<u64>,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, the schema cannot be
    /// created, or the file carries an unsupported schema version.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL for readers, FULL so a returned write survives power loss
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")?;

        schema::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self::from_connection(path, conn))
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        schema::initialize_schema(&conn)?;

        Ok(Self::from_connection(PathBuf::from(":memory:"), conn))
    }

    fn from_connection(path: PathBuf, conn: Connection) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            path,
            conn,
            changes,
        }
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Subscribe to the change feed.
    ///
    /// The receiver starts out having seen the current revision, so
    /// `changed()` resolves on the next write.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Current revision of the change feed.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.changes.borrow()
    }

    fn notify(&self) {
        self.changes.send_modify(|rev| *rev += 1);
    }

    /// Insert an employee as a new row and return its assigned ID.
    ///
    /// Any ID already present on `employee` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, employee: &Employee) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO employees
                (first_name, last_name, email, phone_number, address, designation, salary)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                employee.first_name,
                employee.last_name,
                employee.email,
                employee.phone_number,
                employee.address,
                employee.designation,
                employee.salary,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted employee with id {}", id);
        self.notify();
        Ok(id)
    }

    /// Replace every data column of the row matching the employee's ID.
    ///
    /// Returns `true` if a row was updated, `false` if the employee has no ID
    /// or no such row exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update(&self, employee: &Employee) -> Result<bool> {
        let Some(id) = employee.id else {
            debug!("Skipping update of employee without id");
            return Ok(false);
        };

        let affected = self.conn.execute(
            r"
            UPDATE employees SET
                first_name = ?2,
                last_name = ?3,
                email = ?4,
                phone_number = ?5,
                address = ?6,
                designation = ?7,
                salary = ?8
            WHERE id = ?1
            ",
            params![
                id,
                employee.first_name,
                employee.last_name,
                employee.email,
                employee.phone_number,
                employee.address,
                employee.designation,
                employee.salary,
            ],
        )?;

        debug!("Updated employee {} ({} rows)", id, affected);
        if affected > 0 {
            self.notify();
        }
        Ok(affected > 0)
    }

    /// Delete the row matching the employee's ID.
    ///
    /// Returns `true` if a row was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, employee: &Employee) -> Result<bool> {
        let Some(id) = employee.id else {
            debug!("Skipping delete of employee without id");
            return Ok(false);
        };

        let affected = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1", [id])?;

        debug!("Deleted employee {} ({} rows)", id, affected);
        if affected > 0 {
            self.notify();
        }
        Ok(affected > 0)
    }

    /// Get an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<Employee>> {
        let result = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id],
                Self::row_to_employee,
            )
            .optional()?;
        Ok(result)
    }

    /// Get all employees ordered by first name (case-insensitive), then ID.
    ///
    /// Case folding uses Unicode lowercase, so `"éa"` sorts before `"Émile"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_all(&self) -> Result<Vec<Employee>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))?;

        let mut employees = stmt
            .query_map([], Self::row_to_employee)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // SQLite's NOCASE only folds ASCII.
        employees.sort_by_cached_key(|e| (e.first_name.to_lowercase(), e.id));
        Ok(employees)
    }

    /// Count total employees in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or the database
    /// file cannot be inspected.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_employees = self.count()?;
        let schema_version = schema::schema_version(&self.conn)?.unwrap_or(0);

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path)?.len()
        };

        Ok(StorageStats {
            total_employees,
            schema_version,
            db_size_bytes,
        })
    }

    fn row_to_employee(row: &rusqlite::Row) -> rusqlite::Result<Employee> {
        Ok(Employee {
            id: Some(row.get(0)?),
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            phone_number: row.get(4)?,
            address: row.get(5)?,
            designation: row.get(6)?,
            salary: row.get(7)?,
        })
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Total number of employees stored.
    pub total_employees: i64,
    /// Schema version stamped in the database.
    pub schema_version: i32,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
