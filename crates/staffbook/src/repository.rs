//! Repository abstraction between the controller and the store.
//!
//! [`EmployeeRepository`] mirrors the store's five operations as async
//! calls. [`SqliteRepository`] forwards them to a [`Storage`] on tokio's
//! blocking pool so that `SQLite` work never runs on an async worker.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::employee::Employee;
use crate::error::{Error, Result};
use crate::storage::Storage;

/// Data access used by the view-state controller.
#[async_trait::async_trait]
pub trait EmployeeRepository: Send + Sync + std::fmt::Debug {
    /// Insert a new record and return its assigned ID.
    async fn insert(&self, employee: Employee) -> Result<i64>;

    /// Replace the row matching the record's ID. Returns whether a row matched.
    async fn update(&self, employee: Employee) -> Result<bool>;

    /// Delete the row matching the record's ID. Returns whether a row matched.
    async fn delete(&self, employee: Employee) -> Result<bool>;

    /// Fetch one record.
    async fn get_by_id(&self, id: i64) -> Result<Option<Employee>>;

    /// Fetch every record, ordered by first name.
    async fn get_all(&self) -> Result<Vec<Employee>>;

    /// Change feed that ticks whenever the underlying table changes.
    fn changes(&self) -> watch::Receiver<u64>;
}

/// [`EmployeeRepository`] backed by a [`Storage`].
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    storage: Arc<Mutex<Storage>>,
    changes: watch::Receiver<u64>,
}

impl SqliteRepository {
    /// Take ownership of an opened store.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        let changes = storage.subscribe();
        Self {
            storage: Arc::new(Mutex::new(storage)),
            changes,
        }
    }

    async fn with_storage<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Storage) -> Result<T> + Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || {
            let guard = storage
                .lock()
                .map_err(|_| Error::internal("storage lock poisoned"))?;
            f(&*guard)
        })
        .await?
    }
}

#[async_trait::async_trait]
impl EmployeeRepository for SqliteRepository {
    async fn insert(&self, employee: Employee) -> Result<i64> {
        self.with_storage(move |s| s.insert(&employee)).await
    }

    async fn update(&self, employee: Employee) -> Result<bool> {
        self.with_storage(move |s| s.update(&employee)).await
    }

    async fn delete(&self, employee: Employee) -> Result<bool> {
        self.with_storage(move |s| s.delete(&employee)).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Employee>> {
        self.with_storage(move |s| s.get(id)).await
    }

    async fn get_all(&self) -> Result<Vec<Employee>> {
        self.with_storage(Storage::get_all).await
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.changes.clone()
    }
}
