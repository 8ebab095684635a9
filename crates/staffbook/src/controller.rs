//! View-state controller.
//!
//! [`EmployeeController`] owns the observable state that screens render:
//!
//! - the full employee list, kept current from the repository change feed,
//! - an optional error message from the last failed operation,
//! - a busy flag that is set while any operation is in flight.
//!
//! Operations are dispatched as tokio tasks and never block the caller.
//! Their outcome is published through the observable state; the returned
//! [`JoinHandle`] is only for callers that want to wait.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

use crate::employee::Employee;
use crate::error::Result;
use crate::repository::EmployeeRepository;

#[derive(Debug)]
struct ViewState {
    employees: watch::Sender<Vec<Employee>>,
    error: watch::Sender<Option<String>>,
    busy: watch::Sender<bool>,
    in_flight: Mutex<usize>,
}

impl ViewState {
    fn new() -> Self {
        Self {
            employees: watch::channel(Vec::new()).0,
            error: watch::channel(None).0,
            busy: watch::channel(false).0,
            in_flight: Mutex::new(0),
        }
    }

    fn begin(&self) {
        let mut count = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        *count += 1;
        publish(&self.busy, true);
    }

    fn finish<T>(&self, operation: &'static str, result: Result<T>) -> Option<T> {
        let outcome = match result {
            Ok(value) => {
                publish(&self.error, None);
                Some(value)
            }
            Err(err) => {
                warn!(operation, error = %err, "Employee operation failed");
                publish(&self.error, Some(err.to_string()));
                None
            }
        };

        let mut count = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        *count = count.saturating_sub(1);
        publish(&self.busy, *count > 0);
        outcome
    }
}

/// Send `value` only if it differs from the current one.
fn publish<T: PartialEq>(tx: &watch::Sender<T>, value: T) {
    tx.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    });
}

/// Holds observable UI-facing state and mediates user actions.
#[derive(Debug)]
pub struct EmployeeController {
    repository: Arc<dyn EmployeeRepository>,
    state: Arc<ViewState>,
    refresh: AbortHandle,
}

impl EmployeeController {
    /// Create a controller and start keeping the employee list current.
    ///
    /// The initial load counts as an in-flight operation, so observers see
    /// `busy == true` until the first list has been published.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[must_use]
    pub fn new(repository: Arc<dyn EmployeeRepository>) -> Self {
        let state = Arc::new(ViewState::new());
        state.begin();
        let refresh = tokio::spawn(keep_list_current(
            Arc::clone(&repository),
            Arc::clone(&state),
        ))
        .abort_handle();

        Self {
            repository,
            state,
            refresh,
        }
    }

    /// Observe the employee list, ordered by first name.
    #[must_use]
    pub fn employees(&self) -> watch::Receiver<Vec<Employee>> {
        self.state.employees.subscribe()
    }

    /// Observe the error message of the last failed operation.
    #[must_use]
    pub fn error(&self) -> watch::Receiver<Option<String>> {
        self.state.error.subscribe()
    }

    /// Observe whether an operation is in flight.
    #[must_use]
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.state.busy.subscribe()
    }

    /// Current error message, if any.
    #[must_use]
    pub fn current_error(&self) -> Option<String> {
        self.state.error.borrow().clone()
    }

    /// Whether an operation is currently in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        *self.state.busy.borrow()
    }

    /// Reset the error message.
    pub fn clear_error(&self) {
        publish(&self.state.error, None);
    }

    /// Wait until no operation is in flight.
    pub async fn wait_idle(&self) {
        let mut busy = self.busy();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = busy.wait_for(|busy| !*busy).await;
    }

    /// Insert a new employee. Resolves to the assigned ID on success.
    pub fn insert(&self, employee: Employee) -> JoinHandle<Option<i64>> {
        self.launch("insert", move |repo| async move { repo.insert(employee).await })
    }

    /// Replace a stored employee. Resolves to whether a row matched.
    pub fn update(&self, employee: Employee) -> JoinHandle<Option<bool>> {
        self.launch("update", move |repo| async move { repo.update(employee).await })
    }

    /// Delete a stored employee. Resolves to whether a row matched.
    pub fn delete(&self, employee: Employee) -> JoinHandle<Option<bool>> {
        self.launch("delete", move |repo| async move { repo.delete(employee).await })
    }

    /// Fetch one employee.
    ///
    /// Resolves to `Some(None)` when the ID is unknown and to `None` when
    /// the fetch failed.
    pub fn get_by_id(&self, id: i64) -> JoinHandle<Option<Option<Employee>>> {
        self.launch("get_by_id", move |repo| async move { repo.get_by_id(id).await })
    }

    fn launch<T, F, Fut>(&self, operation: &'static str, call: F) -> JoinHandle<Option<T>>
    where
        T: Send + 'static,
        F: FnOnce(Arc<dyn EmployeeRepository>) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        debug!(operation, "Dispatching employee operation");
        self.state.begin();
        let state = Arc::clone(&self.state);
        let call = call(Arc::clone(&self.repository));
        tokio::spawn(async move {
            let result = call.await;
            state.finish(operation, result)
        })
    }
}

impl Drop for EmployeeController {
    fn drop(&mut self) {
        self.refresh.abort();
    }
}

async fn keep_list_current(repository: Arc<dyn EmployeeRepository>, state: Arc<ViewState>) {
    let mut changes = repository.changes();
    let mut initial = true;

    loop {
        let _ = changes.borrow_and_update();
        let result = repository.get_all().await.map(|employees| {
            debug!(count = employees.len(), "Employee list refreshed");
            state.employees.send_replace(employees);
        });

        if initial {
            state.finish("load", result);
            initial = false;
        } else if let Err(err) = result {
            warn!(error = %err, "Failed to refresh employee list");
            publish(&state.error, Some(err.to_string()));
        }

        if changes.changed().await.is_err() {
            debug!("Change feed closed, list no longer refreshed");
            break;
        }
    }
}
