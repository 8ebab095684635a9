//! Headless presentation screens.
//!
//! Each screen is a small state machine that a host drives with user
//! intents and renders however it likes. Screens never touch the store:
//! they validate input locally and hand valid records to the
//! [`EmployeeController`](crate::controller::EmployeeController).

pub mod add;
pub mod edit;
pub mod list;

pub use add::{AddScreen, AddState};
pub use edit::{Deleted, EditScreen, EditState, UndoDelete};
pub use list::{EmployeeRow, ListContent, ListScreen, ListView};

use tokio::task::JoinHandle;

use crate::controller::EmployeeController;
use crate::employee::Employee;
use crate::form::{EmployeeForm, Field, FormErrors, Validator};

/// One-shot messages a host shows after a screen transition.
pub mod notice {
    /// Shown after a successful add.
    pub const EMPLOYEE_ADDED: &str = "Employee added successfully";
    /// Shown after a successful edit.
    pub const EMPLOYEE_UPDATED: &str = "Employee updated successfully";
    /// Shown after a delete; the host offers undo alongside it.
    pub const EMPLOYEE_DELETED: &str = "Employee deleted";
    /// Shown after an undo re-inserted the record.
    pub const EMPLOYEE_RESTORED: &str = "Employee restored";
    /// Shown when the edit screen was opened without a usable ID.
    pub const INVALID_EMPLOYEE_ID: &str = "Invalid employee ID";
    /// Shown when the requested record does not exist.
    pub const EMPLOYEE_NOT_FOUND: &str = "Employee not found";
    /// Shown when loading the record failed.
    pub const LOAD_FAILED: &str = "Could not load employee";
}

/// Where the host should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Open the add screen.
    AddEmployee,
    /// Open the edit screen for one record.
    EditEmployee {
        /// Identifier of the record to edit.
        id: i64,
    },
}

/// Result of tapping save on a form.
#[derive(Debug)]
pub enum SaveOutcome<T> {
    /// Input was rejected; the screen stays open with these inline errors.
    Invalid(FormErrors),
    /// The write was issued and the screen closed.
    Saved {
        /// Completes when the write finished; `None` means it failed.
        pending: JoinHandle<Option<T>>,
        /// Message to show.
        notice: &'static str,
    },
    /// The screen is not accepting input.
    Ignored,
}

/// Form text plus its inline errors.
#[derive(Debug, Clone)]
struct FormState {
    form: EmployeeForm,
    errors: FormErrors,
    validator: Validator,
}

impl FormState {
    fn new(form: EmployeeForm, validator: Validator) -> Self {
        Self {
            form,
            errors: FormErrors::new(),
            validator,
        }
    }

    /// Any edit clears that field's inline error and the controller error.
    fn set(&mut self, controller: &EmployeeController, field: Field, value: String) {
        self.form.set(field, value);
        self.errors.remove(&field);
        controller.clear_error();
    }

    fn validate(&mut self) -> Result<Employee, FormErrors> {
        match self.form.validate(&self.validator) {
            Ok(employee) => {
                self.errors.clear();
                Ok(employee)
            }
            Err(errors) => {
                self.errors.clone_from(&errors);
                Err(errors)
            }
        }
    }
}
