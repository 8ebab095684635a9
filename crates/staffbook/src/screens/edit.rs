//! Edit-employee screen.
//!
//! ```text
//! open(id) ──invalid id──▶ Closed
//!    │
//!    ▼
//! Loading ──not found / failed──▶ Closed
//!    │
//!    ▼
//! Editing ──save (valid)──▶ Closed
//!    │  ▲
//!    │  └──cancel_delete──┐
//!    ▼                    │
//! ConfirmingDelete ───────┘
//!    │
//!    └──confirm_delete──▶ Closed (+ UndoDelete)
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::debug;

use super::{notice, FormState, SaveOutcome};
use crate::controller::EmployeeController;
use crate::employee::Employee;
use crate::form::{EmployeeForm, Field, FormErrors, Validator};

/// States of the edit screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// Fetching the record.
    Loading,
    /// Form populated and accepting input.
    Editing,
    /// Waiting for the user to confirm a delete.
    ConfirmingDelete,
    /// Finished; the host should dismiss the screen.
    Closed,
}

/// A delete that was issued, plus the means to take it back.
#[derive(Debug)]
pub struct Deleted {
    /// Completes when the delete finished; `None` means it failed.
    pub pending: JoinHandle<Option<bool>>,
    /// Message to show.
    pub notice: &'static str,
    /// One-shot undo for this delete.
    pub undo: UndoDelete,
}

/// Remembers a deleted record so it can be re-inserted once.
///
/// The restored row gets a new identifier.
#[derive(Debug)]
pub struct UndoDelete {
    controller: Arc<EmployeeController>,
    employee: Employee,
    deleted_at: DateTime<Utc>,
}

impl UndoDelete {
    /// The record as it was when deleted.
    #[must_use]
    pub fn employee(&self) -> &Employee {
        &self.employee
    }

    /// When the delete was issued.
    #[must_use]
    pub fn deleted_at(&self) -> DateTime<Utc> {
        self.deleted_at
    }

    /// Re-insert the record. Consumes the token.
    pub fn undo(self) -> (JoinHandle<Option<i64>>, &'static str) {
        debug!(id = ?self.employee.id, "Restoring deleted employee");
        let pending = self.controller.insert(self.employee.without_id());
        (pending, notice::EMPLOYEE_RESTORED)
    }
}

/// Loads one record into a validated form; saves or deletes it.
#[derive(Debug)]
pub struct EditScreen {
    controller: Arc<EmployeeController>,
    form: FormState,
    state: EditState,
    id: Option<i64>,
    current: Option<Employee>,
    notice: Option<&'static str>,
}

impl EditScreen {
    /// Open the screen for the record the host passed in.
    ///
    /// A missing or non-positive ID closes the screen straight away with a
    /// notice.
    #[must_use]
    pub fn open(
        controller: Arc<EmployeeController>,
        validator: Validator,
        id: Option<i64>,
    ) -> Self {
        let id = id.filter(|id| *id > 0);
        let (state, notice) = match id {
            Some(_) => (EditState::Loading, None),
            None => (EditState::Closed, Some(notice::INVALID_EMPLOYEE_ID)),
        };

        Self {
            controller,
            form: FormState::new(EmployeeForm::default(), validator),
            state,
            id,
            current: None,
            notice,
        }
    }

    /// Fetch the record and populate the form.
    ///
    /// Does nothing unless the screen is loading.
    pub async fn load(&mut self) -> EditState {
        let (EditState::Loading, Some(id)) = (self.state, self.id) else {
            return self.state;
        };

        match self.controller.get_by_id(id).await {
            Ok(Some(Some(employee))) => {
                self.form.form = EmployeeForm::from_employee(&employee);
                self.current = Some(employee);
                self.state = EditState::Editing;
            }
            Ok(Some(None)) => self.close_with(notice::EMPLOYEE_NOT_FOUND),
            Ok(None) | Err(_) => self.close_with(notice::LOAD_FAILED),
        }
        self.state
    }

    fn close_with(&mut self, message: &'static str) {
        self.state = EditState::Closed;
        self.notice = Some(message);
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> EditState {
        self.state
    }

    /// The record as loaded.
    #[must_use]
    pub fn employee(&self) -> Option<&Employee> {
        self.current.as_ref()
    }

    /// Current form text.
    #[must_use]
    pub fn form(&self) -> &EmployeeForm {
        &self.form.form
    }

    /// Inline errors from the last save attempt still showing.
    #[must_use]
    pub fn errors(&self) -> &FormErrors {
        &self.form.errors
    }

    /// Take the pending one-shot notice, if any.
    pub fn take_notice(&mut self) -> Option<&'static str> {
        self.notice.take()
    }

    /// The user typed into a field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if self.state == EditState::Editing {
            self.form.set(&self.controller, field, value.into());
        }
    }

    /// The user dismissed the error message.
    pub fn dismiss_error(&self) {
        self.controller.clear_error();
    }

    /// The user tapped save.
    pub fn save(&mut self) -> SaveOutcome<bool> {
        let (EditState::Editing, Some(current)) = (self.state, self.current.as_ref()) else {
            return SaveOutcome::Ignored;
        };
        let Some(id) = current.id else {
            return SaveOutcome::Ignored;
        };

        match self.form.validate() {
            Err(errors) => SaveOutcome::Invalid(errors),
            Ok(updated) => {
                let updated = updated.with_id(id);
                self.current = Some(updated.clone());
                let pending = self.controller.update(updated);
                self.state = EditState::Closed;
                SaveOutcome::Saved {
                    pending,
                    notice: notice::EMPLOYEE_UPDATED,
                }
            }
        }
    }

    /// The user tapped delete; ask for confirmation.
    ///
    /// Returns whether the confirmation prompt is now showing.
    pub fn request_delete(&mut self) -> bool {
        if self.state == EditState::Editing {
            self.state = EditState::ConfirmingDelete;
        }
        self.state == EditState::ConfirmingDelete
    }

    /// The user declined the confirmation.
    pub fn cancel_delete(&mut self) {
        if self.state == EditState::ConfirmingDelete {
            self.state = EditState::Editing;
        }
    }

    /// The user confirmed the delete.
    pub fn confirm_delete(&mut self) -> Option<Deleted> {
        if self.state != EditState::ConfirmingDelete {
            return None;
        }
        let employee = self.current.clone()?;

        let pending = self.controller.delete(employee.clone());
        self.close_with(notice::EMPLOYEE_DELETED);
        Some(Deleted {
            pending,
            notice: notice::EMPLOYEE_DELETED,
            undo: UndoDelete {
                controller: Arc::clone(&self.controller),
                employee,
                deleted_at: Utc::now(),
            },
        })
    }
}
