//! Add-employee screen.

use std::sync::Arc;

use super::{notice, FormState, SaveOutcome};
use crate::controller::EmployeeController;
use crate::form::{EmployeeForm, Field, FormErrors, Validator};

/// States of the add screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddState {
    /// Accepting input.
    Editing,
    /// Saved; the host should dismiss the screen.
    Closed,
}

/// Validated form that inserts a new record.
#[derive(Debug)]
pub struct AddScreen {
    controller: Arc<EmployeeController>,
    form: FormState,
    state: AddState,
}

impl AddScreen {
    /// Open an empty form.
    #[must_use]
    pub fn new(controller: Arc<EmployeeController>, validator: Validator) -> Self {
        Self {
            controller,
            form: FormState::new(EmployeeForm::default(), validator),
            state: AddState::Editing,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AddState {
        self.state
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

    /// The user typed into a field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if self.state == AddState::Editing {
            self.form.set(&self.controller, field, value.into());
        }
    }

    /// The user dismissed the error message.
    pub fn dismiss_error(&self) {
        self.controller.clear_error();
    }

    /// The user tapped save.
    pub fn save(&mut self) -> SaveOutcome<i64> {
        if self.state != AddState::Editing {
            return SaveOutcome::Ignored;
        }

        match self.form.validate() {
            Err(errors) => SaveOutcome::Invalid(errors),
            Ok(employee) => {
                let pending = self.controller.insert(employee);
                self.state = AddState::Closed;
                SaveOutcome::Saved {
                    pending,
                    notice: notice::EMPLOYEE_ADDED,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldError;
    use crate::repository::SqliteRepository;
    use crate::storage::Storage;

    fn controller() -> Arc<EmployeeController> {
        let storage = Storage::open_in_memory().expect("failed to create test storage");
        Arc::new(EmployeeController::new(Arc::new(SqliteRepository::new(
            storage,
        ))))
    }

    fn fill_valid(screen: &mut AddScreen) {
        screen.set_field(Field::FirstName, "Ada");
        screen.set_field(Field::LastName, "Lovelace");
        screen.set_field(Field::Email, "ada@example.com");
        screen.set_field(Field::Phone, "+15551234567");
        screen.set_field(Field::Address, "1 Infinite Loop");
        screen.set_field(Field::Designation, "Engineer");
        screen.set_field(Field::Salary, "95000.00");
    }

    #[tokio::test]
    async fn test_valid_save_inserts_and_closes() {
        let controller = controller();
        let mut screen = AddScreen::new(Arc::clone(&controller), Validator::default());
        fill_valid(&mut screen);

        let SaveOutcome::Saved { pending, notice: message } = screen.save() else {
            panic!("expected a save");
        };
        assert_eq!(message, notice::EMPLOYEE_ADDED);
        assert_eq!(screen.state(), AddState::Closed);

        let id = pending.await.unwrap().expect("insert should succeed");
        let mut list = controller.employees();
        let list = list
            .wait_for(|list| list.len() == 1)
            .await
            .unwrap()
            .clone();
        assert_eq!(list[0].id, Some(id));
        assert_eq!(list[0].email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_invalid_save_stays_editing() {
        let controller = controller();
        let mut screen = AddScreen::new(Arc::clone(&controller), Validator::default());
        fill_valid(&mut screen);
        screen.set_field(Field::Email, "not-an-email");
        screen.set_field(Field::Salary, "abc");

        let SaveOutcome::Invalid(errors) = screen.save() else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[&Field::Email], FieldError::InvalidEmail);
        assert_eq!(errors[&Field::Salary], FieldError::InvalidSalary);
        assert_eq!(screen.state(), AddState::Editing);
        assert_eq!(screen.errors(), &errors);

        controller.wait_idle().await;
        assert!(controller.employees().borrow().is_empty());
    }

    #[tokio::test]
    async fn test_editing_field_clears_its_inline_error() {
        let controller = controller();
        let mut screen = AddScreen::new(controller, Validator::default());
        let _ = screen.save();
        assert_eq!(screen.errors().len(), 7);

        screen.set_field(Field::FirstName, "Ada");
        assert!(!screen.errors().contains_key(&Field::FirstName));
        assert_eq!(screen.errors().len(), 6);
    }

    #[tokio::test]
    async fn test_save_after_close_is_ignored() {
        let controller = controller();
        let mut screen = AddScreen::new(controller, Validator::default());
        fill_valid(&mut screen);

        assert!(matches!(screen.save(), SaveOutcome::Saved { .. }));
        assert!(matches!(screen.save(), SaveOutcome::Ignored));

        screen.set_field(Field::FirstName, "Changed");
        assert_eq!(screen.form().first_name, "Ada");
    }
}
