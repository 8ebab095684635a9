//! Employee list screen.

use tokio::sync::watch;

use super::Navigation;
use crate::controller::EmployeeController;
use crate::employee::Employee;

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRow {
    /// Identifier passed to the edit screen.
    pub id: Option<i64>,
    /// Avatar text.
    pub initials: String,
    /// First and last name.
    pub name: String,
    /// Job title.
    pub designation: String,
}

impl From<&Employee> for EmployeeRow {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            initials: employee.initials(),
            name: employee.full_name(),
            designation: employee.designation.clone(),
        }
    }
}

/// What the list body shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListContent {
    /// No records; show the empty-state message.
    Empty,
    /// Rows in display order.
    Populated(Vec<EmployeeRow>),
}

/// Full render state of the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    /// Whether the loading indicator is visible.
    pub loading: bool,
    /// List body.
    pub content: ListContent,
}

/// Displays all records and navigates to the add and edit screens.
///
/// Dropping the screen drops its receivers, which is all it takes to stop
/// observing.
#[derive(Debug)]
pub struct ListScreen {
    employees: watch::Receiver<Vec<Employee>>,
    busy: watch::Receiver<bool>,
}

impl ListScreen {
    /// Start observing the controller.
    #[must_use]
    pub fn new(controller: &EmployeeController) -> Self {
        Self {
            employees: controller.employees(),
            busy: controller.busy(),
        }
    }

    /// Render the current state.
    #[must_use]
    pub fn view(&self) -> ListView {
        let employees = self.employees.borrow();
        let content = if employees.is_empty() {
            ListContent::Empty
        } else {
            ListContent::Populated(employees.iter().map(EmployeeRow::from).collect())
        };

        ListView {
            loading: *self.busy.borrow(),
            content,
        }
    }

    /// Wait until the list or the busy flag changes.
    ///
    /// Returns `false` once the controller is gone.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            res = self.employees.changed() => res.is_ok(),
            res = self.busy.changed() => res.is_ok(),
        }
    }

    /// Intent: the add button was tapped.
    #[must_use]
    pub fn add(&self) -> Navigation {
        Navigation::AddEmployee
    }

    /// Intent: the row at `index` was tapped.
    #[must_use]
    pub fn open(&self, index: usize) -> Option<Navigation> {
        self.employees
            .borrow()
            .get(index)
            .and_then(|employee| employee.id)
            .map(|id| Navigation::EditEmployee { id })
    }
}
