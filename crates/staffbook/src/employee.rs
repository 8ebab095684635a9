//! Core record type for staffbook.
//!
//! An [`Employee`] is the single entity the application stores. The
//! identifier is assigned by the storage layer and never reused.

use serde::{Deserialize, Serialize};

/// One employee's stored data plus its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier (assigned by storage layer on insert).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Contact email address.
    pub email: String,

    /// Contact phone number, as entered.
    pub phone_number: String,

    /// Postal address.
    pub address: String,

    /// Job title.
    pub designation: String,

    /// Salary amount.
    pub salary: f64,
}

impl Employee {
    /// Create a record that has not been stored yet.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        address: impl Into<String>,
        designation: impl Into<String>,
        salary: f64,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            address: address.into(),
            designation: designation.into(),
            salary,
        }
    }

    /// Return a copy carrying the given identifier.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Return a copy with the identifier cleared, ready for re-insertion.
    #[must_use]
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    /// Uppercased first letters of the first and last name.
    ///
    /// A missing name contributes nothing, so two empty names yield `""`.
    #[must_use]
    pub fn initials(&self) -> String {
        let mut initials = String::new();
        for name in [&self.first_name, &self.last_name] {
            if let Some(first) = name.chars().next() {
                initials.extend(first.to_uppercase());
            }
        }
        initials
    }

    /// First and last name separated by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Employee {
        Employee::new(
            "ada",
            "lovelace",
            "ada@example.com",
            "+15551234567",
            "1 Infinite Loop",
            "Engineer",
            95_000.0,
        )
    }

    #[test]
    fn test_employee_new_has_no_id() {
        let employee = ada();
        assert!(employee.id.is_none());
        assert_eq!(employee.first_name, "ada");
        assert!((employee.salary - 95_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_initials() {
        assert_eq!(ada().initials(), "AL");
    }

    #[test]
    fn test_initials_empty_names() {
        let mut employee = ada();
        employee.first_name = String::new();
        employee.last_name = String::new();
        assert_eq!(employee.initials(), "");
    }

    #[test]
    fn test_initials_missing_last_name() {
        let mut employee = ada();
        employee.last_name = String::new();
        assert_eq!(employee.initials(), "A");
    }

    #[test]
    fn test_initials_non_ascii() {
        let mut employee = ada();
        employee.first_name = "émile".to_string();
        employee.last_name = "ßmith".to_string();
        assert_eq!(employee.initials(), "ÉSS");
    }

    #[test]
    fn test_full_name() {
        assert_eq!(ada().full_name(), "ada lovelace");
    }

    #[test]
    fn test_with_and_without_id() {
        let stored = ada().with_id(7);
        assert_eq!(stored.id, Some(7));
        assert!(stored.without_id().id.is_none());
    }

    #[test]
    fn test_serialization_skips_missing_id() {
        let json = serde_json::to_string(&ada()).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(json.contains("\"phone_number\""));

        let json = serde_json::to_string(&ada().with_id(3)).unwrap();
        assert!(json.contains("\"id\":3"));
    }
}
