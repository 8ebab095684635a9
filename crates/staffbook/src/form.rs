//! Employee form model and field validation.
//!
//! The add and edit screens share one [`EmployeeForm`]. Every field is
//! checked independently by [`EmployeeForm::validate`], so several inline
//! errors can be reported at once. Validation never touches the store.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

use crate::employee::Employee;
use crate::error::{Error, Result};

/// Default email pattern (full-match).
pub const DEFAULT_EMAIL_PATTERN: &str = r"[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+";

/// Default phone pattern (full-match). Optional `+country`, optional
/// `(area)`, then digits with space, dot or dash separators.
pub const DEFAULT_PHONE_PATTERN: &str =
    r"(\+[0-9]+[\- .]*)?(\([0-9]+\)[\- .]*)?([0-9][0-9\- .]+[0-9])";

/// One input field of the employee form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Postal address.
    Address,
    /// Job title.
    Designation,
    /// Salary amount.
    Salary,
}

impl Field {
    /// Every field in display order.
    pub const ALL: [Field; 7] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Phone,
        Field::Address,
        Field::Designation,
        Field::Salary,
    ];

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Address => "Address",
            Self::Designation => "Designation",
            Self::Salary => "Salary",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The field is blank.
    Required,
    /// The email is blank or malformed.
    InvalidEmail,
    /// The phone number is blank or malformed.
    InvalidPhone,
    /// The salary is blank or not a number.
    InvalidSalary,
}

impl FieldError {
    /// Inline message shown next to the field.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Required => "This field is required",
            Self::InvalidEmail => "Please enter a valid email address",
            Self::InvalidPhone => "Please enter a valid phone number",
            Self::InvalidSalary => "Please enter a valid salary",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Inline errors keyed by field, in display order.
pub type FormErrors = BTreeMap<Field, FieldError>;

/// Compiled email and phone patterns.
#[derive(Debug, Clone)]
pub struct Validator {
    email: Regex,
    phone: Regex,
}

impl Validator {
    /// Compile the given patterns. Both are matched against the whole input.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either pattern does not compile.
    pub fn new(email_pattern: &str, phone_pattern: &str) -> Result<Self> {
        Ok(Self {
            email: full_match(email_pattern, "email_pattern")?,
            phone: full_match(phone_pattern, "phone_pattern")?,
        })
    }

    /// Whether `value` is a well-formed email address.
    #[must_use]
    pub fn is_email(&self, value: &str) -> bool {
        self.email.is_match(value)
    }

    /// Whether `value` is a well-formed phone number.
    #[must_use]
    pub fn is_phone(&self, value: &str) -> bool {
        self.phone.is_match(value)
    }
}

impl Default for Validator {
    /// # Panics
    ///
    /// Never in practice: the built-in patterns are covered by tests.
    fn default() -> Self {
        Self::new(DEFAULT_EMAIL_PATTERN, DEFAULT_PHONE_PATTERN)
            .expect("built-in validation patterns are valid")
    }
}

fn full_match(pattern: &str, name: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|e| Error::config_validation(format!("invalid {name}: {e}")))
}

/// Parse a salary the way the form accepts it: trimmed, finite.
#[must_use]
pub fn parse_salary(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|salary| salary.is_finite())
}

/// Raw text of every form field, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Postal address.
    pub address: String,
    /// Job title.
    pub designation: String,
    /// Salary amount.
    pub salary: String,
}

impl EmployeeForm {
    /// Populate a form from a stored record.
    #[must_use]
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            phone: employee.phone_number.clone(),
            address: employee.address.clone(),
            designation: employee.designation.clone(),
            salary: employee.salary.to_string(),
        }
    }

    /// Text of one field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Address => &self.address,
            Field::Designation => &self.designation,
            Field::Salary => &self.salary,
        }
    }

    /// Replace the text of one field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Address => &mut self.address,
            Field::Designation => &mut self.designation,
            Field::Salary => &mut self.salary,
        };
        *slot = value.into();
    }

    /// Check one field.
    #[must_use]
    pub fn check(&self, field: Field, validator: &Validator) -> Option<FieldError> {
        let value = self.get(field).trim();
        match field {
            Field::Email if value.is_empty() || !validator.is_email(value) => {
                Some(FieldError::InvalidEmail)
            }
            Field::Phone if value.is_empty() || !validator.is_phone(value) => {
                Some(FieldError::InvalidPhone)
            }
            Field::Salary if parse_salary(value).is_none() => Some(FieldError::InvalidSalary),
            Field::FirstName | Field::LastName | Field::Address | Field::Designation
                if value.is_empty() =>
            {
                Some(FieldError::Required)
            }
            _ => None,
        }
    }

    /// Check every field independently.
    #[must_use]
    pub fn errors(&self, validator: &Validator) -> FormErrors {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.check(field, validator).map(|err| (field, err)))
            .collect()
    }

    /// Validate the form and build an unsaved record from it.
    ///
    /// Text fields are trimmed before they are stored.
    ///
    /// # Errors
    ///
    /// Returns every failing field when the form is invalid.
    pub fn validate(&self, validator: &Validator) -> std::result::Result<Employee, FormErrors> {
        let errors = self.errors(validator);
        if !errors.is_empty() {
            return Err(errors);
        }

        let salary = parse_salary(&self.salary).ok_or_else(|| {
            FormErrors::from([(Field::Salary, FieldError::InvalidSalary)])
        })?;

        Ok(Employee::new(
            self.first_name.trim(),
            self.last_name.trim(),
            self.email.trim(),
            self.phone.trim(),
            self.address.trim(),
            self.designation.trim(),
            salary,
        ))
    }
}
