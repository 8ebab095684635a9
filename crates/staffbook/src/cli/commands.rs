//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::form::Field;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Employee ID
    #[arg(allow_negative_numbers = true)]
    pub id: i64,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Form input shared by `add` and `edit`.
///
/// Values are taken as text so the form can report every problem at once.
#[derive(Debug, Default, Args)]
pub struct EmployeeFields {
    /// First name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Postal address
    #[arg(long)]
    pub address: Option<String>,

    /// Job title
    #[arg(long)]
    pub designation: Option<String>,

    /// Salary (decimal number)
    #[arg(long, allow_hyphen_values = true)]
    pub salary: Option<String>,
}

impl EmployeeFields {
    /// The fields given on the command line, in form order.
    #[must_use]
    pub fn provided(&self) -> Vec<(Field, &str)> {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.value(field).map(|value| (field, value)))
            .collect()
    }

    fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::FirstName => self.first_name.as_deref(),
            Field::LastName => self.last_name.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Phone => self.phone.as_deref(),
            Field::Address => self.address.as_deref(),
            Field::Designation => self.designation.as_deref(),
            Field::Salary => self.salary.as_deref(),
        }
    }
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Field values for the new employee
    #[command(flatten)]
    pub fields: EmployeeFields,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Employee ID
    #[arg(allow_negative_numbers = true)]
    pub id: i64,

    /// Fields to replace; the rest keep their stored values
    #[command(flatten)]
    pub fields: EmployeeFields,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Employee ID
    #[arg(allow_negative_numbers = true)]
    pub id: i64,

    /// Skip confirmation and undo prompts
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provided_fields_in_form_order() {
        let fields = EmployeeFields {
            salary: Some("1000".to_string()),
            first_name: Some("Ada".to_string()),
            ..EmployeeFields::default()
        };

        assert_eq!(
            fields.provided(),
            vec![(Field::FirstName, "Ada"), (Field::Salary, "1000")]
        );
    }

    #[test]
    fn test_provided_fields_empty() {
        assert!(EmployeeFields::default().provided().is_empty());
    }

    #[test]
    fn test_provided_keeps_blank_values() {
        let fields = EmployeeFields {
            address: Some(String::new()),
            ..EmployeeFields::default()
        };
        assert_eq!(fields.provided(), vec![(Field::Address, "")]);
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
