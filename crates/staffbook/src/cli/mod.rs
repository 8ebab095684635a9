//! Command-line interface for staffbook.
//!
//! This module provides the CLI structure for the `staffbook` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, EmployeeFields, ListCommand,
    ShowCommand, StatusCommand,
};

use crate::logging::Verbosity;

/// staffbook - Keep track of your employees
///
/// A local employee directory backed by a single `SQLite` file, with
/// validated add and edit forms.
#[derive(Debug, Parser)]
#[command(name = "staffbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all employees
    List(ListCommand),

    /// Show one employee
    Show(ShowCommand),

    /// Add an employee
    Add(AddCommand),

    /// Change an employee's details
    Edit(EditCommand),

    /// Delete an employee
    Delete(DeleteCommand),

    /// Show database status
    Status(StatusCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use crate::form::Field;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "staffbook");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["staffbook", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["staffbook", "-v", "list"]).verbosity(), Verbosity::Info);
        assert_eq!(
            parse(&["staffbook", "list", "-vv"]).verbosity(),
            Verbosity::Verbose
        );
        assert_eq!(parse(&["staffbook", "-q", "list"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_parse_list() {
        let cli = parse(&["staffbook", "list", "--json"]);
        assert!(matches!(cli.command, Command::List(ListCommand { json: true })));
    }

    #[test]
    fn test_parse_show() {
        let cli = parse(&["staffbook", "show", "7"]);
        assert!(matches!(
            cli.command,
            Command::Show(ShowCommand { id: 7, json: false })
        ));
    }

    #[test]
    fn test_parse_show_negative_id() {
        let cli = parse(&["staffbook", "show", "-3"]);
        assert!(matches!(cli.command, Command::Show(ShowCommand { id: -3, .. })));
    }

    #[test]
    fn test_parse_add() {
        let cli = parse(&[
            "staffbook",
            "add",
            "--first-name",
            "Ada",
            "--last-name",
            "Lovelace",
            "--email",
            "ada@example.com",
            "--phone",
            "+15551234567",
            "--address",
            "1 Infinite Loop",
            "--designation",
            "Engineer",
            "--salary",
            "95000",
        ]);
        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(add.fields.provided().len(), 7);
        assert_eq!(add.fields.salary.as_deref(), Some("95000"));
    }

    #[test]
    fn test_parse_add_without_fields() {
        // Missing fields are reported by the form, not by the parser.
        let cli = parse(&["staffbook", "add"]);
        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert!(add.fields.provided().is_empty());
    }

    #[test]
    fn test_parse_edit() {
        let cli = parse(&["staffbook", "edit", "3", "--designation", "CTO"]);
        let Command::Edit(edit) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(edit.id, 3);
        assert_eq!(edit.fields.provided(), vec![(Field::Designation, "CTO")]);
    }

    #[test]
    fn test_parse_edit_requires_id() {
        assert!(Cli::try_parse_from(["staffbook", "edit"]).is_err());
    }

    #[test]
    fn test_parse_delete() {
        let cli = parse(&["staffbook", "delete", "12", "--yes"]);
        assert!(matches!(
            cli.command,
            Command::Delete(DeleteCommand { id: 12, yes: true })
        ));
    }

    #[test]
    fn test_parse_status() {
        let cli = parse(&["staffbook", "status"]);
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_parse_config_subcommands() {
        assert!(matches!(
            parse(&["staffbook", "config", "show", "--json"]).command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
        assert!(matches!(
            parse(&["staffbook", "config", "path"]).command,
            Command::Config(ConfigCommand::Path)
        ));
        let cli = parse(&["staffbook", "config", "validate", "--file", "/tmp/x.toml"]);
        let Command::Config(ConfigCommand::Validate { file }) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(file, Some(PathBuf::from("/tmp/x.toml")));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["staffbook", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
