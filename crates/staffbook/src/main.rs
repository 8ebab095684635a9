//! `staffbook` - CLI for the staffbook employee directory
//!
//! This binary is the composition root: it loads configuration, opens the
//! database once and drives the screens from command-line input.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use staffbook::cli::{
    AddCommand, Cli, Command, ConfigCommand, DeleteCommand, EditCommand, ListCommand, ShowCommand,
};
use staffbook::screens::{
    notice, AddScreen, EditScreen, EditState, ListContent, ListScreen, SaveOutcome, UndoDelete,
};
use staffbook::{
    init_logging, Config, Employee, EmployeeController, SqliteRepository, Storage, Validator,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let loaded = Config::load_from(cli.config.clone());
    let format = loaded
        .as_ref()
        .map(|config| config.logging.format)
        .unwrap_or_default();
    init_logging(cli.verbosity(), format);

    match cli.command {
        Command::Config(cmd) => handle_config(cli.config, loaded, cmd),
        Command::Status(cmd) => handle_status(&loaded?, cmd.json),
        Command::List(cmd) => App::open(&loaded?)?.list(cmd).await,
        Command::Show(cmd) => App::open(&loaded?)?.show(cmd).await,
        Command::Add(cmd) => App::open(&loaded?)?.add(cmd).await,
        Command::Edit(cmd) => App::open(&loaded?)?.edit(cmd).await,
        Command::Delete(cmd) => App::open(&loaded?)?.delete(cmd).await,
    }
}

/// Everything the employee commands share.
#[derive(Debug)]
struct App {
    controller: Arc<EmployeeController>,
    validator: Validator,
}

impl App {
    fn open(config: &Config) -> Result<Self> {
        let validator = config.validator()?;
        let path = config.database_path();
        let storage = Storage::open(&path)
            .with_context(|| format!("failed to open employee database at {}", path.display()))?;
        let repository = Arc::new(SqliteRepository::new(storage));

        Ok(Self {
            controller: Arc::new(EmployeeController::new(repository)),
            validator,
        })
    }

    fn edit_screen(&self, id: i64) -> EditScreen {
        EditScreen::open(Arc::clone(&self.controller), self.validator.clone(), Some(id))
    }

    /// Print the controller error, if any, and fail.
    fn report_error(&self) -> ExitCode {
        if let Some(message) = self.controller.current_error() {
            eprintln!("Error: {message}");
        }
        ExitCode::FAILURE
    }

    /// Print why the edit screen closed on its own and fail.
    fn report_closed(&self, screen: &mut EditScreen) -> ExitCode {
        if let Some(message) = screen.take_notice() {
            eprintln!("{message}");
        }
        self.report_error()
    }

    async fn list(&self, cmd: ListCommand) -> Result<ExitCode> {
        let screen = ListScreen::new(&self.controller);
        self.controller.wait_idle().await;
        if self.controller.current_error().is_some() {
            return Ok(self.report_error());
        }

        if cmd.json {
            let employees = self.controller.employees().borrow().clone();
            println!("{}", serde_json::to_string_pretty(&employees)?);
            return Ok(ExitCode::SUCCESS);
        }

        match screen.view().content {
            ListContent::Empty => println!("No employees found. Add one with `staffbook add`."),
            ListContent::Populated(rows) => {
                println!("{:>5}  {:<3} {:<32} DESIGNATION", "ID", "", "NAME");
                for row in rows {
                    let id = row.id.map(|id| id.to_string()).unwrap_or_default();
                    println!(
                        "{id:>5}  {:<3} {:<32} {}",
                        row.initials, row.name, row.designation
                    );
                }
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    async fn show(&self, cmd: ShowCommand) -> Result<ExitCode> {
        let mut screen = self.edit_screen(cmd.id);
        if screen.load().await == EditState::Closed {
            return Ok(self.report_closed(&mut screen));
        }
        let Some(employee) = screen.employee() else {
            return Ok(ExitCode::FAILURE);
        };

        if cmd.json {
            println!("{}", serde_json::to_string_pretty(employee)?);
        } else {
            print_employee(employee);
        }
        Ok(ExitCode::SUCCESS)
    }

    async fn add(&self, cmd: AddCommand) -> Result<ExitCode> {
        let mut screen = AddScreen::new(Arc::clone(&self.controller), self.validator.clone());
        for (field, value) in cmd.fields.provided() {
            screen.set_field(field, value);
        }

        match finish_save(screen.save()).await? {
            Some((id, message)) => {
                println!("{message} (ID {id})");
                Ok(ExitCode::SUCCESS)
            }
            None => Ok(self.report_error()),
        }
    }

    async fn edit(&self, cmd: EditCommand) -> Result<ExitCode> {
        let mut screen = self.edit_screen(cmd.id);
        if screen.load().await == EditState::Closed {
            return Ok(self.report_closed(&mut screen));
        }
        for (field, value) in cmd.fields.provided() {
            screen.set_field(field, value);
        }

        match finish_save(screen.save()).await? {
            Some((true, message)) => {
                println!("{message}");
                Ok(ExitCode::SUCCESS)
            }
            // Deleted between load and save.
            Some((false, _)) => {
                eprintln!("{}", notice::EMPLOYEE_NOT_FOUND);
                Ok(ExitCode::FAILURE)
            }
            None => Ok(self.report_error()),
        }
    }

    async fn delete(&self, cmd: DeleteCommand) -> Result<ExitCode> {
        let mut screen = self.edit_screen(cmd.id);
        if screen.load().await == EditState::Closed {
            return Ok(self.report_closed(&mut screen));
        }
        let name = screen.employee().map(Employee::full_name).unwrap_or_default();
        let mut input = BufReader::new(tokio::io::stdin());

        screen.request_delete();
        if !cmd.yes && !confirm(&mut input, &format!("Delete {name}?")).await? {
            screen.cancel_delete();
            println!("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }

        let Some(deleted) = screen.confirm_delete() else {
            return Ok(ExitCode::FAILURE);
        };
        if deleted.pending.await?.is_none() {
            return Ok(self.report_error());
        }
        println!("{}", deleted.notice);

        if cmd.yes || !io::stdin().is_terminal() {
            debug!("Undo offer skipped");
            return Ok(ExitCode::SUCCESS);
        }
        if confirm(&mut input, &undo_prompt(&deleted.undo)).await? {
            let (pending, message) = deleted.undo.undo();
            match pending.await? {
                Some(id) => println!("{message} (new ID {id})"),
                None => return Ok(self.report_error()),
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

/// Print inline errors or wait for the write to land.
///
/// Returns `None` when the save was rejected or failed.
async fn finish_save<T>(outcome: SaveOutcome<T>) -> Result<Option<(T, &'static str)>> {
    match outcome {
        SaveOutcome::Invalid(errors) => {
            for (field, error) in &errors {
                eprintln!("{field}: {error}");
            }
            Ok(None)
        }
        SaveOutcome::Saved { pending, notice } => {
            Ok(pending.await?.map(|value| (value, notice)))
        }
        SaveOutcome::Ignored => Ok(None),
    }
}

/// Question offering to take back a delete, with the local time it happened.
fn undo_prompt(undo: &UndoDelete) -> String {
    let deleted_at = undo.deleted_at().with_timezone(&Local);
    format!(
        "Undo delete of {} at {}?",
        undo.employee().full_name(),
        deleted_at.format("%H:%M:%S")
    )
}

fn print_employee(employee: &Employee) {
    if let Some(id) = employee.id {
        println!("ID:           {id}");
    }
    println!("Name:         {}", employee.full_name());
    println!("Email:        {}", employee.email);
    println!("Phone:        {}", employee.phone_number);
    println!("Address:      {}", employee.address);
    println!("Designation:  {}", employee.designation);
    println!("Salary:       {:.2}", employee.salary);
}

/// Ask a yes/no question. Anything but "y" or "yes" declines.
///
/// Callers asking several questions pass the same reader so buffered input
/// carries over between prompts.
async fn confirm<R>(input: &mut R, prompt: &str) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer).await?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn handle_status(config: &Config, json: bool) -> Result<ExitCode> {
    let path = config.database_path();
    let storage = Storage::open(&path)
        .with_context(|| format!("failed to open employee database at {}", path.display()))?;
    let stats = storage.stats()?;

    if json {
        let status = serde_json::json!({
            "database_path": path,
            "schema_version": stats.schema_version,
            "total_employees": stats.total_employees,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("staffbook status");
        println!("----------------");
        println!("Database:       {}", path.display());
        println!("Schema version: {}", stats.schema_version);
        println!("Employees:      {}", stats.total_employees);
        println!("Size:           {} bytes", stats.db_size_bytes);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(
    config_path: Option<PathBuf>,
    loaded: staffbook::Result<Config>,
    cmd: ConfigCommand,
) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = loaded?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Validation]");
                println!("  Email pattern:  {}", config.validation.email_pattern);
                println!("  Phone pattern:  {}", config.validation.phone_pattern);
                println!();
                println!("[Logging]");
                println!("  Format:         {:?}", config.logging.format);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            if let Err(e) = Config::load_from(Some(path)) {
                eprintln!("Configuration error: {e}");
                return Ok(ExitCode::FAILURE);
            }
            println!("Configuration is valid.");
        }
    }
    Ok(ExitCode::SUCCESS)
}
