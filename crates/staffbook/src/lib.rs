//! `staffbook` - A local employee directory
//!
//! This library provides durable storage for employee records, a view-state
//! controller that keeps observers current, and headless add, edit and list
//! screens with form validation.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod controller;
pub mod employee;
pub mod error;
pub mod form;
pub mod logging;
pub mod repository;
pub mod screens;
pub mod storage;

pub use config::Config;
pub use controller::EmployeeController;
pub use employee::Employee;
pub use error::{Error, Result};
pub use form::{EmployeeForm, Field, FieldError, FormErrors, Validator};
pub use logging::init_logging;
pub use repository::{EmployeeRepository, SqliteRepository};
pub use storage::{Storage, StorageStats};
