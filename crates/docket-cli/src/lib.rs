//! Docket CLI library.
//!
//! This library provides the core functionality for the Docket command-line interface,
//! including case file access, configuration, command execution, and output formatting.

pub mod case_file;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use case_file::CaseFile;
pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
