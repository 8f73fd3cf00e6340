//! CLI module for recordhub
//!
//! Provides command-line interface for:
//! - serve: Boot the store and serve the HTTP API
//! - check: Validate a field set offline

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ResourceKind};
pub use commands::{check, check_value, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
