//! CLI module for gridpress
//!
//! Provides command-line interface for:
//! - init: Write a default config file
//! - check: Validate a config file
//! - serve: Run the HTTP API

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, init, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_json};
