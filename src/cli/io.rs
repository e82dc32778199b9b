//! JSON output for CLI commands
//!
//! Commands print a single pretty JSON document to stdout.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::json;

use super::errors::{CliError, CliResult};

/// Write a JSON value to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json_to(&mut handle, value)
}

pub(super) fn write_json_to<W: Write, T: Serialize>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write an error document to stderr
pub fn write_error(err: &CliError) {
    let body = json!({
        "error": {
            "code": err.code_str(),
            "message": err.message(),
        }
    });
    eprintln!("{}", body);
}
