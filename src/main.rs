//! gridpress CLI entry point
//!
//! Parses arguments, dispatches to the CLI module, and exits non-zero on failure.

use gridpress::cli;

fn main() {
    if let Err(e) = cli::run() {
        cli::write_error(&e);
        std::process::exit(1);
    }
}
