//! CLI argument definitions using clap
//!
//! Commands:
//! - gridpress init --config <path>
//! - gridpress check --config <path>
//! - gridpress serve --config <path> [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gridpress - grid page composition with drafts, publishing and version history
#[derive(Parser, Debug)]
#[command(name = "gridpress")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./gridpress.json")]
        config: PathBuf,
    },

    /// Validate a configuration file and print the effective settings
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./gridpress.json")]
        config: PathBuf,
    },

    /// Start the HTTP server over an in-memory store
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./gridpress.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
