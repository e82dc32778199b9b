//! CLI command implementations

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::sync::Arc;

use crate::composition::CompositionService;
use crate::config::AppConfig;
use crate::http_server::HttpServer;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::store::InMemoryObjectStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Check { config } => check(&config),
        Command::Serve { config, port } => serve(&config, port),
    }
}

/// Write the default configuration to `config_path`.
///
/// Never overwrites an existing file.
pub fn init(config_path: &Path) -> CliResult<()> {
    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(config_path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(CliError::already_initialized(config_path.display()))
        }
        Err(e) => return Err(e.into()),
    };

    let content = serde_json::to_string_pretty(&AppConfig::default())?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;

    write_json(&serde_json::json!({
        "initialized": true,
        "config": config_path.display().to_string(),
    }))
}

/// Load, validate and print the effective configuration
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;
    write_json(&config)
}

/// Serve the HTTP API until the process is stopped
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = AppConfig::load(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    Logger::set_min_severity(config.log_level);
    let path_text = config_path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", path_text.as_str())]);

    let store = Arc::new(InMemoryObjectStore::new());
    let service = Arc::new(CompositionService::new(store, config.composition));
    let server = HttpServer::new(config.server, service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gridpress.json");

        init(&path).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.composition.column_count, 12);
        assert_eq!(config.composition.max_versions, 5);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gridpress.json");
        std::fs::write(&path, "{\"logLevel\": \"warn\"}").unwrap();

        let err = init(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::AlreadyInitialized);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\"logLevel\": \"warn\"}"
        );
    }

    #[test]
    fn test_check_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gridpress.json");
        std::fs::write(&path, r#"{"composition": {"columnCount": 0}}"#).unwrap();

        let err = check(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_check_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = check(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
