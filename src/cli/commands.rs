//! CLI command implementations
//!
//! `serve` boots in a fixed order: config, logging, store, repositories,
//! HTTP server. Any failure before the server is listening is fatal.

use std::path::Path;

use serde_json::{json, Value};

use crate::api::HttpServer;
use crate::client;
use crate::config::Config;
use crate::observability::{init_logging, log_event, log_event_with_fields, Event, LogFormat};
use crate::resources::{self, ResourceDef};
use crate::schema::Mode;
use crate::storage::open_store;

use super::args::{Command, ResourceKind};
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_json};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(config.as_deref()),
        Command::Check { resource, file } => check(resource, file.as_deref()),
    }
}

/// Boot the store and serve the HTTP API until Ctrl-C.
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(err) => {
            // Logging is not configured yet; fall back to defaults to report
            let _ = init_logging("info", LogFormat::Text);
            let message = err.to_string();
            log_event_with_fields(Event::BootFailed, &[("error", message.as_str())]);
            return Err(err.into());
        }
    };

    init_logging(&config.log_level, config.log_format)
        .map_err(|e| CliError::config_error(e.to_string()))?;
    log_event(Event::BootStart);

    let port = config.http.port.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("host", config.http.host.as_str()), ("port", port.as_str())],
    );

    let location = config.store_location()?;
    let store = open_store(&location)
        .map_err(|e| CliError::boot_failed(format!("Failed to open store: {}", e)))?;
    let server = HttpServer::with_store(config.http.clone(), store)
        .map_err(|e| CliError::boot_failed(format!("Failed to prepare collections: {}", e)))?;

    let addr = server.socket_addr();
    log_event_with_fields(Event::BootComplete, &[("addr", addr.as_str())]);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Run the client pre-check and the full validator over one field set,
/// printing the outcome as an envelope.
pub fn check(kind: ResourceKind, file: Option<&Path>) -> CliResult<()> {
    let input = read_input(file)?;
    let outcome = check_value(kind, &input);
    write_json(&outcome)?;

    if outcome["success"] == Value::Bool(true) {
        Ok(())
    } else {
        Err(CliError::validation_failed(format!(
            "{} rejected",
            resource_for(kind).label
        )))
    }
}

fn resource_for(kind: ResourceKind) -> &'static ResourceDef {
    match kind {
        ResourceKind::Students => resources::students(),
        ResourceKind::Notes => resources::notes(),
    }
}

/// Outcome envelope for a field set, without touching any store.
pub fn check_value(kind: ResourceKind, input: &Value) -> Value {
    let resource = resource_for(kind);

    let body = match kind {
        ResourceKind::Students => match client::prepare_student(input) {
            Ok(body) => body,
            Err(err) => return rejected(vec![err.to_string()]),
        },
        ResourceKind::Notes => input.clone(),
    };

    match resource.validator().validate(&body, Mode::Create) {
        Ok(mut fields) => {
            let derived = resource.derived(&fields);
            fields.extend(derived);
            json!({"success": true, "data": fields})
        }
        Err(err) => rejected(err.messages()),
    }
}

fn rejected(messages: Vec<String>) -> Value {
    json!({"success": false, "message": "Validation error", "error": messages})
}
