//! run with `$ cargo run --example worker`
//!
//! Set `OTEL_SIMPLE_CONSOLE_TIMESTAMP_FORMAT="%H:%M:%S "` to prefix every
//! record with the local time.
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_simple_console::SimpleConsoleExporter;
use std::error::Error;
use std::fs::File;
use tracing_subscriber::prelude::*;

fn init_logs() -> Result<SdkLoggerProvider, Box<dyn Error>> {
    let exporter = SimpleConsoleExporter::builder().build()?;
    Ok(SdkLoggerProvider::builder()
        .with_simple_exporter(exporter)
        .build())
}

fn load_settings(path: &str) -> std::io::Result<File> {
    File::open(path)
}

fn main() -> Result<(), Box<dyn Error>> {
    let provider = init_logs()?;
    tracing_subscriber::registry()
        .with(OpenTelemetryTracingBridge::new(&provider))
        .init();

    tracing::trace!(target: "Examples.Worker", "This is a trace message");
    tracing::debug!(target: "Examples.Worker", "This is a debug message");
    tracing::info!(target: "Examples.Worker", "This is an info message");
    tracing::warn!(target: "Examples.Worker", "This is a warning message");
    tracing::error!(target: "Examples.Worker", "This is an error message");

    tracing::info!(
        target: "Examples.Worker",
        user_id = 42,
        action = "Login",
        "User performed an action"
    );

    if let Err(err) = load_settings("/nonexistent/settings.toml") {
        tracing::error!(
            target: "Examples.Worker",
            {
                event.id = 1001,
                exception.message = %err,
                exception.stacktrace = "at load_settings\nat main"
            },
            "Could not load settings"
        );
    }

    provider.shutdown()?;
    Ok(())
}
