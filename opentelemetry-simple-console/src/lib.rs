//! Render OpenTelemetry log records to a human-readable console transcript.
//!
//! Every record becomes a header line with a colored severity tag, followed
//! by the message and any exception transcript, indented by six spaces:
//!
//! ```text
//! info: App.Worker[0]
//!       Worker running at 10:00:00
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use opentelemetry::logs::{LogRecord, Logger, LoggerProvider, Severity};
//! use opentelemetry_sdk::logs::SdkLoggerProvider;
//! use opentelemetry_simple_console::SimpleConsoleExporter;
//!
//! let exporter = SimpleConsoleExporter::builder()
//!     .with_timestamp_format("%Y-%m-%d %H:%M:%S ")
//!     .build()
//!     .expect("valid exporter configuration");
//! let provider = SdkLoggerProvider::builder()
//!     .with_simple_exporter(exporter)
//!     .build();
//!
//! let logger = provider.logger("App.Worker");
//! let mut record = logger.create_log_record();
//! record.set_severity_number(Severity::Info);
//! record.set_body("Worker running".into());
//! logger.emit(record);
//!
//! // 2024-05-01 10:00:00 info: App.Worker[0]
//! //       Worker running
//! ```
#![warn(missing_debug_implementations, missing_docs)]

mod color;
mod config;
mod error;
mod exporter;
mod record;
mod render;
mod severity;
mod sink;

pub use color::{Color, ColorPair, ColorPolicy};
pub use config::{
    ExporterConfig, OTEL_SIMPLE_CONSOLE_TIMESTAMP_FORMAT, OTEL_SIMPLE_CONSOLE_USE_UTC_TIMESTAMP,
};
pub use error::{ConfigError, ExportError, ExportResult, RenderError, RenderResult};
pub use exporter::{SimpleConsoleExporter, SimpleConsoleExporterBuilder};
pub use record::{LogRecordView, SdkRecordView, EVENT_ID_ATTRIBUTE};
pub use render::{LineRenderer, RenderConfig, MESSAGE_PADDING};
pub use severity::{classify, CanonicalSeverity, LogLevel, ParseLogLevelError, SeverityRepr};
pub use sink::{AnsiColors, AnsiSink, ConsoleSink};
