//! Exporter settings sourced from the environment or a host config file.
use crate::color::{ColorPair, ColorPolicy};
use crate::error::ConfigError;
use crate::severity::CanonicalSeverity;
use opentelemetry::otel_warn;
use std::collections::HashMap;

/// Timestamp format (chrono strftime pattern). Empty disables timestamps.
pub const OTEL_SIMPLE_CONSOLE_TIMESTAMP_FORMAT: &str = "OTEL_SIMPLE_CONSOLE_TIMESTAMP_FORMAT";
/// `true` renders timestamps in UTC, `false` in local time.
pub const OTEL_SIMPLE_CONSOLE_USE_UTC_TIMESTAMP: &str = "OTEL_SIMPLE_CONSOLE_USE_UTC_TIMESTAMP";

/// Exporter settings as bound from host configuration.
///
/// Every field is optional; unset fields fall back to the environment and
/// then to defaults when the exporter is built.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ExporterConfig {
    /// strftime pattern prefixed to each record.
    pub timestamp_format: Option<String>,
    /// Render timestamps in UTC.
    pub use_utc_timestamp: Option<bool>,
    /// Full severity color table. Must name every canonical severity.
    pub colors: Option<HashMap<CanonicalSeverity, ColorPair>>,
}

impl ExporterConfig {
    pub(crate) fn color_policy(&self) -> Result<Option<ColorPolicy>, ConfigError> {
        self.colors
            .as_ref()
            .map(|colors| ColorPolicy::from_entries(colors.iter().map(|(s, p)| (*s, *p))))
            .transpose()
    }
}

/// Explicit value, else the environment variable, else no timestamp.
pub(crate) fn resolve_timestamp_format(provided: Option<String>) -> Option<String> {
    provided
        .or_else(|| std::env::var(OTEL_SIMPLE_CONSOLE_TIMESTAMP_FORMAT).ok())
        .filter(|format| !format.is_empty())
}

/// Explicit value, else the environment variable, else local time.
pub(crate) fn resolve_use_utc_timestamp(provided: Option<bool>) -> bool {
    if let Some(utc) = provided {
        return utc;
    }
    match std::env::var(OTEL_SIMPLE_CONSOLE_USE_UTC_TIMESTAMP) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" | "" => false,
            _ => {
                otel_warn!(
                    name: "SimpleConsoleExporter.InvalidEnvValue",
                    variable = OTEL_SIMPLE_CONSOLE_USE_UTC_TIMESTAMP,
                    value = value.clone()
                );
                false
            }
        },
        Err(_) => false,
    }
}
