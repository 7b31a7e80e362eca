//! Severity classification.
//!
//! Records reach the exporter with either a discrete [`LogLevel`] or a raw
//! numeric severity code as defined by the OpenTelemetry log data model.
//! Both are folded onto the six [`CanonicalSeverity`] tags printed at the
//! start of every rendered record, with [`CanonicalSeverity::Unknown`] for
//! anything that fits neither.
use std::fmt;
use std::str::FromStr;

/// Discrete severity levels a host may attach to a record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Most verbose diagnostics.
    Trace,
    /// Debugging diagnostics.
    Debug,
    /// General informational messages.
    Information,
    /// Something unexpected that did not stop the operation.
    Warning,
    /// An operation failed.
    Error,
    /// The process or a subsystem cannot continue.
    Critical,
    /// No level was assigned.
    None,
}

/// Returned when a string does not name a known [`LogLevel`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised log level: {0:?}")]
pub struct ParseLogLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" | "trce" => Ok(LogLevel::Trace),
            "debug" | "dbug" => Ok(LogLevel::Debug),
            "info" | "information" => Ok(LogLevel::Information),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" | "fail" => Ok(LogLevel::Error),
            "critical" | "crit" | "fatal" => Ok(LogLevel::Critical),
            "none" => Ok(LogLevel::None),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

/// How a record expresses its severity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SeverityRepr {
    /// A discrete level, mapped through a fixed table.
    Level(LogLevel),
    /// A numeric severity code; `1..=24` is split into six bands of four.
    Number(i32),
}

impl From<LogLevel> for SeverityRepr {
    fn from(level: LogLevel) -> Self {
        SeverityRepr::Level(level)
    }
}

impl From<opentelemetry::logs::Severity> for SeverityRepr {
    fn from(severity: opentelemetry::logs::Severity) -> Self {
        SeverityRepr::Number(severity as i32)
    }
}

/// The canonical severity tags printed by the exporter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CanonicalSeverity {
    /// `trce`
    #[cfg_attr(feature = "serde", serde(alias = "trce"))]
    Trace,
    /// `dbug`
    #[cfg_attr(feature = "serde", serde(alias = "dbug"))]
    Debug,
    /// `info`
    Info,
    /// `warn`
    Warn,
    /// `fail`
    Fail,
    /// `crit`
    #[cfg_attr(feature = "serde", serde(alias = "crit"))]
    Critical,
    /// `unkn`
    #[cfg_attr(feature = "serde", serde(alias = "unkn"))]
    Unknown,
}

impl CanonicalSeverity {
    /// Every canonical severity, in ascending order.
    pub const ALL: [CanonicalSeverity; 7] = [
        CanonicalSeverity::Trace,
        CanonicalSeverity::Debug,
        CanonicalSeverity::Info,
        CanonicalSeverity::Warn,
        CanonicalSeverity::Fail,
        CanonicalSeverity::Critical,
        CanonicalSeverity::Unknown,
    ];

    /// The tag text written to the console.
    pub fn tag(self) -> &'static str {
        match self {
            CanonicalSeverity::Trace => "trce",
            CanonicalSeverity::Debug => "dbug",
            CanonicalSeverity::Info => "info",
            CanonicalSeverity::Warn => "warn",
            CanonicalSeverity::Fail => "fail",
            CanonicalSeverity::Critical => "crit",
            CanonicalSeverity::Unknown => "unkn",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CanonicalSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Maps a record's severity onto its canonical tag. Never fails.
pub fn classify(severity: SeverityRepr) -> CanonicalSeverity {
    match severity {
        SeverityRepr::Level(level) => match level {
            LogLevel::Trace => CanonicalSeverity::Trace,
            LogLevel::Debug => CanonicalSeverity::Debug,
            LogLevel::Information => CanonicalSeverity::Info,
            LogLevel::Warning => CanonicalSeverity::Warn,
            LogLevel::Error => CanonicalSeverity::Fail,
            LogLevel::Critical => CanonicalSeverity::Critical,
            LogLevel::None => CanonicalSeverity::Unknown,
        },
        SeverityRepr::Number(n) => match n {
            1..=4 => CanonicalSeverity::Trace,
            5..=8 => CanonicalSeverity::Debug,
            9..=12 => CanonicalSeverity::Info,
            13..=16 => CanonicalSeverity::Warn,
            17..=20 => CanonicalSeverity::Fail,
            21..=24 => CanonicalSeverity::Critical,
            _ => CanonicalSeverity::Unknown,
        },
    }
}
