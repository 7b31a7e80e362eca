//! Errors raised while configuring or running the exporter.
use crate::severity::CanonicalSeverity;
use std::io;
use thiserror::Error;

/// Errors detected while building an exporter. An exporter is never
/// constructed when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A canonical severity has no color entry.
    #[error("color policy has no entry for severity `{0}`")]
    MisconfiguredColorPolicy(CanonicalSeverity),

    /// The timestamp format string is not a valid strftime pattern.
    #[error("invalid timestamp format {0:?}")]
    InvalidTimestampFormat(String),
}

/// Rendering of a single record was aborted.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RenderError {
    /// The sink rejected a write or a color change.
    #[error("console sink write failed: {0}")]
    Sink(#[from] io::Error),

    /// The timestamp could not be formatted with the configured pattern.
    #[error("timestamp could not be formatted with {0:?}")]
    Timestamp(String),
}

/// A batch export stopped at the record with the given position.
#[derive(Error, Debug)]
#[error("failed to render log record #{index}: {source}")]
pub struct ExportError {
    /// Position of the failing record within the batch.
    pub index: usize,
    /// Why the record could not be rendered.
    #[source]
    pub source: RenderError,
}

/// Outcome of rendering one record.
pub type RenderResult = Result<(), RenderError>;

/// Outcome of exporting one batch.
pub type ExportResult = Result<(), ExportError>;
