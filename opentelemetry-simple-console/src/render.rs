//! Rendering of a single record onto a [`ConsoleSink`].
//!
//! A record becomes a header line, a message line and zero or more
//! exception lines:
//!
//! ```text
//! 2024-05-01 10:00:00 warn: App.Worker[12]
//!       disk almost full
//!       IoError: quota exceeded
//!       at write
//! ```
//!
//! Only the severity tag is colored. The sink colors in effect before the
//! tag are restored right after it, whether or not the tag was written.
use crate::color::{ColorPair, ColorPolicy};
use crate::error::{ConfigError, RenderError, RenderResult};
use crate::record::LogRecordView;
use crate::severity::{classify, CanonicalSeverity};
use crate::sink::ConsoleSink;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use opentelemetry::otel_debug;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

/// Indentation of message and exception lines.
pub const MESSAGE_PADDING: &str = "      ";

/// Immutable rendering settings.
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    timestamp_format: Option<String>,
    use_utc_timestamp: bool,
    color_policy: ColorPolicy,
}

impl RenderConfig {
    /// Creates a configuration, validating the timestamp format.
    ///
    /// `timestamp_format` is a chrono strftime pattern; `None` or an empty
    /// string turns timestamps off.
    pub fn new(
        timestamp_format: Option<String>,
        use_utc_timestamp: bool,
        color_policy: ColorPolicy,
    ) -> Result<Self, ConfigError> {
        let timestamp_format = timestamp_format.filter(|format| !format.is_empty());
        if let Some(format) = &timestamp_format {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(ConfigError::InvalidTimestampFormat(format.clone()));
            }
        }
        Ok(RenderConfig {
            timestamp_format,
            use_utc_timestamp,
            color_policy,
        })
    }

    /// The strftime pattern used for timestamps, if any.
    pub fn timestamp_format(&self) -> Option<&str> {
        self.timestamp_format.as_deref()
    }

    /// Whether timestamps are rendered in UTC rather than local time.
    pub fn use_utc_timestamp(&self) -> bool {
        self.use_utc_timestamp
    }

    /// Severity colors.
    pub fn color_policy(&self) -> &ColorPolicy {
        &self.color_policy
    }
}

/// Renders records according to a [`RenderConfig`].
#[derive(Debug, Clone, Default)]
pub struct LineRenderer {
    config: RenderConfig,
}

impl LineRenderer {
    /// Creates a renderer.
    pub fn new(config: RenderConfig) -> Self {
        LineRenderer { config }
    }

    /// The configuration this renderer was built with.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Writes `record` to `sink`.
    ///
    /// A failing sink call aborts the record; lines already written stay.
    pub fn render<S, R>(&self, record: &R, sink: &mut S) -> RenderResult
    where
        S: ConsoleSink + ?Sized,
        R: LogRecordView + ?Sized,
    {
        if let Some(format) = self.config.timestamp_format() {
            let instant = record.timestamp().unwrap_or_else(SystemTime::now);
            let prefix = format_timestamp(instant, format, self.config.use_utc_timestamp)?;
            sink.write_text(&prefix)?;
        }

        let repr = record.severity();
        let severity = classify(repr);
        if severity == CanonicalSeverity::Unknown {
            otel_debug!(
                name: "SimpleConsoleExporter.UnknownSeverity",
                severity = format!("{:?}", repr)
            );
        }
        write_severity(
            sink,
            severity,
            self.config.color_policy.colors_for(severity),
        )?;

        sink.write_line(&format!(
            ": {}[{}]",
            record.category_name(),
            record.event_id()
        ))?;

        sink.write_line(&format!("{MESSAGE_PADDING}{}", message_text(record)))?;

        if let Some(exception) = record.exception() {
            for line in transcript_lines(&exception) {
                sink.write_line(&format!("{MESSAGE_PADDING}{line}"))?;
            }
        }

        Ok(())
    }
}

/// Sets the severity colors, writes the tag and restores the colors that
/// were current before. Restoration is attempted even when an earlier
/// step failed; the first error wins.
fn write_severity<S>(sink: &mut S, severity: CanonicalSeverity, colors: ColorPair) -> io::Result<()>
where
    S: ConsoleSink + ?Sized,
{
    let prior = ColorPair::new(sink.foreground_color(), sink.background_color());

    let written = sink
        .set_foreground_color(colors.foreground)
        .and_then(|_| sink.set_background_color(colors.background))
        .and_then(|_| sink.write_text(severity.tag()));

    let restored = sink
        .set_foreground_color(prior.foreground)
        .and_then(|_| sink.set_background_color(prior.background));

    written.and(restored)
}

fn message_text<R: LogRecordView + ?Sized>(record: &R) -> Cow<'_, str> {
    record
        .formatted_message()
        .filter(|message| !message.is_empty())
        .or_else(|| record.body())
        .unwrap_or_default()
}

/// Splits an exception transcript on `\n`, `\r\n` or `\r`, dropping empty
/// fragments.
pub(crate) fn transcript_lines(transcript: &str) -> impl Iterator<Item = &str> {
    transcript
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
}

fn format_timestamp(instant: SystemTime, format: &str, utc: bool) -> Result<String, RenderError> {
    let utc_time = match utc_datetime(instant) {
        Some(time) => time,
        None => {
            otel_debug!(
                name: "SimpleConsoleExporter.TimestampOutOfRange",
                timestamp = format!("{:?}", instant)
            );
            Utc::now()
        }
    };

    let mut prefix = String::new();
    let result = if utc {
        write!(prefix, "{}", utc_time.format(format))
    } else {
        write!(prefix, "{}", utc_time.with_timezone(&Local).format(format))
    };
    result.map_err(|_| RenderError::Timestamp(format.to_string()))?;
    Ok(prefix)
}

/// Converts without panicking; `None` when the instant is outside the
/// range chrono can represent.
fn utc_datetime(instant: SystemTime) -> Option<DateTime<Utc>> {
    match instant.duration_since(UNIX_EPOCH) {
        Ok(since) => DateTime::from_timestamp(
            i64::try_from(since.as_secs()).ok()?,
            since.subsec_nanos(),
        ),
        Err(before) => {
            let before = before.duration();
            let secs = i64::try_from(before.as_secs()).ok()?;
            match before.subsec_nanos() {
                0 => DateTime::from_timestamp(secs.checked_neg()?, 0),
                nanos => DateTime::from_timestamp(
                    secs.checked_neg()?.checked_sub(1)?,
                    1_000_000_000 - nanos,
                ),
            }
        }
    }
}
