use crate::color::ColorPolicy;
use crate::config::{resolve_timestamp_format, resolve_use_utc_timestamp, ExporterConfig};
use crate::error::{ConfigError, ExportError, ExportResult};
use crate::record::{LogRecordView, SdkRecordView};
use crate::render::{LineRenderer, RenderConfig};
use crate::sink::{AnsiSink, ConsoleSink};
use core::fmt;
use opentelemetry::{otel_debug, otel_error};
use opentelemetry_sdk::error::{OTelSdkError, OTelSdkResult};
use opentelemetry_sdk::logs::LogBatch;
use std::io::Stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// An OpenTelemetry log exporter that renders records as colorized,
/// human-readable console lines.
///
/// The sink is owned by the exporter behind a mutex. The lock is held for
/// the whole of one record, so concurrent exports never interleave lines
/// or colors of different records.
///
/// After shutdown, SDK exports are rejected with
/// [`OTelSdkError::AlreadyShutdown`].
pub struct SimpleConsoleExporter<S = AnsiSink<Stdout>> {
    renderer: LineRenderer,
    sink: Mutex<S>,
    is_shutdown: AtomicBool,
}

impl<S> fmt::Debug for SimpleConsoleExporter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleConsoleExporter")
            .field("config", self.renderer.config())
            .field("is_shutdown", &self.is_shutdown.load(Ordering::Relaxed))
            .finish()
    }
}

impl SimpleConsoleExporter {
    /// Builder writing to standard output.
    pub fn builder() -> SimpleConsoleExporterBuilder {
        SimpleConsoleExporterBuilder::default()
    }
}

impl<S: ConsoleSink> SimpleConsoleExporter<S> {
    /// Renders `batch` in order, stopping at the first record that fails.
    ///
    /// Output of the records before the failure, and any lines of the
    /// failing record already written, remain on the sink.
    pub fn export_batch<I>(&self, batch: I) -> ExportResult
    where
        I: IntoIterator,
        I::Item: LogRecordView,
    {
        for (index, record) in batch.into_iter().enumerate() {
            let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
            self.renderer
                .render(&record, &mut *sink)
                .map_err(|source| ExportError { index, source })?;
        }
        Ok(())
    }

    /// Rendering settings in effect.
    pub fn config(&self) -> &RenderConfig {
        self.renderer.config()
    }

    /// Consumes the exporter, handing back its sink.
    pub fn into_sink(self) -> S {
        self.sink.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> opentelemetry_sdk::logs::LogExporter for SimpleConsoleExporter<S>
where
    S: ConsoleSink + Send,
{
    /// Export logs to the console
    #[allow(clippy::manual_async_fn)]
    fn export(
        &self,
        batch: LogBatch<'_>,
    ) -> impl std::future::Future<Output = OTelSdkResult> + Send {
        let result = if self.is_shutdown.load(Ordering::SeqCst) {
            Err(OTelSdkError::AlreadyShutdown)
        } else {
            self.export_batch(batch.iter().map(SdkRecordView::from))
                .map_err(|err| {
                    otel_error!(
                        name: "SimpleConsoleExporter.ExportFailed",
                        error = format!("{}", err)
                    );
                    OTelSdkError::InternalFailure(err.to_string())
                })
        };
        async move { result }
    }

    fn shutdown_with_timeout(&self, _timeout: Duration) -> OTelSdkResult {
        self.is_shutdown.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Builder for [`SimpleConsoleExporter`].
///
/// Values not set explicitly are read from
/// [`OTEL_SIMPLE_CONSOLE_TIMESTAMP_FORMAT`](crate::OTEL_SIMPLE_CONSOLE_TIMESTAMP_FORMAT)
/// and
/// [`OTEL_SIMPLE_CONSOLE_USE_UTC_TIMESTAMP`](crate::OTEL_SIMPLE_CONSOLE_USE_UTC_TIMESTAMP).
#[derive(Debug)]
pub struct SimpleConsoleExporterBuilder<S = AnsiSink<Stdout>> {
    sink: S,
    timestamp_format: Option<String>,
    use_utc_timestamp: Option<bool>,
    color_policy: ColorPolicy,
}

impl Default for SimpleConsoleExporterBuilder {
    fn default() -> Self {
        SimpleConsoleExporterBuilder {
            sink: AnsiSink::stdout(),
            timestamp_format: None,
            use_utc_timestamp: None,
            color_policy: ColorPolicy::default(),
        }
    }
}

impl<S: ConsoleSink> SimpleConsoleExporterBuilder<S> {
    /// Renders onto `sink` instead of standard output.
    pub fn with_sink<T: ConsoleSink>(self, sink: T) -> SimpleConsoleExporterBuilder<T> {
        SimpleConsoleExporterBuilder {
            sink,
            timestamp_format: self.timestamp_format,
            use_utc_timestamp: self.use_utc_timestamp,
            color_policy: self.color_policy,
        }
    }

    /// Prefixes every record with a timestamp in this strftime format.
    /// An empty format turns timestamps off.
    pub fn with_timestamp_format<T: Into<String>>(mut self, format: T) -> Self {
        self.timestamp_format = Some(format.into());
        self
    }

    /// Chooses UTC (`true`) or local time (`false`) for timestamps.
    pub fn with_utc_timestamp(mut self, utc: bool) -> Self {
        self.use_utc_timestamp = Some(utc);
        self
    }

    /// Replaces the default severity colors.
    pub fn with_color_policy(mut self, policy: ColorPolicy) -> Self {
        self.color_policy = policy;
        self
    }

    /// Applies every setting present in `config`.
    pub fn with_config(mut self, config: ExporterConfig) -> Result<Self, ConfigError> {
        if let Some(policy) = config.color_policy()? {
            self.color_policy = policy;
        }
        if let Some(format) = config.timestamp_format {
            self.timestamp_format = Some(format);
        }
        if let Some(utc) = config.use_utc_timestamp {
            self.use_utc_timestamp = Some(utc);
        }
        Ok(self)
    }

    /// Validates the settings and creates the exporter.
    pub fn build(self) -> Result<SimpleConsoleExporter<S>, ConfigError> {
        let config = RenderConfig::new(
            resolve_timestamp_format(self.timestamp_format),
            resolve_use_utc_timestamp(self.use_utc_timestamp),
            self.color_policy,
        )?;
        otel_debug!(
            name: "SimpleConsoleExporter.Build",
            timestamp_format = format!("{:?}", config.timestamp_format()),
            use_utc_timestamp = config.use_utc_timestamp()
        );
        Ok(SimpleConsoleExporter {
            renderer: LineRenderer::new(config),
            sink: Mutex::new(self.sink),
            is_shutdown: AtomicBool::new(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, ColorPair};
    use crate::severity::{CanonicalSeverity, LogLevel, SeverityRepr};
    use crate::sink::AnsiColors;
    use crate::{OTEL_SIMPLE_CONSOLE_TIMESTAMP_FORMAT, OTEL_SIMPLE_CONSOLE_USE_UTC_TIMESTAMP};
    use opentelemetry::logs::{LogRecord, Logger, LoggerProvider, Severity};
    use opentelemetry::InstrumentationScope;
    use opentelemetry_sdk::logs::{LogExporter, SdkLoggerProvider};
    use std::borrow::Cow;
    use std::io::{self, Write};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Line(&'static str, LogLevel);

    impl LogRecordView for Line {
        fn severity(&self) -> SeverityRepr {
            SeverityRepr::Level(self.1)
        }
        fn category_name(&self) -> &str {
            "Tests"
        }
        fn event_id(&self) -> i64 {
            1
        }
        fn formatted_message(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }
    }

    fn plain_exporter() -> SimpleConsoleExporter<AnsiSink<Vec<u8>>> {
        temp_env::with_vars_unset(
            [
                OTEL_SIMPLE_CONSOLE_TIMESTAMP_FORMAT,
                OTEL_SIMPLE_CONSOLE_USE_UTC_TIMESTAMP,
            ],
            || {
                SimpleConsoleExporter::builder()
                    .with_sink(AnsiSink::new(Vec::new()).with_colors(AnsiColors::Disabled))
                    .build()
                    .unwrap()
            },
        )
    }

    #[test]
    fn exports_batch_in_order() {
        let exporter = plain_exporter();
        let batch = [
            Line("first", LogLevel::Information),
            Line("second", LogLevel::Warning),
            Line("third", LogLevel::Error),
        ];
        exporter.export_batch(&batch).unwrap();

        let text = String::from_utf8(exporter.into_sink().into_inner()).unwrap();
        assert_eq!(
            text,
            "info: Tests[1]\n      first\n\
             warn: Tests[1]\n      second\n\
             fail: Tests[1]\n      third\n"
        );
    }

    #[test]
    fn empty_batch_succeeds() {
        let exporter = plain_exporter();
        exporter.export_batch(Vec::<Line>::new()).unwrap();
        assert!(exporter.into_sink().into_inner().is_empty());
    }

    #[test]
    fn invalid_env_timestamp_format_fails_build() {
        temp_env::with_var(OTEL_SIMPLE_CONSOLE_TIMESTAMP_FORMAT, Some("%Q"), || {
            let err = SimpleConsoleExporter::builder()
                .with_sink(AnsiSink::new(Vec::new()))
                .build()
                .unwrap_err();
            assert_eq!(err, ConfigError::InvalidTimestampFormat("%Q".to_string()));
        });
    }

    #[test]
    fn builder_values_override_env() {
        temp_env::with_vars(
            [
                (OTEL_SIMPLE_CONSOLE_TIMESTAMP_FORMAT, Some("%H ")),
                (OTEL_SIMPLE_CONSOLE_USE_UTC_TIMESTAMP, Some("false")),
            ],
            || {
                let exporter = SimpleConsoleExporter::builder()
                    .with_sink(AnsiSink::new(Vec::new()))
                    .with_timestamp_format("%M ")
                    .with_utc_timestamp(true)
                    .build()
                    .unwrap();
                assert_eq!(exporter.config().timestamp_format(), Some("%M "));
                assert!(exporter.config().use_utc_timestamp());

                let from_env = SimpleConsoleExporter::builder()
                    .with_sink(AnsiSink::new(Vec::new()))
                    .build()
                    .unwrap();
                assert_eq!(from_env.config().timestamp_format(), Some("%H "));
                assert!(!from_env.config().use_utc_timestamp());
            },
        );
    }

    #[test]
    fn with_config_applies_colors() {
        let colors = CanonicalSeverity::ALL
            .into_iter()
            .map(|severity| (severity, ColorPair::new(Color::Cyan, Color::Default)))
            .collect();
        let config = ExporterConfig {
            colors: Some(colors),
            use_utc_timestamp: Some(true),
            ..Default::default()
        };
        let exporter = temp_env::with_var_unset(OTEL_SIMPLE_CONSOLE_TIMESTAMP_FORMAT, || {
            SimpleConsoleExporter::builder()
                .with_sink(AnsiSink::new(Vec::new()))
                .with_config(config)
                .unwrap()
                .build()
                .unwrap()
        });
        assert_eq!(
            exporter
                .config()
                .color_policy()
                .colors_for(CanonicalSeverity::Fail),
            ColorPair::new(Color::Cyan, Color::Default)
        );
        assert!(exporter.config().use_utc_timestamp());
    }

    #[test]
    fn debug_does_not_require_debug_sink() {
        let exporter = plain_exporter();
        assert!(format!("{exporter:?}").starts_with("SimpleConsoleExporter"));
    }

    #[test]
    fn boxed_dyn_sink() {
        let buffer = SharedBuffer::default();
        let sink: Box<dyn ConsoleSink + Send> =
            Box::new(AnsiSink::new(buffer.clone()).with_colors(AnsiColors::Disabled));
        let exporter = SimpleConsoleExporter::builder()
            .with_sink(sink)
            .with_timestamp_format("")
            .build()
            .unwrap();

        exporter
            .export_batch([Line("boxed", LogLevel::Critical)])
            .unwrap();

        assert_eq!(buffer.text(), "crit: Tests[1]\n      boxed\n");
        let sink = exporter.into_sink();
        assert_eq!(sink.foreground_color(), Color::Default);
        assert_eq!(sink.background_color(), Color::Default);
    }

    #[test]
    fn export_after_shutdown_is_rejected() {
        let buffer = SharedBuffer::default();
        let exporter = SimpleConsoleExporter::builder()
            .with_sink(AnsiSink::new(buffer.clone()).with_colors(AnsiColors::Disabled))
            .with_timestamp_format("")
            .build()
            .unwrap();

        let provider = SdkLoggerProvider::builder().build();
        let mut record = provider.logger("Tests").create_log_record();
        record.set_severity_number(Severity::Info);
        record.set_body("before shutdown".into());
        let scope = InstrumentationScope::builder("Tests").build();
        let data = [(&record, &scope)];

        let result = futures_executor::block_on(exporter.export(LogBatch::new(&data)));
        assert!(result.is_ok());
        assert_eq!(buffer.text(), "info: Tests[0]\n      before shutdown\n");

        exporter.shutdown().unwrap();
        let result = futures_executor::block_on(exporter.export(LogBatch::new(&data)));
        assert!(matches!(result, Err(OTelSdkError::AlreadyShutdown)));
        assert_eq!(buffer.text(), "info: Tests[0]\n      before shutdown\n");
    }
}
