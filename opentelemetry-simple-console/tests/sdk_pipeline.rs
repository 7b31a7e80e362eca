use chrono::NaiveDateTime;
use opentelemetry::logs::{AnyValue, LogRecord, Logger, LoggerProvider, Severity};
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_semantic_conventions::attribute::{EXCEPTION_MESSAGE, EXCEPTION_TYPE};
use opentelemetry_simple_console::{
    AnsiColors, AnsiSink, SimpleConsoleExporter, SimpleConsoleExporterBuilder,
    EVENT_ID_ATTRIBUTE,
};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;

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

fn builder(buffer: &SharedBuffer) -> SimpleConsoleExporterBuilder<AnsiSink<SharedBuffer>> {
    SimpleConsoleExporter::builder()
        .with_sink(AnsiSink::new(buffer.clone()).with_colors(AnsiColors::Disabled))
}

fn provider(exporter: SimpleConsoleExporter<AnsiSink<SharedBuffer>>) -> SdkLoggerProvider {
    SdkLoggerProvider::builder()
        .with_simple_exporter(exporter)
        .build()
}

#[test]
fn info_record_through_sdk() {
    let buffer = SharedBuffer::default();
    let provider = provider(builder(&buffer).with_timestamp_format("").build().unwrap());

    let logger = provider.logger("App.X");
    let mut record = logger.create_log_record();
    record.set_severity_number(Severity::Info);
    record.set_body("hello".into());
    logger.emit(record);

    assert_eq!(buffer.text(), "info: App.X[0]\n      hello\n");
}

#[test]
fn warning_with_timestamp_prefix() {
    let buffer = SharedBuffer::default();
    let exporter = builder(&buffer)
        .with_timestamp_format("%Y-%m-%d %H:%M:%S ")
        .with_utc_timestamp(true)
        .build()
        .unwrap();
    let provider = provider(exporter);

    let logger = provider.logger("App.Disk");
    let mut record = logger.create_log_record();
    record.set_severity_number(Severity::Warn);
    record.set_body("disk almost full".into());
    logger.emit(record);

    let text = buffer.text();
    let (stamp, rest) = text.split_at("2024-01-01 00:00:00 ".len());
    assert!(
        NaiveDateTime::parse_from_str(stamp.trim_end(), "%Y-%m-%d %H:%M:%S").is_ok(),
        "unexpected prefix in {text:?}"
    );
    assert!(rest.starts_with("warn: App.Disk[0]\n"));
}

#[test]
fn event_id_and_exception_attributes() {
    let buffer = SharedBuffer::default();
    let provider = provider(builder(&buffer).with_timestamp_format("").build().unwrap());

    let logger = provider.logger("App.Store");
    let mut record = logger.create_log_record();
    record.set_severity_number(Severity::Error);
    record.set_target("App.Store.Writer");
    record.set_body(AnyValue::from("write failed"));
    record.add_attribute(EVENT_ID_ATTRIBUTE, 31_i64);
    record.add_attribute(EXCEPTION_TYPE, "IoError");
    record.add_attribute(EXCEPTION_MESSAGE, "disk full");
    logger.emit(record);

    assert_eq!(
        buffer.text(),
        "fail: App.Store.Writer[31]\n      write failed\n      IoError: disk full\n"
    );
}

#[test]
fn tracing_events_through_the_bridge() {
    let buffer = SharedBuffer::default();
    let provider = provider(builder(&buffer).with_timestamp_format("").build().unwrap());
    let subscriber =
        tracing_subscriber::registry().with(OpenTelemetryTracingBridge::new(&provider));

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(target: "App.Worker", { event.id = 12 }, "disk almost full");
        tracing::error!(target: "App.Worker", "worker stopped");
    });

    assert_eq!(
        buffer.text(),
        "warn: App.Worker[12]\n      disk almost full\n\
         fail: App.Worker[0]\n      worker stopped\n"
    );
}
