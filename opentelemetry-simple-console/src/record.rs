//! The record boundary between the host pipeline and the renderer.
//!
//! [`LogRecordView`] is everything the renderer reads from a record.
//! [`SdkRecordView`] adapts the records handed to a
//! [`LogExporter`](opentelemetry_sdk::logs::LogExporter) by the
//! OpenTelemetry SDK.
use crate::severity::{LogLevel, SeverityRepr};
use opentelemetry::logs::AnyValue;
use opentelemetry::InstrumentationScope;
use opentelemetry_sdk::logs::SdkLogRecord;
use opentelemetry_semantic_conventions::attribute::{
    EXCEPTION_MESSAGE, EXCEPTION_STACKTRACE, EXCEPTION_TYPE,
};
use std::borrow::Cow;
use std::time::SystemTime;

/// Attribute carrying the numeric event id printed in the record header.
pub const EVENT_ID_ATTRIBUTE: &str = "event.id";

/// Read-only view of a log record.
pub trait LogRecordView {
    /// Severity as the host expresses it.
    fn severity(&self) -> SeverityRepr;

    /// Logger category; may be empty.
    fn category_name(&self) -> &str;

    /// Numeric event id.
    fn event_id(&self) -> i64;

    /// The fully formatted message, when the host produced one.
    fn formatted_message(&self) -> Option<Cow<'_, str>>;

    /// Text form of the record body, used when there is no formatted message.
    fn body(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Transcript of an attached exception, possibly spanning several lines.
    fn exception(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// When the record was produced.
    fn timestamp(&self) -> Option<SystemTime> {
        None
    }
}

impl<T: LogRecordView + ?Sized> LogRecordView for &T {
    fn severity(&self) -> SeverityRepr {
        (**self).severity()
    }

    fn category_name(&self) -> &str {
        (**self).category_name()
    }

    fn event_id(&self) -> i64 {
        (**self).event_id()
    }

    fn formatted_message(&self) -> Option<Cow<'_, str>> {
        (**self).formatted_message()
    }

    fn body(&self) -> Option<Cow<'_, str>> {
        (**self).body()
    }

    fn exception(&self) -> Option<Cow<'_, str>> {
        (**self).exception()
    }

    fn timestamp(&self) -> Option<SystemTime> {
        (**self).timestamp()
    }
}

/// [`LogRecordView`] over a record and scope taken from a
/// [`LogBatch`](opentelemetry_sdk::logs::LogBatch).
///
/// - severity: a recognised severity text, else the severity number
/// - category: the record target, else the instrumentation scope name
/// - event id: the integer attribute [`EVENT_ID_ATTRIBUTE`], else `0`
/// - exception: the `exception.type`, `exception.message` and
///   `exception.stacktrace` attributes
#[derive(Debug, Clone, Copy)]
pub struct SdkRecordView<'a> {
    record: &'a SdkLogRecord,
    scope: &'a InstrumentationScope,
}

impl<'a> SdkRecordView<'a> {
    /// Wraps a record emitted under `scope`.
    pub fn new(record: &'a SdkLogRecord, scope: &'a InstrumentationScope) -> Self {
        SdkRecordView { record, scope }
    }

    fn attribute(&self, key: &str) -> Option<&'a AnyValue> {
        self.record
            .attributes_iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }
}

impl<'a> From<(&'a SdkLogRecord, &'a InstrumentationScope)> for SdkRecordView<'a> {
    fn from((record, scope): (&'a SdkLogRecord, &'a InstrumentationScope)) -> Self {
        SdkRecordView::new(record, scope)
    }
}

impl LogRecordView for SdkRecordView<'_> {
    fn severity(&self) -> SeverityRepr {
        if let Some(level) = self
            .record
            .severity_text()
            .and_then(|text| text.parse::<LogLevel>().ok())
        {
            return SeverityRepr::Level(level);
        }
        self.record
            .severity_number()
            .map(SeverityRepr::from)
            .unwrap_or(SeverityRepr::Number(0))
    }

    fn category_name(&self) -> &str {
        self.record
            .target()
            .map(|target| &**target)
            .filter(|target| !target.is_empty())
            .unwrap_or_else(|| self.scope.name())
    }

    fn event_id(&self) -> i64 {
        match self.attribute(EVENT_ID_ATTRIBUTE) {
            Some(AnyValue::Int(id)) => *id,
            Some(AnyValue::String(id)) => id.as_str().trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    fn formatted_message(&self) -> Option<Cow<'_, str>> {
        match self.record.body() {
            Some(AnyValue::String(message)) => Some(Cow::Borrowed(message.as_str())),
            _ => None,
        }
    }

    fn body(&self) -> Option<Cow<'_, str>> {
        self.record.body().map(value_text)
    }

    fn exception(&self) -> Option<Cow<'_, str>> {
        let kind = self.attribute(EXCEPTION_TYPE).map(value_text);
        let message = self.attribute(EXCEPTION_MESSAGE).map(value_text);
        let stacktrace = self.attribute(EXCEPTION_STACKTRACE).map(value_text);

        let header = match (kind, message) {
            (Some(kind), Some(message)) => Some(Cow::Owned(format!("{kind}: {message}"))),
            (Some(only), None) | (None, Some(only)) => Some(only),
            (None, None) => None,
        };

        match (header, stacktrace) {
            (Some(header), Some(stacktrace)) => {
                Some(Cow::Owned(format!("{header}\n{stacktrace}")))
            }
            (Some(text), None) | (None, Some(text)) => Some(text),
            (None, None) => None,
        }
    }

    fn timestamp(&self) -> Option<SystemTime> {
        self.record
            .timestamp()
            .or_else(|| self.record.observed_timestamp())
    }
}

fn value_text(value: &AnyValue) -> Cow<'_, str> {
    match value {
        AnyValue::String(s) => Cow::Borrowed(s.as_str()),
        AnyValue::Int(i) => Cow::Owned(i.to_string()),
        AnyValue::Double(d) => Cow::Owned(d.to_string()),
        AnyValue::Boolean(b) => Cow::Owned(b.to_string()),
        other => Cow::Owned(format!("{other:?}")),
    }
}
