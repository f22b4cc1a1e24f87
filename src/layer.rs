use crate::adapter::{Adapter, DIAGNOSTICS_TARGET};
use crate::record::{ExceptionInfo, LogRecord, MessageObject};
use chrono::Utc;
use serde_json::{Map, Value};
use std::error::Error;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_log::NormalizeEvent;
use tracing_subscriber::layer::{Context, Layer};

/// `tracing_subscriber` layer that turns every event it sees into a
/// [`LogRecord`] and appends it to an [`Adapter`].
///
/// The layer does no filtering of its own besides skipping the adapter's
/// diagnostic events; compose it with `tracing_subscriber` filters
/// (e.g. `ReportLayer::new(adapter).with_filter(LevelFilter::ERROR)`).
#[derive(Clone, Debug)]
pub struct ReportLayer {
    adapter: Arc<Adapter>,
}

impl ReportLayer {
    pub fn new(adapter: Arc<Adapter>) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &Arc<Adapter> {
        &self.adapter
    }
}

impl<S> Layer<S> for ReportLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // events bridged from the `log` crate carry their real target and
        // level in `log.*` fields
        let normalized = event.normalized_metadata();
        let meta = normalized.as_ref().unwrap_or_else(|| event.metadata());
        if meta.target() == DIAGNOSTICS_TARGET {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.adapter.append(&visitor.into_record(meta.level(), meta.target()));
    }
}

/// Level label handed to the adapter. `TRACE` has no report severity of
/// its own and is reported as `DEBUG`.
fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::TRACE | Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARN",
        Level::ERROR => "ERROR",
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    exception: Option<ExceptionInfo>,
    properties: Map<String, Value>,
}

impl FieldVisitor {
    fn into_record(self, level: &Level, target: &str) -> LogRecord {
        let FieldVisitor {
            message,
            exception,
            properties,
        } = self;

        let (message, message_object, exception) = match (message, exception) {
            (Some(text), exception) => (text.clone(), Some(MessageObject::Text(text)), exception),
            (None, Some(exception)) => (
                exception.value.clone(),
                Some(MessageObject::Exception(exception)),
                None,
            ),
            (None, None) => (String::new(), None, None),
        };

        LogRecord {
            timestamp: Utc::now(),
            level: level_label(level).to_string(),
            logger: target.to_string(),
            message,
            message_object,
            exception,
            properties,
        }
    }

    fn insert(&mut self, field: &Field, value: Value) {
        self.properties.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        if self.exception.is_none() {
            self.exception = Some(ExceptionInfo::from_error(value));
        } else {
            self.insert(field, Value::String(value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.insert(field, Value::String(format!("{:?}", value)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_is_reported_as_debug() {
        assert_eq!(level_label(&Level::TRACE), "DEBUG");
        assert_eq!(level_label(&Level::WARN), "WARN");
    }

    #[test]
    fn error_without_message_becomes_message_object() {
        let visitor = FieldVisitor {
            exception: Some(ExceptionInfo::new("IoError", "broken pipe")),
            ..Default::default()
        };
        let record = visitor.into_record(&Level::ERROR, "app::net");

        assert!(record.exception.is_none());
        assert_eq!(record.message, "broken pipe");
        assert_eq!(
            record.message_exception(),
            Some(&ExceptionInfo::new("IoError", "broken pipe"))
        );
    }

    #[test]
    fn error_with_message_stays_associated() {
        let visitor = FieldVisitor {
            message: Some("upload failed".into()),
            exception: Some(ExceptionInfo::new("IoError", "broken pipe")),
            ..Default::default()
        };
        let record = visitor.into_record(&Level::ERROR, "app::net");

        assert_eq!(record.message, "upload failed");
        assert_eq!(record.exception, Some(ExceptionInfo::new("IoError", "broken pipe")));
        assert_eq!(record.logger, "app::net");
        assert_eq!(record.level, "ERROR");
    }
}
