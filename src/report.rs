use crate::context::{extract_context, RequestContextProvider};
use crate::record::{ExceptionInfo, LogRecord};
use crate::severity::{translate, Severity};
use crate::tags::TagTemplate;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Error report built from a single [`LogRecord`], ready to be handed to a
/// reporting client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedReport {
    pub timestamp: DateTime<Utc>,
    pub logger: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionInfo>,
    pub level: Severity,
    /// Tags in template declaration order; names may repeat.
    pub tags: Vec<(String, String)>,
    pub extra: Map<String, Value>,
}

impl NormalizedReport {
    /// First tag value with the given name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(tag, _)| tag == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Build the report for `record`.
///
/// A separate exception on the record wins and keeps the rendered message
/// next to it; an exception logged as the message object is captured on its
/// own; anything else is a plain message.
pub fn build_report(
    record: &LogRecord,
    templates: &[TagTemplate],
    provider: Option<&dyn RequestContextProvider>,
    environment: Option<&str>,
) -> NormalizedReport {
    let (message, exception) = match (&record.exception, record.message_exception()) {
        (Some(exception), _) => (record.message.clone(), Some(exception.clone())),
        (None, Some(exception)) => (exception.value.clone(), Some(exception.clone())),
        (None, None) => (record.message.clone(), None),
    };

    let tags = templates
        .iter()
        .map(|template| (template.name().to_string(), template.format(record)))
        .collect();

    NormalizedReport {
        timestamp: record.timestamp,
        logger: record.logger.clone(),
        message,
        exception,
        level: translate(&record.level),
        tags,
        extra: extract_context(record, provider, environment).collect(),
    }
}
