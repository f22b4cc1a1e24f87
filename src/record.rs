use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt;

/// Captured description of an error value, detached from the original
/// error so that it can be stored in records and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionInfo {
    /// Type name of the error, e.g. `"IoError"`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Display text of the error.
    pub value: String,
    /// The error's `source()`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Box<ExceptionInfo>>,
}

impl ExceptionInfo {
    pub fn new(ty: impl Into<String>, value: impl Into<String>) -> Self {
        ExceptionInfo {
            ty: ty.into(),
            value: value.into(),
            source: None,
        }
    }

    /// Capture an error and its whole `source()` chain.
    pub fn from_error<E: Error + ?Sized>(err: &E) -> Self {
        ExceptionInfo {
            ty: type_from_debug(err),
            value: err.to_string(),
            source: err.source().map(|source| Box::new(ExceptionInfo::from_error(source))),
        }
    }

    pub fn with_source(mut self, source: ExceptionInfo) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.ty, self.value)
    }
}

/// Best-effort type name from a `Debug` rendering: `Os { code: 2, .. }`
/// gives `Os`, `ParseIntError { kind: .. }` gives `ParseIntError`.
fn type_from_debug<D: fmt::Debug + ?Sized>(value: &D) -> String {
    let dbg = format!("{:?}", value);
    dbg.split(&[' ', '(', '{', '\r', '\n'][..])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Error")
        .to_string()
}

/// The object a log call was made with, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageObject {
    Text(String),
    Exception(ExceptionInfo),
}

/// One structured event handed to the adapter by the host logging
/// framework. The adapter only reads it.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    /// Severity label as the framework names it (`"ERROR"`, `"WARN"`, ...).
    pub level: String,
    /// Name of the logger (tracing target) that produced the record.
    pub logger: String,
    /// Rendered message text.
    pub message: String,
    pub message_object: Option<MessageObject>,
    /// Exception associated with the record, separate from its message.
    pub exception: Option<ExceptionInfo>,
    /// Arbitrary properties in the order the framework supplied them.
    pub properties: Map<String, Value>,
}

impl LogRecord {
    /// Plain-text record stamped with the current time.
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        LogRecord {
            timestamp: Utc::now(),
            level: level.into(),
            logger: String::new(),
            message_object: Some(MessageObject::Text(message.clone())),
            message,
            exception: None,
            properties: Map::new(),
        }
    }

    /// Record whose message object is the error itself, with no separate text.
    pub fn from_error<E: Error + ?Sized>(level: impl Into<String>, err: &E) -> Self {
        let info = ExceptionInfo::from_error(err);
        LogRecord {
            timestamp: Utc::now(),
            level: level.into(),
            logger: String::new(),
            message: info.value.clone(),
            message_object: Some(MessageObject::Exception(info)),
            exception: None,
            properties: Map::new(),
        }
    }

    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = logger.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The exception carried as the message object, if any.
    pub fn message_exception(&self) -> Option<&ExceptionInfo> {
        match &self.message_object {
            Some(MessageObject::Exception(info)) => Some(info),
            _ => None,
        }
    }
}
