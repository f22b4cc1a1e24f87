use crate::record::LogRecord;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Property-key prefixes owned by logging frameworks themselves
/// (`tracing-log` fields, log4net-style bridged properties).
pub const RESERVED_PREFIXES: &[&str] = &["log.", "log4net:"];

/// Extra key holding the ambient HTTP request, when there is one.
pub const HTTP_EXTRA_KEY: &str = "http-extra";

/// Extra key holding the configured environment name.
pub const ENV_EXTRA_KEY: &str = "env-extra";

/// Request data attached to reports logged while serving an HTTP request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HttpExtra {
    pub url: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub cookies: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,
}

/// Source of ambient request context.
///
/// Web integrations implement this to expose the request currently being
/// served on the calling thread or task. Returning `None` means the call is
/// not happening inside a request scope.
pub trait RequestContextProvider: Send + Sync {
    fn current_request(&self) -> Option<HttpExtra>;
}

impl<F> RequestContextProvider for F
where
    F: Fn() -> Option<HttpExtra> + Send + Sync,
{
    fn current_request(&self) -> Option<HttpExtra> {
        self()
    }
}

/// Extra context for `record`, lazily.
///
/// Yields the record's own properties in order, minus blank keys, reserved
/// framework keys, nulls and blank strings; then `http-extra` when a
/// request is in scope and `env-extra` when an environment is configured.
pub fn extract_context<'a>(
    record: &'a LogRecord,
    provider: Option<&'a dyn RequestContextProvider>,
    environment: Option<&'a str>,
) -> impl Iterator<Item = (String, Value)> + 'a {
    let properties = record
        .properties
        .iter()
        .filter(|(key, value)| is_application_key(key) && has_content(value))
        .map(|(key, value)| (key.clone(), value.clone()));

    let http = std::iter::once(())
        .filter_map(move |()| provider?.current_request())
        .filter_map(|extra| serde_json::to_value(extra).ok())
        .map(|value| (HTTP_EXTRA_KEY.to_string(), value));

    let env = environment
        .into_iter()
        .map(|name| (ENV_EXTRA_KEY.to_string(), Value::String(name.to_string())));

    properties.chain(http).chain(env)
}

fn is_application_key(key: &str) -> bool {
    if key.trim().is_empty() {
        return false;
    }
    !RESERVED_PREFIXES.iter().any(|prefix| {
        key.get(..prefix.len())
            .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
    })
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}
