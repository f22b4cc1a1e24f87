use crate::pattern::Pattern;
use crate::record::LogRecord;
use std::borrow::Cow;

/// A named layout that renders one tag value per log record.
#[derive(Debug, Clone, PartialEq)]
pub struct TagTemplate {
    name: String,
    pattern: Pattern,
}

impl TagTemplate {
    pub fn new(name: impl Into<String>, pattern: &str) -> Self {
        TagTemplate {
            name: name.into(),
            pattern: Pattern::parse(pattern),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the tag value for `record`. Unresolved parts render empty.
    pub fn format(&self, record: &LogRecord) -> String {
        self.pattern.render(record)
    }
}

/// Parse a tag configuration string of the form
/// `name=url-encoded-pattern&other=pattern`.
///
/// Entries without a `=` are skipped. Duplicate names are kept, in the
/// order they appear.
pub fn parse_tag_config(raw: &str) -> Vec<TagTemplate> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    raw.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, encoded)| TagTemplate::new(name, &decode_pattern(encoded)))
        .collect()
}

fn decode_pattern(encoded: &str) -> String {
    // form encoding: '+' is a space
    let encoded = encoded.replace('+', " ");
    match urlencoding::decode(&encoded) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => match urlencoding::decode_binary(encoded.as_bytes()) {
            Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Cow::Owned(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        },
    }
}
