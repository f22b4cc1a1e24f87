//! Layout patterns used to render tag values from a [`LogRecord`].
//!
//! The syntax follows the familiar `PatternLayout` conventions:
//! `%level`, `%logger{2}`, `%property{user}`, `%date{%H:%M}`, `%-5p`, `%%`.
//! Parsing and rendering never fail; anything that cannot be resolved
//! renders as an empty string.

use crate::record::LogRecord;
use serde_json::Value;

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

#[derive(Debug, Clone, PartialEq)]
enum Conversion {
    Message,
    Level,
    Logger(Option<usize>),
    Exception,
    Property(Option<String>),
    Date(String),
    Newline,
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Modifiers {
    left_align: bool,
    min_width: usize,
    max_width: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Convert(Conversion, Modifiers),
}

/// A parsed layout pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    pub fn parse(pattern: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }

            let mut modifiers = Modifiers::default();
            if chars.peek() == Some(&'-') {
                chars.next();
                modifiers.left_align = true;
            }
            modifiers.min_width = take_number(&mut chars).unwrap_or(0);
            if chars.peek() == Some(&'.') {
                chars.next();
                modifiers.max_width = take_number(&mut chars);
            }

            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if !c.is_ascii_alphabetic() {
                    break;
                }
                word.push(c);
                chars.next();
            }

            // `%nException` is `%n` followed by the text `Exception`
            let (name, rest) = match longest_known_name(&word) {
                Some(name) => (name.to_string(), word[name.len()..].to_string()),
                None => (word, String::new()),
            };

            let mut option = None;
            if rest.is_empty() && chars.peek() == Some(&'{') {
                chars.next();
                let mut text = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    text.push(c);
                }
                option = Some(text);
            }

            if name.is_empty() {
                // dangling '%'
                continue;
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Convert(conversion(&name, option), modifiers));
            literal.push_str(&rest);
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Pattern { segments }
    }

    pub fn render(&self, record: &LogRecord) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Convert(conversion, modifiers) => {
                    let value = convert(conversion, record);
                    out.push_str(&apply_modifiers(value, modifiers));
                }
            }
        }
        out
    }
}

fn take_number<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits.parse().ok()
}

const KNOWN_NAMES: &[&str] = &[
    "m", "msg", "message", "p", "level", "c", "logger", "exception", "P", "X", "property", "d",
    "date", "utcdate", "n", "newline",
];

fn longest_known_name(word: &str) -> Option<&'static str> {
    KNOWN_NAMES
        .iter()
        .copied()
        .filter(|name| word.starts_with(name))
        .max_by_key(|name| name.len())
}

fn conversion(name: &str, option: Option<String>) -> Conversion {
    match name {
        "m" | "msg" | "message" => Conversion::Message,
        "p" | "level" => Conversion::Level,
        "c" | "logger" => Conversion::Logger(option.and_then(|o| o.trim().parse().ok())),
        "exception" => Conversion::Exception,
        "P" | "X" | "property" => Conversion::Property(option),
        "d" | "date" | "utcdate" => {
            Conversion::Date(option.unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()))
        }
        "n" | "newline" => Conversion::Newline,
        _ => Conversion::Unknown,
    }
}

fn convert(conversion: &Conversion, record: &LogRecord) -> String {
    match conversion {
        Conversion::Message => record.message.clone(),
        Conversion::Level => record.level.clone(),
        Conversion::Logger(None) => record.logger.clone(),
        Conversion::Logger(Some(n)) => last_segments(&record.logger, *n),
        Conversion::Exception => record
            .exception
            .as_ref()
            .map(|e| e.value.clone())
            .unwrap_or_default(),
        Conversion::Property(Some(key)) => record
            .properties
            .get(key)
            .map(value_text)
            .unwrap_or_default(),
        Conversion::Property(None) => String::new(),
        Conversion::Date(format) => {
            use std::fmt::Write;
            let mut text = String::new();
            // chrono reports malformed format strings through fmt::Error
            match write!(text, "{}", record.timestamp.format(format)) {
                Ok(()) => text,
                Err(_) => String::new(),
            }
        }
        Conversion::Newline => "\n".to_string(),
        Conversion::Unknown => String::new(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn last_segments(logger: &str, n: usize) -> String {
    if n == 0 {
        return logger.to_string();
    }
    let parts: Vec<&str> = logger
        .split("::")
        .flat_map(|part| part.split('.'))
        .collect();
    let start = parts.len().saturating_sub(n);
    let sep = if logger.contains("::") { "::" } else { "." };
    parts[start..].join(sep)
}

fn apply_modifiers(value: String, modifiers: &Modifiers) -> String {
    let mut value = value;
    if let Some(max) = modifiers.max_width {
        let len = value.chars().count();
        if len > max {
            value = value.chars().skip(len - max).collect();
        }
    }
    let len = value.chars().count();
    if len < modifiers.min_width {
        let pad = " ".repeat(modifiers.min_width - len);
        if modifiers.left_align {
            value.push_str(&pad);
        } else {
            value.insert_str(0, &pad);
        }
    }
    value
}
