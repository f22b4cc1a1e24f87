use serde::Serialize;
use std::fmt;

/// Normalized criticality of an error report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translate a logging-framework level label into a [`Severity`].
///
/// `WARN` and `NOTICE` are rewritten first; any other label is matched
/// case-insensitively against the severity names. Labels that match
/// nothing (custom levels, `CRITICAL`, `TRACE`, ...) become
/// [`Severity::Error`] so that they surface instead of being buried.
pub fn translate(label: &str) -> Severity {
    let label = label.trim();

    if label.eq_ignore_ascii_case("warn") {
        return Severity::Warning;
    }
    if label.eq_ignore_ascii_case("notice") {
        return Severity::Info;
    }

    Severity::ALL
        .iter()
        .copied()
        .find(|severity| severity.as_str().eq_ignore_ascii_case(label))
        .unwrap_or(Severity::Error)
}
