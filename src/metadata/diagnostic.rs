use serde::{Deserialize, Serialize};
use std::fmt;

/// Route argument is not a string literal; the function keeps a placeholder name
pub const NON_LITERAL_ROUTE: &str = "FNMETA001";

/// Registration method has no HTTP verb mapping; the call site is dropped
pub const UNRECOGNIZED_VERB: &str = "FNMETA002";

/// Retry attribute found but its arguments could not be read; no retry is emitted
pub const MALFORMED_RETRY: &str = "FNMETA003";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// A degrade-and-continue event raised while extracting metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    /// Zero-based index of the call site in scan order
    pub call_site: usize,
}

impl Diagnostic {
    pub fn warning(code: &str, call_site: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.to_string(),
            message: message.into(),
            call_site,
        }
    }

    pub fn info(code: &str, call_site: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            code: code.to_string(),
            message: message.into(),
            call_site,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{} {} (call site #{}): {}",
            severity, self.code, self.call_site, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diag = Diagnostic::warning(NON_LITERAL_ROUTE, 2, "route is not a literal");
        assert_eq!(
            diag.to_string(),
            "warning FNMETA001 (call site #2): route is not a literal"
        );
    }
}
