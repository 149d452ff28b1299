//! Compiler service seam.
//!
//! The analysis engine obtains its compiler service from a [`ServiceFactory`].
//! Passing a decorating factory is how calque filters diagnostics before the
//! engine sees them; the real service is never modified.

use serde::{Deserialize, Serialize};

/// TypeScript diagnostic category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    #[default]
    Error,
    Suggestion,
    Message,
}

/// A diagnostic as reported by the compiler service.
///
/// `start` is an absolute UTF-16 offset into the service's own view of the
/// file text; global diagnostics have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDiagnostic {
    #[serde(default)]
    pub start: Option<u32>,
    #[serde(default)]
    pub length: Option<u32>,
    pub code: u32,
    #[serde(default)]
    pub category: DiagnosticCategory,
    pub message: String,
}

impl RawDiagnostic {
    /// Create an error diagnostic at `start`.
    pub fn error(code: u32, message: impl Into<String>, start: u32, length: u32) -> Self {
        Self {
            start: Some(start),
            length: Some(length),
            code,
            category: DiagnosticCategory::Error,
            message: message.into(),
        }
    }
}

/// Diagnostic retrieval entry point of a compiler service.
pub trait LanguageService {
    /// Syntactic and semantic diagnostics for `file_name`.
    fn diagnostics(&self, file_name: &str) -> Vec<RawDiagnostic>;

    /// The service's own view of the file text, which may differ from the
    /// code it was created with.
    fn source_text(&self, file_name: &str) -> Option<String>;
}

/// Creates compiler services for the analysis engine.
pub trait ServiceFactory {
    fn create_service(&self, file_name: &str, code: &str) -> Box<dyn LanguageService + '_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_diagnostic_json() {
        let diag: RawDiagnostic = serde_json::from_str(
            r#"{"start": 12, "length": 3, "code": 2322, "category": "error", "message": "nope"}"#,
        )
        .unwrap();
        assert_eq!(diag, RawDiagnostic::error(2322, "nope", 12, 3));

        let global: RawDiagnostic =
            serde_json::from_str(r#"{"code": 2318, "message": "Cannot find global type"}"#)
                .unwrap();
        assert_eq!(global.start, None);
        assert_eq!(global.category, DiagnosticCategory::Error);
    }
}
