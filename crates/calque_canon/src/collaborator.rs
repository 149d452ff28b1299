//! Contracts of the external collaborators: the rewriter that turns a
//! template document into checkable code, and the analysis engine that
//! type-checks it.

use calque_carton::Position;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BoxError;
use crate::service::{DiagnosticCategory, ServiceFactory};

/// Output flavour requested from the rewriter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteMode {
    /// Regular TypeScript.
    #[default]
    Ts,
    /// Declaration output.
    Dts,
}

/// Options passed to [`Rewriter::rewrite`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteOptions {
    #[serde(default)]
    pub mode: RewriteMode,
    /// Whether the document's script is TypeScript rather than JavaScript.
    #[serde(default)]
    pub is_ts_file: bool,
}

/// Rewritten code plus a standard (v3) source map back to the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteOutput {
    pub code: String,
    pub map: Value,
}

/// Turns a template document into host-language code.
pub trait Rewriter {
    fn rewrite(&self, source: &str, options: &RewriteOptions) -> Result<RewriteOutput, BoxError>;
}

/// Options passed to [`AnalysisEngine::analyze`].
pub struct AnalyzeOptions<'a> {
    /// Virtual file name the code is checked under.
    pub file_name: &'a str,
    /// Default compiler options, as tsconfig-style JSON.
    pub compiler_options: &'a Value,
    /// Factory the engine must create its compiler service with.
    pub service_factory: &'a dyn ServiceFactory,
}

/// Type-checks code and reports diagnostics and quick-info.
pub trait AnalysisEngine {
    fn analyze(
        &self,
        code: &str,
        language_id: &str,
        options: AnalyzeOptions<'_>,
    ) -> Result<AnalysisOutput, BoxError>;
}

/// What the analysis engine returns.
///
/// Positions are relative to `code`, the engine's own re-emitted version of
/// its input. Fields calque does not know are carried through in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutput {
    pub code: String,
    #[serde(default)]
    pub static_quick_infos: Vec<QuickInfo>,
    #[serde(default)]
    pub errors: Vec<ErrorInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Hover information attached to an identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickInfo {
    pub line: u32,
    pub character: u32,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub length: u32,
    /// The identifier the info is about.
    pub target_string: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A diagnostic as reported in the engine's output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub line: u32,
    pub character: u32,
    #[serde(default)]
    pub start: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    pub code: u32,
    #[serde(default)]
    pub category: DiagnosticCategory,
    pub rendered_message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A positioned result that can be moved between coordinate spaces.
pub trait Located {
    fn position(&self) -> Position;

    /// Identifier the result points at, if any.
    fn target(&self) -> Option<&str> {
        None
    }

    /// Move to `position`, with `start` its absolute offset.
    fn relocate(&mut self, position: Position, start: u32);
}

impl Located for QuickInfo {
    fn position(&self) -> Position {
        Position::new(self.line, self.character)
    }

    fn target(&self) -> Option<&str> {
        Some(&self.target_string)
    }

    fn relocate(&mut self, position: Position, start: u32) {
        self.line = position.line;
        self.character = position.character;
        self.start = start;
    }
}

impl Located for ErrorInfo {
    fn position(&self) -> Position {
        Position::new(self.line, self.character)
    }

    fn relocate(&mut self, position: Position, start: u32) {
        self.line = position.line;
        self.character = position.character;
        self.start = start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analysis_output_passes_unknown_fields_through() {
        let raw = json!({
            "code": "let a = 1",
            "staticQuickInfos": [{
                "line": 0, "character": 4, "length": 1,
                "targetString": "a", "text": "let a: number", "kind": "let"
            }],
            "errors": [],
            "highlights": [{ "line": 0 }],
            "extension": "ts"
        });
        let output: AnalysisOutput = serde_json::from_value(raw).unwrap();

        assert_eq!(output.static_quick_infos[0].target(), Some("a"));
        assert_eq!(output.static_quick_infos[0].extra["kind"], json!("let"));
        assert_eq!(output.extra["extension"], json!("ts"));

        let back = serde_json::to_value(&output).unwrap();
        assert_eq!(back["highlights"], json!([{ "line": 0 }]));
        assert_eq!(back["staticQuickInfos"][0]["kind"], json!("let"));
    }

    #[test]
    fn test_relocate() {
        let mut error = ErrorInfo {
            line: 9,
            character: 3,
            code: 2322,
            rendered_message: "Type 'number' is not assignable to type 'string'.".into(),
            ..Default::default()
        };
        error.relocate(Position::new(2, 8), 40);

        assert_eq!(error.position(), Position::new(2, 8));
        assert_eq!(error.start, 40);
        assert_eq!(error.target(), None);
    }

    #[test]
    fn test_rewrite_options_json() {
        let options: RewriteOptions =
            serde_json::from_value(json!({ "mode": "dts", "isTsFile": true })).unwrap();
        assert_eq!(options.mode, RewriteMode::Dts);
        assert!(options.is_ts_file);
    }
}
