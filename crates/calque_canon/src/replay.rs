//! Collaborators replayed from recorded JSON.
//!
//! A [`Fixture`] holds what a real rewriter and analysis engine produced for
//! one document. Replaying it still goes through the service factory the
//! pipeline hands to the engine, so diagnostic interception behaves exactly
//! as it does against a live engine.
//!
//! ```json
//! {
//!   "rewrite": { "code": "...", "map": { "version": 3, "mappings": "..." } },
//!   "analysis": {
//!     "code": "...",
//!     "checkerText": "...",
//!     "diagnostics": [{ "start": 120, "length": 5, "code": 2322, "message": "..." }],
//!     "staticQuickInfos": [{ "line": 4, "character": 6, "targetString": "a", "text": "..." }]
//!   }
//! }
//! ```

use std::path::Path;

use calque_carton::LineIndex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::align::align;
use crate::collaborator::{
    AnalysisEngine, AnalysisOutput, AnalyzeOptions, ErrorInfo, QuickInfo, RewriteOptions,
    RewriteOutput, Rewriter,
};
use crate::error::{BoxError, CanonResult};
use crate::service::{LanguageService, RawDiagnostic, ServiceFactory};

/// Recorded collaborator output for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub rewrite: RewriteOutput,
    #[serde(default)]
    pub analysis: RecordedAnalysis,
}

/// Recorded analysis engine behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedAnalysis {
    /// Code the engine returns and reports positions against. Defaults to
    /// the checker view; when both are recorded, error positions are moved
    /// from the view into this code line by line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// The compiler service's view of the file. Defaults to the code the
    /// engine was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checker_text: Option<String>,
    /// Raw diagnostics the compiler service reports, before interception.
    #[serde(default)]
    pub diagnostics: Vec<RawDiagnostic>,
    #[serde(default)]
    pub static_quick_infos: Vec<QuickInfo>,
    /// Returned unchanged in the engine output.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Fixture {
    pub fn from_json(json: &str) -> CanonResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> CanonResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn rewriter(&self) -> ReplayRewriter<'_> {
        ReplayRewriter {
            output: &self.rewrite,
        }
    }

    pub fn services(&self) -> RecordedServices<'_> {
        RecordedServices {
            analysis: &self.analysis,
        }
    }

    pub fn engine(&self) -> ReplayEngine<'_> {
        ReplayEngine {
            analysis: &self.analysis,
        }
    }
}

/// Returns the recorded rewrite for any document.
pub struct ReplayRewriter<'a> {
    output: &'a RewriteOutput,
}

impl Rewriter for ReplayRewriter<'_> {
    fn rewrite(&self, _source: &str, options: &RewriteOptions) -> Result<RewriteOutput, BoxError> {
        tracing::debug!("replaying rewrite ({:?})", options.mode);
        Ok(self.output.clone())
    }
}

/// Compiler services serving recorded diagnostics.
pub struct RecordedServices<'a> {
    analysis: &'a RecordedAnalysis,
}

impl ServiceFactory for RecordedServices<'_> {
    fn create_service(&self, _file_name: &str, code: &str) -> Box<dyn LanguageService + '_> {
        Box::new(RecordedService {
            diagnostics: &self.analysis.diagnostics,
            text: self
                .analysis
                .checker_text
                .clone()
                .unwrap_or_else(|| code.to_string()),
        })
    }
}

struct RecordedService<'a> {
    diagnostics: &'a [RawDiagnostic],
    text: String,
}

impl LanguageService for RecordedService<'_> {
    fn diagnostics(&self, _file_name: &str) -> Vec<RawDiagnostic> {
        self.diagnostics.to_vec()
    }

    fn source_text(&self, _file_name: &str) -> Option<String> {
        Some(self.text.clone())
    }
}

/// Analysis engine that reports the recorded results.
///
/// Errors come from the service created through the supplied factory, so
/// only diagnostics that survive interception are reported.
pub struct ReplayEngine<'a> {
    analysis: &'a RecordedAnalysis,
}

impl AnalysisEngine for ReplayEngine<'_> {
    fn analyze(
        &self,
        code: &str,
        language_id: &str,
        options: AnalyzeOptions<'_>,
    ) -> Result<AnalysisOutput, BoxError> {
        tracing::debug!("replaying analysis of {} as {}", options.file_name, language_id);

        let service = options
            .service_factory
            .create_service(options.file_name, code);
        let diagnostics = service.diagnostics(options.file_name);
        let view = service
            .source_text(options.file_name)
            .unwrap_or_else(|| code.to_string());
        let view_index = LineIndex::new(&view);

        // Errors are reported against the returned code, which may lack
        // lines the checker view still has.
        let code = self.analysis.code.clone().unwrap_or_else(|| view.clone());
        let to_code = (code != view).then(|| align(&view, &code));
        let code_index = LineIndex::new(&code);

        let errors = diagnostics
            .into_iter()
            .filter_map(|diag| {
                let mut start = diag.start?;
                let mut position = view_index.position_at(start);
                if let Some(alignment) = &to_code {
                    let Some(line) = alignment.original_to_generated(position.line) else {
                        tracing::debug!(
                            "TS{} at {} is on a line missing from the engine code",
                            diag.code,
                            position
                        );
                        return None;
                    };
                    position = position.with_line(line);
                    start = code_index.offset_at(position);
                }
                Some(ErrorInfo {
                    line: position.line,
                    character: position.character,
                    start,
                    length: diag.length,
                    code: diag.code,
                    category: diag.category,
                    rendered_message: diag.message,
                    extra: Map::new(),
                })
            })
            .collect();

        Ok(AnalysisOutput {
            code,
            static_quick_infos: self.analysis.static_quick_infos.clone(),
            errors,
            extra: self.analysis.extra.clone(),
        })
    }
}
