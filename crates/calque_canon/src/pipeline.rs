//! The remapping pipeline.
//!
//! ```text
//! document ─► rewrite ─► prepend references ─► analyze (intercepted)
//!                                                     │
//!     ┌───────────────────────────────────────────────┘
//!     ▼
//! map results ─► strip removed lines ─► re-align ─► PipelineOutput
//! ```
//!
//! One call processes one document. Individual results that cannot be mapped
//! are dropped; only collaborator failures abort the run.

use calque_carton::{split_lines, strip_lines, LineIndex, Position};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::align::{align, AlignmentMap};
use crate::collaborator::{
    AnalysisEngine, AnalyzeOptions, ErrorInfo, Located, QuickInfo, RewriteOptions, Rewriter,
};
use crate::error::{CanonError, CanonResult};
use crate::interceptor::DiagnosticsInterceptor;
use crate::service::ServiceFactory;
use crate::source_map::SourceMapBridge;
use crate::stages::{
    AlignmentCorrection, PrependCorrection, ProcessedCorrection, SourceMapStage, Stage, StageChain,
};

/// Reference declarations prepended to rewritten code by default.
pub const DEFAULT_REFERENCES: &[&str] = &[
    r#"/// <reference types="svelte" />"#,
    r#"/// <reference types="svelte2tsx/svelte-jsx" />"#,
    r#"/// <reference types="svelte2tsx/svelte-shims-v4" />"#,
];

/// Identifier of the render helper synthesized by the rewriter.
pub const DEFAULT_HELPER_IDENTIFIER: &str = "render";

/// Pipeline options.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Virtual file name the generated code is analyzed under.
    pub file_name: String,
    /// Language id passed to the engine.
    pub language_id: String,
    /// Lines prepended to the rewritten code.
    pub references: Vec<String>,
    /// Quick-info about this identifier is always dropped.
    pub helper_identifier: String,
    /// Options for the rewriter.
    pub rewrite: RewriteOptions,
    /// Default compiler options for the engine.
    pub compiler_options: Value,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            file_name: "index.ts".to_string(),
            language_id: "ts".to_string(),
            references: DEFAULT_REFERENCES.iter().map(|r| r.to_string()).collect(),
            helper_identifier: DEFAULT_HELPER_IDENTIFIER.to_string(),
            rewrite: RewriteOptions {
                is_ts_file: true,
                ..Default::default()
            },
            compiler_options: Value::Object(Map::new()),
        }
    }
}

impl PipelineOptions {
    /// Text prepended to the rewritten code, and how many lines it spans.
    fn prelude(&self) -> (String, u32) {
        if self.references.is_empty() {
            return (String::new(), 0);
        }
        let mut prelude = self.references.join("\n");
        prelude.push('\n');
        let lines = self
            .references
            .iter()
            .map(|r| split_lines(r).len() as u32)
            .sum();
        (prelude, lines)
    }
}

/// A result in both original-document and processed-document coordinates.
///
/// The wrapped item's own `line`, `character` and `start` are in the
/// original document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapped<T> {
    #[serde(flatten)]
    pub item: T,
    pub processed: Position,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    /// The original document with meaningless lines stripped.
    pub code: String,
    pub static_quick_infos: Vec<Mapped<QuickInfo>>,
    pub errors: Vec<Mapped<ErrorInfo>>,
    /// Original-document lines stripped from `code`, ascending.
    pub removed_lines: Vec<u32>,
    /// Engine output fields passed through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PipelineOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Drives rewrite, analysis and position mapping for one document.
pub struct Pipeline<'a> {
    rewriter: &'a dyn Rewriter,
    engine: &'a dyn AnalysisEngine,
    services: &'a dyn ServiceFactory,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    /// `services` is the real compiler service factory; the engine receives
    /// an intercepting wrapper around it.
    pub fn new(
        rewriter: &'a dyn Rewriter,
        engine: &'a dyn AnalysisEngine,
        services: &'a dyn ServiceFactory,
        options: PipelineOptions,
    ) -> Self {
        Self {
            rewriter,
            engine,
            services,
            options,
        }
    }

    /// Run the pipeline on `source`.
    pub fn run(&self, source: &str) -> CanonResult<PipelineOutput> {
        let options = &self.options;

        // Rewrite
        let rewritten = self
            .rewriter
            .rewrite(source, &options.rewrite)
            .map_err(CanonError::Rewrite)?;

        // Prepend reference lines
        let (prelude, prepended) = options.prelude();
        let generated = format!("{}{}", prelude, rewritten.code);
        tracing::info!(
            "rewrote {} ({} bytes -> {} bytes, {} reference lines)",
            options.file_name,
            source.len(),
            generated.len(),
            prepended
        );

        // Bridges
        let bridge = SourceMapBridge::from_json(&rewritten.map).map_err(|e| match e {
            CanonError::SourceMap(_) | CanonError::Json(_) => CanonError::Rewrite(Box::new(e)),
            other => other,
        })?;
        tracing::debug!(
            "source map covers {} of {} rewritten lines",
            bridge.mapped_line_count(),
            split_lines(&rewritten.code).len()
        );
        let prepend = PrependCorrection { lines: prepended };
        let source_map = SourceMapStage { bridge: &bridge };
        let interceptor = DiagnosticsInterceptor::new(self.services, &generated, |p: Position| {
            prepend.apply(p).and_then(|p| source_map.apply(p))
        });

        // Analyze
        let mut analysis = self
            .engine
            .analyze(
                &generated,
                &options.language_id,
                AnalyzeOptions {
                    file_name: &options.file_name,
                    compiler_options: &options.compiler_options,
                    service_factory: &interceptor,
                },
            )
            .map_err(CanonError::Analyze)?;
        tracing::info!(
            "engine reported {} errors and {} quick infos",
            analysis.errors.len(),
            analysis.static_quick_infos.len()
        );

        // Align engine output to the generated code
        let engine_alignment = align(&generated, &analysis.code);
        if !engine_alignment.is_identity() {
            tracing::debug!(
                "engine output keeps {} of {} generated lines",
                engine_alignment.matched_count(),
                engine_alignment.original_line_count()
            );
        }

        // Map every result back to the document
        let to_original = StageChain::new()
            .then(prepend)
            .then(AlignmentCorrection {
                alignment: &engine_alignment,
                prepended,
            })
            .then(source_map);
        let source_index = LineIndex::new(source);
        let helper = options.helper_identifier.as_str();

        let quick_infos = map_to_original(
            std::mem::take(&mut analysis.static_quick_infos),
            &to_original,
            &source_index,
            helper,
        );
        let errors = map_to_original(
            std::mem::take(&mut analysis.errors),
            &to_original,
            &source_index,
            helper,
        );

        // Removed lines in document coordinates
        let removed_lines = removed_original_lines(&engine_alignment, prepended, &bridge);
        tracing::debug!("removed document lines: {:?}", removed_lines);

        // Processed source, and results moved into it
        let processed = strip_lines(source, &removed_lines);
        let processed_alignment = align(source, &processed);
        let to_processed = ProcessedCorrection {
            alignment: &processed_alignment,
        };

        let output = PipelineOutput {
            static_quick_infos: map_to_processed(quick_infos, &to_processed),
            errors: map_to_processed(errors, &to_processed),
            code: processed,
            removed_lines,
            extra: analysis.extra,
        };
        tracing::info!(
            "mapped {} errors and {} quick infos onto {}",
            output.errors.len(),
            output.static_quick_infos.len(),
            options.file_name
        );

        Ok(output)
    }
}

fn map_to_original<T: Located>(
    items: Vec<T>,
    chain: &StageChain<'_>,
    source_index: &LineIndex,
    helper: &str,
) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|mut item| {
            let from = item.position();
            let Some(position) = chain.apply(from) else {
                tracing::debug!("dropping result at {}: no mapping", from);
                return None;
            };
            if position.line == 0 || position.character == 0 {
                tracing::debug!("dropping result at {}: maps to {}", from, position);
                return None;
            }
            if item.target() == Some(helper) {
                tracing::debug!("dropping result at {}: points at '{}'", from, helper);
                return None;
            }
            item.relocate(position, source_index.offset_at(position));
            Some(item)
        })
        .collect()
}

fn map_to_processed<T: Located>(items: Vec<T>, stage: &ProcessedCorrection<'_>) -> Vec<Mapped<T>> {
    items
        .into_iter()
        .filter_map(|item| {
            let processed = stage.apply(item.position())?;
            Some(Mapped { item, processed })
        })
        .collect()
}

/// Lines the engine dropped, in original-document coordinates.
fn removed_original_lines(
    engine_alignment: &AlignmentMap,
    prepended: u32,
    bridge: &SourceMapBridge,
) -> Vec<u32> {
    let mut lines: Vec<u32> = engine_alignment
        .removed_lines()
        .iter()
        .filter_map(|&line| line.checked_sub(prepended))
        .filter_map(|line| bridge.original_line(line))
        .collect();
    lines.sort_unstable();
    lines.dedup();
    lines
}
