//! # calque_canon
//!
//! Canon - Maps type-checker results from rewritten code back to the
//! template document they came from.
//!
//! ## Name Origin
//!
//! A **canon** is the set of proportions a copy must respect to stay true to
//! its model. A calque is such a copy, and `calque_canon` keeps every
//! diagnostic and quick-info true to the lines of the original document.
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |                        calque_canon                          |
//! +-------------------------------------------------------------+
//! |                                                              |
//! |  +--------------------+      +---------------------------+   |
//! |  | Pipeline           |----->| Rewriter / AnalysisEngine |   |
//! |  | - run              |      | (collaborator traits)     |   |
//! |  +--------------------+      +---------------------------+   |
//! |        |                                 |                   |
//! |        v                                 v                   |
//! |  +--------------------+      +---------------------------+   |
//! |  | StageChain         |      | DiagnosticsInterceptor    |   |
//! |  | - prepend          |      | (decorating factory)      |   |
//! |  | - alignment        |      +---------------------------+   |
//! |  | - source map       |                  |                   |
//! |  | - processed        |                  v                   |
//! |  +--------------------+      +---------------------------+   |
//! |        |                     | align / AlignmentMap      |   |
//! |        v                     +---------------------------+   |
//! |  +--------------------+                                      |
//! |  | SourceMapBridge    |   calque_carton::LineIndex           |
//! |  +--------------------+                                      |
//! +-------------------------------------------------------------+
//! ```

pub mod align;
pub mod collaborator;
mod error;
pub mod interceptor;
pub mod pipeline;
pub mod replay;
pub mod service;
pub mod source_map;
pub mod stages;

pub use align::{align, AlignmentMap};
pub use collaborator::{
    AnalysisEngine, AnalysisOutput, AnalyzeOptions, ErrorInfo, Located, QuickInfo, RewriteMode,
    RewriteOptions, RewriteOutput, Rewriter,
};
pub use error::{BoxError, CanonError, CanonResult};
pub use interceptor::DiagnosticsInterceptor;
pub use pipeline::{
    Mapped, Pipeline, PipelineOptions, PipelineOutput, DEFAULT_HELPER_IDENTIFIER,
    DEFAULT_REFERENCES,
};
pub use replay::{Fixture, RecordedAnalysis, RecordedServices, ReplayEngine, ReplayRewriter};
pub use service::{DiagnosticCategory, LanguageService, RawDiagnostic, ServiceFactory};
pub use source_map::SourceMapBridge;
pub use stages::{
    AlignmentCorrection, PrependCorrection, ProcessedCorrection, SourceMapStage, Stage, StageChain,
};

pub use calque_carton::{LineIndex, Position};
