//! Error types for the mapping pipeline.
//!
//! Unmappable positions are not errors: every stage returns `Option` and the
//! pipeline drops the affected result. Only collaborator failures surface
//! here.

/// Boxed error returned by external collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for canon operations.
#[derive(Debug, thiserror::Error)]
pub enum CanonError {
    /// The rewriter failed to produce code for the document.
    #[error("rewrite failed: {0}")]
    Rewrite(#[source] BoxError),

    /// The analysis engine failed on the generated code.
    #[error("analysis failed: {0}")]
    Analyze(#[source] BoxError),

    /// The rewriter's source map could not be decoded.
    #[error("invalid source map: {0}")]
    SourceMap(#[from] sourcemap::Error),

    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for canon operations.
pub type CanonResult<T> = Result<T, CanonError>;
