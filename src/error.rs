//! Error types for the scrawl library

use thiserror::Error;

/// Result type alias using ScrawlError
pub type Result<T> = std::result::Result<T, ScrawlError>;

/// Errors that can occur while generating a handwritten document
#[derive(Debug, Error)]
pub enum ScrawlError {
    /// Error from the underlying lopdf library
    #[error("PDF operation failed: {0}")]
    PdfError(#[from] lopdf::Error),

    /// Font data could not be parsed or registered
    #[error("Font error: {0}")]
    FontError(String),

    /// Layout or drawing failure
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// The requested output format is not available in this build
    #[error("Unsupported export format: {0}")]
    UnsupportedExport(String),
}
