//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No suitable rendering backend available.
    #[error("No rendering backend available: {0}")]
    NoBackend(String),

    /// Drawing surface missing or unusable.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Glyph rasterization failed.
    #[error("Glyph rasterization failed: {0}")]
    Glyph(String),

    /// Export encoding failed.
    #[error("Export failed: {0}")]
    Export(String),
}
