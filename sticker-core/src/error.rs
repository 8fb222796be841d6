//! Error types for sticker canvas operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
///
/// None of these reach the user: store mutations treat unknown ids as
/// no-ops. They surface at API boundaries that parse or validate input.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A sticker ID string could not be parsed.
    #[error("Invalid sticker id: {0}")]
    InvalidId(String),

    /// Canvas configuration is unusable.
    #[error("Invalid canvas configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
