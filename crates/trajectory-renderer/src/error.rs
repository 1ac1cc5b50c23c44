//! Error types for the trajectory renderer

use thiserror::Error;

/// Error type for renderer operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Eye-relative encoding was requested before an eye position was set.
    #[error("No eye position established for relative-to-eye encoding")]
    EyeNotEstablished,

    /// The eye position contains NaN or infinite components.
    #[error("Eye position is not finite: {0:?}")]
    NonFiniteEye([f64; 3]),

    /// Configuration could not be parsed or serialized.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read or written.
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;
