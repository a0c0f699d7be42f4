//! Error types for the helmet overlay library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Required landmarks are missing or geometrically degenerate
    #[error("Pose unavailable: {0}")]
    PoseUnavailable(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filter initialization or processing error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Landmark provider could not produce a frame
    #[error("Landmark provider error: {0}")]
    ProviderError(String),

    /// Graphics sink failed to consume a shape set
    #[error("Graphics sink error: {0}")]
    SinkError(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error means "no usable face this frame".
    #[must_use]
    pub const fn is_pose_unavailable(&self) -> bool {
        matches!(self, Self::PoseUnavailable(_))
    }
}
