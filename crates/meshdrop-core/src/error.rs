//! Error types for mesh generation

use thiserror::Error;

/// Result type for generation operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Errors that can occur while talking to the inference service
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("generation failed with terminal status: {0}")]
    Failed(String),

    #[error("queue response missing field: {0}")]
    MissingField(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
