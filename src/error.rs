use thiserror::Error;

/// Main error type for the posting bot
#[derive(Error, Debug)]
pub enum PickcastError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Provider payload errors
    #[error("Invalid provider payload: {0}")]
    InvalidPayload(String),

    // Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    // Publishing errors
    #[error("Post submission failed: {0}")]
    PostSubmission(String),

    // Media errors
    #[error("Media upload failed: {0}")]
    MediaUpload(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for PickcastError
pub type Result<T> = std::result::Result<T, PickcastError>;
