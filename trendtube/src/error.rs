use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendError {
    #[error("No video found for ID: {0}")]
    NotFound(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("No count target or selector was given")]
    EmptySelector,
    #[error("Index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("External service error: {0}")]
    ExternalService(#[from] ServiceError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reported by the trending page or the YouTube Data API.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Authentication rejected ({reason}): {message}")]
    Auth { reason: String, message: String },
    #[error("Quota exhausted ({reason}): {message}")]
    Quota { reason: String, message: String },
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ServiceError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ServiceError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrendError>;
