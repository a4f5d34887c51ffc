use thiserror::Error;

/// Failures talking to the recommendation backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Cannot reach backend at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response from backend: {0}")]
    Decode(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("{0}")]
    NoRecommendation(String),

    #[error("Please enter at least one drug name")]
    EmptyInput,

    #[error("Background request stopped unexpectedly")]
    WorkerPanicked,
}
