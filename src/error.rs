use crate::upstream::Operation;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation} timed out")]
    Timeout { operation: Operation },

    #[error("{operation} was rate limited by upstream")]
    RateLimited { operation: Operation },

    #[error("{operation} was rejected by upstream (API key or subscription)")]
    Forbidden { operation: Operation },

    #[error("{operation} failed with status {status}: {detail}")]
    Upstream {
        operation: Operation,
        status: u16,
        detail: String,
    },

    #[error("route not found")]
    NotFound,

    #[error("malformed {operation} response: {detail}")]
    Malformed {
        operation: Operation,
        detail: &'static str,
    },

    #[error("RAPIDAPI_KEY is not configured")]
    MissingApiKey,

    #[error("{0}")]
    InvalidInput(String),

    #[error("session verification failed with status {status}: {detail}")]
    Verify { status: u16, detail: String },

    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
