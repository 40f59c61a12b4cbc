//! Error types for the Pi-hole monitor

/// Why a status or last-blocked fetch failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error("malformed response: {0}")]
    Parse(String),
}

/// Errors that can occur in the Pi-hole monitor
#[derive(Debug, thiserror::Error)]
pub enum PiholeMonitorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Display transport error: {0}")]
    Display(String),
}

/// Result type alias for monitor operations
pub type Result<T> = std::result::Result<T, PiholeMonitorError>;
