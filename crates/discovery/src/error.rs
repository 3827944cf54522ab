use std::time::Duration;

/// Network/provider failure during discovery. Non-fatal to the UI: the
/// caller falls back to the last cached enabled set and reports the error
/// alongside. One failing endpoint never blocks another's results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteListingError {
    #[error("auth resolution failed: {0}")]
    Auth(String),

    #[error("listing request failed: {0}")]
    Http(String),

    #[error("provider returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed listing page: {0}")]
    Decode(String),

    #[error("listing timed out after {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, RemoteListingError>;
