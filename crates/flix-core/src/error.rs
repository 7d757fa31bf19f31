//! Failure taxonomy for metadata API calls.
//!
//! Every variant is recoverable: callers degrade to an empty or loading state
//! and never propagate these past the view that issued the request.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no API key configured (set api.api_key or TMDB_API_KEY)")]
    MissingApiKey,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{endpoint} returned status {status}")]
    Status { status: u16, endpoint: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed response from {endpoint}: {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// True when trying again later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::MissingApiKey | Self::NotFound(_) | Self::MalformedResponse { .. } => false,
        }
    }
}
