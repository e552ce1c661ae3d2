use thiserror::Error;

/// Transport-level failures inside the HTTP client.
///
/// These never leave the crate's public store operations: they are folded
/// into [`DataUnavailable`] at the boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// The backend could not be reached or answered with a failure.
///
/// Callers show `to_string()` to the user and keep their previous results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("shop data unavailable ({operation}): {reason}")]
pub struct DataUnavailable {
    pub operation: &'static str,
    pub reason: String,
}

impl DataUnavailable {
    pub(crate) fn from_client(operation: &'static str, err: &ClientError) -> Self {
        Self {
            operation,
            reason: err.to_string(),
        }
    }
}

/// The device position could not be obtained. Never shown to the user: the
/// caller falls back to a fixed coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationUnavailable {
    #[error("location permission denied")]
    Denied,

    #[error("location request timed out after {timeout_ms} ms")]
    TimedOut { timeout_ms: u64 },

    #[error("no location provider available")]
    Unsupported,
}
