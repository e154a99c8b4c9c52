//! Error types for tern-ai

use thiserror::Error;

/// Result type alias using tern-ai Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the upstream provider
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upstream answered with a non-success status; `body` is the raw bytes
    #[error("Upstream error ({status}): {}", String::from_utf8_lossy(.body))]
    Upstream { status: u16, body: Vec<u8> },

    /// Invalid API key
    #[error("Invalid or missing API key")]
    InvalidApiKey,
}

impl Error {
    /// Create an upstream error from a status code and raw body
    pub fn upstream(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display_keeps_body() {
        let e = Error::upstream(429, "{\"error\":{\"message\":\"quota\"}}");
        assert_eq!(
            e.to_string(),
            "Upstream error (429): {\"error\":{\"message\":\"quota\"}}"
        );
    }
}
