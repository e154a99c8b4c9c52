//! HTTP client for the relay's chat endpoint

use std::pin::Pin;

use futures::StreamExt;
use tern_ai::{ChatRequest, Turn, decode_stream};
use tokio_stream::Stream;

use crate::error::{Error, Result};

/// Default relay endpoint
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/api/chat";

/// Reply text as it arrives, in order
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Client for a running tern relay
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RelayClient {
    /// Create a client for the chat endpoint at `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Create a client from a relay base URL such as `http://localhost:3000`
    pub fn from_base_url(base_url: &str) -> Self {
        Self::new(format!("{}/api/chat", base_url.trim_end_matches('/')))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post the full history and stream back the reply text.
    ///
    /// A non-success response becomes [`Error::Relay`] with the body as sent.
    pub async fn send(&self, turns: &[Turn]) -> Result<TextStream> {
        let request = ChatRequest {
            messages: turns.to_vec(),
        };

        let response = self.http.post(&self.endpoint).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(Error::Relay { status, body });
        }

        let text = decode_stream(response.bytes_stream()).map(|piece| piece.map_err(Error::from));
        Ok(Box::pin(text))
    }
}

impl Default for RelayClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}
