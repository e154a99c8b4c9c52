//! Google Generative AI (Gemini) API provider

use crate::{
    error::{Error, Result},
    stream::{FragmentStream, extract_stream},
    types::{ContentPart, Role, Turn},
};
use futures::StreamExt;
use serde::Serialize;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Environment variables consulted for the API key, in order
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

// Generation parameters are fixed; callers cannot negotiate them per request.
const TEMPERATURE: f32 = 0.7;
const TOP_K: i32 = 1;
const TOP_P: f32 = 1.0;
const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Google Generative AI client
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GoogleProvider {
    /// Create a new Google provider with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_key)
    }

    /// Create a provider sharing an existing HTTP client
    pub fn with_client(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Point the provider at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a different model id
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Stream a response from Gemini as extracted text fragments.
    ///
    /// A non-success status is returned as [`Error::Upstream`] carrying the
    /// status and the body exactly as received. Nothing is retried.
    pub async fn stream_text(&self, turns: &[Turn]) -> Result<FragmentStream> {
        let request = self.build_request(turns);
        let url = format!(
            "{}/models/{}:streamGenerateContent",
            self.base_url, self.model
        );

        tracing::debug!(model = %self.model, turns = turns.len(), "sending Gemini request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            tracing::error!(status, body = %String::from_utf8_lossy(&body), "Gemini API error");
            return Err(Error::upstream(status, body.to_vec()));
        }

        let body = response.bytes_stream().map(|chunk| chunk.map_err(Error::from));
        Ok(Box::pin(extract_stream(body)))
    }

    /// Shape turns into the Gemini request body
    pub fn build_request(&self, turns: &[Turn]) -> GeminiRequest {
        GeminiRequest {
            contents: turns.iter().map(convert_turn).collect(),
            generation_config: GeminiGenerationConfig {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

fn convert_turn(turn: &Turn) -> GeminiContent {
    GeminiContent {
        role: turn.role,
        parts: turn.parts.clone(),
    }
}

// Request types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: Role,
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_k: i32,
    top_p: f32,
    max_output_tokens: u32,
}
