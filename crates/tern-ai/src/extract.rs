//! Text extraction from streamed Gemini JSON
//!
//! `streamGenerateContent` without `alt=sse` returns one JSON array written out
//! incrementally, so a transport chunk can start or end anywhere inside it.
//! Rather than parsing the array, each chunk is scanned for complete
//! `"text": "..."` fields and only their values are kept.
//!
//! The scan is stateless per chunk. A field cut by a chunk boundary does not
//! match in either chunk and its content is dropped. Only the UTF-8 decoder
//! carries state forward, so multi-byte characters are never corrupted.

use std::sync::LazyLock;

use regex::Regex;

use crate::decode::Utf8Decoder;

/// A `"text"` key followed by a complete JSON string literal.
static TEXT_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""text":\s*"((?:[^"\\]|\\.)*)""#).expect("text field pattern is valid")
});

/// Concatenate the unescaped values of every complete text field in `chunk`.
///
/// A captured value that is not a valid JSON string (bad escape, raw control
/// character, truncated `\u` sequence) contributes nothing.
pub fn extract_text(chunk: &str) -> String {
    TEXT_FIELD
        .captures_iter(chunk)
        .filter_map(|caps| caps.get(1))
        .map(|value| unescape(value.as_str()))
        .collect()
}

fn unescape(escaped: &str) -> String {
    let literal = format!("\"{}\"", escaped);
    match serde_json::from_str::<String>(&literal) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(error = %e, "dropping unparseable text field");
            String::new()
        }
    }
}

/// Per-response extraction state: the UTF-8 carry and nothing else.
#[derive(Debug, Default)]
pub struct TextExtractor {
    decoder: Utf8Decoder,
}

impl TextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one raw chunk and return the text found in it (possibly empty)
    pub fn push(&mut self, chunk: &[u8]) -> String {
        let decoded = self.decoder.decode(chunk);
        extract_text(&decoded)
    }
}
