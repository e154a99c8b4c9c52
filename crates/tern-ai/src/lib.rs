//! tern-ai: Gemini conversation types and streaming text extraction
//!
//! This crate shapes conversations for Google's Generative Language API and
//! turns its streamed JSON response into plain text fragments.

pub mod decode;
pub mod error;
pub mod extract;
pub mod providers;
pub mod stream;
pub mod types;

pub use decode::Utf8Decoder;
pub use error::{Error, Result};
pub use extract::{TextExtractor, extract_text};
pub use stream::{FragmentStream, decode_stream, extract_stream};
pub use types::*;
