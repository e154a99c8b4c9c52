//! Incremental UTF-8 decoding across chunk boundaries

use encoding_rs::{CoderResult, Decoder, UTF_8};

/// Streaming UTF-8 decoder.
///
/// Bytes of a character split across two chunks are held back until the rest
/// arrives. Invalid sequences decode to U+FFFD, one per maximal invalid
/// subpart, the same output a browser `TextDecoder` gives in streaming mode.
pub struct Utf8Decoder {
    inner: Decoder,
}

impl Utf8Decoder {
    /// Create a decoder with no pending bytes
    pub fn new() -> Self {
        Self {
            inner: UTF_8.new_decoder(),
        }
    }

    /// Decode one chunk, keeping an incomplete trailing sequence for later
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        decode_into(&mut self.inner, chunk, false)
    }

    /// Flush at end of stream. A dangling partial sequence becomes U+FFFD.
    ///
    /// The decoder is reset afterwards and can take a new stream.
    pub fn finish(&mut self) -> String {
        let mut done = std::mem::replace(&mut self.inner, UTF_8.new_decoder());
        decode_into(&mut done, &[], true)
    }
}

fn decode_into(decoder: &mut Decoder, mut bytes: &[u8], last: bool) -> String {
    let capacity = decoder.max_utf8_buffer_length(bytes.len()).unwrap_or(32);
    let mut out = String::with_capacity(capacity);

    loop {
        let (result, read, _had_errors) = decoder.decode_to_string(bytes, &mut out, last);
        bytes = &bytes[read..];
        match result {
            CoderResult::InputEmpty => return out,
            CoderResult::OutputFull => {
                let more = decoder.max_utf8_buffer_length(bytes.len()).unwrap_or(32);
                out.reserve(more);
            }
        }
    }
}

impl Default for Utf8Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Utf8Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Utf8Decoder").finish_non_exhaustive()
    }
}
