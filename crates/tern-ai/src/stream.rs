//! Stream adapters over raw response bodies

use std::pin::Pin;

use async_stream::stream;
use futures::{StreamExt, pin_mut};
use tokio_stream::Stream;

use crate::{decode::Utf8Decoder, error::Result, extract::TextExtractor};

/// A stream of extracted text fragments, one per upstream chunk
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Turn a stream of raw Gemini body chunks into text fragments.
///
/// Exactly one fragment is produced per input chunk, in arrival order, even
/// when the chunk holds no complete text field. A transport error is passed
/// through once and ends the stream.
pub fn extract_stream<S, B, E>(chunks: S) -> impl Stream<Item = std::result::Result<String, E>>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
{
    stream! {
        let mut extractor = TextExtractor::new();
        let mut received = 0usize;
        pin_mut!(chunks);

        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(bytes) => {
                    received += 1;
                    yield Ok(extractor.push(bytes.as_ref()));
                }
                Err(e) => {
                    tracing::warn!(chunks = received, "upstream stream failed");
                    yield Err(e);
                    return;
                }
            }
        }

        tracing::debug!(chunks = received, "upstream stream finished");
    }
}

/// Decode a plain-text body incrementally, flushing the decoder at the end.
///
/// Empty pieces (a chunk that only held part of a character) are skipped.
pub fn decode_stream<S, B, E>(chunks: S) -> impl Stream<Item = std::result::Result<String, E>>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
{
    stream! {
        let mut decoder = Utf8Decoder::new();
        pin_mut!(chunks);

        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(bytes) => {
                    let text = decoder.decode(bytes.as_ref());
                    if !text.is_empty() {
                        yield Ok(text);
                    }
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            yield Ok(tail);
        }
    }
}
