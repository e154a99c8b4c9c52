//! Error types for tern-chat

use thiserror::Error;

/// Result type alias using tern-chat Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while chatting
#[derive(Error, Debug)]
pub enum Error {
    /// The relay answered with a non-success status
    #[error("API Error ({status}): {body}")]
    Relay { status: u16, body: String },

    /// HTTP request or body stream failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading or writing saved chats failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Saved chats could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A reply is already being generated
    #[error("A response is still being generated")]
    Busy,

    /// Nothing to send
    #[error("Message is empty")]
    EmptyMessage,

    /// Attachment limit reached
    #[error("You can upload a maximum of {max} images")]
    TooManyImages { max: usize },

    /// No chat with this id
    #[error("Chat not found: {0}")]
    ChatNotFound(String),

    /// No message at this index in the current chat
    #[error("Message not found: {0}")]
    MessageNotFound(usize),

    /// No pending image at this index
    #[error("Image not found: {0}")]
    ImageNotFound(usize),
}
