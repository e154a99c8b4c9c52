//! tern-chat: chat sessions and a streaming relay client
//!
//! This crate holds the client side of tern: the list of chats and which one
//! is active, their persistence, and the HTTP client that streams replies from
//! the relay.

pub mod chat;
pub mod client;
pub mod controller;
pub mod error;
pub mod session;
pub mod store;

pub use chat::{Chat, ChatMessage, ChatPart, ChatRole};
pub use client::{RelayClient, TextStream};
pub use controller::{ChatController, error_notice};
pub use error::{Error, Result};
pub use session::ChatSession;
pub use store::{ChatStore, JsonFileStore, MemoryStore};
