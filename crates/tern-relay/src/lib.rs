//! tern-relay: credential-holding relay in front of the Gemini API
//!
//! Accepts a conversation on `POST /api/chat`, attaches the API key, and
//! streams the model's reply back as plain text.

pub mod config;
pub mod error;
pub mod handler;
pub mod server;

pub use config::RelayConfig;
pub use error::RelayError;
pub use server::{AppState, build_router, serve};
