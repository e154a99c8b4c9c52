//! Drives one send: session bookkeeping around a streamed relay reply

use futures::StreamExt;

use crate::{
    client::RelayClient,
    error::{Error, Result},
    session::ChatSession,
};

/// Shown in place of a reply when anything goes wrong
pub const ERROR_NOTICE: &str = "Sorry, an error occurred.";

/// User-facing text for a failed reply
pub fn error_notice(err: &Error) -> String {
    format!("{} (Error: {})", ERROR_NOTICE, err)
}

/// Owns the session and the relay client
#[derive(Debug)]
pub struct ChatController {
    session: ChatSession,
    client: RelayClient,
}

impl ChatController {
    pub fn new(session: ChatSession, client: RelayClient) -> Self {
        Self { session, client }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    pub fn client(&self) -> &RelayClient {
        &self.client
    }

    /// Send `text` (plus any attached images) in the current chat.
    ///
    /// `on_fragment` sees each piece of the reply as it arrives. On success the
    /// full reply is stored and returned. On failure nothing is stored for the
    /// reply, the session accepts input again, and the error is returned.
    pub async fn send<F>(&mut self, text: &str, mut on_fragment: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        let conversation = self.session.begin_send(text)?;

        match self.stream_reply(&conversation, &mut on_fragment).await {
            Ok(reply) => {
                self.session.finish_reply(reply.clone());
                Ok(reply)
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching reply");
                self.session.fail_reply();
                Err(e)
            }
        }
    }

    async fn stream_reply<F>(
        &self,
        conversation: &[tern_ai::Turn],
        on_fragment: &mut F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        let mut stream = self.client.send(conversation).await?;
        let mut reply = String::new();

        while let Some(piece) = stream.next().await {
            let piece = piece?;
            reply.push_str(&piece);
            on_fragment(&piece);
        }

        Ok(reply)
    }
}
