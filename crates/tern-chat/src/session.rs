//! Session context: the chat list, the active chat, and the in-flight reply

use tern_ai::Conversation;

use crate::{
    chat::{Chat, ChatMessage, ChatPart, ChatRole, title_from},
    error::{Error, Result},
    store::ChatStore,
};

/// Most images that can wait to be sent with one message
pub const MAX_PENDING_IMAGES: usize = 10;

/// All client-side chat state.
///
/// Lives for the whole process and changes only through the methods below.
/// There is always at least one chat and `current_id` always names one of them.
pub struct ChatSession {
    chats: Vec<Chat>,
    current_id: String,
    /// Chat whose reply is being generated
    generating: Option<String>,
    pending_images: Vec<ChatPart>,
    store: Box<dyn ChatStore>,
}

impl ChatSession {
    /// Load saved chats and select the newest, or start a fresh one
    pub fn open(store: Box<dyn ChatStore>) -> Result<Self> {
        let chats = store.load()?;
        tracing::debug!(chats = chats.len(), "loaded chats");

        let mut session = Self {
            current_id: String::new(),
            chats,
            generating: None,
            pending_images: Vec::new(),
            store,
        };

        match session.chats.first().map(|c| c.id.clone()) {
            Some(id) => session.current_id = id,
            None => {
                session.new_chat();
            }
        }
        Ok(session)
    }

    /// All chats, newest first
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn current_id(&self) -> &str {
        &self.current_id
    }

    pub fn current(&self) -> &Chat {
        &self.chats[self.current_index()]
    }

    /// Whether a reply is being generated
    pub fn is_generating(&self) -> bool {
        self.generating.is_some()
    }

    pub fn pending_images(&self) -> usize {
        self.pending_images.len()
    }

    /// Start an empty chat at the top of the list and make it current
    pub fn new_chat(&mut self) -> &Chat {
        let mut id = Chat::generate_id();
        if self.find(&id).is_some() {
            id = format!("{}_{}", id, uuid::Uuid::new_v4().simple());
        }

        self.chats.insert(0, Chat::new(id.clone()));
        self.current_id = id;
        self.pending_images.clear();
        &self.chats[0]
    }

    /// Make an existing chat current
    pub fn switch_chat(&mut self, id: &str) -> Result<()> {
        if self.find(id).is_none() {
            return Err(Error::ChatNotFound(id.to_string()));
        }
        self.current_id = id.to_string();
        self.pending_images.clear();
        Ok(())
    }

    /// Remove a chat. If it was current, fall back to the newest remaining chat
    /// or a new one.
    pub fn delete_chat(&mut self, id: &str) -> Result<Chat> {
        let index = self
            .find(id)
            .ok_or_else(|| Error::ChatNotFound(id.to_string()))?;
        let removed = self.chats.remove(index);

        if self.generating.as_deref() == Some(id) {
            tracing::debug!(chat = %id, "deleted chat with reply in flight");
        }

        self.persist();

        if self.current_id == id {
            match self.chats.first().map(|c| c.id.clone()) {
                Some(first) => self.switch_chat(&first)?,
                None => {
                    self.new_chat();
                }
            }
        }
        Ok(removed)
    }

    /// Remove one message from the current chat
    pub fn delete_message(&mut self, index: usize) -> Result<ChatMessage> {
        if self.is_generating() {
            return Err(Error::Busy);
        }

        let current = self.current_index();
        let messages = &mut self.chats[current].messages;
        if index >= messages.len() {
            return Err(Error::MessageNotFound(index));
        }
        let removed = messages.remove(index);
        self.persist();
        Ok(removed)
    }

    /// Queue an image to go out with the next message
    pub fn attach_image(&mut self, mime_type: &str, bytes: &[u8]) -> Result<()> {
        if self.pending_images.len() >= MAX_PENDING_IMAGES {
            return Err(Error::TooManyImages {
                max: MAX_PENDING_IMAGES,
            });
        }
        self.pending_images.push(ChatPart::image(mime_type, bytes));
        Ok(())
    }

    /// Drop one queued image before it is sent
    pub fn remove_image(&mut self, index: usize) -> Result<()> {
        if index >= self.pending_images.len() {
            return Err(Error::ImageNotFound(index));
        }
        self.pending_images.remove(index);
        Ok(())
    }

    /// Drop every queued image
    pub fn clear_images(&mut self) {
        self.pending_images.clear();
    }

    /// Record the user's message and return the history to send.
    ///
    /// Rejected (not queued) while another reply is being generated.
    pub fn begin_send(&mut self, text: &str) -> Result<Conversation> {
        if self.is_generating() {
            return Err(Error::Busy);
        }

        let text = text.trim();
        if text.is_empty() && self.pending_images.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let mut parts = Vec::with_capacity(1 + self.pending_images.len());
        if !text.is_empty() {
            parts.push(ChatPart::text(text));
        }
        parts.append(&mut self.pending_images);

        let current = self.current_index();
        let chat = &mut self.chats[current];
        if chat.messages.is_empty() && !text.is_empty() {
            chat.title = title_from(text);
        }
        chat.messages.push(ChatMessage {
            role: ChatRole::User,
            parts,
        });
        let conversation = chat.conversation();

        self.generating = Some(self.current_id.clone());
        self.persist();
        Ok(conversation)
    }

    /// Store the finished reply in the chat it was generated for
    pub fn finish_reply(&mut self, text: impl Into<String>) {
        let Some(id) = self.generating.take() else {
            tracing::warn!("reply finished with no send in progress");
            return;
        };

        match self.find(&id) {
            Some(index) => {
                self.chats[index].messages.push(ChatMessage::ai(text));
                self.persist();
            }
            None => tracing::debug!(chat = %id, "dropping reply for deleted chat"),
        }
    }

    /// Give up on the in-flight reply; the user's message stays
    pub fn fail_reply(&mut self) {
        self.generating = None;
    }

    fn find(&self, id: &str) -> Option<usize> {
        self.chats.iter().position(|c| c.id == id)
    }

    fn current_index(&self) -> usize {
        self.find(&self.current_id).unwrap_or(0)
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.chats) {
            tracing::warn!(error = %e, "failed to save chats");
        }
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("chats", &self.chats.len())
            .field("current_id", &self.current_id)
            .field("generating", &self.generating)
            .field("pending_images", &self.pending_images.len())
            .finish()
    }
}
