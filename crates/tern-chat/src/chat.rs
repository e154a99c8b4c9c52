//! Stored chat records

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use tern_ai::{ContentPart, Role, Turn};

/// Title shown until the first user message arrives
pub const DEFAULT_TITLE: &str = "New Chat";

/// Characters of the first message kept in a chat title
pub const TITLE_MAX_CHARS: usize = 30;

/// Who wrote a stored message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Ai,
}

/// One piece of a stored message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatPart {
    Text {
        text: String,
    },
    /// `data` is a `data:<mime>;base64,<payload>` URL
    Image {
        data: String,
        #[serde(rename = "mimeType", alias = "mime_type")]
        mime_type: String,
    },
}

impl ChatPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Encode raw image bytes as a data URL part
    pub fn image(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        let mime_type = mime_type.into();
        Self::Image {
            data: format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)),
            mime_type,
        }
    }

    fn to_content(&self) -> ContentPart {
        match self {
            ChatPart::Text { text } => ContentPart::text(text.clone()),
            ChatPart::Image { data, mime_type } => {
                // The provider wants the bare base64 payload
                let payload = data.split_once(',').map_or(data.as_str(), |(_, p)| p);
                ContentPart::image(mime_type.clone(), payload)
            }
        }
    }
}

/// A stored message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub parts: Vec<ChatPart>,
}

impl ChatMessage {
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Ai,
            parts: vec![ChatPart::text(text)],
        }
    }

    /// Get combined text content
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ChatPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn image_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, ChatPart::Image { .. }))
            .count()
    }

    /// Shape this message the way the relay expects it
    pub fn to_turn(&self) -> Turn {
        Turn {
            role: match self.role {
                ChatRole::User => Role::User,
                ChatRole::Ai => Role::Model,
            },
            parts: self.parts.iter().map(ChatPart::to_content).collect(),
        }
    }
}

/// One conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl Chat {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    /// Id derived from the current time, e.g. `chat_1718000000000`
    pub fn generate_id() -> String {
        format!("chat_{}", chrono::Utc::now().timestamp_millis())
    }

    /// Relay-shaped copy of the whole history
    pub fn conversation(&self) -> Vec<Turn> {
        self.messages.iter().map(ChatMessage::to_turn).collect()
    }
}

/// Title for a chat whose first message is `text`
pub fn title_from(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
