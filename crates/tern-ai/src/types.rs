//! Conversation types shared by the relay and the chat client

use serde::{Deserialize, Deserializer, Serialize};

/// Speaker of a turn, as the provider sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// The assistant. Chat clients commonly store this as `"ai"`.
    #[serde(alias = "ai", alias = "assistant")]
    Model,
}

/// Base64 payload forwarded to the provider without inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineData {
    #[serde(alias = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

/// One part of a turn's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    /// Text content
    Text { text: String },
    /// Image content (base64 encoded, no data-URL prefix)
    InlineData {
        #[serde(alias = "inlineData")]
        inline_data: InlineData,
    },
}

impl ContentPart {
    /// Create text content
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create image content from base64 data
    pub fn image(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }

    /// Get text if this is text content
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    #[serde(alias = "content", deserialize_with = "deserialize_parts")]
    pub parts: Vec<ContentPart>,
}

impl Turn {
    /// Create a user turn with a single text part
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![ContentPart::text(text)],
        }
    }

    /// Create a model turn with a single text part
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![ContentPart::text(text)],
        }
    }

    /// Get combined text content
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.as_text())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Ordered turns of one chat. Alternation is not enforced.
pub type Conversation = Vec<Turn>;

/// Body accepted by the relay's chat endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Conversation,
}

/// Accepts either a part list or a bare string, which becomes one text part.
fn deserialize_parts<'de, D>(deserializer: D) -> std::result::Result<Vec<ContentPart>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Parts {
        Text(String),
        List(Vec<ContentPart>),
    }

    Ok(match Parts::deserialize(deserializer)? {
        Parts::Text(text) => vec![ContentPart::Text { text }],
        Parts::List(parts) => parts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ai_role_maps_to_model() {
        let turn: Turn = serde_json::from_value(json!({
            "role": "ai",
            "parts": [{ "text": "hello" }]
        }))
        .unwrap();
        assert_eq!(turn.role, Role::Model);
        assert_eq!(serde_json::to_value(&turn).unwrap()["role"], "model");
    }

    #[test]
    fn test_string_content_becomes_text_part() {
        let turn: Turn =
            serde_json::from_value(json!({ "role": "user", "content": "hi" })).unwrap();
        assert_eq!(turn, Turn::user("hi"));
    }

    #[test]
    fn test_inline_data_accepts_camel_case() {
        let turn: Turn = serde_json::from_value(json!({
            "role": "user",
            "parts": [
                { "text": "what is this?" },
                { "inlineData": { "mimeType": "image/png", "data": "iVBORw0K" } }
            ]
        }))
        .unwrap();

        assert_eq!(turn.parts[1], ContentPart::image("image/png", "iVBORw0K"));
        assert_eq!(
            serde_json::to_value(&turn.parts[1]).unwrap(),
            json!({ "inline_data": { "mime_type": "image/png", "data": "iVBORw0K" } })
        );
    }

    #[test]
    fn test_turn_text_skips_images() {
        let turn = Turn {
            role: Role::User,
            parts: vec![
                ContentPart::text("a"),
                ContentPart::image("image/jpeg", "xyz"),
                ContentPart::text("b"),
            ],
        };
        assert_eq!(turn.text(), "ab");
    }

    #[test]
    fn test_chat_request_round_trips_messages() {
        let body = r#"{"messages":[{"role":"user","parts":[{"text":"Hi"}]},{"role":"model","parts":[{"text":"Hello"}]}]}"#;
        let request: ChatRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.messages, vec![Turn::user("Hi"), Turn::model("Hello")]);
    }
}
