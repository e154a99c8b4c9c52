//! Persistence for the chat list

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::{chat::Chat, error::Result};

/// File holding all chats
pub const CHATS_FILE_NAME: &str = "chats.json";

/// Loads and saves the whole chat list at once.
///
/// Saves are synchronous and last-writer-wins; there is no locking between
/// processes sharing a store.
pub trait ChatStore: Send + Sync {
    /// Load every saved chat, newest first. A store with nothing saved yields
    /// an empty list.
    fn load(&self) -> Result<Vec<Chat>>;

    /// Replace the saved list with `chats`
    fn save(&self, chats: &[Chat]) -> Result<()>;
}

/// Chats kept as one JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Get the default data directory
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tern")
    }

    /// Store under the default data directory
    pub fn open_default() -> Self {
        Self::in_dir(Self::data_dir())
    }

    /// Store at `<dir>/chats.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CHATS_FILE_NAME))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChatStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Chat>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, chats: &[Chat]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string(chats)?;
        fs::write(&self.path, content)?;
        tracing::trace!(path = %self.path.display(), chats = chats.len(), "saved chats");
        Ok(())
    }
}

/// In-memory store, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    chats: Mutex<Vec<Chat>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with some chats already "saved"
    pub fn with_chats(chats: Vec<Chat>) -> Self {
        Self {
            chats: Mutex::new(chats),
        }
    }

    /// Snapshot of what was last saved
    pub fn saved(&self) -> Vec<Chat> {
        self.chats.lock().clone()
    }
}

impl ChatStore for MemoryStore {
    fn load(&self) -> Result<Vec<Chat>> {
        Ok(self.saved())
    }

    fn save(&self, chats: &[Chat]) -> Result<()> {
        *self.chats.lock() = chats.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatMessage, ChatPart, ChatRole};

    fn sample_chats() -> Vec<Chat> {
        let mut chat = Chat::new("chat_2");
        chat.title = "Rust lifetimes".into();
        chat.messages.push(ChatMessage {
            role: ChatRole::User,
            parts: vec![ChatPart::text("Explain lifetimes")],
        });
        chat.messages.push(ChatMessage::ai("Lifetimes describe..."));
        vec![chat, Chat::new("chat_1")]
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path().join("nested"));

        store.save(&sample_chats()).unwrap();
        assert_eq!(store.load().unwrap(), sample_chats());
    }

    #[test]
    fn test_last_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let a = JsonFileStore::in_dir(dir.path());
        let b = JsonFileStore::in_dir(dir.path());

        a.save(&sample_chats()).unwrap();
        b.save(&[Chat::new("chat_9")]).unwrap();

        let loaded = a.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "chat_9");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), "[{\"id\":").unwrap();
        assert!(matches!(store.load(), Err(crate::Error::Json(_))));
    }

    #[test]
    fn test_reads_browser_export_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(
            store.path(),
            r#"[{"id":"chat_1718000000000","title":"Hello","messages":[{"role":"user","parts":[{"type":"text","text":"Hello"}]},{"role":"ai","parts":[{"type":"text","text":"Hi!"}]}]}]"#,
        )
        .unwrap();

        let chats = store.load().unwrap();
        assert_eq!(chats[0].messages[1], ChatMessage::ai("Hi!"));
    }
}
