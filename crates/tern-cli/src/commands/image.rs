//! /image - queue image files for the next message

use super::CommandResult;
use std::path::Path;
use tern_chat::{ChatSession, Error};

const USAGE: &str = "Usage: /image <path> | /image rm <n> | /image clear";

pub struct ImageCommand;

impl ImageCommand {
    pub fn execute(args: &str, session: &mut ChatSession) -> CommandResult {
        let (sub, rest) = args.split_once(' ').unwrap_or((args, ""));
        match sub {
            "" => CommandResult::Message(USAGE.to_string()),
            "clear" => {
                session.clear_images();
                CommandResult::Message("Removed all pending images.".to_string())
            }
            "rm" | "remove" => Self::remove(rest.trim(), session),
            _ => Self::attach(args, session),
        }
    }

    fn remove(args: &str, session: &mut ChatSession) -> CommandResult {
        let Some(index) = args.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
            return CommandResult::Message(USAGE.to_string());
        };

        match session.remove_image(index) {
            Ok(()) => CommandResult::Message(format!(
                "Removed image {} ({} pending)",
                index + 1,
                session.pending_images()
            )),
            Err(Error::ImageNotFound(_)) => {
                CommandResult::Message(format!("No pending image {}", index + 1))
            }
            Err(e) => CommandResult::Message(e.to_string()),
        }
    }

    fn attach(args: &str, session: &mut ChatSession) -> CommandResult {
        let path = Path::new(args);
        let Some(mime_type) = mime_type_for(path) else {
            return CommandResult::Message(format!(
                "Unsupported image type: {} (png, jpg, gif, webp)",
                path.display()
            ));
        };

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => return CommandResult::Message(format!("Cannot read {}: {}", path.display(), e)),
        };

        match session.attach_image(mime_type, &bytes) {
            Ok(()) => CommandResult::Message(format!(
                "Attached {} ({} pending)",
                path.display(),
                session.pending_images()
            )),
            Err(e) => CommandResult::Message(e.to_string()),
        }
    }
}

/// Guess an image mime type from the file extension
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_chat::MemoryStore;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("cat.PNG")), Some("image/png"));
        assert_eq!(mime_type_for(Path::new("a/b/photo.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("notes.txt")), None);
        assert_eq!(mime_type_for(Path::new("no_extension")), None);
    }

    #[test]
    fn test_attach_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        let mut session = ChatSession::open(Box::new(MemoryStore::new())).unwrap();
        ImageCommand::execute(path.to_str().unwrap(), &mut session);
        assert_eq!(session.pending_images(), 1);
    }

    #[test]
    fn test_rm_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        std::fs::write(&path, b"png").unwrap();
        let path = path.to_str().unwrap();

        let mut session = ChatSession::open(Box::new(MemoryStore::new())).unwrap();
        for _ in 0..3 {
            ImageCommand::execute(path, &mut session);
        }

        let CommandResult::Message(text) = ImageCommand::execute("rm 2", &mut session) else {
            panic!("expected message");
        };
        assert_eq!(text, "Removed image 2 (2 pending)");

        let CommandResult::Message(text) = ImageCommand::execute("rm 3", &mut session) else {
            panic!("expected message");
        };
        assert_eq!(text, "No pending image 3");

        ImageCommand::execute("clear", &mut session);
        assert_eq!(session.pending_images(), 0);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let mut session = ChatSession::open(Box::new(MemoryStore::new())).unwrap();
        let CommandResult::Message(text) = ImageCommand::execute("/nonexistent/x.png", &mut session)
        else {
            panic!("expected message");
        };
        assert!(text.starts_with("Cannot read /nonexistent/x.png"));
        assert_eq!(session.pending_images(), 0);
    }
}
