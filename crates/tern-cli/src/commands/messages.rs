//! /messages, /delete-msg - inspect and prune the current chat

use super::CommandResult;
use tern_chat::{ChatRole, ChatSession};

pub struct MessagesCommand;

impl MessagesCommand {
    pub fn list(session: &ChatSession) -> CommandResult {
        let chat = session.current();
        if chat.messages.is_empty() {
            return CommandResult::Message("No messages yet.".to_string());
        }

        let mut output = format!("Messages in \"{}\":\n", chat.title);
        for (i, msg) in chat.messages.iter().enumerate() {
            let role = match msg.role {
                ChatRole::User => "user",
                ChatRole::Ai => "ai",
            };
            let preview: String = msg.text().chars().take(60).collect();
            let preview = preview.replace('\n', " ");
            let images = match msg.image_count() {
                0 => String::new(),
                n => format!(" (+{} image{})", n, if n == 1 { "" } else { "s" }),
            };
            output.push_str(&format!("  {}: [{}] {}{}\n", i + 1, role, preview, images));
        }

        CommandResult::Message(output.trim_end().to_string())
    }

    pub fn delete(args: &str, session: &mut ChatSession) -> CommandResult {
        let Some(index) = args.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
            return CommandResult::Message("Usage: /delete-msg <number> (see /messages)".into());
        };

        match session.delete_message(index) {
            Ok(_) => CommandResult::Message(format!("Deleted message {}.", index + 1)),
            Err(e) => CommandResult::Message(e.to_string()),
        }
    }
}
