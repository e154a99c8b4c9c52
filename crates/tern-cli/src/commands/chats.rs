//! /chats, /switch, /delete - manage chat threads

use super::CommandResult;
use tern_chat::ChatSession;

pub struct ChatsCommand;

impl ChatsCommand {
    pub fn list(session: &ChatSession) -> CommandResult {
        let mut output = String::from("Chats\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');

        for (i, chat) in session.chats().iter().enumerate() {
            let marker = if chat.id == session.current_id() { "*" } else { " " };
            output.push_str(&format!(
                "{} {:>2}. {} ({} messages) [{}]\n",
                marker,
                i + 1,
                chat.title,
                chat.messages.len(),
                chat.id
            ));
        }

        CommandResult::Message(output.trim_end().to_string())
    }

    pub fn switch(args: &str, session: &mut ChatSession) -> CommandResult {
        let Some(id) = resolve(args, session) else {
            return CommandResult::Message(usage("switch"));
        };

        match session.switch_chat(&id) {
            Ok(()) => CommandResult::Message(format!("Switched to: {}", session.current().title)),
            Err(e) => CommandResult::Message(e.to_string()),
        }
    }

    pub fn delete(args: &str, session: &mut ChatSession) -> CommandResult {
        let Some(id) = resolve(args, session) else {
            return CommandResult::Message(usage("delete"));
        };

        match session.delete_chat(&id) {
            Ok(removed) => CommandResult::Message(format!(
                "Deleted \"{}\". Current chat: {}",
                removed.title,
                session.current().title
            )),
            Err(e) => CommandResult::Message(e.to_string()),
        }
    }
}

/// Accept a 1-based list number or a chat id
fn resolve(args: &str, session: &ChatSession) -> Option<String> {
    if args.is_empty() {
        return None;
    }

    if let Ok(n) = args.parse::<usize>() {
        if let Some(chat) = n.checked_sub(1).and_then(|i| session.chats().get(i)) {
            return Some(chat.id.clone());
        }
    }

    Some(args.to_string())
}

fn usage(command: &str) -> String {
    format!("Usage: /{} <number|id> (see /chats)", command)
}
