//! Slash commands for interactive mode

mod chats;
mod image;
mod messages;

pub use chats::ChatsCommand;
pub use image::ImageCommand;
pub use messages::MessagesCommand;

use tern_chat::ChatSession;

/// Result of executing a slash command
#[derive(Debug)]
pub enum CommandResult {
    /// Show a message to the user (not sent to the relay)
    Message(String),
    /// Exit the application
    Exit,
    /// Unknown command
    Unknown(String),
}

/// Parse and execute a slash command
pub fn execute_command(input: &str, session: &mut ChatSession) -> Option<CommandResult> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let parts: Vec<&str> = rest.splitn(2, ' ').collect();
    let command = parts[0].to_lowercase();
    let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

    Some(match command.as_str() {
        "help" | "h" | "?" => CommandResult::Message(help_message()),

        "quit" | "exit" | "q" => CommandResult::Exit,

        "new" | "n" => {
            let chat = session.new_chat();
            CommandResult::Message(format!("Started {}", chat.id))
        }

        "chats" | "ls" => ChatsCommand::list(session),

        "switch" | "s" => ChatsCommand::switch(args, session),

        "delete" | "rm" => ChatsCommand::delete(args, session),

        "messages" | "m" => MessagesCommand::list(session),

        "delete-msg" | "dm" => MessagesCommand::delete(args, session),

        "image" | "i" => ImageCommand::execute(args, session),

        _ => CommandResult::Unknown(command),
    })
}

fn help_message() -> String {
    r#"Available commands:
  /help, /h, /?            Show this help message
  /new, /n                 Start a new chat
  /chats, /ls              List chats (current marked with *)
  /switch, /s <n|id>       Switch to a chat by list number or id
  /delete, /rm <n|id>      Delete a chat
  /messages, /m            List messages in the current chat
  /delete-msg, /dm <n>     Delete a message by its number
  /image, /i <path>        Attach an image to the next message (max 10)
  /image rm <n>            Remove a pending image
  /image clear             Remove all pending images
  /quit, /exit, /q         Exit tern

Anything else is sent to the model."#
        .to_string()
}
