//! tern - chat with Gemini through a tern relay

mod commands;
mod config;

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tern_chat::{ChatController, ChatSession, JsonFileStore, RelayClient, error_notice};

/// tern - terminal chat client
#[derive(Parser, Debug)]
#[command(name = "tern")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Relay base URL (default: http://127.0.0.1:3000)
    #[arg(long, env = "TERN_RELAY_URL")]
    relay_url: Option<String>,

    /// Directory holding chats.json
    #[arg(long)]
    data_dir: Option<String>,

    /// Open a saved chat by id
    #[arg(long)]
    chat: Option<String>,

    /// List saved chats
    #[arg(long)]
    list: bool,

    /// Run in non-interactive mode with a single prompt
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("tern=debug,tern_chat=debug")
            .with_writer(io::stderr)
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Merge config with CLI args (CLI takes precedence)
    let cfg = config::Config::load();
    let data_dir = args.data_dir.map(PathBuf::from).or_else(|| cfg.data_dir());
    let relay_url = args.relay_url.or(cfg.relay_url);

    let store = match data_dir {
        Some(dir) => JsonFileStore::in_dir(dir),
        None => JsonFileStore::open_default(),
    };
    tracing::debug!(path = %store.path().display(), "using chat store");

    let mut session = ChatSession::open(Box::new(store))?;

    if args.list {
        list_chats(&session);
        return Ok(());
    }

    if let Some(ref id) = args.chat {
        if let Err(e) = session.switch_chat(id) {
            eprintln!("Error: {}", e);
            eprintln!("List saved chats with: tern --list");
            std::process::exit(1);
        }
    }

    let client = match relay_url {
        Some(url) => RelayClient::from_base_url(&url),
        None => RelayClient::default(),
    };
    tracing::debug!(endpoint = client.endpoint(), "relay endpoint");

    let mut controller = ChatController::new(session, client);

    // Non-interactive mode
    if let Some(command) = args.command {
        if let Err(e) = send(&mut controller, &command).await {
            eprintln!("{}", error_notice(&e));
            std::process::exit(1);
        }
        return Ok(());
    }

    run_interactive(&mut controller).await
}

/// Send one message, printing the reply as it streams in
async fn send(controller: &mut ChatController, text: &str) -> tern_chat::Result<String> {
    let result = controller
        .send(text, |fragment| {
            print!("{}", fragment);
            io::stdout().flush().ok();
        })
        .await;
    println!();
    result
}

async fn run_interactive(controller: &mut ChatController) -> anyhow::Result<()> {
    // Show minimal startup info (only if TTY)
    if io::IsTerminal::is_terminal(&io::stderr()) {
        let chat = controller.session().current();
        eprintln!("tern ({}) chat: {}", controller.client().endpoint(), chat.title);
        eprintln!("Type /help for commands.");
        eprintln!();
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        // Handle slash commands
        if let Some(result) = commands::execute_command(input, controller.session_mut()) {
            match result {
                commands::CommandResult::Exit => break,
                commands::CommandResult::Message(msg) => println!("{}", msg),
                commands::CommandResult::Unknown(cmd) => {
                    println!("Unknown command: /{}", cmd);
                    println!("Type /help for available commands.");
                }
            }
            println!();
            continue;
        }

        println!();
        if let Err(e) = send(controller, input).await {
            println!("{}", error_notice(&e));
        }
        println!();
    }

    Ok(())
}

fn list_chats(session: &ChatSession) {
    if session.chats().iter().all(|c| c.messages.is_empty()) {
        println!("No saved chats found.");
        return;
    }

    println!("{:<32} {:<8} Title", "ID", "Msgs");
    println!("{}", "-".repeat(72));
    for chat in session.chats() {
        println!("{:<32} {:<8} {}", chat.id, chat.messages.len(), chat.title);
    }
    println!("\nOpen with: tern --chat <id>");
}
