//! tern-relay - streams Gemini replies to chat clients as plain text

use clap::Parser;
use std::path::PathBuf;
use tern_relay::{RelayConfig, config};

/// tern-relay - credential-holding Gemini relay
#[derive(Parser, Debug)]
#[command(name = "tern-relay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: ./tern-relay.toml or $TERN_RELAY_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Model id to request
    #[arg(short, long)]
    model: Option<String>,

    /// Print an example config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", config::example_config());
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tern_relay=debug".into()),
        )
        .with_target(false)
        .with_line_number(true)
        .init();

    // CLI args take precedence over file and environment
    let mut cfg = RelayConfig::load(args.config.as_deref());
    if let Some(host) = args.host {
        cfg.host = host;
    }
    if let Some(port) = args.port {
        cfg.port = port;
    }
    if let Some(model) = args.model {
        cfg.model = model;
    }

    tern_relay::serve(cfg, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
