mod subcommands;


use crate::config::{Config, load_config};
use crate::gateway::GatewayState;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "courtify")]
#[command(about = "Multilingual chat and summarization gateway")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Run the HTTP gateway
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
    /// Run one chat turn (interactive when no message is given)
    Chat {
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Summarize text or a file
    Summarize {
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List credential slots and where each value comes from
    Credentials,
    /// Run configuration diagnostics
    Doctor,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init()?;
        }
        Commands::Serve { host, port } => {
            serve(host, port).await?;
        }
        Commands::Chat { message } => {
            subcommands::chat(message).await?;
        }
        Commands::Summarize { text, file } => {
            subcommands::summarize(text, file).await?;
        }
        Commands::Credentials => {
            subcommands::credentials_command()?;
        }
        Commands::Doctor => {
            crate::cli::doctor::doctor_command()?;
        }
    }

    Ok(())
}

fn init() -> Result<()> {
    println!("Initializing courtify...");

    let config_path = crate::config::get_config_path()?;
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        println!("Overwrite? (y/N): ");
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }

    let config = Config::default();
    crate::config::save_config(&config, Some(config_path.as_path()))?;
    println!("\u{2713} Created config at {}", config_path.display());

    println!("\nNext steps:");
    println!(
        "  1. Add API keys to {} (or export COURTIFY_*_API_KEY)",
        config_path.display()
    );
    println!("  2. Check the setup: courtify doctor");
    println!("  3. Chat: courtify chat -m \"Hola, ¿cómo estás?\"");

    Ok(())
}

/// Applies CLI overrides on top of the loaded gateway settings.
fn apply_serve_overrides(config: &mut Config, host: Option<String>, port: Option<u16>) {
    if let Some(host) = host {
        config.gateway.host = host;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }
}

/// Gateway state from a loaded config. Fails fast on missing credentials.
fn build_state(config: &Config) -> Result<GatewayState> {
    let (chat, summary) = crate::pipeline::from_config(config)
        .with_context(|| "Failed to set up service pipelines")?;
    Ok(GatewayState::new(
        chat,
        summary,
        config.gateway.max_message_bytes,
    ))
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    info!("Loading configuration...");
    let mut config = load_config(None)?;
    apply_serve_overrides(&mut config, host, port);
    config
        .validate()
        .with_context(|| "Configuration validation failed")?;
    debug!("pipeline settings: {:?}", config.pipeline);

    let state = build_state(&config)?;
    let server = crate::gateway::start(&config.gateway.host, config.gateway.port, state).await?;

    println!(
        "courtify {} listening on {}:{}",
        crate::VERSION,
        config.gateway.host,
        config.gateway.port
    );
    info!("gateway is running");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
        }
        _ = server => {}
    }

    Ok(())
}
