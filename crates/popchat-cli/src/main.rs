//! CLI entry point for popchat.
//!
//! This binary provides the `popchat` command with subcommands for the
//! interactive popup, one-shot questions, Markdown rendering and config
//! inspection.

mod cli;
mod helpers;
mod settings;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use popchat_client::{ChatController, Credentials, HttpBackend, LoginOutcome, SendOutcome};

use crate::cli::{Cli, Commands};
use crate::helpers::{format_transcript, init_file_tracing, init_tracing};
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui {
        no_mouse: false,
        log_file: PathBuf::from("popchat.log"),
    });

    match command {
        Commands::Tui { no_mouse, log_file } => {
            init_file_tracing(&log_file, "info")?;
            let settings = settings::load(&cli.global)?;
            cmd_tui(settings, no_mouse).await
        }
        Commands::Render { file } => {
            init_tracing("warn");
            cmd_render(file)
        }
        Commands::Ask {
            username,
            password,
            html,
            message,
        } => {
            init_tracing("warn");
            let settings = settings::load(&cli.global)?;
            cmd_ask(settings, Credentials::new(username, password), &message, html).await
        }
        Commands::Config => {
            init_tracing("warn");
            let settings = settings::load(&cli.global)?;
            cmd_config(&settings)
        }
    }
}

fn controller(settings: &Settings) -> Result<ChatController> {
    let backend = HttpBackend::new(&settings.client).context("failed to build HTTP client")?;
    Ok(ChatController::new(settings.client.clone(), Arc::new(backend)))
}

// ---------------------------------------------------------------------------
// Subcommand: tui
// ---------------------------------------------------------------------------

async fn cmd_tui(settings: Settings, no_mouse: bool) -> Result<()> {
    let mut tui = settings.tui.clone();
    if no_mouse {
        tui.mouse = false;
    }
    info!(base_url = %settings.client.base_url, "starting popchat");
    let controller = controller(&settings)?;
    popchat_tui::run_tui(controller, tui)
        .await
        .context("terminal UI failed")
}

// ---------------------------------------------------------------------------
// Subcommand: render
// ---------------------------------------------------------------------------

fn cmd_render(file: Option<PathBuf>) -> Result<()> {
    let input = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    println!("{}", popchat_markdown::render(&input));
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: ask
// ---------------------------------------------------------------------------

async fn cmd_ask(
    settings: Settings,
    credentials: Credentials,
    message: &str,
    html: bool,
) -> Result<()> {
    let mut controller = controller(&settings)?;
    controller.toggle_popup();

    let login = controller.submit_login(&credentials).await;
    if login != LoginOutcome::Succeeded {
        print!("{}", format_transcript(controller.transcript(), html));
        bail!("login failed for {}", credentials.username);
    }

    let outcome = controller.send_message(message).await;
    print!("{}", format_transcript(controller.transcript(), html));
    match outcome {
        Some(SendOutcome::Replied) => Ok(()),
        Some(SendOutcome::Failed) => bail!("the assistant did not reply"),
        None => bail!("nothing to send"),
    }
}

// ---------------------------------------------------------------------------
// Subcommand: config
// ---------------------------------------------------------------------------

fn cmd_config(settings: &Settings) -> Result<()> {
    let text = toml::to_string_pretty(settings).context("failed to serialize config")?;
    print!("{text}");
    Ok(())
}
