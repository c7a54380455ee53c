//! Shared helper functions used across CLI subcommands.
//!
//! Includes tracing initialization and transcript printing.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use popchat_client::Transcript;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the tracing subscriber on stderr with the given default level.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Initialize the tracing subscriber writing to `path`.
///
/// Used while the terminal belongs to the TUI.
pub fn init_file_tracing(path: &Path, default_level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Format a transcript for stdout, one labelled block per message.
///
/// With `html`, each message is printed as the widget's message bubble, a
/// `<div>` carrying the sender's CSS class around the message HTML.
/// Otherwise bot replies are flattened to text.
pub fn format_transcript(transcript: &Transcript, html: bool) -> String {
    let mut out = String::new();
    for message in transcript.messages() {
        if html {
            out.push_str(&format!(
                "<div class=\"{}\">{}</div>\n",
                message.sender.css_class(),
                message.to_html()
            ));
        } else {
            let body = popchat_tui::message_text(message, 80);
            out.push_str(&format!("[{}] {}\n", message.sender.label(), body));
        }
    }
    out
}
