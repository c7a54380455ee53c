//! CLI argument definitions for popchat.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// popchat -- a terminal chat popup for the banking assistant.
#[derive(Parser)]
#[command(
    name = "popchat",
    version,
    about = "popchat -- chat with the banking assistant from your terminal",
    long_about = "A small chat client that logs in to the assistant backend, sends \
                  messages and renders the Markdown replies."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Defaults to `tui`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Configuration file.  A missing file means built-in defaults.
    #[arg(long, short, global = true, default_value = "config/popchat.toml")]
    pub config: PathBuf,

    /// Backend origin, overriding the file and `POPCHAT_BASE_URL`.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Delay before the welcome line, in milliseconds.
    #[arg(long, global = true)]
    pub welcome_delay_ms: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive chat popup.
    Tui {
        /// Disable mouse capture (no drag or resize).
        #[arg(long)]
        no_mouse: bool,

        /// Log file for the session.
        #[arg(long, default_value = "popchat.log")]
        log_file: PathBuf,
    },

    /// Render Markdown to HTML the way bot replies are rendered.
    Render {
        /// Input file; reads stdin when omitted.
        file: Option<PathBuf>,
    },

    /// Log in, send one message and print the conversation.
    Ask {
        /// Account username.
        #[arg(long, short)]
        username: String,

        /// Account password.
        #[arg(long, short)]
        password: String,

        /// Print the transcript as HTML message bubbles instead of plain text.
        #[arg(long)]
        html: bool,

        /// The message to send.
        message: String,
    },

    /// Print the effective configuration as TOML.
    Config,
}
