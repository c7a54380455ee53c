//! Transcript messages and their HTML form.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who a transcript line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    System,
}

impl Sender {
    /// CSS class of the message bubble.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::User => "user-message",
            Self::Bot => "bot-message",
            Self::System => "system-message",
        }
    }

    /// Short label used by text front ends.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Bot => "Bot",
            Self::System => "System",
        }
    }
}

/// One immutable transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub sender: Sender,
    /// Raw body.  Markdown for bot replies, plain text for user input,
    /// fixed status text for system lines.
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, body: impl Into<String>) -> Self {
        Self {
            sender,
            body: body.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn user(body: impl Into<String>) -> Self {
        Self::new(Sender::User, body)
    }

    pub fn bot(body: impl Into<String>) -> Self {
        Self::new(Sender::Bot, body)
    }

    pub fn system(body: impl Into<String>) -> Self {
        Self::new(Sender::System, body)
    }

    /// HTML for the message body.
    ///
    /// Bot replies go through the Markdown renderer and are trusted.  User
    /// input is always escaped and never rendered.  System lines are fixed
    /// strings produced by this crate and are emitted as-is.
    pub fn to_html(&self) -> String {
        match self.sender {
            Sender::Bot => popchat_markdown::render(&self.body),
            Sender::User => escape_html(&self.body),
            Sender::System => self.body.clone(),
        }
    }
}

/// Escape text for use as HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
