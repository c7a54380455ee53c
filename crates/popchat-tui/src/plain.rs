//! Plain-text rendering of transcript messages for the terminal.

use popchat_client::{Message, Sender};

/// The text to show for `message` in a column `width` cells wide.
///
/// Bot replies are rendered to HTML and then flattened with `html2text`.
/// User and system lines are shown as typed; they are never parsed as
/// markup.
pub fn message_text(message: &Message, width: usize) -> String {
    match message.sender {
        Sender::Bot => {
            let html = message.to_html();
            match html2text::from_read(html.as_bytes(), width.max(1)) {
                Ok(text) => text.trim_end().to_owned(),
                Err(err) => {
                    tracing::warn!(error = %err, "could not flatten bot reply");
                    message.body.clone()
                }
            }
        }
        Sender::User | Sender::System => message.body.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_markup_is_shown_literally() {
        let msg = Message::user("<b>hi</b> **there**");
        assert_eq!(message_text(&msg, 80), "<b>hi</b> **there**");
    }

    #[test]
    fn bot_markdown_is_flattened() {
        let text = message_text(&Message::bot("* Checking\n* Savings"), 80);
        assert!(text.contains("Checking"));
        assert!(text.contains("Savings"));
        assert!(!text.contains("<li>"));
    }

    #[test]
    fn bot_sources_block_keeps_its_text() {
        let msg = Message::bot("Done<div class='sources-section'><p>FAQ page</p></div>");
        let text = message_text(&msg, 80);
        assert!(text.contains("Done"));
        assert!(text.contains("FAQ page"));
    }
}
