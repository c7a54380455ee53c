//! Markdown-to-HTML rendering for popchat bot replies.
//!
//! This is deliberately not a CommonMark implementation.  It supports a small
//! subset (bold, italic, `#`..`###` headers, inline code, ordered and
//! unordered lists, paragraphs and line breaks) implemented as an ordered
//! sequence of regular-expression [`stages`].  The stage order determines how
//! overlapping syntax resolves; for example `**1. not a list**` becomes bold
//! text because emphasis runs before list detection.
//!
//! A reply may end with a pre-rendered `<div class='sources-section'>` block.
//! That block is cut off before the stages run and appended verbatim to the
//! result.
//!
//! Rendering never fails: anything the stages do not recognise is passed
//! through unchanged.  The input is treated as trusted; no HTML escaping is
//! performed.

mod patterns;
pub mod sources;
pub mod stages;

pub use sources::split_sources;
pub use stages::{STAGES, Stage};

/// Render a bot reply to HTML.
///
/// # Examples
///
/// ```
/// assert_eq!(
///     popchat_markdown::render("**a** *b*"),
///     "<p><strong>a</strong> <em>b</em></p>"
/// );
/// ```
pub fn render(text: &str) -> String {
    let (body, sources) = split_sources(text);
    if sources.is_some() {
        tracing::trace!(body_len = body.len(), "sources block detached");
    }

    let mut html = render_stages(body, STAGES);
    if let Some(block) = sources {
        html.push_str(block);
    }
    html
}

/// Run `text` through `stages` in order, without sources handling.
pub fn render_stages(text: &str, stages: &[Stage]) -> String {
    stages
        .iter()
        .fold(text.to_owned(), |acc, stage| (stage.apply)(&acc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn sources_only_reply() {
        let block = "<div class='sources-section'>*x*</div>";
        assert_eq!(render(block), block);
    }

    #[test]
    fn stage_prefix_can_be_run_alone() {
        assert_eq!(render_stages("**a** *b*", &STAGES[..1]), "<strong>a</strong> *b*");
    }
}
