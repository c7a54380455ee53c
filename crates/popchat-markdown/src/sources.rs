//! Handling of the pre-rendered sources block that may close a bot reply.

use crate::patterns;

/// Split `text` into the Markdown body and the trailing sources block.
///
/// The block is the leftmost `<div class='sources-section'>` from which the
/// text runs to a final `</div>` at the very end.  Anything after the closing
/// tag, even a newline, means there is no block.
pub fn split_sources(text: &str) -> (&str, Option<&str>) {
    match patterns::sources().find(text) {
        Some(m) => (&text[..m.start()], Some(m.as_str())),
        None => (text, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "<div class='sources-section'><ul><li>a</li></ul></div>";

    #[test]
    fn no_block() {
        assert_eq!(split_sources("hello"), ("hello", None));
    }

    #[test]
    fn block_at_end_is_split_off() {
        let text = format!("body{BLOCK}");
        assert_eq!(split_sources(&text), ("body", Some(BLOCK)));
    }

    #[test]
    fn trailing_newline_disables_extraction() {
        let text = format!("body{BLOCK}\n");
        assert_eq!(split_sources(&text), (text.as_str(), None));
    }

    #[test]
    fn block_may_span_lines() {
        let block = "<div class='sources-section'>\n<b>x</b>\n</div>";
        let text = format!("a\n\n{block}");
        assert_eq!(split_sources(&text), ("a\n\n", Some(block)));
    }

    #[test]
    fn leftmost_opening_tag_wins() {
        let text = "<div class='sources-section'>one</div>mid<div class='sources-section'>two</div>";
        let (body, block) = split_sources(text);
        assert_eq!(body, "");
        assert_eq!(block, Some(text));
    }

    #[test]
    fn double_quoted_class_is_not_a_block() {
        let text = "x<div class=\"sources-section\">a</div>";
        assert_eq!(split_sources(text), (text, None));
    }
}
