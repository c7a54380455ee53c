//! Compiled regular expressions shared by the rendering stages.
//!
//! The character classes reproduce the dialect the chat widget's replies were
//! authored against: digits are ASCII only, "any character" stops at every
//! line terminator (`\n`, `\r`, U+2028, U+2029), and whitespace is the
//! ECMAScript white-space plus line-terminator set.

use std::sync::OnceLock;

use regex::Regex;

/// Any single character except a line terminator.
const DOT: &str = r"[^\n\r\x{2028}\x{2029}]";

/// One whitespace character, line terminators included.
const SPACE: &str = r"[\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("renderer patterns are valid")
}

/// Trailing `<div class='sources-section'>…</div>` block, anchored at the
/// very end of the input.
pub(crate) fn sources() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"(?s)<div class='sources-section'>.*?</div>$"))
}

pub(crate) fn bold() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"\*\*([^*]+?)\*\*"))
}

/// Single-asterisk emphasis. The content never crosses a line break, so two
/// consecutive `* ` bullet lines are left for the unordered-list stage.
pub(crate) fn italic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"\*([^*\n\r\x{2028}\x{2029}]+?)\*"))
}

/// A run of ordered-list lines, each starting at a line start.  The
/// whitespace after the marker may itself contain line breaks, and the run
/// consumes its final newline.
pub(crate) fn ordered_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(&format!(r"(?m)(?:^[0-9]+\.{SPACE}+{DOT}*(?:\n|$))+")))
}

pub(crate) fn ordered_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(&format!(r"^[0-9]+\.{SPACE}+")))
}

pub(crate) fn unordered_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(&format!(r"(?m)(?:^\*{SPACE}+{DOT}*(?:\n|$))+")))
}

pub(crate) fn unordered_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(&format!(r"^\*{SPACE}+")))
}

/// Line-anchored header of the given level (1 to 3).
///
/// CRLF mode lets `^`/`$` treat a lone `\r` as a line boundary too.
pub(crate) fn header(level: usize) -> &'static Regex {
    static RES: OnceLock<[Regex; 3]> = OnceLock::new();
    let all = RES.get_or_init(|| {
        [1, 2, 3].map(|n: usize| compile(&format!(r"(?mR)^{} ({DOT}*?)$", "#".repeat(n))))
    });
    &all[level.clamp(1, 3) - 1]
}

pub(crate) fn inline_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(&format!(r"`({DOT}*?)`")))
}

pub(crate) fn paragraph_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"\n\n+"))
}

/// A block that is nothing but one rendered header line.
pub(crate) fn lone_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"^<h[1-3]>[^\n]*</h[1-3]>$"))
}

/// Whitespace test matching [`SPACE`], used when trimming paragraph blocks.
pub(crate) fn is_space(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        sources();
        bold();
        italic();
        ordered_run();
        ordered_marker();
        unordered_run();
        unordered_marker();
        header(1);
        header(2);
        header(3);
        inline_code();
        paragraph_break();
        lone_header();
    }

    #[test]
    fn digits_are_ascii_only() {
        assert!(ordered_marker().is_match("12. x"));
        // Arabic-Indic digit one.
        assert!(!ordered_marker().is_match("\u{0661}. x"));
    }

    #[test]
    fn next_line_is_not_whitespace() {
        assert!(!is_space('\u{85}'));
        assert!(is_space('\u{FEFF}'));
        assert!(is_space('\u{2005}'));
    }

    #[test]
    fn header_levels_are_distinct() {
        assert!(header(1).is_match("# a"));
        assert!(!header(1).is_match("## a"));
        assert!(header(2).is_match("## a"));
        assert!(header(3).is_match("### a"));
        assert!(!header(3).is_match("#### a"));
    }
}
