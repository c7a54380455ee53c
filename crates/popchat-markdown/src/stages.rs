//! The ordered text-to-text stages of the renderer.
//!
//! Every stage is a pure function over the whole working text.  Order is
//! significant: emphasis runs before list detection, lists before headers,
//! and paragraphs before line breaks.  Later stages see the HTML emitted by
//! earlier ones as plain text.

use regex::{Captures, Regex};

use crate::patterns;

/// A named rendering stage.
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    /// Short identifier, used in logs and tests.
    pub name: &'static str,
    /// The transform itself.
    pub apply: fn(&str) -> String,
}

/// The rendering pipeline, in application order.
pub const STAGES: &[Stage] = &[
    Stage {
        name: "bold",
        apply: bold,
    },
    Stage {
        name: "italic",
        apply: italic,
    },
    Stage {
        name: "ordered_list",
        apply: ordered_lists,
    },
    Stage {
        name: "unordered_list",
        apply: unordered_lists,
    },
    Stage {
        name: "headers",
        apply: headers,
    },
    Stage {
        name: "inline_code",
        apply: inline_code,
    },
    Stage {
        name: "paragraphs",
        apply: paragraphs,
    },
    Stage {
        name: "line_breaks",
        apply: line_breaks,
    },
];

// ---------------------------------------------------------------------------
// Inline emphasis
// ---------------------------------------------------------------------------

/// `**text**` to `<strong>text</strong>`.
pub fn bold(text: &str) -> String {
    patterns::bold()
        .replace_all(text, "<strong>${1}</strong>")
        .into_owned()
}

/// `*text*` to `<em>text</em>`.
pub fn italic(text: &str) -> String {
    patterns::italic()
        .replace_all(text, "<em>${1}</em>")
        .into_owned()
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// Runs of `N. item` lines to `<ol>`.
pub fn ordered_lists(text: &str) -> String {
    wrap_list_runs(text, patterns::ordered_run(), patterns::ordered_marker(), "ol")
}

/// Runs of `* item` lines to `<ul>`.
pub fn unordered_lists(text: &str) -> String {
    wrap_list_runs(
        text,
        patterns::unordered_run(),
        patterns::unordered_marker(),
        "ul",
    )
}

/// Replace every match of `run` with a list whose items are the lines of the
/// match that start with `marker`, marker stripped.
///
/// Lines of the run without a marker are dropped, so a run can produce an
/// empty list.
fn wrap_list_runs(text: &str, run: &Regex, marker: &Regex, tag: &str) -> String {
    run.replace_all(text, |caps: &Captures<'_>| {
        let items: String = caps[0]
            .split('\n')
            .filter_map(|line| marker.find(line).map(|m| &line[m.end()..]))
            .map(|content| format!("<li>{content}</li>"))
            .collect();
        format!("<{tag}>{items}</{tag}>")
    })
    .into_owned()
}

// ---------------------------------------------------------------------------
// Block-level
// ---------------------------------------------------------------------------

/// `#`, `##` and `###` at line start to `<h1>`..`<h3>`.
pub fn headers(text: &str) -> String {
    (1..=3).fold(text.to_owned(), |acc, level| {
        patterns::header(level)
            .replace_all(&acc, format!("<h{level}>${{1}}</h{level}>").as_str())
            .into_owned()
    })
}

/// `` `code` `` to `<code>code</code>`.
pub fn inline_code(text: &str) -> String {
    patterns::inline_code()
        .replace_all(text, "<code>${1}</code>")
        .into_owned()
}

/// Wrap each block separated by two or more newlines in `<p>`.
///
/// Blocks that are whitespace-only produce nothing.  A block holding a single
/// header line is emitted bare.
/// Other kept blocks are wrapped untrimmed.
pub fn paragraphs(text: &str) -> String {
    patterns::paragraph_break()
        .split(text)
        .filter_map(|block| {
            let trimmed = block.trim_matches(patterns::is_space);
            if trimmed.is_empty() {
                None
            } else if patterns::lone_header().is_match(trimmed) {
                Some(trimmed.to_owned())
            } else {
                Some(format!("<p>{block}</p>"))
            }
        })
        .collect()
}

/// Every remaining `\n` to `<br>`.
pub fn line_breaks(text: &str) -> String {
    text.replace('\n', "<br>")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
