//! Item descriptions: explicit front-matter text, else an abstract of the body.

use crate::host::Page;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

/// Appended when the abstract is cut.
const ELLIPSIS: &str = "...";

/// Description of `page` within `max_chars`.
///
/// An explicit `description` (or `summary`) is used verbatim, whatever
/// the budget. Otherwise the body is reduced to plain text and truncated.
pub fn extract(page: &Page, max_chars: usize) -> String {
    if let Some(description) = page.meta.description() {
        return description;
    }
    abstract_of(&page.markdown, max_chars)
}

/// Plain-text abstract of Markdown, at most `max_chars` characters.
pub fn abstract_of(markdown: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    truncate_words(&plain_text(markdown), max_chars)
}

/// Markdown to plain text.
///
/// Raw HTML is dropped, as are level-1 headings (they repeat the title).
/// Whitespace runs collapse to a single space.
fn plain_text(markdown: &str) -> String {
    let mut raw = String::with_capacity(markdown.len());
    let mut in_title = false;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_title = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => in_title = false,
            _ if in_title => {}
            Event::Text(text) | Event::Code(text) => raw.push_str(&text),
            Event::SoftBreak | Event::HardBreak => raw.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableCell,
            ) => raw.push(' '),
            _ => {}
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_chars` characters, preferring a word boundary.
///
/// | budget | input               | output          |
/// |--------|---------------------|-----------------|
/// | 20     | `short`             | `short`         |
/// | 12     | `hello brave world` | `hello...`      |
/// | 3      | `hello`             | `hel`           |
fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let marker_len = ELLIPSIS.chars().count();
    if max_chars <= marker_len {
        return text.chars().take(max_chars).collect();
    }

    let keep = max_chars - marker_len;
    let end = text
        .char_indices()
        .nth(keep)
        .map_or(text.len(), |(idx, _)| idx);
    let window = &text[..end];

    // Cut at the last space when the word under the cut would be split
    let next_is_space = text[end..].starts_with(char::is_whitespace);
    let cut = if next_is_space {
        window
    } else {
        match window.rfind(char::is_whitespace) {
            Some(idx) if idx > 0 => &window[..idx],
            _ => window,
        }
    };

    format!("{}{ELLIPSIS}", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn page(source: &str) -> Page {
        Page::from_source(PathBuf::from("/docs/a.md"), "a.md".into(), source, None, true)
            .unwrap()
    }

    #[test]
    fn test_explicit_description_verbatim() {
        let long = "x".repeat(400);
        let page = page(&format!("---\ndescription: {long}\n---\nbody"));

        assert_eq!(extract(&page, 10), long);
        assert_eq!(extract(&page, 0), long);
    }

    #[test]
    fn test_zero_budget_is_empty() {
        let page = page("Some body text that would otherwise be used.");
        assert_eq!(extract(&page, 0), "");
    }

    #[test]
    fn test_short_body_untouched() {
        let page = page("# Title\n\nShort *body* with `code`.");
        assert_eq!(extract(&page, 150), "Short body with code.");
    }

    #[test]
    fn test_markup_and_html_stripped() {
        let text = abstract_of(
            "Intro <span>inline</span> [link](https://x.y) **bold**\n\n<div>\nblock\n</div>\n\n- one\n- two",
            500,
        );
        assert_eq!(text, "Intro inline link bold one two");
    }

    #[test]
    fn test_word_boundary_truncation() {
        assert_eq!(truncate_words("hello brave world", 12), "hello...");
        assert_eq!(truncate_words("hello brave world", 14), "hello brave...");
    }

    #[test]
    fn test_truncation_at_exact_word_end() {
        // keep = 8 chars: "alpha be" -> cut back to "alpha"
        assert_eq!(truncate_words("alpha beta gamma", 11), "alpha...");
        // keep = 10 chars: "alpha beta" followed by a space: keep it whole
        assert_eq!(truncate_words("alpha beta gamma", 13), "alpha beta...");
    }

    #[test]
    fn test_single_long_word_is_cut() {
        assert_eq!(truncate_words("supercalifragilistic", 8), "super...");
    }

    #[test]
    fn test_tiny_budget_no_marker() {
        assert_eq!(truncate_words("hello", 3), "hel");
        assert_eq!(truncate_words("hello", 1), "h");
    }

    #[test]
    fn test_never_exceeds_budget() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod";
        for budget in 1..=80 {
            let out = truncate_words(text, budget);
            assert!(out.chars().count() <= budget, "budget {budget}: {out:?}");
        }
    }

    #[test]
    fn test_unicode_counts_chars() {
        let out = truncate_words("日本語のテキストです とても長い", 8);
        assert!(out.chars().count() <= 8);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_deterministic() {
        let page = page("Body *with* markup and a fairly long sentence to cut.");
        assert_eq!(extract(&page, 20), extract(&page, 20));
    }
}
