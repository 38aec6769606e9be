//! XML text escaping and well-formedness checks for rendered feeds.

use anyhow::{Result, anyhow};
use quick_xml::{Reader, events::Event};
use std::borrow::Cow;

/// Escape text for use in XML content or attribute values.
///
/// Reserved characters (`& < > " '`) become entities and characters that
/// XML 1.0 forbids outright (most C0 controls) are dropped.
pub fn escape_text(raw: &str) -> Cow<'_, str> {
    if raw.chars().all(is_xml_char) {
        return quick_xml::escape::escape(raw);
    }
    let cleaned: String = raw.chars().filter(|&c| is_xml_char(c)).collect();
    Cow::Owned(quick_xml::escape::escape(cleaned.as_str()).into_owned())
}

/// `Char` production of the XML 1.0 grammar.
#[inline]
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Parse the whole document once and report the first syntax error.
///
/// Catches unbalanced or mismatched tags that a custom template may produce.
pub fn check_well_formed(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = true;

    let mut depth = 0usize;
    let mut roots = 0usize;
    loop {
        let event = reader.read_event().map_err(|e| {
            anyhow!(
                "malformed xml at byte {}: {e}",
                reader.error_position()
            )
        })?;
        match event {
            Event::Start(_) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Empty(_) if depth == 0 => roots += 1,
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(anyhow!("malformed xml: {depth} unclosed element(s)"));
    }
    if roots != 1 {
        return Err(anyhow!("malformed xml: expected one root element, found {roots}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_reserved() {
        assert_eq!(escape_text("a & b"), "a &amp; b");
        assert_eq!(escape_text("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_text(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_text("it's"), "it&apos;s");
    }

    #[test]
    fn test_escape_plain_is_borrowed() {
        assert!(matches!(escape_text("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_drops_control_chars() {
        assert_eq!(escape_text("a\u{0}b\u{1B}c"), "abc");
        assert_eq!(escape_text("tab\there\nline"), "tab\there\nline");
    }

    #[test]
    fn test_escape_keeps_unicode() {
        assert_eq!(escape_text("日本語 & émoji 🚀"), "日本語 &amp; émoji 🚀");
    }

    #[test]
    fn test_well_formed_ok() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?><rss><channel><title>a &amp; b</title></channel></rss>"#;
        assert!(check_well_formed(xml).is_ok());
    }

    #[test]
    fn test_well_formed_mismatched_end() {
        assert!(check_well_formed("<rss><channel></rss></channel>").is_err());
    }

    #[test]
    fn test_well_formed_unclosed() {
        assert!(check_well_formed("<rss><channel>").is_err());
    }

    #[test]
    fn test_well_formed_two_roots() {
        assert!(check_well_formed("<a/><b/>").is_err());
    }
}
