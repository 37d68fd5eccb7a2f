//! Verse content stripping
//!
//! Verse content arrives as an HTML fragment. Text nodes and inline elements
//! are kept as plain text; top-level `div` elements carry module markup
//! (section titles, cross references) and are dropped with everything inside.

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::sync::LazyLock;

/// Self-closing tags such as `<br/>` or `<milestone type="x"/>`
static SELF_CLOSING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([a-z]+)(\s?[^>]*?)/>").unwrap());

/// HTML elements that never have content or an end tag
const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"param", b"source", b"track", b"wbr",
];

fn is_void_element(name: &[u8]) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

/// Rewrite self-closing tags into open/close pairs
///
/// `<br/>` becomes `<br></br>` so that every element has a matching end tag.
pub fn normalize_self_closing(html: &str) -> String {
    SELF_CLOSING_TAG.replace_all(html, "<$1$2></$1>").into_owned()
}

/// Extract the plain text of a verse
///
/// Malformed fragments never fail; the text collected up to the first parse
/// error is returned.
pub fn strip_verse_markup(content: &str) -> String {
    let normalized = normalize_self_closing(content);

    let mut reader = Reader::from_str(&normalized);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut text = String::new();
    let mut depth: usize = 0;
    let mut skipping = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if is_void_element(e.name().as_ref()) => {}
            Ok(Event::End(e)) if is_void_element(e.name().as_ref()) => {}
            Ok(Event::Start(e)) => {
                if depth == 0 {
                    skipping = e.name().as_ref().eq_ignore_ascii_case(b"div");
                }
                depth += 1;
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    skipping = false;
                }
            }
            Ok(Event::Text(e)) => {
                if !skipping {
                    text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if !skipping {
                    let entity = format!("&{};", String::from_utf8_lossy(e.as_ref()));
                    text.push_str(&html_escape::decode_html_entities(&entity));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                log::warn!(
                    "Stopped reading verse content at position {}: {}",
                    reader.error_position(),
                    e
                );
                break;
            }
        }
    }

    text
}
