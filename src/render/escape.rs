//! Markup escaping for text drawn from incident payloads.

/// Escape the five markup-sensitive characters.
///
/// `None` yields an empty string. `&` is replaced first so the entities
/// produced for the other characters are never re-escaped.
pub fn escape(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Escape a value that is always present.
pub fn escape_str(text: &str) -> String {
    escape(Some(text))
}
