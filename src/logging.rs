//! Log-safe rendering of user input
//!
//! Request text is user data; log lines only ever carry a short preview.

/// Maximum number of characters of user text that may appear in a log line
pub const PREVIEW_CHARS: usize = 32;

/// First `PREVIEW_CHARS` characters of `text` with control characters
/// escaped, followed by `…` when truncated
pub fn text_preview(text: &str) -> String {
    let mut preview: String = text
        .chars()
        .take(PREVIEW_CHARS)
        .flat_map(char::escape_debug)
        .collect();

    if text.chars().nth(PREVIEW_CHARS).is_some() {
        preview.push('…');
    }

    preview
}
