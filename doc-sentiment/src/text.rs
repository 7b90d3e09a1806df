//! Whitespace normalization and fixed-size character chunking.

/// Default maximum chunk length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 900;

/// Unicode whitespace plus the ASCII information separators U+001C..U+001F,
/// which `char::is_whitespace` leaves out.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Collapses every whitespace run to a single space and trims both ends.
///
/// `None` (a missing cell) normalizes to the empty string.
pub fn normalize_whitespace(text: Option<&str>) -> String {
    match text {
        Some(text) => text
            .split(is_separator)
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        None => String::new(),
    }
}

/// Splits normalized `text` into consecutive chunks of at most `max_chars` characters.
///
/// Chunks cover the normalized text exactly, in order, without overlap. Empty
/// or missing text yields no chunks.
///
/// # Examples
///
/// ```
/// use doc_sentiment::text::chunk_text;
///
/// let chunks = chunk_text(Some("  abc\n\tdefg "), 3);
/// assert_eq!(chunks, vec!["abc", " de", "fg"]);
/// assert!(chunk_text(None, 3).is_empty());
/// ```
pub fn chunk_text(text: Option<&str>, max_chars: usize) -> Vec<String> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() {
        return Vec::new();
    }

    // Zero is rejected by config validation; keep the function total anyway.
    let max_chars = max_chars.max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in normalized.char_indices() {
        if count == max_chars {
            chunks.push(normalized[start..idx].to_string());
            start = idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(normalized[start..].to_string());

    chunks
}
