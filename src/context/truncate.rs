//! Character-ceiling truncation with an explicit marker.

/// Marker appended to truncated bodies.
pub fn truncation_marker(original: usize, kept: usize) -> String {
    format!("\n[... truncated from {original} to {kept} characters ...]")
}

/// Keep at most `limit` characters of `content`.
///
/// Bodies over the limit keep exactly `limit` characters followed by
/// [`truncation_marker`]. Lengths are counted in characters, not bytes, so
/// the cut never splits a code point.
pub fn truncate(content: &str, limit: usize) -> String {
    let Some((cut, _)) = content.char_indices().nth(limit) else {
        return content.to_string();
    };
    let original = limit + content[cut..].chars().count();
    let mut out = String::with_capacity(cut + 64);
    out.push_str(&content[..cut]);
    out.push_str(&truncation_marker(original, limit));
    out
}

/// Whether `content` ends with a marker produced by [`truncate`].
pub fn is_truncated(content: &str) -> bool {
    content.ends_with("characters ...]") && content.contains("\n[... truncated from ")
}
