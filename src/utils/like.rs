//! SQL `LIKE` pattern helpers.

/// Escapes `LIKE` wildcards so `text` is matched literally.
///
/// Backslash is the escape character (`ESCAPE '\'`).
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Pattern matching any value that contains `text`.
pub fn contains_pattern(text: &str) -> String {
    format!("%{}%", escape_like(text))
}
