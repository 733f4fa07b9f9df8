//! Free-text search helpers shared by the project, task, and daily task
//! searches.

/// Escape character understood by PostgreSQL `LIKE`/`ILIKE` by default.
const LIKE_ESCAPE: char = '\\';

/// Turn a user search term into an `ILIKE` "contains" pattern.
///
/// The term is trimmed; blank terms yield `None` (no text filter). `%`, `_`,
/// and the escape character itself match literally.
pub fn contains_pattern(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    Some(pattern)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
