//! Case-insensitive substring search over guest names.
//!
//! # Responsibility
//! - Filter guests whose last or first name contains a query substring.
//! - Treat user input as literal text, never as a LIKE pattern.
//!
//! # Invariants
//! - A blank query returns the full guest list in store order.
//! - Matching is substring containment, not prefix or fuzzy matching.
//! - Result order is the stable store iteration order; no ranking.

use crate::model::guest::Guest;
use crate::repo::guest_repo::{
    parse_guest_row, GuestRepository, RepoResult, SqliteGuestRepository,
};
use rusqlite::Connection;

/// Searches guests by name substring, case-insensitively.
///
/// Blank queries (empty after trim) list every guest. `%`, `_` and `\`
/// in the query match themselves literally.
pub fn search_guests(conn: &Connection, query: &str) -> RepoResult<Vec<Guest>> {
    let repo = SqliteGuestRepository::try_new(conn)?;

    let trimmed = query.trim();
    if trimmed.is_empty() {
        return repo.list_all();
    }

    let pattern = format!("%{}%", escape_like_pattern(trimmed));
    let mut stmt = conn.prepare(
        "SELECT
            uuid,
            last_name,
            first_name,
            confirmed,
            confirmed_at
         FROM guests
         WHERE last_name LIKE ?1 ESCAPE '\\'
            OR first_name LIKE ?1 ESCAPE '\\'
         ORDER BY created_at ASC, uuid ASC;",
    )?;

    let mut rows = stmt.query([pattern.as_str()])?;
    let mut guests = Vec::new();
    while let Some(row) = rows.next()? {
        guests.push(parse_guest_row(row)?);
    }

    Ok(guests)
}

/// Escapes LIKE wildcards so query text matches itself literally.
fn escape_like_pattern(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like_pattern;

    #[test]
    fn wildcards_and_escape_char_are_escaped() {
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("a_b"), "a\\_b");
        assert_eq!(escape_like_pattern("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(escape_like_pattern("Martin"), "Martin");
    }
}
