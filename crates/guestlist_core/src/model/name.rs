//! Name normalization for guest lookup.
//!
//! # Responsibility
//! - Turn raw (last, first) input into a normalized matching key.
//!
//! # Invariants
//! - Matching is insensitive to surrounding whitespace and ASCII case.
//! - Internal whitespace and diacritics are never rewritten.
//! - Blank components never produce a key, so callers short-circuit
//!   before touching storage.

/// Normalized (last, first) pair used only for matching, never storage.
///
/// Folding is ASCII-only so the Rust-side key agrees with SQLite's
/// `LOWER()` used by the lookup SQL and the uniqueness index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameKey {
    last: String,
    first: String,
}

impl NameKey {
    /// Builds a key from raw input; `None` when either component is blank
    /// after trimming.
    pub fn new(last_name: &str, first_name: &str) -> Option<Self> {
        let last = normalize_component(last_name)?;
        let first = normalize_component(first_name)?;
        Some(Self { last, first })
    }

    /// Normalized last name component.
    pub fn last(&self) -> &str {
        &self.last
    }

    /// Normalized first name component.
    pub fn first(&self) -> &str {
        &self.first
    }
}

/// Trims and ASCII-lowercases one name component, `None` when blank.
pub fn normalize_component(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_lowercase())
    }
}
