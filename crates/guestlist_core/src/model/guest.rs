//! Guest domain model.
//!
//! # Responsibility
//! - Define the canonical guest record shared by confirmation and admin flows.
//! - Provide the confirmed/unconfirmed transition helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another guest.
//! - `last_name`/`first_name` are stored trimmed, non-empty, at most 100 chars.
//! - `confirmed_at` is `Some` if and only if `confirmed` is true.

use crate::model::name::NameKey;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a guest record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type GuestId = Uuid;

/// Upper bound on stored name length, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// A person on the invitation list.
///
/// Names keep their originally-entered casing and internal spacing; only
/// surrounding whitespace is removed at construction time. Case folding
/// happens in [`NameKey`], never in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    /// Stable global ID used for admin edit/delete flows.
    pub id: GuestId,
    pub last_name: String,
    pub first_name: String,
    /// Attendance flag; flips to `true` at most once via self-confirmation.
    pub confirmed: bool,
    /// Confirmation time in Unix epoch milliseconds. Paired with `confirmed`.
    pub confirmed_at: Option<i64>,
}

/// Validation failure for guest records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuestValidationError {
    BlankLastName,
    BlankFirstName,
    NameTooLong {
        field: &'static str,
        chars: usize,
    },
    /// `confirmed` and `confirmed_at` disagree.
    ConfirmationTimestampMismatch {
        confirmed: bool,
    },
}

impl Display for GuestValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankLastName => write!(f, "last name must not be blank"),
            Self::BlankFirstName => write!(f, "first name must not be blank"),
            Self::NameTooLong { field, chars } => write!(
                f,
                "{field} is {chars} characters long, maximum is {MAX_NAME_CHARS}"
            ),
            Self::ConfirmationTimestampMismatch { confirmed } => write!(
                f,
                "confirmed={confirmed} but confirmed_at {}",
                if *confirmed { "is missing" } else { "is set" }
            ),
        }
    }
}

impl Error for GuestValidationError {}

impl Guest {
    /// Creates a new unconfirmed guest with a generated stable ID.
    ///
    /// Surrounding whitespace is trimmed from both name components;
    /// internal whitespace and casing are preserved.
    pub fn new(last_name: impl AsRef<str>, first_name: impl AsRef<str>) -> Self {
        Self::with_id(Uuid::new_v4(), last_name, first_name)
    }

    /// Creates a new unconfirmed guest with a caller-provided stable ID.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        id: GuestId,
        last_name: impl AsRef<str>,
        first_name: impl AsRef<str>,
    ) -> Self {
        Self {
            id,
            last_name: last_name.as_ref().trim().to_string(),
            first_name: first_name.as_ref().trim().to_string(),
            confirmed: false,
            confirmed_at: None,
        }
    }

    /// Checks name constraints and the confirmation timestamp pairing.
    pub fn validate(&self) -> Result<(), GuestValidationError> {
        if self.last_name.trim().is_empty() {
            return Err(GuestValidationError::BlankLastName);
        }
        if self.first_name.trim().is_empty() {
            return Err(GuestValidationError::BlankFirstName);
        }

        let last_chars = self.last_name.chars().count();
        if last_chars > MAX_NAME_CHARS {
            return Err(GuestValidationError::NameTooLong {
                field: "last_name",
                chars: last_chars,
            });
        }
        let first_chars = self.first_name.chars().count();
        if first_chars > MAX_NAME_CHARS {
            return Err(GuestValidationError::NameTooLong {
                field: "first_name",
                chars: first_chars,
            });
        }

        if self.confirmed != self.confirmed_at.is_some() {
            return Err(GuestValidationError::ConfirmationTimestampMismatch {
                confirmed: self.confirmed,
            });
        }

        Ok(())
    }

    /// Display name in "first last" order.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Normalized lookup key for this guest, `None` when a name is blank.
    pub fn name_key(&self) -> Option<NameKey> {
        NameKey::new(&self.last_name, &self.first_name)
    }

    /// Marks this guest confirmed at the given epoch-millisecond instant.
    pub fn mark_confirmed(&mut self, at_epoch_ms: i64) {
        self.confirmed = true;
        self.confirmed_at = Some(at_epoch_ms);
    }

    /// Clears the confirmation flag and its timestamp together.
    pub fn mark_unconfirmed(&mut self) {
        self.confirmed = false;
        self.confirmed_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{Guest, GuestValidationError, MAX_NAME_CHARS};

    #[test]
    fn new_trims_surrounding_whitespace_only() {
        let guest = Guest::new("  Van der Berg ", "\tAnne Marie\n");
        assert_eq!(guest.last_name, "Van der Berg");
        assert_eq!(guest.first_name, "Anne Marie");
        assert!(!guest.confirmed);
        assert!(guest.confirmed_at.is_none());
    }

    #[test]
    fn full_name_is_first_then_last() {
        let guest = Guest::new("Dupont", "Jean");
        assert_eq!(guest.full_name(), "Jean Dupont");
    }

    #[test]
    fn validate_rejects_blank_names() {
        let guest = Guest::new("   ", "Jean");
        assert_eq!(guest.validate(), Err(GuestValidationError::BlankLastName));

        let guest = Guest::new("Dupont", "");
        assert_eq!(guest.validate(), Err(GuestValidationError::BlankFirstName));
    }

    #[test]
    fn validate_rejects_overlong_names() {
        let long = "x".repeat(MAX_NAME_CHARS + 1);
        let guest = Guest::new(long, "Jean");
        assert!(matches!(
            guest.validate(),
            Err(GuestValidationError::NameTooLong {
                field: "last_name",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_timestamp_mismatch_in_both_directions() {
        let mut guest = Guest::new("Dupont", "Jean");
        guest.confirmed = true;
        assert!(matches!(
            guest.validate(),
            Err(GuestValidationError::ConfirmationTimestampMismatch { confirmed: true })
        ));

        let mut guest = Guest::new("Dupont", "Jean");
        guest.confirmed_at = Some(1_700_000_000_000);
        assert!(matches!(
            guest.validate(),
            Err(GuestValidationError::ConfirmationTimestampMismatch { confirmed: false })
        ));
    }

    #[test]
    fn transition_helpers_keep_flag_and_timestamp_paired() {
        let mut guest = Guest::new("Dupont", "Jean");
        guest.mark_confirmed(1_700_000_000_000);
        assert!(guest.confirmed);
        assert_eq!(guest.confirmed_at, Some(1_700_000_000_000));
        guest.validate().unwrap();

        guest.mark_unconfirmed();
        assert!(!guest.confirmed);
        assert!(guest.confirmed_at.is_none());
        guest.validate().unwrap();
    }
}
