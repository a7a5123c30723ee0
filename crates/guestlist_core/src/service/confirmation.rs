//! Guest confirmation engine.
//!
//! # Responsibility
//! - Resolve a guest by normalized name and apply the at-most-once
//!   confirmation transition.
//! - Report every expected condition (blank input, unknown guest, already
//!   confirmed) as a structured outcome, never as an error.
//!
//! # Invariants
//! - Blank input short-circuits before any store access.
//! - The unconfirmed -> confirmed transition goes through the repository's
//!   conditional update; of any set of racing calls exactly one succeeds.
//! - Storage faults are caught at this boundary, logged, and downgraded to
//!   a generic failure outcome.

use crate::model::guest::Guest;
use crate::model::name::NameKey;
use crate::repo::guest_repo::{GuestRepository, RepoResult};
use chrono::{DateTime, Utc};
use log::{error, info};

/// Structured result of one confirmation attempt.
///
/// `success` is true only when this call performed the transition.
/// Idempotent rejects carry the existing guest so callers can render the
/// prior confirmation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationOutcome {
    pub success: bool,
    pub message: String,
    pub guest: Option<Guest>,
}

impl ConfirmationOutcome {
    fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            guest: None,
        }
    }

    fn already_confirmed(guest: Guest) -> Self {
        let when = format_confirmed_at(guest.confirmed_at);
        Self {
            success: false,
            message: format!(
                "Your attendance was already confirmed on {when}. \
                 There is no need to confirm again."
            ),
            guest: Some(guest),
        }
    }
}

/// Use-case service applying the guest self-confirmation flow.
pub struct ConfirmationService<R: GuestRepository> {
    repo: R,
}

impl<R: GuestRepository> ConfirmationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Confirms attendance for the guest matching the submitted name.
    ///
    /// # Contract
    /// - Never returns an error: expected conditions come back as failure
    ///   outcomes, storage faults as a generic failure outcome.
    /// - Any non-empty trimmed string is syntactically valid input; no
    ///   length limit is applied here.
    pub fn confirm(&self, last_name: &str, first_name: &str) -> ConfirmationOutcome {
        let Some(key) = NameKey::new(last_name, first_name) else {
            return ConfirmationOutcome::rejected(
                "Please fill in both your last name and your first name.",
            );
        };

        let submitted = format!("{} {}", first_name.trim(), last_name.trim());
        match self.try_confirm(&key, &submitted) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    "event=guest_confirm module=service status=error name_key={}/{} error={err}",
                    key.last(),
                    key.first()
                );
                ConfirmationOutcome::rejected(
                    "A technical error occurred while recording your confirmation. \
                     Please try again in a few moments.",
                )
            }
        }
    }

    fn try_confirm(&self, key: &NameKey, submitted: &str) -> RepoResult<ConfirmationOutcome> {
        let Some(guest) = self.repo.find_by_normalized_name(key)? else {
            return Ok(ConfirmationOutcome::rejected(format!(
                "No guest named '{submitted}' was found. \
                 Please check the exact spelling of your last and first name."
            )));
        };

        if guest.confirmed {
            return Ok(ConfirmationOutcome::already_confirmed(guest));
        }

        let now_ms = Utc::now().timestamp_millis();
        if !self.repo.confirm_if_unconfirmed(guest.id, now_ms)? {
            // Lost the race against a concurrent confirmation (or a
            // concurrent delete). Re-read to report the winner's state.
            return Ok(match self.repo.find_by_id(guest.id)? {
                Some(current) if current.confirmed => {
                    ConfirmationOutcome::already_confirmed(current)
                }
                Some(_) => ConfirmationOutcome::rejected(
                    "A technical error occurred while recording your confirmation. \
                     Please try again in a few moments.",
                ),
                None => ConfirmationOutcome::rejected(format!(
                    "No guest named '{submitted}' was found. \
                     Please check the exact spelling of your last and first name."
                )),
            });
        }

        let mut confirmed = guest;
        confirmed.mark_confirmed(now_ms);
        info!(
            "event=guest_confirm module=service status=ok guest={} confirmed_at={now_ms}",
            confirmed.id
        );

        Ok(ConfirmationOutcome {
            success: true,
            message: format!(
                "Confirmation received! Thank you {}, your attendance has been recorded.",
                confirmed.full_name()
            ),
            guest: Some(confirmed),
        })
    }
}

/// Formats an epoch-millisecond confirmation time for user-facing messages.
pub(crate) fn format_confirmed_at(confirmed_at_ms: Option<i64>) -> String {
    confirmed_at_ms
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|at| at.format("%d/%m/%Y at %H:%M").to_string())
        .unwrap_or_else(|| "an unknown date".to_string())
}

#[cfg(test)]
mod tests {
    use super::format_confirmed_at;

    #[test]
    fn formats_known_timestamps_day_first() {
        // 2026-02-01T10:30:00Z
        let formatted = format_confirmed_at(Some(1_769_941_800_000));
        assert_eq!(formatted, "01/02/2026 at 10:30");
    }

    #[test]
    fn missing_or_invalid_timestamps_fall_back() {
        assert_eq!(format_confirmed_at(None), "an unknown date");
        assert_eq!(format_confirmed_at(Some(i64::MAX)), "an unknown date");
    }
}
