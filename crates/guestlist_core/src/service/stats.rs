//! Confirmation statistics.
//!
//! # Responsibility
//! - Derive total/confirmed/unconfirmed counts and a confirmation rate.
//!
//! # Invariants
//! - Recomputed from store counters on every call; no cached or
//!   incrementally-maintained state.
//! - `confirmed + unconfirmed == total`; the rate is 0 for an empty store.

use crate::repo::guest_repo::{GuestRepository, RepoResult};
use serde::Serialize;

/// Aggregate guest list statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GuestStats {
    pub total: u64,
    pub confirmed: u64,
    pub unconfirmed: u64,
    /// Confirmed share as a percentage in `[0, 100]`.
    pub confirmation_rate: f64,
}

impl GuestStats {
    /// Derives the full stats record from the two store counters.
    pub fn from_counts(total: u64, confirmed: u64) -> Self {
        let rate = if total == 0 {
            0.0
        } else {
            confirmed as f64 / total as f64 * 100.0
        };

        Self {
            total,
            confirmed,
            unconfirmed: total.saturating_sub(confirmed),
            confirmation_rate: rate,
        }
    }
}

/// Read-side statistics service over a guest repository.
pub struct StatsService<R: GuestRepository> {
    repo: R,
}

impl<R: GuestRepository> StatsService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Computes current statistics from store counters.
    pub fn stats(&self) -> RepoResult<GuestStats> {
        let total = self.repo.count_all()?;
        let confirmed = self.repo.count_confirmed()?;
        Ok(GuestStats::from_counts(total, confirmed))
    }
}
