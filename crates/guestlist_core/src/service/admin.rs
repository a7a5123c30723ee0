//! Guest administration use-cases.
//!
//! # Responsibility
//! - Provide create/update/delete/lookup APIs for trusted admin callers.
//! - Keep the confirmation timestamp invariant centralized in one
//!   transition, whichever direction an edit flips the flag.
//!
//! # Invariants
//! - Every write goes through `Guest::validate()` via the repository.
//! - An edit that does not change the confirmation state never alters the
//!   existing `confirmed_at` value.
//! - Storage faults surface to admin callers as structured errors, not
//!   downgraded messages.

use crate::model::guest::{Guest, GuestId, GuestValidationError};
use crate::repo::guest_repo::{GuestRepository, RepoError, RepoResult};
use chrono::Utc;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for guest administration use-cases.
#[derive(Debug)]
pub enum AdminServiceError {
    /// Submitted names fail validation.
    InvalidName(GuestValidationError),
    /// Target guest does not exist.
    GuestNotFound(GuestId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for AdminServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(err) => write!(f, "{err}"),
            Self::GuestNotFound(id) => write!(f, "guest not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AdminServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidName(err) => Some(err),
            Self::GuestNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for AdminServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::GuestNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Administration facade over a guest repository.
pub struct AdminService<R: GuestRepository> {
    repo: R,
}

impl<R: GuestRepository> AdminService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new unconfirmed guest from raw name input.
    ///
    /// Names are trimmed before persistence; blank or overlong input is
    /// rejected with `InvalidName`.
    pub fn create(&self, last_name: &str, first_name: &str) -> Result<Guest, AdminServiceError> {
        let guest = Guest::new(last_name, first_name);
        guest.validate().map_err(AdminServiceError::InvalidName)?;

        self.repo.create_guest(&guest)?;
        info!(
            "event=guest_create module=service status=ok guest={}",
            guest.id
        );
        Ok(guest)
    }

    /// Updates names and confirmation state of an existing guest.
    ///
    /// # Contract
    /// - Trimmed name updates are applied unconditionally.
    /// - unconfirmed -> confirmed stamps `confirmed_at` with the current
    ///   time; confirmed -> unconfirmed clears it; an unchanged state
    ///   leaves the existing timestamp untouched.
    pub fn update(
        &self,
        id: GuestId,
        last_name: &str,
        first_name: &str,
        confirmed: bool,
    ) -> Result<Guest, AdminServiceError> {
        let Some(mut guest) = self.repo.find_by_id(id)? else {
            return Err(AdminServiceError::GuestNotFound(id));
        };

        guest.last_name = last_name.trim().to_string();
        guest.first_name = first_name.trim().to_string();

        match (guest.confirmed, confirmed) {
            (false, true) => guest.mark_confirmed(Utc::now().timestamp_millis()),
            (true, false) => guest.mark_unconfirmed(),
            // State unchanged: existing confirmation history stays as-is.
            _ => {}
        }

        guest.validate().map_err(AdminServiceError::InvalidName)?;
        self.repo.update_guest(&guest)?;
        info!(
            "event=guest_update module=service status=ok guest={} confirmed={}",
            guest.id, guest.confirmed
        );
        Ok(guest)
    }

    /// Permanently deletes a guest. No soft-delete, no cascade.
    pub fn delete(&self, id: GuestId) -> Result<(), AdminServiceError> {
        self.repo.delete_guest(id)?;
        info!("event=guest_delete module=service status=ok guest={id}");
        Ok(())
    }

    /// Read-only lookup by identifier, used by edit flows and detail views.
    pub fn find_by_id(&self, id: GuestId) -> RepoResult<Option<Guest>> {
        self.repo.find_by_id(id)
    }

    /// Lists every guest in store order.
    pub fn list_all(&self) -> RepoResult<Vec<Guest>> {
        self.repo.list_all()
    }

    /// Lists confirmed guests in store order.
    pub fn list_confirmed(&self) -> RepoResult<Vec<Guest>> {
        self.repo.list_by_status(true)
    }

    /// Lists guests that have not confirmed yet, in store order.
    pub fn list_unconfirmed(&self) -> RepoResult<Vec<Guest>> {
        self.repo.list_by_status(false)
    }

    /// Seeds the guest list when, and only when, the store is empty.
    ///
    /// Returns the number of guests inserted: 0 when the store already
    /// holds records, `entries.len()` otherwise. Any invalid entry aborts
    /// the seed with `InvalidName`.
    pub fn seed_if_empty(&self, entries: &[(&str, &str)]) -> Result<usize, AdminServiceError> {
        if self.repo.count_all()? > 0 {
            return Ok(0);
        }

        for (last_name, first_name) in entries.iter().copied() {
            self.create(last_name, first_name)?;
        }

        info!(
            "event=guest_seed module=service status=ok count={}",
            entries.len()
        );
        Ok(entries.len())
    }
}
