//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the guest store contract consumed by the service layer.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Guest::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateName`)
//!   in addition to DB transport errors.

pub mod guest_repo;
