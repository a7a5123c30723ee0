//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep transport layers (web, CLI) decoupled from storage details.

pub mod admin;
pub mod confirmation;
pub mod stats;
