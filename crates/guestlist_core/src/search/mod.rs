//! Guest search entry points.
//!
//! # Responsibility
//! - Expose the admin-facing substring search over the guest table.
//! - Keep search result shaping inside core.

pub mod name_search;
