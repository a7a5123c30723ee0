//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `guestlist_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("guestlist_core ping={}", guestlist_core::ping());
    println!("guestlist_core version={}", guestlist_core::core_version());
}
