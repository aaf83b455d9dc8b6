//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `socialnet_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("socialnet_core ping={}", socialnet_core::ping());
    println!("socialnet_core version={}", socialnet_core::core_version());
}
