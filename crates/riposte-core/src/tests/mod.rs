//! Crate-level scenario and concurrency tests.
//!
//! - `integration.rs`: end-to-end engine scenarios against an arena
//! - `concurrency.rs`: shared-state access from parallel callers
//! - `helpers.rs`: recording collaborators and duel fixtures

mod concurrency;
mod helpers;

// Re-export for convenience
pub use helpers::*;
