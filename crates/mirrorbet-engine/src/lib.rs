//! mirrorbet-engine — the Copy Engine: mirrors external bets on behalf of
//! registered principals, at most once per (principal, bettor, bet).
//!
//! [`CopyEngine`] holds the consumed-bet history and the check sequence for
//! a single mirror; [`CopyService`] wraps engine plus registry behind
//! per-key locks for concurrent callers. The upstream venue is reached
//! through the [`Venue`] trait only.

pub mod engine;
pub mod guard;
pub mod locks;
pub mod service;
pub mod venue;

pub use engine::CopyEngine;
pub use guard::CopyGuard;
pub use locks::KeyLocks;
pub use service::CopyService;
pub use venue::Venue;

#[cfg(any(test, feature = "test-helpers"))]
pub use venue::MockVenue;
