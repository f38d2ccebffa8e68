//! Upstream venue boundary.
//!
//! The engine forwards mirrored placements through [`Venue`] and never
//! commits ledger state unless the venue accepts. Timeouts and retries are
//! the adapter's concern; the core only sees a synchronous result.

use std::collections::HashSet;
use std::sync::Mutex;

use mirrorbet_types::{ExternalBetId, MirrorbetError, Result, VenueRef};
use rust_decimal::Decimal;

/// Places a mirrored bet at the upstream venue, funded from escrow.
pub trait Venue: Send + Sync {
    /// Place a bet of `stake` mirroring `mirror_of`.
    ///
    /// # Errors
    /// - [`MirrorbetError::InvalidExternalBet`] if `mirror_of` does not
    ///   exist or cannot be mirrored
    /// - [`MirrorbetError::VenueRejected`] for any other venue-side refusal
    fn place_bet(&self, stake: Decimal, mirror_of: ExternalBetId) -> Result<VenueRef>;
}

/// Scriptable in-memory venue for tests: a set of known external bets, an
/// optional rejection switch, and a log of accepted placements.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct MockVenue {
    inner: Mutex<MockVenueState>,
}

#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
struct MockVenueState {
    known_bets: HashSet<ExternalBetId>,
    reject_reason: Option<String>,
    placed: Vec<(ExternalBetId, Decimal)>,
    next_ref: VenueRef,
}

#[cfg(any(test, feature = "test-helpers"))]
impl MockVenue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make an external bet id known (mirrorable) at the venue.
    pub fn register_bet(&self, id: ExternalBetId) {
        self.lock().known_bets.insert(id);
    }

    /// Force every placement to fail with `VenueRejected`.
    pub fn reject_with(&self, reason: &str) {
        self.lock().reject_reason = Some(reason.to_string());
    }

    /// Clear a previously set rejection.
    pub fn accept_again(&self) {
        self.lock().reject_reason = None;
    }

    /// All accepted placements, in order.
    #[must_use]
    pub fn placements(&self) -> Vec<(ExternalBetId, Decimal)> {
        self.lock().placed.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockVenueState> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Venue for MockVenue {
    fn place_bet(&self, stake: Decimal, mirror_of: ExternalBetId) -> Result<VenueRef> {
        let mut state = self.lock();
        if let Some(reason) = &state.reject_reason {
            return Err(MirrorbetError::VenueRejected {
                reason: reason.clone(),
            });
        }
        if !state.known_bets.contains(&mirror_of) {
            return Err(MirrorbetError::InvalidExternalBet(mirror_of));
        }
        state.placed.push((mirror_of, stake));
        state.next_ref += 1;
        Ok(state.next_ref)
    }
}
