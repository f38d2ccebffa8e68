//! The Copy Engine — authorizes and executes a single mirrored bet.
//!
//! Check order for `mirror_bet`:
//! 1. caller == principal
//! 2. (principal, bettor) has an allocation record
//! 3. budget not exhausted — checked **before** the consumed-bet set, so an
//!    exhausted allocation retried with an already-copied id reports
//!    `NoBetsLeft`, matching the observed venue-side contract
//! 4. external bet not already consumed
//! 5. venue placement; ledger commits strictly after acceptance
//!
//! The engine never moves escrow funds itself; a committed mirror only
//! records the venue's draw through the registry.

use mirrorbet_registry::AllocationRegistry;
use mirrorbet_types::{
    AccountId, ExternalBetId, MirrorReceipt, MirrorbetError, Result, VenueRef,
};
use rust_decimal::Decimal;

use crate::guard::CopyGuard;
use crate::venue::Venue;

/// Per-call mirroring authority. Owns the consumed-bet set.
#[derive(Debug, Default)]
pub struct CopyEngine {
    guard: CopyGuard,
}

impl CopyEngine {
    /// Create an engine with an empty consumed-bet history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            guard: CopyGuard::new(),
        }
    }

    /// Run checks 1–4 and return the stake to forward to the venue. No
    /// state is mutated.
    ///
    /// # Errors
    /// `UnauthorizedCaller`, `NotRegistered`, `NoBetsLeft`, or
    /// `AlreadyCopied`, in that order of precedence.
    pub fn authorize(
        &self,
        registry: &AllocationRegistry,
        caller: AccountId,
        principal: AccountId,
        external_bet_id: ExternalBetId,
        bettor: AccountId,
    ) -> Result<Decimal> {
        if caller != principal {
            return Err(MirrorbetError::UnauthorizedCaller { caller, principal });
        }
        if !registry.is_registered(principal, bettor) {
            return Err(MirrorbetError::NotRegistered { principal, bettor });
        }
        let alloc = registry.allocation(principal, bettor);
        if alloc.bets_remaining == 0 {
            return Err(MirrorbetError::NoBetsLeft { bettor });
        }
        if self.guard.is_copied(principal, bettor, external_bet_id) {
            return Err(MirrorbetError::AlreadyCopied {
                bettor,
                external_bet_id,
            });
        }
        Ok(alloc.stake_per_bet)
    }

    /// Commit a venue-accepted mirror: consume the external bet id,
    /// decrement the budget, and issue the receipt.
    ///
    /// # Errors
    /// Propagates guard/ledger errors; unreachable when the same key was
    /// held from `authorize` through the venue call.
    pub fn commit(
        &mut self,
        registry: &mut AllocationRegistry,
        principal: AccountId,
        external_bet_id: ExternalBetId,
        bettor: AccountId,
        venue_ref: VenueRef,
    ) -> Result<MirrorReceipt> {
        self.guard.mark_copied(principal, bettor, external_bet_id)?;
        let stake = registry.consume_bet(principal, bettor)?;

        tracing::info!(
            principal = %principal.short(),
            bettor = %bettor.short(),
            %external_bet_id,
            %stake,
            venue_ref,
            "bet mirrored"
        );
        Ok(MirrorReceipt::new(
            principal,
            bettor,
            external_bet_id,
            stake,
            venue_ref,
        ))
    }

    /// Mirror a single external bet: authorize, place at the venue, commit.
    ///
    /// # Errors
    /// Any authorization error, or `InvalidExternalBet` / `VenueRejected`
    /// from the venue — in which case nothing is committed.
    pub fn mirror_bet(
        &mut self,
        registry: &mut AllocationRegistry,
        venue: &dyn Venue,
        caller: AccountId,
        principal: AccountId,
        external_bet_id: ExternalBetId,
        bettor: AccountId,
    ) -> Result<MirrorReceipt> {
        let stake = self.authorize(registry, caller, principal, external_bet_id, bettor)?;
        let venue_ref = venue.place_bet(stake, external_bet_id)?;
        self.commit(registry, principal, external_bet_id, bettor, venue_ref)
    }

    /// Whether an external bet has been consumed for a pair.
    #[must_use]
    pub fn is_copied(
        &self,
        principal: AccountId,
        bettor: AccountId,
        external_bet_id: ExternalBetId,
    ) -> bool {
        self.guard.is_copied(principal, bettor, external_bet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venue::MockVenue;
    use mirrorbet_registry::{AllocationRequest, MockToken};

    fn wei(units: i64) -> Decimal {
        Decimal::new(units, 0) * Decimal::new(1_000_000_000_000_000_000, 0)
    }

    fn setup(stake: Decimal, bets: u64) -> (CopyEngine, AllocationRegistry, MockToken, MockVenue, AccountId, AccountId) {
        let token = MockToken::new();
        let venue = MockVenue::new();
        let mut registry = AllocationRegistry::new();
        let p = AccountId::random();
        let b = AccountId::random();
        let total = stake * Decimal::from(bets);
        token.mint(p, total);
        token.approve(p, total);
        registry
            .add_allocations(
                &token,
                p,
                p,
                &[AllocationRequest {
                    bettor: b,
                    stake_per_bet: stake,
                    bet_count: bets,
                }],
            )
            .unwrap();
        (CopyEngine::new(), registry, token, venue, p, b)
    }

    #[test]
    fn mirror_succeeds_and_decrements() {
        let (mut engine, mut registry, _token, venue, p, b) = setup(wei(1), 5);
        venue.register_bet(ExternalBetId(9848));

        let receipt = engine
            .mirror_bet(&mut registry, &venue, p, p, ExternalBetId(9848), b)
            .unwrap();
        assert_eq!(receipt.stake, wei(1));
        assert_eq!(receipt.external_bet_id, ExternalBetId(9848));
        assert!(receipt.verify_hash());

        assert_eq!(registry.allocation(p, b).bets_remaining, 4);
        assert_eq!(registry.escrow_balance(p), wei(4));
        assert_eq!(venue.placements(), vec![(ExternalBetId(9848), wei(1))]);
    }

    #[test]
    fn second_mirror_of_same_bet_fails() {
        let (mut engine, mut registry, _token, venue, p, b) = setup(wei(1), 5);
        venue.register_bet(ExternalBetId(9848));

        engine
            .mirror_bet(&mut registry, &venue, p, p, ExternalBetId(9848), b)
            .unwrap();
        let err = engine
            .mirror_bet(&mut registry, &venue, p, p, ExternalBetId(9848), b)
            .unwrap_err();
        assert!(matches!(err, MirrorbetError::AlreadyCopied { .. }));

        // Budget only paid once; venue saw one placement.
        assert_eq!(registry.allocation(p, b).bets_remaining, 4);
        assert_eq!(venue.placements().len(), 1);
    }

    #[test]
    fn no_bets_left_takes_precedence_over_already_copied() {
        // Single-bet allocation: after the first mirror the budget is zero,
        // and retrying the identical bet id must report the budget error.
        let (mut engine, mut registry, _token, venue, p, b) = setup(wei(1), 1);
        venue.register_bet(ExternalBetId(9848));

        engine
            .mirror_bet(&mut registry, &venue, p, p, ExternalBetId(9848), b)
            .unwrap();
        assert_eq!(registry.allocation(p, b).bets_remaining, 0);

        let err = engine
            .mirror_bet(&mut registry, &venue, p, p, ExternalBetId(9848), b)
            .unwrap_err();
        assert!(matches!(err, MirrorbetError::NoBetsLeft { .. }), "got {err:?}");
    }

    #[test]
    fn unregistered_pair_fails() {
        let (mut engine, mut registry, _token, venue, p, _b) = setup(wei(1), 1);
        venue.register_bet(ExternalBetId(1));

        let err = engine
            .mirror_bet(&mut registry, &venue, p, p, ExternalBetId(1), AccountId::random())
            .unwrap_err();
        assert!(matches!(err, MirrorbetError::NotRegistered { .. }));
        assert!(venue.placements().is_empty());
    }

    #[test]
    fn wrong_caller_fails() {
        let (mut engine, mut registry, _token, venue, p, b) = setup(wei(1), 1);
        venue.register_bet(ExternalBetId(1));

        let intruder = AccountId::random();
        let err = engine
            .mirror_bet(&mut registry, &venue, intruder, p, ExternalBetId(1), b)
            .unwrap_err();
        assert!(matches!(err, MirrorbetError::UnauthorizedCaller { .. }));
    }

    #[test]
    fn invalid_external_bet_commits_nothing() {
        let (mut engine, mut registry, _token, venue, p, b) = setup(wei(1), 5);
        // Bet 12345 never registered at the venue.
        let err = engine
            .mirror_bet(&mut registry, &venue, p, p, ExternalBetId(12345), b)
            .unwrap_err();
        assert!(matches!(err, MirrorbetError::InvalidExternalBet(_)));

        // Budget and consumed set untouched: the id can be retried later.
        assert_eq!(registry.allocation(p, b).bets_remaining, 5);
        assert!(!engine.is_copied(p, b, ExternalBetId(12345)));
        assert_eq!(registry.escrow_balance(p), wei(5));
    }

    #[test]
    fn venue_rejection_commits_nothing() {
        let (mut engine, mut registry, _token, venue, p, b) = setup(wei(1), 2);
        venue.register_bet(ExternalBetId(7));
        venue.reject_with("market suspended");

        let err = engine
            .mirror_bet(&mut registry, &venue, p, p, ExternalBetId(7), b)
            .unwrap_err();
        assert!(matches!(err, MirrorbetError::VenueRejected { .. }));
        assert_eq!(registry.allocation(p, b).bets_remaining, 2);

        // The same id succeeds once the venue recovers.
        venue.accept_again();
        engine
            .mirror_bet(&mut registry, &venue, p, p, ExternalBetId(7), b)
            .unwrap();
        assert_eq!(registry.allocation(p, b).bets_remaining, 1);
    }

    #[test]
    fn budget_conservation_over_sequence() {
        let (mut engine, mut registry, _token, venue, p, b) = setup(wei(1), 3);
        for id in [10, 11, 12] {
            venue.register_bet(ExternalBetId(id));
            engine
                .mirror_bet(&mut registry, &venue, p, p, ExternalBetId(id), b)
                .unwrap();
        }
        assert_eq!(registry.allocation(p, b).bets_remaining, 0);
        assert_eq!(registry.escrow_balance(p), Decimal::ZERO);

        venue.register_bet(ExternalBetId(13));
        let err = engine
            .mirror_bet(&mut registry, &venue, p, p, ExternalBetId(13), b)
            .unwrap_err();
        assert!(matches!(err, MirrorbetError::NoBetsLeft { .. }));
    }
}
