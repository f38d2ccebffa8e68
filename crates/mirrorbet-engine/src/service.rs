//! Thread-safe facade composing the Registry and the Engine.
//!
//! Locking discipline:
//! - one guard per (principal, bettor) key from [`KeyLocks`], held for the
//!   whole operation — same-key calls serialize in arrival order, unrelated
//!   keys never contend;
//! - the shared ledger state sits behind one `RwLock`, taken only for the
//!   short validate and commit sections;
//! - external token/venue calls run while holding per-key guards only, so
//!   a slow adapter stalls its own key, not the ledger.
//!
//! All work is request-driven and synchronous; there are no background
//! tasks.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use mirrorbet_registry::{AllocationRegistry, AllocationRequest, TokenTransfer};
use mirrorbet_types::{
    AccountId, AllocationEntry, CopyKey, DeploymentConfig, ExternalBetId, MirrorReceipt, Result,
};
use rust_decimal::Decimal;

use crate::engine::CopyEngine;
use crate::locks::KeyLocks;
use crate::venue::Venue;

/// Registry and engine state guarded as one unit.
#[derive(Debug, Default)]
struct CoreState {
    registry: AllocationRegistry,
    engine: CopyEngine,
}

/// Concurrent entry point for principals and mirror callers.
pub struct CopyService {
    config: DeploymentConfig,
    token: Arc<dyn TokenTransfer>,
    venue: Arc<dyn Venue>,
    locks: KeyLocks,
    state: RwLock<CoreState>,
}

impl CopyService {
    /// Create a service bound to its immutable deployment configuration
    /// and adapters.
    #[must_use]
    pub fn new(
        config: DeploymentConfig,
        token: Arc<dyn TokenTransfer>,
        venue: Arc<dyn Venue>,
    ) -> Self {
        Self {
            config,
            token,
            venue,
            locks: KeyLocks::new(),
            state: RwLock::new(CoreState::default()),
        }
    }

    /// The deployment configuration this instance was wired with.
    #[must_use]
    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    /// Register a batch of bettors for a principal. All-or-nothing; see
    /// [`AllocationRegistry::add_allocations`].
    pub fn add_allocations(
        &self,
        caller: AccountId,
        principal: AccountId,
        requests: &[AllocationRequest],
    ) -> Result<()> {
        let keys: Vec<CopyKey> = requests.iter().map(|r| (principal, r.bettor)).collect();
        let handles = self.locks.handles_sorted(&keys);
        let _guards: Vec<_> = handles
            .iter()
            .map(|h| h.lock().unwrap_or_else(PoisonError::into_inner))
            .collect();

        let total = self.read().registry.validate_add(caller, principal, requests)?;
        self.token.pull_funds(principal, total)?;
        self.write().registry.commit_add(principal, requests, total)
    }

    /// Remove a batch of bettors, refunding the remaining reservation. See
    /// [`AllocationRegistry::remove_allocations`].
    pub fn remove_allocations(
        &self,
        caller: AccountId,
        principal: AccountId,
        bettors: &[AccountId],
    ) -> Result<()> {
        let keys: Vec<CopyKey> = bettors.iter().map(|&b| (principal, b)).collect();
        let handles = self.locks.handles_sorted(&keys);
        let _guards: Vec<_> = handles
            .iter()
            .map(|h| h.lock().unwrap_or_else(PoisonError::into_inner))
            .collect();

        let refund = self.read().registry.validate_remove(caller, principal, bettors)?;
        self.token.push_funds(principal, refund)?;
        self.write().registry.commit_remove(principal, bettors, refund)
    }

    /// Mirror a single external bet on the principal's behalf. At most one
    /// mirror per (principal, bettor, external bet id), ever.
    pub fn mirror_bet(
        &self,
        caller: AccountId,
        principal: AccountId,
        external_bet_id: ExternalBetId,
        bettor: AccountId,
    ) -> Result<MirrorReceipt> {
        let handle = self.locks.handle((principal, bettor));
        let _guard = handle.lock().unwrap_or_else(PoisonError::into_inner);

        // The key guard keeps this key's state fixed between the check and
        // the commit, across the venue call.
        let stake = {
            let state = self.read();
            state
                .engine
                .authorize(&state.registry, caller, principal, external_bet_id, bettor)?
        };
        let venue_ref = self.venue.place_bet(stake, external_bet_id)?;

        let mut state = self.write();
        let CoreState { registry, engine } = &mut *state;
        engine.commit(registry, principal, external_bet_id, bettor, venue_ref)
    }

    /// Whether an allocation record exists for the pair.
    #[must_use]
    pub fn is_registered(&self, principal: AccountId, bettor: AccountId) -> bool {
        self.read().registry.is_registered(principal, bettor)
    }

    /// The allocation for a pair; all-zero if absent.
    #[must_use]
    pub fn allocation(&self, principal: AccountId, bettor: AccountId) -> AllocationEntry {
        self.read().registry.allocation(principal, bettor)
    }

    /// Custodied escrow balance for a principal.
    #[must_use]
    pub fn escrow_balance(&self, principal: AccountId) -> Decimal {
        self.read().registry.escrow_balance(principal)
    }

    fn read(&self) -> RwLockReadGuard<'_, CoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
