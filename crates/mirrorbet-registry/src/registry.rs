//! The Allocation Registry — the single source of truth for copy budgets.
//!
//! Every add/remove pairs a token-custody transfer with a ledger mutation.
//! The two are atomic as a unit: the batch is validated in full, then the
//! one external transfer runs, and only on its success does the ledger
//! commit. A failed transfer leaves no observable state change.

use mirrorbet_types::{
    constants, AccountId, AllocationEntry, MirrorbetError, Result,
};
use rust_decimal::Decimal;

use crate::escrow::EscrowVault;
use crate::ledger::AllocationLedger;
use crate::token::TokenTransfer;

/// One tuple of an `add_allocations` batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationRequest {
    /// The bettor to follow.
    pub bettor: AccountId,
    /// Token amount staked per mirrored bet.
    pub stake_per_bet: Decimal,
    /// Number of mirrors to authorize.
    pub bet_count: u64,
}

/// Stateful ledger of allocations and escrow custody.
#[derive(Debug, Default)]
pub struct AllocationRegistry {
    ledger: AllocationLedger,
    escrow: EscrowVault,
}

impl AllocationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ledger: AllocationLedger::new(),
            escrow: EscrowVault::new(),
        }
    }

    /// Register a batch of bettors for a principal, pulling
    /// `Σ stake_per_bet × bet_count` into custody.
    ///
    /// All-or-nothing: any invalid tuple rejects the entire batch before
    /// the transfer runs.
    ///
    /// # Errors
    /// - [`MirrorbetError::UnauthorizedCaller`] if `caller != principal`
    /// - [`MirrorbetError::BatchTooLarge`] past the per-call cap
    /// - [`MirrorbetError::InvalidAllocationParams`] on zero stake or count
    /// - [`MirrorbetError::AlreadyRegistered`] for an existing or duplicated
    ///   bettor
    /// - [`MirrorbetError::FailedTransfer`] if the fund pull fails
    pub fn add_allocations(
        &mut self,
        token: &dyn TokenTransfer,
        caller: AccountId,
        principal: AccountId,
        requests: &[AllocationRequest],
    ) -> Result<()> {
        let total = self.validate_add(caller, principal, requests)?;
        // Single external transfer; the ledger commits only after it.
        token.pull_funds(principal, total)?;
        self.commit_add(principal, requests, total)
    }

    /// Validate an add batch without side effects, returning the total to
    /// pull into custody. Callers that sequence the external transfer
    /// themselves (the concurrent service) pair this with [`commit_add`].
    ///
    /// [`commit_add`]: AllocationRegistry::commit_add
    pub fn validate_add(
        &self,
        caller: AccountId,
        principal: AccountId,
        requests: &[AllocationRequest],
    ) -> Result<Decimal> {
        verify_caller(caller, principal)?;
        check_batch_size(requests.len())?;

        let mut seen = std::collections::HashSet::with_capacity(requests.len());
        let mut total = Decimal::ZERO;
        for req in requests {
            if req.stake_per_bet <= Decimal::ZERO {
                return Err(MirrorbetError::InvalidAllocationParams {
                    bettor: req.bettor,
                    reason: "stake per bet must be positive".to_string(),
                });
            }
            if req.bet_count == 0 {
                return Err(MirrorbetError::InvalidAllocationParams {
                    bettor: req.bettor,
                    reason: "bet count must be positive".to_string(),
                });
            }
            if self.ledger.is_registered(principal, req.bettor) || !seen.insert(req.bettor) {
                return Err(MirrorbetError::AlreadyRegistered {
                    principal,
                    bettor: req.bettor,
                });
            }
            total += req.stake_per_bet * Decimal::from(req.bet_count);
        }
        Ok(total)
    }

    /// Commit a validated add batch after the fund pull succeeded.
    pub fn commit_add(
        &mut self,
        principal: AccountId,
        requests: &[AllocationRequest],
        total: Decimal,
    ) -> Result<()> {
        for req in requests {
            let entry = AllocationEntry {
                stake_per_bet: req.stake_per_bet,
                bets_remaining: req.bet_count,
            };
            self.ledger.insert(principal, req.bettor, entry)?;
        }
        self.escrow.credit(principal, total);
        self.verify_invariant(principal)?;

        tracing::info!(
            principal = %principal.short(),
            bettors = requests.len(),
            %total,
            "allocations added"
        );
        Ok(())
    }

    /// Remove a batch of bettors, refunding `Σ stake_per_bet ×
    /// bets_remaining` to the principal. The consumed-bet history is not
    /// touched.
    ///
    /// # Errors
    /// - [`MirrorbetError::UnauthorizedCaller`] if `caller != principal`
    /// - [`MirrorbetError::BatchTooLarge`] past the per-call cap
    /// - [`MirrorbetError::NotRegistered`] for a missing or duplicated
    ///   bettor (the whole batch aborts)
    /// - [`MirrorbetError::FailedTransfer`] if the fund return fails
    pub fn remove_allocations(
        &mut self,
        token: &dyn TokenTransfer,
        caller: AccountId,
        principal: AccountId,
        bettors: &[AccountId],
    ) -> Result<()> {
        let refund = self.validate_remove(caller, principal, bettors)?;
        // One transfer for the batch total: per-entry pushes could not be
        // rolled back if a later entry failed.
        token.push_funds(principal, refund)?;
        self.commit_remove(principal, bettors, refund)
    }

    /// Validate a remove batch without side effects, returning the refund
    /// total. Paired with [`commit_remove`] by callers sequencing the
    /// external transfer themselves.
    ///
    /// [`commit_remove`]: AllocationRegistry::commit_remove
    pub fn validate_remove(
        &self,
        caller: AccountId,
        principal: AccountId,
        bettors: &[AccountId],
    ) -> Result<Decimal> {
        verify_caller(caller, principal)?;
        check_batch_size(bettors.len())?;

        let mut seen = std::collections::HashSet::with_capacity(bettors.len());
        let mut refund = Decimal::ZERO;
        for &bettor in bettors {
            if !self.ledger.is_registered(principal, bettor) || !seen.insert(bettor) {
                return Err(MirrorbetError::NotRegistered { principal, bettor });
            }
            refund += self.ledger.allocation(principal, bettor).reserved();
        }
        Ok(refund)
    }

    /// Commit a validated remove batch after the fund return succeeded.
    pub fn commit_remove(
        &mut self,
        principal: AccountId,
        bettors: &[AccountId],
        refund: Decimal,
    ) -> Result<()> {
        for &bettor in bettors {
            self.ledger.remove(principal, bettor)?;
        }
        self.escrow.debit(principal, refund)?;
        self.verify_invariant(principal)?;

        tracing::info!(
            principal = %principal.short(),
            bettors = bettors.len(),
            %refund,
            "allocations removed"
        );
        Ok(())
    }

    /// Decrement a bettor's budget by one and record the venue's draw of the
    /// stake from custody. Called by the Copy Engine only, strictly after
    /// venue acceptance.
    ///
    /// # Errors
    /// - [`MirrorbetError::NotRegistered`] / [`MirrorbetError::NoBetsLeft`]
    ///   from the ledger
    pub fn consume_bet(&mut self, principal: AccountId, bettor: AccountId) -> Result<Decimal> {
        let stake = self.ledger.consume_bet(principal, bettor)?;
        self.escrow.debit(principal, stake)?;
        self.verify_invariant(principal)?;

        tracing::debug!(
            principal = %principal.short(),
            bettor = %bettor.short(),
            %stake,
            "bet budget consumed"
        );
        Ok(stake)
    }

    /// Whether an allocation record exists for the pair.
    #[must_use]
    pub fn is_registered(&self, principal: AccountId, bettor: AccountId) -> bool {
        self.ledger.is_registered(principal, bettor)
    }

    /// The allocation for a pair; all-zero if absent.
    #[must_use]
    pub fn allocation(&self, principal: AccountId, bettor: AccountId) -> AllocationEntry {
        self.ledger.allocation(principal, bettor)
    }

    /// Custodied escrow balance for a principal.
    #[must_use]
    pub fn escrow_balance(&self, principal: AccountId) -> Decimal {
        self.escrow.balance(principal)
    }

    /// Total reserved escrow for a principal.
    #[must_use]
    pub fn reserved(&self, principal: AccountId) -> Decimal {
        self.ledger.reserved(principal)
    }

    fn verify_invariant(&self, principal: AccountId) -> Result<()> {
        let result = self
            .escrow
            .verify_reserved(principal, self.ledger.reserved(principal));
        if let Err(ref err) = result {
            tracing::warn!(principal = %principal.short(), %err, "reservation invariant broken");
        }
        result
    }
}

fn verify_caller(caller: AccountId, principal: AccountId) -> Result<()> {
    if caller != principal {
        return Err(MirrorbetError::UnauthorizedCaller { caller, principal });
    }
    Ok(())
}

fn check_batch_size(size: usize) -> Result<()> {
    if size > constants::MAX_BATCH_SIZE {
        return Err(MirrorbetError::BatchTooLarge {
            size,
            max: constants::MAX_BATCH_SIZE,
        });
    }
    Ok(())
}
