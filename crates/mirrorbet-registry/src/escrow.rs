//! Escrow custody accounting and the reservation conservation invariant.
//!
//! The vault mirrors the token balance the registry custodies per principal.
//! It moves on exactly three events: a fund pull on add, a fund return on
//! remove, and a venue draw when a mirror commits. The invariant checked
//! after every mutation:
//!
//! ```text
//! ∀ principal: Σ(stake_per_bet × bets_remaining) == custodied balance
//! ```

use std::collections::HashMap;

use mirrorbet_types::{AccountId, MirrorbetError, Result};
use rust_decimal::Decimal;

/// Per-principal custody balances of the configured token.
#[derive(Debug, Default)]
pub struct EscrowVault {
    custody: HashMap<AccountId, Decimal>,
}

impl EscrowVault {
    /// Create an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self {
            custody: HashMap::new(),
        }
    }

    /// Record funds pulled from a principal into custody.
    pub fn credit(&mut self, principal: AccountId, amount: Decimal) {
        *self.custody.entry(principal).or_insert(Decimal::ZERO) += amount;
    }

    /// Record funds leaving custody (returned to the principal, or drawn by
    /// the venue for a committed mirror).
    ///
    /// # Errors
    /// Returns [`MirrorbetError::ReservationInvariantViolation`] if the
    /// debit would drive the balance negative — custody can never owe.
    pub fn debit(&mut self, principal: AccountId, amount: Decimal) -> Result<()> {
        let balance = self.custody.entry(principal).or_insert(Decimal::ZERO);
        if *balance < amount {
            return Err(MirrorbetError::ReservationInvariantViolation {
                reason: format!(
                    "debit {amount} exceeds custody {balance} for principal {}",
                    principal.short()
                ),
            });
        }
        *balance -= amount;
        Ok(())
    }

    /// Custodied balance for a principal. Unknown principals hold zero.
    #[must_use]
    pub fn balance(&self, principal: AccountId) -> Decimal {
        self.custody.get(&principal).copied().unwrap_or(Decimal::ZERO)
    }

    /// Total custody across every principal.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.custody.values().copied().sum()
    }

    /// Verify that the ledger's reserved total for a principal matches the
    /// custodied balance exactly.
    ///
    /// # Errors
    /// Returns [`MirrorbetError::ReservationInvariantViolation`] on any
    /// mismatch — if reservations and custody disagree, something has gone
    /// catastrophically wrong.
    pub fn verify_reserved(&self, principal: AccountId, reserved: Decimal) -> Result<()> {
        let custody = self.balance(principal);
        if reserved != custody {
            return Err(MirrorbetError::ReservationInvariantViolation {
                reason: format!(
                    "principal {}: reserved {reserved} != custody {custody}",
                    principal.short()
                ),
            });
        }
        Ok(())
    }
}
