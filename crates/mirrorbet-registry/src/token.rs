//! Token transfer boundary.
//!
//! The registry never speaks the token's wire protocol itself; it calls
//! through [`TokenTransfer`] and treats any failure as a reason to abort the
//! whole batch before touching the ledger.

use std::collections::HashMap;
use std::sync::Mutex;

use mirrorbet_types::{AccountId, MirrorbetError, Result};
use rust_decimal::Decimal;

/// Moves the configured token between a principal and the registry's
/// custody. `pull_funds` requires a prior allowance from the principal.
pub trait TokenTransfer: Send + Sync {
    /// Pull `amount` from the principal into custody.
    ///
    /// # Errors
    /// Returns [`MirrorbetError::FailedTransfer`] if allowance or balance
    /// is insufficient.
    fn pull_funds(&self, from: AccountId, amount: Decimal) -> Result<()>;

    /// Push `amount` from custody back to the principal.
    ///
    /// # Errors
    /// Returns [`MirrorbetError::FailedTransfer`] if the transfer fails.
    fn push_funds(&self, to: AccountId, amount: Decimal) -> Result<()>;
}

/// In-memory token with balances and allowances, reproducing the
/// approve/transfer-from flow the registry is driven by in production.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct MockToken {
    inner: Mutex<MockTokenState>,
}

#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
struct MockTokenState {
    balances: HashMap<AccountId, Decimal>,
    allowances: HashMap<AccountId, Decimal>,
    /// Token held in the registry's custody account.
    custody: Decimal,
}

#[cfg(any(test, feature = "test-helpers"))]
impl MockToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account balance.
    pub fn mint(&self, account: AccountId, amount: Decimal) {
        let mut state = self.lock();
        *state.balances.entry(account).or_insert(Decimal::ZERO) += amount;
    }

    /// Approve the registry to pull up to `amount` from `account`.
    pub fn approve(&self, account: AccountId, amount: Decimal) {
        self.lock().allowances.insert(account, amount);
    }

    /// An account's token balance.
    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Decimal {
        self.lock()
            .balances
            .get(&account)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Token held by the registry's custody account.
    #[must_use]
    pub fn custody_balance(&self) -> Decimal {
        self.lock().custody
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockTokenState> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl TokenTransfer for MockToken {
    fn pull_funds(&self, from: AccountId, amount: Decimal) -> Result<()> {
        let mut state = self.lock();
        let allowance = state.allowances.get(&from).copied().unwrap_or(Decimal::ZERO);
        if allowance < amount {
            return Err(MirrorbetError::FailedTransfer {
                account: from,
                amount,
                reason: format!("allowance {allowance} too low"),
            });
        }
        let balance = state.balances.get(&from).copied().unwrap_or(Decimal::ZERO);
        if balance < amount {
            return Err(MirrorbetError::FailedTransfer {
                account: from,
                amount,
                reason: format!("balance {balance} too low"),
            });
        }
        state.allowances.insert(from, allowance - amount);
        state.balances.insert(from, balance - amount);
        state.custody += amount;
        Ok(())
    }

    fn push_funds(&self, to: AccountId, amount: Decimal) -> Result<()> {
        let mut state = self.lock();
        if state.custody < amount {
            return Err(MirrorbetError::FailedTransfer {
                account: to,
                amount,
                reason: format!("custody {} too low", state.custody),
            });
        }
        state.custody -= amount;
        *state.balances.entry(to).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }
}
