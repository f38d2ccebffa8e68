//! Allocation ledger — per-(principal, bettor) records.
//!
//! The ledger is the source of truth for "how much budget remains to copy
//! this bettor". All mutations are atomic: either the full operation
//! succeeds or the ledger is unchanged.

use std::collections::HashMap;

use mirrorbet_types::{AccountId, AllocationEntry, CopyKey, MirrorbetError, Result};
use rust_decimal::Decimal;

/// Tracks allocation records keyed by (principal, bettor).
#[derive(Debug, Default)]
pub struct AllocationLedger {
    records: HashMap<CopyKey, AllocationEntry>,
}

impl AllocationLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Insert a fresh allocation record.
    ///
    /// # Errors
    /// Returns [`MirrorbetError::AlreadyRegistered`] if the pair already has
    /// a record — re-adding must fail, never silently overwrite (an
    /// overwrite would double-reserve escrow).
    pub fn insert(
        &mut self,
        principal: AccountId,
        bettor: AccountId,
        entry: AllocationEntry,
    ) -> Result<()> {
        if self.records.contains_key(&(principal, bettor)) {
            return Err(MirrorbetError::AlreadyRegistered { principal, bettor });
        }
        self.records.insert((principal, bettor), entry);
        Ok(())
    }

    /// Delete a record, returning the entry at the time of removal.
    ///
    /// # Errors
    /// Returns [`MirrorbetError::NotRegistered`] if the pair has no record.
    pub fn remove(&mut self, principal: AccountId, bettor: AccountId) -> Result<AllocationEntry> {
        self.records
            .remove(&(principal, bettor))
            .ok_or(MirrorbetError::NotRegistered { principal, bettor })
    }

    /// Decrement `bets_remaining` by exactly one. Only the Copy Engine
    /// calls this, after venue acceptance.
    ///
    /// # Errors
    /// - [`MirrorbetError::NotRegistered`] if the pair has no record
    /// - [`MirrorbetError::NoBetsLeft`] if the budget is already zero
    pub fn consume_bet(&mut self, principal: AccountId, bettor: AccountId) -> Result<Decimal> {
        let entry = self
            .records
            .get_mut(&(principal, bettor))
            .ok_or(MirrorbetError::NotRegistered { principal, bettor })?;

        if entry.bets_remaining == 0 {
            return Err(MirrorbetError::NoBetsLeft { bettor });
        }

        entry.bets_remaining -= 1;
        Ok(entry.stake_per_bet)
    }

    /// Whether an allocation record exists for the pair.
    #[must_use]
    pub fn is_registered(&self, principal: AccountId, bettor: AccountId) -> bool {
        self.records.contains_key(&(principal, bettor))
    }

    /// The allocation for a pair. Absent records read back as all-zero.
    #[must_use]
    pub fn allocation(&self, principal: AccountId, bettor: AccountId) -> AllocationEntry {
        self.records
            .get(&(principal, bettor))
            .cloned()
            .unwrap_or_default()
    }

    /// Total reserved escrow for a principal:
    /// `Σ stake_per_bet × bets_remaining` over their active records.
    #[must_use]
    pub fn reserved(&self, principal: AccountId) -> Decimal {
        self.records
            .iter()
            .filter(|((p, _), _)| *p == principal)
            .map(|(_, entry)| entry.reserved())
            .sum()
    }

    /// Number of allocation records across all principals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(stake: i64, bets: u64) -> AllocationEntry {
        AllocationEntry {
            stake_per_bet: Decimal::new(stake, 0),
            bets_remaining: bets,
        }
    }

    #[test]
    fn insert_and_query() {
        let mut ledger = AllocationLedger::new();
        let p = AccountId::random();
        let b = AccountId::random();

        ledger.insert(p, b, entry(100, 5)).unwrap();
        assert!(ledger.is_registered(p, b));
        assert_eq!(ledger.allocation(p, b), entry(100, 5));
        assert_eq!(ledger.reserved(p), Decimal::new(500, 0));
    }

    #[test]
    fn double_insert_fails() {
        let mut ledger = AllocationLedger::new();
        let p = AccountId::random();
        let b = AccountId::random();

        ledger.insert(p, b, entry(100, 5)).unwrap();
        let err = ledger.insert(p, b, entry(200, 1)).unwrap_err();
        assert!(matches!(err, MirrorbetError::AlreadyRegistered { .. }));
        // Original record untouched.
        assert_eq!(ledger.allocation(p, b), entry(100, 5));
    }

    #[test]
    fn absent_allocation_reads_zero() {
        let ledger = AllocationLedger::new();
        let alloc = ledger.allocation(AccountId::random(), AccountId::random());
        assert!(alloc.is_zero());
    }

    #[test]
    fn remove_returns_entry() {
        let mut ledger = AllocationLedger::new();
        let p = AccountId::random();
        let b = AccountId::random();

        ledger.insert(p, b, entry(100, 3)).unwrap();
        let removed = ledger.remove(p, b).unwrap();
        assert_eq!(removed, entry(100, 3));
        assert!(!ledger.is_registered(p, b));
        assert!(ledger.allocation(p, b).is_zero());
    }

    #[test]
    fn remove_missing_fails() {
        let mut ledger = AllocationLedger::new();
        let err = ledger
            .remove(AccountId::random(), AccountId::random())
            .unwrap_err();
        assert!(matches!(err, MirrorbetError::NotRegistered { .. }));
    }

    #[test]
    fn consume_bet_decrements() {
        let mut ledger = AllocationLedger::new();
        let p = AccountId::random();
        let b = AccountId::random();

        ledger.insert(p, b, entry(100, 2)).unwrap();
        let stake = ledger.consume_bet(p, b).unwrap();
        assert_eq!(stake, Decimal::new(100, 0));
        assert_eq!(ledger.allocation(p, b).bets_remaining, 1);

        ledger.consume_bet(p, b).unwrap();
        assert_eq!(ledger.allocation(p, b).bets_remaining, 0);

        let err = ledger.consume_bet(p, b).unwrap_err();
        assert!(matches!(err, MirrorbetError::NoBetsLeft { .. }));
    }

    #[test]
    fn consume_bet_unregistered_fails() {
        let mut ledger = AllocationLedger::new();
        let err = ledger
            .consume_bet(AccountId::random(), AccountId::random())
            .unwrap_err();
        assert!(matches!(err, MirrorbetError::NotRegistered { .. }));
    }

    #[test]
    fn reserved_sums_per_principal_only() {
        let mut ledger = AllocationLedger::new();
        let p1 = AccountId::random();
        let p2 = AccountId::random();
        let b = AccountId::random();

        ledger.insert(p1, b, entry(100, 2)).unwrap();
        ledger.insert(p2, b, entry(500, 1)).unwrap();
        assert_eq!(ledger.reserved(p1), Decimal::new(200, 0));
        assert_eq!(ledger.reserved(p2), Decimal::new(500, 0));
    }

    #[test]
    fn exhausted_record_still_registered() {
        // Active(0) blocks re-add until explicit removal.
        let mut ledger = AllocationLedger::new();
        let p = AccountId::random();
        let b = AccountId::random();

        ledger.insert(p, b, entry(100, 1)).unwrap();
        ledger.consume_bet(p, b).unwrap();
        assert!(ledger.is_registered(p, b));
        assert_eq!(ledger.reserved(p), Decimal::ZERO);

        let err = ledger.insert(p, b, entry(100, 1)).unwrap_err();
        assert!(matches!(err, MirrorbetError::AlreadyRegistered { .. }));
    }
}
