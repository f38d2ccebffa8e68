//! Allocation record for a (principal, bettor) pair.
//!
//! A record is active while both `stake_per_bet` and `bets_remaining` are
//! positive. An absent record reads back as all-zero, so "not registered"
//! and "zero allocation" are indistinguishable to queries — exactly the
//! observable contract of the registry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-(principal, bettor) allocation state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocationEntry {
    /// Token amount staked on every mirrored bet. Never changed after
    /// creation.
    pub stake_per_bet: Decimal,
    /// Mirror operations still authorized. Decremented by exactly one per
    /// successful mirror.
    pub bets_remaining: u64,
}

impl AllocationEntry {
    /// Create an empty (unregistered) entry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stake_per_bet: Decimal::ZERO,
            bets_remaining: 0,
        }
    }

    /// The reserved portion of escrow this record accounts for:
    /// `stake_per_bet × bets_remaining`.
    #[must_use]
    pub fn reserved(&self) -> Decimal {
        self.stake_per_bet * Decimal::from(self.bets_remaining)
    }

    /// Whether this entry still authorizes mirrors.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.bets_remaining > 0 && self.stake_per_bet > Decimal::ZERO
    }

    /// Whether this entry is indistinguishable from "not registered".
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.stake_per_bet.is_zero() && self.bets_remaining == 0
    }
}

impl Default for AllocationEntry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        let entry = AllocationEntry::default();
        assert!(entry.is_zero());
        assert!(!entry.is_active());
        assert_eq!(entry.reserved(), Decimal::ZERO);
    }

    #[test]
    fn reserved_is_stake_times_count() {
        let entry = AllocationEntry {
            stake_per_bet: Decimal::new(25, 1), // 2.5
            bets_remaining: 4,
        };
        assert_eq!(entry.reserved(), Decimal::new(100, 1)); // 10.0
        assert!(entry.is_active());
    }

    #[test]
    fn exhausted_entry_is_inactive_but_not_zero() {
        let entry = AllocationEntry {
            stake_per_bet: Decimal::ONE,
            bets_remaining: 0,
        };
        assert!(!entry.is_active());
        assert!(!entry.is_zero());
        assert_eq!(entry.reserved(), Decimal::ZERO);
    }

    #[test]
    fn wei_scale_reserved() {
        // 1e18 stake with 5 bets, the original deployment's working range.
        let entry = AllocationEntry {
            stake_per_bet: Decimal::new(1_000_000_000_000_000_000, 0),
            bets_remaining: 5,
        };
        assert_eq!(entry.reserved(), Decimal::new(5_000_000_000_000_000_000, 0));
    }

    #[test]
    fn serde_roundtrip() {
        let entry = AllocationEntry {
            stake_per_bet: Decimal::new(12345, 2),
            bets_remaining: 7,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: AllocationEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
