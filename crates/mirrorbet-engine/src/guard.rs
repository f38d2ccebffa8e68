//! Consumed-bet guard — prevents mirroring the same external bet twice.
//!
//! Each `(principal, bettor, external_bet_id)` triple can be consumed at
//! most once. The set only grows: entries survive allocation removal, so a
//! remove/re-add cycle can never replay an already-copied bet.

use std::collections::HashSet;

use mirrorbet_types::{AccountId, ExternalBetId, MirrorbetError, Result};

/// Grow-only set of consumed external bets.
#[derive(Debug, Default)]
pub struct CopyGuard {
    consumed: HashSet<(AccountId, AccountId, ExternalBetId)>,
}

impl CopyGuard {
    /// Create an empty guard.
    #[must_use]
    pub fn new() -> Self {
        Self {
            consumed: HashSet::new(),
        }
    }

    /// Mark an external bet as consumed for a (principal, bettor) pair.
    ///
    /// # Errors
    /// Returns [`MirrorbetError::AlreadyCopied`] if the triple is already
    /// present.
    pub fn mark_copied(
        &mut self,
        principal: AccountId,
        bettor: AccountId,
        external_bet_id: ExternalBetId,
    ) -> Result<()> {
        if !self.consumed.insert((principal, bettor, external_bet_id)) {
            return Err(MirrorbetError::AlreadyCopied {
                bettor,
                external_bet_id,
            });
        }
        Ok(())
    }

    /// Whether the triple has already been consumed.
    #[must_use]
    pub fn is_copied(
        &self,
        principal: AccountId,
        bettor: AccountId,
        external_bet_id: ExternalBetId,
    ) -> bool {
        self.consumed
            .contains(&(principal, bettor, external_bet_id))
    }

    /// Number of consumed triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.consumed.len()
    }

    /// Whether nothing has been consumed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_copy_ok() {
        let mut guard = CopyGuard::new();
        let p = AccountId::random();
        let b = AccountId::random();
        assert!(guard.mark_copied(p, b, ExternalBetId(1)).is_ok());
        assert!(guard.is_copied(p, b, ExternalBetId(1)));
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn double_copy_blocked() {
        let mut guard = CopyGuard::new();
        let p = AccountId::random();
        let b = AccountId::random();
        guard.mark_copied(p, b, ExternalBetId(9848)).unwrap();

        let err = guard.mark_copied(p, b, ExternalBetId(9848)).unwrap_err();
        assert!(
            matches!(
                err,
                MirrorbetError::AlreadyCopied { external_bet_id, .. }
                    if external_bet_id == ExternalBetId(9848)
            ),
            "Expected AlreadyCopied, got: {err:?}"
        );
    }

    #[test]
    fn same_bet_different_pairs_ok() {
        let mut guard = CopyGuard::new();
        let p1 = AccountId::random();
        let p2 = AccountId::random();
        let b = AccountId::random();

        // Two principals mirroring the same bettor's bet are independent.
        guard.mark_copied(p1, b, ExternalBetId(7)).unwrap();
        guard.mark_copied(p2, b, ExternalBetId(7)).unwrap();
        assert_eq!(guard.len(), 2);
    }

    #[test]
    fn different_bets_same_pair_ok() {
        let mut guard = CopyGuard::new();
        let p = AccountId::random();
        let b = AccountId::random();

        guard.mark_copied(p, b, ExternalBetId(1)).unwrap();
        guard.mark_copied(p, b, ExternalBetId(2)).unwrap();
        guard.mark_copied(p, b, ExternalBetId(3)).unwrap();
        assert_eq!(guard.len(), 3);
    }

    #[test]
    fn empty_guard() {
        let guard = CopyGuard::new();
        assert!(guard.is_empty());
        assert!(!guard.is_copied(AccountId::random(), AccountId::random(), ExternalBetId(0)));
    }
}
