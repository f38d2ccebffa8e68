//! Mirror receipts — the audit trail of executed copies.
//!
//! Every successful mirror produces a [`MirrorReceipt`] tying together the
//! principal, the followed bettor, the consumed external bet id, and the
//! venue's own reference for the placed bet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, ExternalBetId, ReceiptId};
use rust_decimal::Decimal;

/// Opaque handle the venue assigns to a placed bet.
pub type VenueRef = u64;

/// Proof that a single external bet was mirrored on a principal's behalf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorReceipt {
    /// Unique receipt identifier.
    pub id: ReceiptId,
    /// The principal whose escrow funded the mirror.
    pub principal: AccountId,
    /// The bettor whose external bet was copied.
    pub bettor: AccountId,
    /// The external bet that was consumed.
    pub external_bet_id: ExternalBetId,
    /// The stake the venue drew from escrow.
    pub stake: Decimal,
    /// The venue's reference for the mirrored placement.
    pub venue_ref: VenueRef,
    /// SHA-256 over the receipt's identifying fields.
    pub payload_hash: [u8; 32],
    /// When the mirror was committed.
    pub placed_at: DateTime<Utc>,
}

impl MirrorReceipt {
    /// Build a receipt for a committed mirror, hashing the identifying
    /// fields.
    #[must_use]
    pub fn new(
        principal: AccountId,
        bettor: AccountId,
        external_bet_id: ExternalBetId,
        stake: Decimal,
        venue_ref: VenueRef,
    ) -> Self {
        let payload_hash =
            Self::payload_hash(principal, bettor, external_bet_id, stake, venue_ref);
        Self {
            id: ReceiptId::new(),
            principal,
            bettor,
            external_bet_id,
            stake,
            venue_ref,
            payload_hash,
            placed_at: Utc::now(),
        }
    }

    /// Deterministic hash over the identifying fields. Two receipts for the
    /// same committed mirror hash identically regardless of issue time.
    #[must_use]
    pub fn payload_hash(
        principal: AccountId,
        bettor: AccountId,
        external_bet_id: ExternalBetId,
        stake: Decimal,
        venue_ref: VenueRef,
    ) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"mirrorbet:receipt:v1:");
        hasher.update(principal.as_bytes());
        hasher.update(bettor.as_bytes());
        hasher.update(external_bet_id.0.to_le_bytes());
        hasher.update(stake.serialize());
        hasher.update(venue_ref.to_le_bytes());
        hasher.finalize().into()
    }

    /// Verify the stored hash against the receipt's own fields.
    #[must_use]
    pub fn verify_hash(&self) -> bool {
        self.payload_hash
            == Self::payload_hash(
                self.principal,
                self.bettor,
                self.external_bet_id,
                self.stake,
                self.venue_ref,
            )
    }
}
