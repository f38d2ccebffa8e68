//! Error types for the MirrorBet copy-betting core.
//!
//! All errors use the `MB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Configuration lifecycle errors
//! - 2xx: Allocation errors
//! - 3xx: Mirror / venue errors
//! - 4xx: Escrow / transfer errors
//! - 8xx: Security errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, ExternalBetId};

/// Central error enum for all MirrorBet operations.
#[derive(Debug, Error)]
pub enum MirrorbetError {
    // =================================================================
    // Configuration Lifecycle (1xx)
    // =================================================================
    /// `initialize` was called after the deployment was already configured.
    #[error("MB_ERR_100: Already initialized")]
    AlreadyInitialized,

    /// A configuration accessor was used before `initialize`.
    #[error("MB_ERR_101: Not initialized")]
    NotInitialized,

    // =================================================================
    // Allocation Errors (2xx)
    // =================================================================
    /// Zero stake or zero bet count on add.
    #[error("MB_ERR_200: Invalid allocation params for bettor {bettor}: {reason}")]
    InvalidAllocationParams { bettor: AccountId, reason: String },

    /// Add called for a (principal, bettor) pair that already exists.
    #[error("MB_ERR_201: Bettor {bettor} already registered for principal {principal}")]
    AlreadyRegistered {
        principal: AccountId,
        bettor: AccountId,
    },

    /// Remove or mirror called for a missing (principal, bettor) pair.
    #[error("MB_ERR_202: Bettor {bettor} is not registered for principal {principal}")]
    NotRegistered {
        principal: AccountId,
        bettor: AccountId,
    },

    /// An add/remove batch exceeds the per-call bettor cap.
    #[error("MB_ERR_203: Batch of {size} bettors exceeds maximum {max}")]
    BatchTooLarge { size: usize, max: usize },

    // =================================================================
    // Mirror / Venue Errors (3xx)
    // =================================================================
    /// Mirror called with an exhausted bet budget.
    #[error("MB_ERR_300: No bets left for bettor {bettor}")]
    NoBetsLeft { bettor: AccountId },

    /// Mirror called twice for the same external bet id.
    #[error("MB_ERR_301: Bet {external_bet_id} already copied for bettor {bettor}")]
    AlreadyCopied {
        bettor: AccountId,
        external_bet_id: ExternalBetId,
    },

    /// The venue rejected the external bet id as non-existent or
    /// non-mirrorable.
    #[error("MB_ERR_302: Invalid external bet: {0}")]
    InvalidExternalBet(ExternalBetId),

    /// The venue refused the mirrored placement for its own reasons.
    #[error("MB_ERR_303: Venue rejected bet: {reason}")]
    VenueRejected { reason: String },

    // =================================================================
    // Escrow / Transfer Errors (4xx)
    // =================================================================
    /// Token pull/push failed (insufficient allowance or balance).
    #[error("MB_ERR_400: Transfer of {amount} failed for account {account}: {reason}")]
    FailedTransfer {
        account: AccountId,
        amount: Decimal,
        reason: String,
    },

    /// Reserved allocations no longer match custodied escrow — critical
    /// safety alert.
    #[error("MB_ERR_401: Reservation invariant violation: {reason}")]
    ReservationInvariantViolation { reason: String },

    // =================================================================
    // Security Errors (8xx)
    // =================================================================
    /// The verified caller does not match the principal parameter.
    #[error("MB_ERR_800: Caller {caller} is not principal {principal}")]
    UnauthorizedCaller {
        caller: AccountId,
        principal: AccountId,
    },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("MB_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MirrorbetError>;
