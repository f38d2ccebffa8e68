//! System-wide constants for the MirrorBet core.

/// Decimal places of the configured token (18, wei-style).
pub const TOKEN_DECIMALS: u32 = 18;

/// Maximum bettors accepted in a single `add_allocations` /
/// `remove_allocations` batch.
pub const MAX_BATCH_SIZE: usize = 64;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "MirrorBet";
