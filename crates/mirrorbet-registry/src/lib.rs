//! # mirrorbet-registry
//!
//! **Allocation Registry plane**: per-(principal, bettor) allocation
//! records, escrow custody, and the token transfer boundary.
//!
//! ## Architecture
//!
//! 1. **AllocationLedger**: allocation records keyed by (principal, bettor)
//! 2. **EscrowVault**: per-principal custody balances + reservation invariant
//! 3. **TokenTransfer**: the fungible-token boundary (pull on add, push on
//!    remove)
//! 4. **AllocationRegistry**: batch add/remove with all-or-nothing
//!    transfer-plus-ledger semantics, and the engine-only `consume_bet`
//!
//! ## Write Flow
//!
//! ```text
//! principal → AllocationRegistry.add_allocations()
//!     → TokenTransfer.pull_funds() → AllocationLedger.insert() + EscrowVault.credit()
//! ```
//!
//! Reserved allocations and custodied escrow must agree after every
//! mutation; a mismatch is a critical invariant violation.

pub mod escrow;
pub mod ledger;
pub mod registry;
pub mod token;

pub use escrow::EscrowVault;
pub use ledger::AllocationLedger;
pub use registry::{AllocationRegistry, AllocationRequest};
pub use token::TokenTransfer;

#[cfg(any(test, feature = "test-helpers"))]
pub use token::MockToken;
