//! # mirrorbet-types
//!
//! Shared types, errors, and configuration for the **MirrorBet**
//! copy-betting core.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`ExternalBetId`], [`ReceiptId`], [`CopyKey`]
//! - **Allocation model**: [`AllocationEntry`]
//! - **Receipt model**: [`MirrorReceipt`], [`VenueRef`]
//! - **Configuration**: [`DeploymentConfig`], [`Deployment`]
//! - **Errors**: [`MirrorbetError`] with `MB_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod allocation;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod receipt;

// Re-export all primary types at crate root for ergonomic imports:
//   use mirrorbet_types::{AccountId, AllocationEntry, MirrorbetError, ...};

pub use allocation::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use receipt::*;

// Constants are accessed via `mirrorbet_types::constants::FOO`
// (not re-exported to avoid name collisions).
