//! Deployment configuration for a MirrorBet instance.
//!
//! A registry instance is bound to exactly one fungible token and one
//! upstream venue. The addresses are set once through [`Deployment`] and are
//! immutable afterwards; a second `initialize` fails with
//! `AlreadyInitialized`.

use serde::{Deserialize, Serialize};

use crate::{AccountId, MirrorbetError, Result};

/// Immutable addresses wired at deployment time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// The configured fungible token the escrow custodies.
    pub token: AccountId,
    /// The upstream venue's core contract.
    pub venue_core: AccountId,
    /// The venue's liquidity pool funds are drawn against.
    pub liquidity_pool: AccountId,
    /// The paired Allocation Registry instance.
    pub registry: AccountId,
    /// The paired Copy Engine instance.
    pub engine: AccountId,
}

/// One-shot holder for the deployment configuration.
#[derive(Debug, Default)]
pub struct Deployment {
    config: Option<DeploymentConfig>,
}

impl Deployment {
    /// Create an uninitialized deployment.
    #[must_use]
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set the configuration. May be called exactly once.
    ///
    /// # Errors
    /// Returns [`MirrorbetError::AlreadyInitialized`] on any later call.
    pub fn initialize(&mut self, config: DeploymentConfig) -> Result<()> {
        if self.config.is_some() {
            return Err(MirrorbetError::AlreadyInitialized);
        }
        self.config = Some(config);
        Ok(())
    }

    /// Whether `initialize` has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.config.is_some()
    }

    /// Access the configuration.
    ///
    /// # Errors
    /// Returns [`MirrorbetError::NotInitialized`] before `initialize`.
    pub fn config(&self) -> Result<&DeploymentConfig> {
        self.config.as_ref().ok_or(MirrorbetError::NotInitialized)
    }
}
