//! Ledger configuration.
//!
//! Loaded from the environment with the `config` crate. Every key is read
//! from `ORDER_SWAP_<KEY>`:
//!
//! | Variable                     | Default | Meaning                         |
//! |------------------------------|---------|---------------------------------|
//! | `ORDER_SWAP_OWNER`           | -       | Deploying account, fee receiver |
//! | `ORDER_SWAP_FEE_PERCENTAGE`  | 1000    | Platform fee in basis points    |
//! | `ORDER_SWAP_VAULT_ACCOUNT`   | max u64 | Account holding custody         |

use serde::Deserialize;

use crate::error::{LedgerError, Result};
use crate::types::bps;
use crate::types::AccountId;

pub const ENV_PREFIX: &str = "ORDER_SWAP";

/// Custody account used when none is configured. Reserved: no caller may
/// act as it and it may not own the ledger.
pub const DEFAULT_VAULT_ACCOUNT: AccountId = AccountId::MAX;

fn default_fee_percentage() -> u64 {
    1_000
}

fn default_vault_account() -> AccountId {
    DEFAULT_VAULT_ACCOUNT
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Deploying account; receives fees
    pub owner: AccountId,

    /// Fee in basis points, 0..=10000
    #[serde(default = "default_fee_percentage")]
    pub fee_percentage: u64,

    /// Account under which the vault holds custody
    #[serde(default = "default_vault_account")]
    pub vault_account: AccountId,
}

impl LedgerConfig {
    pub fn new(owner: AccountId, fee_percentage: u64) -> Self {
        Self {
            owner,
            fee_percentage,
            vault_account: DEFAULT_VAULT_ACCOUNT,
        }
    }

    pub fn with_vault_account(mut self, vault_account: AccountId) -> Self {
        self.vault_account = vault_account;
        self
    }

    /// Reject a fee above 10000 basis points, or an owner that is the vault
    /// account.
    pub fn validate(&self) -> Result<()> {
        if !bps::is_valid(self.fee_percentage) {
            return Err(LedgerError::InvalidFeePercentage(self.fee_percentage));
        }
        if self.owner == self.vault_account {
            return Err(LedgerError::OwnerIsVault(self.owner));
        }
        Ok(())
    }

    /// Load from `ORDER_SWAP_*` environment variables.
    pub fn from_env() -> std::result::Result<Self, config::ConfigError> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    pub fn from_env_with_prefix(prefix: &str) -> std::result::Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix(prefix).try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
