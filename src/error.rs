//! Error taxonomy for the order ledger and the assets it drives.
//!
//! Every error aborts the operation that raised it. Nothing is retried and no
//! partial state survives a failed call, so callers re-submit with corrected
//! inputs.

use thiserror::Error;

use crate::types::{AccountId, AssetId, OrderId};

/// Failures reported by a [`FungibleAsset`](crate::vault::FungibleAsset)
/// implementation.
///
/// Assets may also signal failure by returning `Ok(false)`; the vault treats
/// both paths the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("insufficient balance: have {available}, need {required}")]
    InsufficientBalance { available: u128, required: u128 },

    #[error("insufficient allowance: have {available}, need {required}")]
    InsufficientAllowance { available: u128, required: u128 },

    #[error("transfer rejected: {0}")]
    Rejected(String),

    #[error("balance overflow")]
    Overflow,
}

/// Errors surfaced by [`OrderLedger`](crate::ledger::OrderLedger) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Either leg of the trade was zero at creation.
    #[error("amount must be greater than zero")]
    AmountMustBeGreaterThanZero,

    /// Slippage tolerance above 10000 basis points.
    #[error("invalid slippage tolerance: {tolerance} bps exceeds 10000")]
    InvalidSlippageTolerance { tolerance: u64 },

    /// The asset declined or failed a pull or push. The enclosing
    /// operation has been rolled back.
    #[error("transfer of asset {asset} failed: {reason}")]
    TransferFailed { asset: AssetId, reason: String },

    /// Target order does not exist or is no longer active.
    #[error("order {0} is not active")]
    OrderNotActive(OrderId),

    /// Construction rejected: fee above 10000 basis points.
    #[error("invalid fee percentage: {0} bps exceeds 10000")]
    InvalidFeePercentage(u64),

    #[error("account {caller} is not authorized for this operation")]
    Unauthorized { caller: AccountId },

    /// The owner (fee recipient) would be the vault's own account, so fees
    /// would never leave custody.
    #[error("account {0} is the vault account and cannot own the ledger")]
    OwnerIsVault(AccountId),

    #[error("no asset registered under id {0}")]
    UnknownAsset(AssetId),

    /// A settlement failed and unwinding the already-applied movements also
    /// failed. Custody may disagree with the order records.
    #[error("rollback of asset {asset} failed: {reason}")]
    RollbackFailed { asset: AssetId, reason: String },

    /// SSZ encoding of a record failed.
    #[error("encoding failed: {0}")]
    Encoding(String),
}

impl LedgerError {
    /// Build a [`LedgerError::TransferFailed`] from an asset-level error.
    pub fn transfer_failed(asset: AssetId, err: &AssetError) -> Self {
        LedgerError::TransferFailed {
            asset,
            reason: err.to_string(),
        }
    }

    pub(crate) fn encoding<E: std::fmt::Debug>(err: E) -> Self {
        LedgerError::Encoding(format!("{err:?}"))
    }

    /// True for errors caused by the caller's inputs rather than by custody.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::AmountMustBeGreaterThanZero
                | LedgerError::InvalidSlippageTolerance { .. }
                | LedgerError::OrderNotActive(_)
                | LedgerError::Unauthorized { .. }
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LedgerError>;
