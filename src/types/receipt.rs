//! Settlement receipt returned by order confirmation.
//!
//! The receipt records where every unit of the escrowed leg went, so callers
//! can audit `amount_deposited == payout + fee` without re-reading balances.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::error::{self, LedgerError};
use crate::types::{AccountId, Order};

/// Summary of one fulfilled order.
///
/// ## Example
///
/// ```
/// use order_swap::types::{Order, SettlementReceipt};
///
/// let order = Order::new(1, 10, 1, 100, 2, 10, 500);
/// let receipt = SettlementReceipt::for_order(&order, 20, 99, 1_000);
///
/// assert_eq!(receipt.payout, 90);
/// assert_eq!(receipt.fee, 10);
/// assert_eq!(receipt.amount_settled(), order.amount_deposited);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct SettlementReceipt {
    pub order_id: u64,

    /// Account that supplied the desired asset
    pub confirmer: u64,

    /// Account that receives the desired asset
    pub depositor: u64,

    /// Account that receives the fee
    pub fee_recipient: u64,

    /// Deposited asset paid to the confirmer, net of fee
    pub payout: u128,

    /// Deposited asset paid to the fee recipient
    pub fee: u128,

    /// Desired asset delivered to the depositor
    pub delivered: u128,
}

impl SettlementReceipt {
    /// Build the receipt for settling `order` with a fee of `fee_bps`.
    pub fn for_order(
        order: &Order,
        confirmer: AccountId,
        fee_recipient: AccountId,
        fee_bps: u64,
    ) -> Self {
        let (payout, fee) = crate::types::bps::split_fee(order.amount_deposited, fee_bps);
        Self {
            order_id: order.id,
            confirmer,
            depositor: order.depositor,
            fee_recipient,
            payout,
            fee,
            delivered: order.amount_desired,
        }
    }

    /// Total deposited-asset amount released by this settlement.
    pub fn amount_settled(&self) -> u128 {
        self.payout + self.fee
    }

    /// SHA-256 of the receipt's SSZ encoding.
    pub fn digest(&self) -> error::Result<[u8; 32]> {
        let bytes = ssz_rs::serialize(self).map_err(LedgerError::encoding)?;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&Sha256::digest(&bytes));
        Ok(hash)
    }

    pub fn digest_hex(&self) -> error::Result<String> {
        Ok(hex::encode(self.digest()?))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_zero_fee() {
        let order = Order::new(1, 10, 1, 100, 2, 10, 0);
        let receipt = SettlementReceipt::for_order(&order, 20, 99, 0);

        assert_eq!(receipt.payout, 100);
        assert_eq!(receipt.fee, 0);
        assert_eq!(receipt.delivered, 10);
        assert_eq!(receipt.depositor, 10);
    }

    #[test]
    fn test_receipt_full_fee() {
        let order = Order::new(1, 10, 1, 100, 2, 10, 0);
        let receipt = SettlementReceipt::for_order(&order, 20, 99, 10_000);

        assert_eq!(receipt.payout, 0);
        assert_eq!(receipt.fee, 100);
    }

    #[test]
    fn test_receipt_truncates_fee() {
        // 10% of 99 is 9.9, truncated to 9
        let order = Order::new(1, 10, 1, 99, 2, 10, 0);
        let receipt = SettlementReceipt::for_order(&order, 20, 99, 1_000);

        assert_eq!(receipt.fee, 9);
        assert_eq!(receipt.payout, 90);
        assert_eq!(receipt.amount_settled(), 99);
    }

    #[test]
    fn test_receipt_digest_determinism() {
        let order = Order::new(1, 10, 1, 100, 2, 10, 0);
        let a = SettlementReceipt::for_order(&order, 20, 99, 1_000);
        let b = SettlementReceipt::for_order(&order, 20, 99, 1_000);
        let c = SettlementReceipt::for_order(&order, 21, 99, 1_000);

        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
        assert_ne!(a.digest().unwrap(), c.digest().unwrap());
        assert_eq!(a.digest_hex().unwrap().len(), 64);
    }
}
