//! Order record for the swap ledger.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs for deterministic encoding:
//! - Basic types (u8, u64, u128): direct little-endian encoding
//! - Fixed-size container: concatenated fields, 81 bytes in total
//!
//! The encoding feeds the ledger state root, so field order is part of the
//! format.

use ssz_rs::prelude::*;

use crate::types::bps;

/// Account identifier (depositor, confirmer, owner, vault).
pub type AccountId = u64;

/// Asset identifier, resolved to a handle through the asset registry.
pub type AssetId = u64;

/// Sequential order identifier, starting at 1.
pub type OrderId = u64;

// ============================================================================
// OrderStatus enum
// ============================================================================

/// Lifecycle state of an order.
///
/// Represented as u8 for SSZ compatibility:
/// - Active = 0
/// - Fulfilled = 1
/// - Cancelled = 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    /// Funds are escrowed and the order can be confirmed or cancelled
    #[default]
    Active,
    /// A counterparty supplied the desired asset (terminal)
    Fulfilled,
    /// The escrow was returned to the depositor (terminal)
    Cancelled,
}

impl OrderStatus {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            OrderStatus::Active => 0,
            OrderStatus::Fulfilled => 1,
            OrderStatus::Cancelled => 2,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderStatus::Active),
            1 => Some(OrderStatus::Fulfilled),
            2 => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Active)
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// One escrowed offer: `amount_deposited` of `asset_deposited` in exchange
/// for `amount_desired` of `asset_desired`.
///
/// ## Example
///
/// ```
/// use order_swap::types::{Order, OrderStatus};
///
/// // Account 10 offers 100 of asset 1 for 10 of asset 2, 5% tolerance
/// let order = Order::new(1, 10, 1, 100, 2, 10, 500);
/// assert!(order.is_active());
/// assert_eq!(order.status(), OrderStatus::Active);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Sequential identifier assigned by the ledger
    pub id: u64,

    /// Account that created the order and owns the escrow until settlement
    pub depositor: u64,

    /// Asset placed in escrow
    pub asset_deposited: u64,

    /// Escrowed quantity, in base units
    pub amount_deposited: u128,

    /// Asset the depositor wants in return
    pub asset_desired: u64,

    /// Quantity required to fulfill the order, in base units
    pub amount_desired: u128,

    /// Acceptable deviation in basis points (0..=10000)
    pub slippage_tolerance: u64,

    /// Lifecycle state as u8 (0=Active, 1=Fulfilled, 2=Cancelled)
    pub status_raw: u8,

    /// Account that fulfilled the order; 0 until fulfilled
    pub confirmer: u64,
}

impl Order {
    /// Create a new active order.
    ///
    /// Validation happens in the ledger; this only assembles the record.
    pub fn new(
        id: OrderId,
        depositor: AccountId,
        asset_deposited: AssetId,
        amount_deposited: u128,
        asset_desired: AssetId,
        amount_desired: u128,
        slippage_tolerance: u64,
    ) -> Self {
        Self {
            id,
            depositor,
            asset_deposited,
            amount_deposited,
            asset_desired,
            amount_desired,
            slippage_tolerance,
            status_raw: OrderStatus::Active.to_u8(),
            confirmer: 0,
        }
    }

    /// Get the lifecycle state
    ///
    /// An unrecognized raw value reads as `Cancelled`, so a corrupt record
    /// can never be confirmed or cancelled again.
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_u8(self.status_raw).unwrap_or(OrderStatus::Cancelled)
    }

    /// True until the order is fulfilled or cancelled
    pub fn is_active(&self) -> bool {
        !self.status().is_terminal()
    }

    /// Record fulfillment by `confirmer`.
    pub(crate) fn mark_fulfilled(&mut self, confirmer: AccountId) {
        debug_assert!(self.is_active());
        self.status_raw = OrderStatus::Fulfilled.to_u8();
        self.confirmer = confirmer;
    }

    pub(crate) fn mark_cancelled(&mut self) {
        debug_assert!(self.is_active());
        self.status_raw = OrderStatus::Cancelled.to_u8();
    }

    /// Inclusive range of desired-asset amounts within the declared
    /// slippage tolerance.
    ///
    /// Advisory only: confirmation always settles exactly `amount_desired`.
    ///
    /// ```
    /// use order_swap::types::Order;
    ///
    /// let order = Order::new(1, 10, 1, 100, 2, 1_000, 500);
    /// assert_eq!(order.settlement_bounds(), (950, 1_050));
    /// ```
    pub fn settlement_bounds(&self) -> (u128, u128) {
        let slack = bps::portion(self.amount_desired, self.slippage_tolerance.min(bps::BPS_DENOMINATOR));
        (
            self.amount_desired - slack,
            self.amount_desired.saturating_add(slack),
        )
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion() {
        assert_eq!(OrderStatus::Active.to_u8(), 0);
        assert_eq!(OrderStatus::Fulfilled.to_u8(), 1);
        assert_eq!(OrderStatus::Cancelled.to_u8(), 2);
        assert_eq!(OrderStatus::from_u8(1), Some(OrderStatus::Fulfilled));
        assert_eq!(OrderStatus::from_u8(3), None);
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Active.is_terminal());
    }

    #[test]
    fn test_order_new() {
        let order = Order::new(1, 10, 1, 100, 2, 10, 500);

        assert_eq!(order.id, 1);
        assert_eq!(order.depositor, 10);
        assert_eq!(order.asset_deposited, 1);
        assert_eq!(order.amount_deposited, 100);
        assert_eq!(order.asset_desired, 2);
        assert_eq!(order.amount_desired, 10);
        assert_eq!(order.slippage_tolerance, 500);
        assert!(order.is_active());
        assert_eq!(order.confirmer, 0);
    }

    #[test]
    fn test_order_transitions() {
        let mut order = Order::new(1, 10, 1, 100, 2, 10, 0);
        order.mark_fulfilled(42);
        assert_eq!(order.status(), OrderStatus::Fulfilled);
        assert_eq!(order.confirmer, 42);
        assert!(!order.is_active());

        let mut order = Order::new(2, 10, 1, 100, 2, 10, 0);
        order.mark_cancelled();
        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert_eq!(order.confirmer, 0);
    }

    #[test]
    fn test_unknown_status_is_terminal() {
        let mut order = Order::new(1, 10, 1, 100, 2, 10, 0);
        order.status_raw = 9;
        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert!(!order.is_active());
    }

    #[test]
    fn test_settlement_bounds_edges() {
        assert_eq!(Order::new(1, 1, 1, 1, 2, 10, 0).settlement_bounds(), (10, 10));
        assert_eq!(Order::new(1, 1, 1, 1, 2, 10, 10_000).settlement_bounds(), (0, 20));
        assert_eq!(
            Order::new(1, 1, 1, 1, 2, u128::MAX, 10_000).settlement_bounds(),
            (0, u128::MAX)
        );
    }

    #[test]
    fn test_order_ssz_roundtrip() {
        let mut order = Order::new(3, 10, 1, 1_000_000_000_000_000_000_000, 2, 10, 500);
        order.mark_fulfilled(11);

        let serialized = ssz_rs::serialize(&order).expect("Failed to serialize");
        let deserialized: Order = ssz_rs::deserialize(&serialized).expect("Failed to deserialize");

        assert_eq!(order, deserialized);
    }

    #[test]
    fn test_order_ssz_size() {
        let order = Order::new(1, 10, 1, 100, 2, 10, 500);
        let bytes = ssz_rs::serialize(&order).expect("Failed to serialize");

        // 8 (id) + 8 (depositor) + 8 + 16 (deposit leg) + 8 + 16 (desired leg)
        // + 8 (slippage) + 1 (status) + 8 (confirmer)
        assert_eq!(bytes.len(), 81);
    }
}
