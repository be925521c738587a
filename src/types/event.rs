//! Notifications emitted by the ledger.
//!
//! Each committed operation appends exactly one event to the ledger's log.
//! Failed operations append nothing. Every payload is an SSZ container so the
//! log can be encoded deterministically for observers.

use ssz_rs::prelude::*;

use crate::error::{self, LedgerError};
use crate::types::{AccountId, Order, OrderId};

/// A new order was registered. Carries the full record as created.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct OrderCreated {
    pub order_id: u64,
    pub depositor: u64,
    pub asset_deposited: u64,
    pub amount_deposited: u128,
    pub asset_desired: u64,
    pub amount_desired: u128,
    pub slippage_tolerance: u64,
}

impl From<&Order> for OrderCreated {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            depositor: order.depositor,
            asset_deposited: order.asset_deposited,
            amount_deposited: order.amount_deposited,
            asset_desired: order.asset_desired,
            amount_desired: order.amount_desired,
            slippage_tolerance: order.slippage_tolerance,
        }
    }
}

/// An order was settled by `confirmer`.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct OrderFulfilled {
    pub order_id: u64,
    pub confirmer: u64,
}

/// An order's escrow was returned to its depositor.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct OrderCancelled {
    pub order_id: u64,
    pub cancelled_by: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct OwnershipTransferred {
    pub previous_owner: u64,
    pub new_owner: u64,
}

/// Any event the ledger can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    OrderCreated(OrderCreated),
    OrderFulfilled(OrderFulfilled),
    OrderCancelled(OrderCancelled),
    OwnershipTransferred(OwnershipTransferred),
}

impl LedgerEvent {
    pub fn order_fulfilled(order_id: OrderId, confirmer: AccountId) -> Self {
        LedgerEvent::OrderFulfilled(OrderFulfilled { order_id, confirmer })
    }

    pub fn order_cancelled(order_id: OrderId, cancelled_by: AccountId) -> Self {
        LedgerEvent::OrderCancelled(OrderCancelled { order_id, cancelled_by })
    }

    /// Order the event refers to, if any.
    pub fn order_id(&self) -> Option<OrderId> {
        match self {
            LedgerEvent::OrderCreated(e) => Some(e.order_id),
            LedgerEvent::OrderFulfilled(e) => Some(e.order_id),
            LedgerEvent::OrderCancelled(e) => Some(e.order_id),
            LedgerEvent::OwnershipTransferred(_) => None,
        }
    }

    /// One-byte discriminant used as the prefix of [`LedgerEvent::encode`].
    pub fn tag(&self) -> u8 {
        match self {
            LedgerEvent::OrderCreated(_) => 0,
            LedgerEvent::OrderFulfilled(_) => 1,
            LedgerEvent::OrderCancelled(_) => 2,
            LedgerEvent::OwnershipTransferred(_) => 3,
        }
    }

    /// Encode as the tag byte followed by the payload's SSZ bytes.
    pub fn encode(&self) -> error::Result<Vec<u8>> {
        let payload = match self {
            LedgerEvent::OrderCreated(e) => ssz_rs::serialize(e),
            LedgerEvent::OrderFulfilled(e) => ssz_rs::serialize(e),
            LedgerEvent::OrderCancelled(e) => ssz_rs::serialize(e),
            LedgerEvent::OwnershipTransferred(e) => ssz_rs::serialize(e),
        }
        .map_err(LedgerError::encoding)?;
        let mut bytes = Vec::with_capacity(payload.len() + 1);
        bytes.push(self.tag());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }
}
