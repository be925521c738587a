//! Core data types for the swap ledger
//!
//! Records that leave the ledger (orders, events, receipts) implement SSZ
//! serialization for deterministic encoding. Amounts are `u128` base units.
//!
//! ## Types
//!
//! - [`Order`]: An escrowed offer and its lifecycle state
//! - [`OrderStatus`]: Active, Fulfilled or Cancelled
//! - [`LedgerEvent`]: Notifications emitted by committed operations
//! - [`SettlementReceipt`]: Where the escrowed leg went on confirmation

mod order;
mod event;
mod receipt;
pub mod bps;
pub mod units;

pub use order::{AccountId, AssetId, Order, OrderId, OrderStatus};
pub use event::{LedgerEvent, OrderCancelled, OrderCreated, OrderFulfilled, OwnershipTransferred};
pub use receipt::SettlementReceipt;
