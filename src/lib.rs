//! # Order Swap
//!
//! Peer-to-peer escrowed token swap ledger.
//!
//! ## Architecture
//!
//! - **Types**: Core records (Order, LedgerEvent, SettlementReceipt)
//! - **Vault**: Custody of escrowed balances over an injected asset capability
//! - **Ledger**: Order state machine, validation and fee routing
//!
//! ## Design Principles
//!
//! 1. **All or nothing**: a failed operation leaves no state change and emits no event
//! 2. **Integer math**: amounts are `u128` base units, fees are basis points
//! 3. **Exactly once**: an escrow is released once, by confirmation or cancellation
//! 4. **Explicit state**: configuration and records live in an owned store

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, events, receipts
pub mod types;

/// Escrow vault and the fungible-asset capability
pub mod vault;

/// Order ledger: create, confirm, cancel
pub mod ledger;

/// Environment-driven configuration
pub mod config;

pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::LedgerConfig;
pub use error::{AssetError, LedgerError};
pub use ledger::{LedgerStore, OrderLedger};
pub use types::{AccountId, AssetId, LedgerEvent, Order, OrderId, OrderStatus, SettlementReceipt};
pub use vault::{AssetRegistry, EscrowVault, FungibleAsset, InMemoryToken};
