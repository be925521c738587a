//! Escrow vault and the asset capability it drives.
//!
//! ## Components
//!
//! - [`FungibleAsset`]: transfer / transfer_from / approve / balance_of
//! - [`AssetRegistry`]: one injected handle per asset identifier
//! - [`EscrowVault`]: verified custody movements and staged settlement
//! - [`InMemoryToken`]: reference asset used by the demo, tests and benches
//!
//! ## Example
//!
//! ```
//! use order_swap::vault::{AssetRegistry, EscrowVault, FungibleAsset, InMemoryToken};
//!
//! let mut token = InMemoryToken::with_supply("Guz", "GUZ", 18, 1, 500);
//! token.approve(1, 99, 200).unwrap();
//!
//! let mut assets = AssetRegistry::new().with_asset(7, token);
//! let vault = EscrowVault::new(99);
//!
//! vault.pull_in(&mut assets, 7, 1, 200).unwrap();
//! assert_eq!(vault.custody(&assets, 7).unwrap(), 200);
//! ```

pub mod asset;
pub mod escrow;
pub mod token;

pub use asset::{AssetRegistry, FungibleAsset};
pub use escrow::{EscrowVault, Movement};
pub use token::InMemoryToken;
