//! Order ledger module.
//!
//! ## Components
//!
//! - [`LedgerStore`]: owner, fee, id counter and order records
//! - [`OrderLedger`]: create / confirm / cancel on top of the escrow vault
//!
//! ## Complexity
//!
//! | Operation     | Complexity |
//! |---------------|------------|
//! | Create order  | O(1)       |
//! | Confirm order | O(1)       |
//! | Lookup by id  | O(1)       |
//! | State root    | O(n)       |

pub mod book;
pub mod store;

pub use book::OrderLedger;
pub use store::LedgerStore;
