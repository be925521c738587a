//! Explicit ledger state: configuration, id counter and order records.
//!
//! ## Memory Model
//!
//! Orders live in a [`Slab`] with an id-to-key index. Records are never
//! removed (fulfilled and cancelled orders stay queryable), so keys are
//! never reused either.
//!
//! ## State Root
//!
//! [`LedgerStore::compute_state_root`] hashes the configuration followed by
//! every order's SSZ encoding in id order. Two stores that saw the same
//! operations produce the same root.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use slab::Slab;
use crate::error::{LedgerError, Result};
use crate::types::{AccountId, Order, OrderId};

/// Owned ledger state. The [`OrderLedger`](crate::ledger::OrderLedger) is
/// the only writer.
#[derive(Debug)]
pub struct LedgerStore {
    owner: AccountId,
    fee_percentage: u64,

    /// Id of the most recently created order
    order_count: u64,

    /// Key: slab index, Value: Order
    orders: Slab<Order>,

    /// Order ID to slab key mapping
    order_index: HashMap<OrderId, usize>,
}

impl LedgerStore {
    pub fn new(owner: AccountId, fee_percentage: u64) -> Self {
        Self::with_capacity(owner, fee_percentage, 0)
    }

    /// Create a store with room for `order_capacity` orders before
    /// reallocating.
    ///
    /// ```
    /// use order_swap::ledger::LedgerStore;
    ///
    /// let store = LedgerStore::with_capacity(1, 1_000, 10_000);
    /// assert!(store.capacity() >= 10_000);
    /// assert_eq!(store.order_count(), 0);
    /// ```
    pub fn with_capacity(owner: AccountId, fee_percentage: u64, order_capacity: usize) -> Self {
        Self {
            owner,
            fee_percentage,
            order_count: 0,
            orders: Slab::with_capacity(order_capacity),
            order_index: HashMap::with_capacity(order_capacity),
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    #[inline]
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: AccountId) {
        self.owner = owner;
    }

    #[inline]
    pub fn fee_percentage(&self) -> u64 {
        self.fee_percentage
    }

    #[inline]
    pub fn order_count(&self) -> u64 {
        self.order_count
    }

    /// Id the next created order will receive.
    #[inline]
    pub fn next_order_id(&self) -> OrderId {
        self.order_count + 1
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    // ========================================================================
    // Records
    // ========================================================================

    /// Store `order` under the next id and advance the counter.
    ///
    /// The id on the record is overwritten with the allocated id.
    pub(crate) fn insert(&mut self, mut order: Order) -> OrderId {
        let id = self.next_order_id();
        order.id = id;

        let key = self.orders.insert(order);
        self.order_index.insert(id, key);
        self.order_count = id;
        id
    }

    #[inline]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        let key = *self.order_index.get(&id)?;
        self.orders.get(key)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        let key = *self.order_index.get(&id)?;
        self.orders.get_mut(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// All orders in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> + '_ {
        (1..=self.order_count).filter_map(move |id| self.get(id))
    }

    // ========================================================================
    // State Root
    // ========================================================================

    pub fn compute_state_root(&self) -> Result<[u8; 32]> {
        let mut hasher = Sha256::new();
        hasher.update(self.owner.to_le_bytes());
        hasher.update(self.fee_percentage.to_le_bytes());
        hasher.update(self.order_count.to_le_bytes());
        for order in self.iter() {
            hasher.update(ssz_rs::serialize(order).map_err(LedgerError::encoding)?);
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        Ok(root)
    }

    pub fn state_root_hex(&self) -> Result<String> {
        Ok(hex::encode(self.compute_state_root()?))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
