//! The fungible-asset capability and the registry of injected asset handles.
//!
//! The ledger never depends on a concrete token type. Each asset identifier
//! maps to a boxed [`FungibleAsset`], so tests, the demo binary and real
//! integrations can plug in whatever backs an asset.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{AssetError, LedgerError, Result};
use crate::types::{AccountId, AssetId};

/// ERC-20 style transfer capability.
///
/// Implementations may report failure either by returning `Ok(false)` or by
/// returning an error. Callers treat both as a failed transfer.
///
/// `caller` and `spender` are explicit because there is no ambient message
/// sender: whoever drives the asset states on whose behalf it acts.
pub trait FungibleAsset: Send {
    /// Balance held by `account`.
    fn balance_of(&self, account: AccountId) -> u128;

    /// Amount `spender` may still move out of `owner`'s balance.
    fn allowance(&self, owner: AccountId, spender: AccountId) -> u128;

    /// Authorize `spender` to move up to `amount` of `owner`'s balance.
    fn approve(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        amount: u128,
    ) -> std::result::Result<bool, AssetError>;

    /// Move `amount` from `caller` to `to`.
    fn transfer(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: u128,
    ) -> std::result::Result<bool, AssetError>;

    /// Move `amount` from `owner` to `to`, consuming `spender`'s allowance.
    fn transfer_from(
        &mut self,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: u128,
    ) -> std::result::Result<bool, AssetError>;
}

/// Asset identifier to handle mapping.
///
/// Ordered by id so iteration (and anything hashed from it) is deterministic.
#[derive(Default)]
pub struct AssetRegistry {
    assets: BTreeMap<AssetId, Box<dyn FungibleAsset>>,
}

impl fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetRegistry")
            .field("assets", &self.assets.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `asset` under `id`, returning the handle it replaced.
    pub fn register<A>(&mut self, id: AssetId, asset: A) -> Option<Box<dyn FungibleAsset>>
    where
        A: FungibleAsset + 'static,
    {
        self.assets.insert(id, Box::new(asset))
    }

    /// Builder-style [`AssetRegistry::register`].
    pub fn with_asset<A>(mut self, id: AssetId, asset: A) -> Self
    where
        A: FungibleAsset + 'static,
    {
        self.register(id, asset);
        self
    }

    #[inline]
    pub fn contains(&self, id: AssetId) -> bool {
        self.assets.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = AssetId> + '_ {
        self.assets.keys().copied()
    }

    pub fn get(&self, id: AssetId) -> Result<&dyn FungibleAsset> {
        self.assets
            .get(&id)
            .map(|asset| asset.as_ref())
            .ok_or(LedgerError::UnknownAsset(id))
    }

    pub fn get_mut(&mut self, id: AssetId) -> Result<&mut (dyn FungibleAsset + 'static)> {
        self.assets
            .get_mut(&id)
            .map(|asset| asset.as_mut())
            .ok_or(LedgerError::UnknownAsset(id))
    }

    /// Balance of `account` in asset `id`.
    pub fn balance_of(&self, id: AssetId, account: AccountId) -> Result<u128> {
        Ok(self.get(id)?.balance_of(account))
    }

    /// Approve on the account owner's behalf. This is the counterparty's
    /// step before creating or confirming an order.
    pub fn approve(
        &mut self,
        id: AssetId,
        owner: AccountId,
        spender: AccountId,
        amount: u128,
    ) -> Result<()> {
        match self.get_mut(id)?.approve(owner, spender, amount) {
            Ok(true) => Ok(()),
            Ok(false) => Err(LedgerError::TransferFailed {
                asset: id,
                reason: "approve returned false".to_string(),
            }),
            Err(err) => Err(LedgerError::transfer_failed(id, &err)),
        }
    }
}
