//! The order ledger: validation, state machine and settlement routing.
//!
//! ## State Machine
//!
//! ```text
//!            confirm_order
//!   Active ----------------> Fulfilled
//!     |
//!     |      cancel_order
//!     +--------------------> Cancelled
//! ```
//!
//! Both transitions are terminal. Records are kept forever.
//!
//! ## Atomicity
//!
//! Every operation validates first, then moves funds, then mutates the
//! store and emits its event. A failure at any point returns before the
//! store is touched, and the vault unwinds any movement it already applied,
//! so a failed call leaves no trace.

use tracing::{info, warn};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::ledger::LedgerStore;
use crate::types::{
    bps, AccountId, AssetId, LedgerEvent, Order, OrderCreated, OrderId, OwnershipTransferred,
    SettlementReceipt,
};
use crate::vault::{AssetRegistry, EscrowVault, Movement};

/// Escrowed bilateral swap ledger.
///
/// ## Example
///
/// ```
/// use order_swap::config::LedgerConfig;
/// use order_swap::ledger::OrderLedger;
/// use order_swap::vault::{AssetRegistry, FungibleAsset, InMemoryToken};
///
/// const OWNER: u64 = 1;
/// const ALICE: u64 = 2;
/// const BOB: u64 = 3;
/// const VAULT: u64 = 100;
///
/// let mut x = InMemoryToken::with_supply("X", "X", 18, ALICE, 100);
/// x.approve(ALICE, VAULT, 100).unwrap();
/// let mut y = InMemoryToken::with_supply("Y", "Y", 18, BOB, 10);
/// y.approve(BOB, VAULT, 10).unwrap();
/// let assets = AssetRegistry::new().with_asset(1, x).with_asset(2, y);
///
/// let config = LedgerConfig::new(OWNER, 1_000).with_vault_account(VAULT);
/// let mut ledger = OrderLedger::new(config, assets).unwrap();
///
/// let id = ledger.create_order(ALICE, 1, 100, 2, 10, 500).unwrap();
/// let receipt = ledger.confirm_order(BOB, id).unwrap();
///
/// assert_eq!((receipt.payout, receipt.fee), (90, 10));
/// assert!(!ledger.order(id).unwrap().is_active());
/// ```
#[derive(Debug)]
pub struct OrderLedger {
    store: LedgerStore,
    vault: EscrowVault,
    assets: AssetRegistry,
    events: Vec<LedgerEvent>,
}

impl OrderLedger {
    /// Deploy a ledger. Fails with [`LedgerError::InvalidFeePercentage`] when
    /// the fee exceeds 10000 basis points; no instance is produced.
    pub fn new(config: LedgerConfig, assets: AssetRegistry) -> Result<Self> {
        Self::with_capacity(config, assets, 0)
    }

    pub fn with_capacity(
        config: LedgerConfig,
        assets: AssetRegistry,
        order_capacity: usize,
    ) -> Result<Self> {
        if let Err(err) = config.validate() {
            warn!(
                owner = config.owner,
                fee_percentage = config.fee_percentage,
                error = %err,
                "ledger construction rejected"
            );
            return Err(err);
        }

        info!(
            owner = config.owner,
            fee_percentage = config.fee_percentage,
            vault = config.vault_account,
            assets = assets.len(),
            "ledger deployed"
        );
        Ok(Self {
            store: LedgerStore::with_capacity(config.owner, config.fee_percentage, order_capacity),
            vault: EscrowVault::new(config.vault_account),
            assets,
            events: Vec::new(),
        })
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Escrow `amount_deposited` of `asset_deposited` from `caller` and
    /// register an active order asking for `amount_desired` of
    /// `asset_desired`.
    ///
    /// `caller` must have approved at least `amount_deposited` to
    /// [`OrderLedger::vault_account`].
    ///
    /// # Errors
    ///
    /// * [`LedgerError::AmountMustBeGreaterThanZero`] - either amount is zero
    /// * [`LedgerError::InvalidSlippageTolerance`] - tolerance above 10000
    /// * [`LedgerError::Unauthorized`] - `caller` is the vault account
    /// * [`LedgerError::UnknownAsset`] - an asset id has no registered handle
    /// * [`LedgerError::TransferFailed`] - the escrow pull failed
    pub fn create_order(
        &mut self,
        caller: AccountId,
        asset_deposited: AssetId,
        amount_deposited: u128,
        asset_desired: AssetId,
        amount_desired: u128,
        slippage_tolerance: u64,
    ) -> Result<OrderId> {
        let outcome = self.validate_create(
            caller,
            asset_deposited,
            amount_deposited,
            asset_desired,
            amount_desired,
            slippage_tolerance,
        );
        let outcome = outcome.and_then(|()| {
            self.vault
                .pull_in(&mut self.assets, asset_deposited, caller, amount_deposited)
        });
        if let Err(err) = outcome {
            warn!(
                depositor = caller,
                error = %err,
                validation = err.is_validation(),
                "order creation rejected"
            );
            return Err(err);
        }

        let order = Order::new(
            0,
            caller,
            asset_deposited,
            amount_deposited,
            asset_desired,
            amount_desired,
            slippage_tolerance,
        );
        let id = self.store.insert(order);
        if let Some(order) = self.store.get(id) {
            self.events.push(LedgerEvent::OrderCreated(OrderCreated::from(order)));
        }

        info!(
            order_id = id,
            depositor = caller,
            asset_deposited,
            amount_deposited,
            asset_desired,
            amount_desired,
            slippage_tolerance,
            "order created"
        );
        Ok(id)
    }

    fn validate_create(
        &self,
        caller: AccountId,
        asset_deposited: AssetId,
        amount_deposited: u128,
        asset_desired: AssetId,
        amount_desired: u128,
        slippage_tolerance: u64,
    ) -> Result<()> {
        if amount_deposited == 0 || amount_desired == 0 {
            return Err(LedgerError::AmountMustBeGreaterThanZero);
        }
        if !bps::is_valid(slippage_tolerance) {
            return Err(LedgerError::InvalidSlippageTolerance {
                tolerance: slippage_tolerance,
            });
        }
        self.ensure_not_vault(caller)?;
        for asset in [asset_deposited, asset_desired] {
            if !self.assets.contains(asset) {
                return Err(LedgerError::UnknownAsset(asset));
            }
        }
        Ok(())
    }

    /// The vault account moves funds only through the vault. Acting as it
    /// would turn pulls into self-transfers that escrow nothing.
    fn ensure_not_vault(&self, caller: AccountId) -> Result<()> {
        if caller == self.vault.account() {
            return Err(LedgerError::Unauthorized { caller });
        }
        Ok(())
    }

    /// Fulfill an active order on behalf of `caller`.
    ///
    /// Pulls `amount_desired` from `caller`, pays the escrow net of fee to
    /// `caller`, the fee to the owner and the desired asset to the
    /// depositor, then marks the order fulfilled. The slippage tolerance is
    /// not consulted: the order settles at exactly its recorded amounts.
    ///
    /// # Errors
    ///
    /// * [`LedgerError::OrderNotActive`] - unknown, fulfilled or cancelled
    /// * [`LedgerError::Unauthorized`] - `caller` is the vault account
    /// * [`LedgerError::TransferFailed`] - any movement failed; the whole
    ///   settlement was rolled back and the order is still active
    pub fn confirm_order(&mut self, caller: AccountId, order_id: OrderId) -> Result<SettlementReceipt> {
        let order = match self
            .active_order(order_id)
            .and_then(|order| self.ensure_not_vault(caller).map(|()| order))
        {
            Ok(order) => order.clone(),
            Err(err) => {
                warn!(order_id, confirmer = caller, error = %err, "confirmation rejected");
                return Err(err);
            }
        };

        let receipt = SettlementReceipt::for_order(
            &order,
            caller,
            self.store.owner(),
            self.store.fee_percentage(),
        );
        let plan = [
            Movement::PullIn {
                asset: order.asset_desired,
                from: caller,
                amount: order.amount_desired,
            },
            Movement::PushOut {
                asset: order.asset_deposited,
                to: caller,
                amount: receipt.payout,
            },
            Movement::PushOut {
                asset: order.asset_deposited,
                to: receipt.fee_recipient,
                amount: receipt.fee,
            },
            Movement::PushOut {
                asset: order.asset_desired,
                to: order.depositor,
                amount: receipt.delivered,
            },
        ];
        if let Err(err) = self.vault.settle(&mut self.assets, &plan) {
            warn!(order_id, confirmer = caller, error = %err, "confirmation failed");
            return Err(err);
        }

        if let Some(order) = self.store.get_mut(order_id) {
            order.mark_fulfilled(caller);
        }
        self.events.push(LedgerEvent::order_fulfilled(order_id, caller));

        info!(
            order_id,
            confirmer = caller,
            payout = receipt.payout,
            fee = receipt.fee,
            "order fulfilled"
        );
        Ok(receipt)
    }

    /// Return the escrow of an active order to its depositor, with no fee.
    ///
    /// Only the depositor or the owner may cancel.
    pub fn cancel_order(&mut self, caller: AccountId, order_id: OrderId) -> Result<()> {
        let order = match self.cancellable_order(caller, order_id) {
            Ok(order) => order.clone(),
            Err(err) => {
                warn!(order_id, caller, error = %err, "cancellation rejected");
                return Err(err);
            }
        };

        let plan = [Movement::PushOut {
            asset: order.asset_deposited,
            to: order.depositor,
            amount: order.amount_deposited,
        }];
        if let Err(err) = self.vault.settle(&mut self.assets, &plan) {
            warn!(order_id, caller, error = %err, "cancellation failed");
            return Err(err);
        }

        if let Some(order) = self.store.get_mut(order_id) {
            order.mark_cancelled();
        }
        self.events.push(LedgerEvent::order_cancelled(order_id, caller));

        info!(order_id, cancelled_by = caller, refunded = order.amount_deposited, "order cancelled");
        Ok(())
    }

    fn cancellable_order(&self, caller: AccountId, order_id: OrderId) -> Result<&Order> {
        let order = self.active_order(order_id)?;
        if caller != order.depositor && caller != self.store.owner() {
            return Err(LedgerError::Unauthorized { caller });
        }
        self.ensure_not_vault(caller)?;
        Ok(order)
    }

    /// Reassign the owner (and fee recipient). Owner only, and the vault
    /// account can never become the owner.
    pub fn transfer_ownership(&mut self, caller: AccountId, new_owner: AccountId) -> Result<()> {
        let previous_owner = self.store.owner();
        let outcome = if caller != previous_owner {
            Err(LedgerError::Unauthorized { caller })
        } else if new_owner == self.vault.account() {
            Err(LedgerError::OwnerIsVault(new_owner))
        } else {
            Ok(())
        };
        if let Err(err) = outcome {
            warn!(caller, new_owner, error = %err, "ownership transfer rejected");
            return Err(err);
        }

        self.store.set_owner(new_owner);
        self.events
            .push(LedgerEvent::OwnershipTransferred(OwnershipTransferred { previous_owner, new_owner }));
        info!(previous_owner, new_owner, "ownership transferred");
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    fn active_order(&self, order_id: OrderId) -> Result<&Order> {
        self.store
            .get(order_id)
            .filter(|order| order.is_active())
            .ok_or(LedgerError::OrderNotActive(order_id))
    }

    /// Preview `(payout, fee)` for confirming an active order.
    pub fn quote(&self, order_id: OrderId) -> Result<(u128, u128)> {
        let order = self.active_order(order_id)?;
        Ok(bps::split_fee(order.amount_deposited, self.store.fee_percentage()))
    }

    #[inline]
    pub fn owner(&self) -> AccountId {
        self.store.owner()
    }

    #[inline]
    pub fn fee_percentage(&self) -> u64 {
        self.store.fee_percentage()
    }

    #[inline]
    pub fn order_count(&self) -> u64 {
        self.store.order_count()
    }

    #[inline]
    pub fn vault_account(&self) -> AccountId {
        self.vault.account()
    }

    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.store.get(order_id)
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.store.iter()
    }

    pub fn active_orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.store.iter().filter(|order| order.is_active())
    }

    pub fn orders_by_depositor(&self, depositor: AccountId) -> impl Iterator<Item = &Order> + '_ {
        self.store.iter().filter(move |order| order.depositor == depositor)
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    /// Direct access to the asset handles, for the steps that happen outside
    /// the ledger (approvals, minting).
    pub fn assets_mut(&mut self) -> &mut AssetRegistry {
        &mut self.assets
    }

    /// Custody balance the vault holds of `asset`.
    pub fn custody(&self, asset: AssetId) -> Result<u128> {
        self.vault.custody(&self.assets, asset)
    }

    pub fn compute_state_root(&self) -> Result<[u8; 32]> {
        self.store.compute_state_root()
    }

    pub fn state_root_hex(&self) -> Result<String> {
        self.store.state_root_hex()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderStatus;
    use crate::vault::{FungibleAsset, InMemoryToken};

    const OWNER: AccountId = 1;
    const ALICE: AccountId = 2;
    const BOB: AccountId = 3;
    const VAULT: AccountId = 100;
    const X: AssetId = 10;
    const Y: AssetId = 20;

    fn ledger_with_fee(fee: u64) -> OrderLedger {
        let mut x = InMemoryToken::with_supply("X", "X", 18, ALICE, 1_000);
        x.approve(ALICE, VAULT, 1_000).unwrap();
        let mut y = InMemoryToken::with_supply("Y", "Y", 18, BOB, 1_000);
        y.approve(BOB, VAULT, 1_000).unwrap();
        let assets = AssetRegistry::new().with_asset(X, x).with_asset(Y, y);

        OrderLedger::new(LedgerConfig::new(OWNER, fee).with_vault_account(VAULT), assets).unwrap()
    }

    fn balance(ledger: &OrderLedger, asset: AssetId, account: AccountId) -> u128 {
        ledger.assets().balance_of(asset, account).unwrap()
    }

    #[test]
    fn test_construction() {
        let ledger = ledger_with_fee(1_000);
        assert_eq!(ledger.owner(), OWNER);
        assert_eq!(ledger.fee_percentage(), 1_000);
        assert_eq!(ledger.order_count(), 0);
        assert_eq!(ledger.vault_account(), VAULT);
    }

    #[test]
    fn test_construction_rejects_fee() {
        let err = OrderLedger::new(LedgerConfig::new(OWNER, 10_001), AssetRegistry::new()).unwrap_err();
        assert_eq!(err, LedgerError::InvalidFeePercentage(10_001));
    }

    #[test]
    fn test_create_order() {
        let mut ledger = ledger_with_fee(1_000);
        let id = ledger.create_order(ALICE, X, 100, Y, 10, 500).unwrap();

        assert_eq!(id, 1);
        assert_eq!(ledger.order_count(), 1);
        let order = ledger.order(id).unwrap();
        assert_eq!(order.depositor, ALICE);
        assert_eq!(order.status(), OrderStatus::Active);
        assert_eq!(ledger.custody(X).unwrap(), 100);
        assert_eq!(balance(&ledger, X, ALICE), 900);
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn test_create_order_validation_precedence() {
        let mut ledger = ledger_with_fee(1_000);

        // zero amount is reported even when the tolerance is also invalid
        assert_eq!(
            ledger.create_order(ALICE, X, 0, Y, 10, 20_000),
            Err(LedgerError::AmountMustBeGreaterThanZero)
        );
        assert_eq!(
            ledger.create_order(ALICE, X, 10, 99, 10, 0),
            Err(LedgerError::UnknownAsset(99))
        );
        assert_eq!(ledger.order_count(), 0);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_confirm_order() {
        let mut ledger = ledger_with_fee(1_000);
        let id = ledger.create_order(ALICE, X, 100, Y, 10, 500).unwrap();

        let receipt = ledger.confirm_order(BOB, id).unwrap();
        assert_eq!(receipt.payout, 90);
        assert_eq!(receipt.fee, 10);
        assert_eq!(receipt.fee_recipient, OWNER);

        let order = ledger.order(id).unwrap();
        assert_eq!(order.status(), OrderStatus::Fulfilled);
        assert_eq!(order.confirmer, BOB);
        assert_eq!(ledger.custody(X).unwrap(), 0);
        assert_eq!(ledger.custody(Y).unwrap(), 0);
    }

    #[test]
    fn test_confirm_zero_fee_skips_fee_push() {
        let mut ledger = ledger_with_fee(0);
        let id = ledger.create_order(ALICE, X, 100, Y, 10, 0).unwrap();
        let receipt = ledger.confirm_order(BOB, id).unwrap();

        assert_eq!(receipt.fee, 0);
        assert_eq!(balance(&ledger, X, BOB), 100);
        assert_eq!(balance(&ledger, X, OWNER), 0);
    }

    #[test]
    fn test_quote() {
        let mut ledger = ledger_with_fee(250);
        let id = ledger.create_order(ALICE, X, 999, Y, 10, 0).unwrap();

        assert_eq!(ledger.quote(id).unwrap(), (975, 24));
        assert_eq!(ledger.quote(2), Err(LedgerError::OrderNotActive(2)));
    }

    #[test]
    fn test_cancel_by_depositor() {
        let mut ledger = ledger_with_fee(1_000);
        let id = ledger.create_order(ALICE, X, 100, Y, 10, 0).unwrap();

        ledger.cancel_order(ALICE, id).unwrap();
        assert_eq!(ledger.order(id).unwrap().status(), OrderStatus::Cancelled);
        assert_eq!(balance(&ledger, X, ALICE), 1_000);
        assert_eq!(ledger.custody(X).unwrap(), 0);

        assert_eq!(ledger.cancel_order(ALICE, id), Err(LedgerError::OrderNotActive(id)));
        assert_eq!(ledger.confirm_order(BOB, id), Err(LedgerError::OrderNotActive(id)));
    }

    #[test]
    fn test_cancel_authorization() {
        let mut ledger = ledger_with_fee(1_000);
        let id = ledger.create_order(ALICE, X, 100, Y, 10, 0).unwrap();

        assert_eq!(ledger.cancel_order(BOB, id), Err(LedgerError::Unauthorized { caller: BOB }));
        assert!(ledger.order(id).unwrap().is_active());

        ledger.cancel_order(OWNER, id).unwrap();
        // refund goes to the depositor, not the owner
        assert_eq!(balance(&ledger, X, ALICE), 1_000);
        assert_eq!(balance(&ledger, X, OWNER), 0);
    }

    #[test]
    fn test_transfer_ownership() {
        let mut ledger = ledger_with_fee(1_000);

        assert_eq!(
            ledger.transfer_ownership(ALICE, ALICE),
            Err(LedgerError::Unauthorized { caller: ALICE })
        );
        ledger.transfer_ownership(OWNER, 77).unwrap();
        assert_eq!(ledger.owner(), 77);

        // fees now route to the new owner
        let id = ledger.create_order(ALICE, X, 100, Y, 10, 0).unwrap();
        ledger.confirm_order(BOB, id).unwrap();
        assert_eq!(balance(&ledger, X, 77), 10);
    }

    #[test]
    fn test_order_queries() {
        let mut ledger = ledger_with_fee(1_000);
        ledger.create_order(ALICE, X, 100, Y, 10, 0).unwrap();
        ledger.create_order(BOB, Y, 50, X, 5, 0).unwrap();
        ledger.create_order(ALICE, X, 100, Y, 10, 0).unwrap();
        ledger.confirm_order(BOB, 1).unwrap();

        let all: Vec<_> = ledger.orders().map(|o| o.id).collect();
        let active: Vec<_> = ledger.active_orders().map(|o| o.id).collect();
        let alice: Vec<_> = ledger.orders_by_depositor(ALICE).map(|o| o.id).collect();
        assert_eq!(all, vec![1, 2, 3]);
        assert_eq!(active, vec![2, 3]);
        assert_eq!(alice, vec![1, 3]);
    }

    #[test]
    fn test_vault_account_cannot_create() {
        let mut ledger = ledger_with_fee(1_000);
        ledger.assets_mut().approve(X, VAULT, VAULT, 1_000).unwrap();
        let honest = ledger.create_order(ALICE, X, 100, Y, 10, 0).unwrap();

        assert_eq!(
            ledger.create_order(VAULT, X, 100, Y, 10, 0),
            Err(LedgerError::Unauthorized { caller: VAULT })
        );
        assert_eq!(ledger.order_count(), 1);
        assert_eq!(ledger.custody(X).unwrap(), 100);

        ledger.confirm_order(BOB, honest).unwrap();
        assert_eq!(ledger.custody(X).unwrap(), 0);
    }

    #[test]
    fn test_vault_account_cannot_confirm() {
        let mut ledger = ledger_with_fee(1_000);
        ledger.create_order(BOB, Y, 50, X, 5, 0).unwrap();
        let id = ledger.create_order(ALICE, X, 100, Y, 10, 0).unwrap();
        ledger.assets_mut().approve(Y, VAULT, VAULT, 1_000).unwrap();

        assert_eq!(
            ledger.confirm_order(VAULT, id),
            Err(LedgerError::Unauthorized { caller: VAULT })
        );
        assert!(ledger.order(id).unwrap().is_active());
        // Bob's escrowed Y is untouched
        assert_eq!(ledger.custody(Y).unwrap(), 50);
        assert_eq!(ledger.custody(X).unwrap(), 100);
        assert_eq!(ledger.events().len(), 2);
    }

    #[test]
    fn test_cancel_rejection_leaves_order() {
        let mut ledger = ledger_with_fee(1_000);
        let id = ledger.create_order(ALICE, X, 100, Y, 10, 0).unwrap();

        assert_eq!(ledger.cancel_order(VAULT, id), Err(LedgerError::Unauthorized { caller: VAULT }));
        assert_eq!(ledger.cancel_order(ALICE, 9), Err(LedgerError::OrderNotActive(9)));
        assert!(ledger.order(id).unwrap().is_active());
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn test_transfer_ownership_to_vault_rejected() {
        let mut ledger = ledger_with_fee(1_000);
        assert_eq!(
            ledger.transfer_ownership(OWNER, VAULT),
            Err(LedgerError::OwnerIsVault(VAULT))
        );
        assert_eq!(ledger.owner(), OWNER);
    }

    #[test]
    fn test_construction_rejects_owner_as_vault() {
        let config = LedgerConfig::new(VAULT, 1_000).with_vault_account(VAULT);
        assert_eq!(
            OrderLedger::new(config, AssetRegistry::new()).unwrap_err(),
            LedgerError::OwnerIsVault(VAULT)
        );
    }

    #[test]
    fn test_drain_events() {
        let mut ledger = ledger_with_fee(1_000);
        let id = ledger.create_order(ALICE, X, 100, Y, 10, 0).unwrap();
        ledger.confirm_order(BOB, id).unwrap();

        let events = ledger.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], LedgerEvent::order_fulfilled(id, BOB));
        assert!(ledger.events().is_empty());
    }
}
