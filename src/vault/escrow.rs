//! Escrow vault: custody movements with success verification.
//!
//! ## Atomicity
//!
//! A single pull or push either moves funds or fails without moving them.
//! Multi-step settlements go through [`EscrowVault::settle`], which applies
//! movements behind one commit point:
//!
//! 1. All pulls run first, in plan order
//! 2. Custody is checked against the total outflow per asset
//! 3. All pushes run, in plan order
//!
//! Every applied movement is journaled. If any step fails the journal is
//! unwound newest-first, so the caller sees either the whole settlement or
//! none of it. Unwinding a delivered push moves the funds back from the
//! recipient under the host's authority, the same authority a chain uses to
//! revert a failed transaction.

use std::collections::BTreeMap;

use tracing::{debug, error, warn};

use crate::error::{AssetError, LedgerError, Result};
use crate::types::{AccountId, AssetId};
use crate::vault::AssetRegistry;

/// One custody movement in a settlement plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Move `amount` from `from` into custody (requires allowance)
    PullIn { asset: AssetId, from: AccountId, amount: u128 },
    /// Release `amount` from custody to `to`
    PushOut { asset: AssetId, to: AccountId, amount: u128 },
}

impl Movement {
    pub fn asset(&self) -> AssetId {
        match *self {
            Movement::PullIn { asset, .. } | Movement::PushOut { asset, .. } => asset,
        }
    }

    pub fn amount(&self) -> u128 {
        match *self {
            Movement::PullIn { amount, .. } | Movement::PushOut { amount, .. } => amount,
        }
    }
}

/// Custodian of escrowed balances.
///
/// Holds no balances of its own bookkeeping: the assets' `balance_of` for
/// [`EscrowVault::account`] is the ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscrowVault {
    account: AccountId,
}

impl EscrowVault {
    pub fn new(account: AccountId) -> Self {
        Self { account }
    }

    /// Account under which custody is held.
    #[inline]
    pub fn account(&self) -> AccountId {
        self.account
    }

    /// Current custody balance of `asset`.
    pub fn custody(&self, assets: &AssetRegistry, asset: AssetId) -> Result<u128> {
        assets.balance_of(asset, self.account)
    }

    /// Pull `amount` of `asset` from `from` into custody.
    ///
    /// `from` must have approved at least `amount` to the vault account.
    pub fn pull_in(
        &self,
        assets: &mut AssetRegistry,
        asset: AssetId,
        from: AccountId,
        amount: u128,
    ) -> Result<()> {
        let outcome = assets
            .get_mut(asset)?
            .transfer_from(self.account, from, self.account, amount);
        check(asset, outcome)?;
        debug!(asset, from, amount, "pulled into custody");
        Ok(())
    }

    /// Release `amount` of `asset` from custody to `to`.
    pub fn push_out(
        &self,
        assets: &mut AssetRegistry,
        asset: AssetId,
        to: AccountId,
        amount: u128,
    ) -> Result<()> {
        let outcome = assets.get_mut(asset)?.transfer(self.account, to, amount);
        check(asset, outcome)?;
        debug!(asset, to, amount, "pushed out of custody");
        Ok(())
    }

    /// Apply `plan` atomically. See the module docs for the ordering.
    ///
    /// Zero-amount movements are skipped.
    pub fn settle(&self, assets: &mut AssetRegistry, plan: &[Movement]) -> Result<()> {
        let mut journal: Vec<Movement> = Vec::with_capacity(plan.len());

        let outcome = self.apply(assets, plan, &mut journal);
        if let Err(err) = outcome {
            warn!(error = %err, applied = journal.len(), "settlement failed, unwinding");
            self.unwind(assets, &journal)?;
            return Err(err);
        }
        Ok(())
    }

    fn apply(
        &self,
        assets: &mut AssetRegistry,
        plan: &[Movement],
        journal: &mut Vec<Movement>,
    ) -> Result<()> {
        for movement in plan.iter().filter(|m| m.amount() > 0) {
            if let Movement::PullIn { asset, from, amount } = *movement {
                self.pull_in(assets, asset, from, amount)?;
                journal.push(*movement);
            }
        }

        self.preflight(assets, plan)?;

        for movement in plan.iter().filter(|m| m.amount() > 0) {
            if let Movement::PushOut { asset, to, amount } = *movement {
                self.push_out(assets, asset, to, amount)?;
                journal.push(*movement);
            }
        }
        Ok(())
    }

    /// Check custody covers every asset's total outflow before anything
    /// leaves the vault.
    fn preflight(&self, assets: &AssetRegistry, plan: &[Movement]) -> Result<()> {
        let mut outflow: BTreeMap<AssetId, u128> = BTreeMap::new();
        for movement in plan {
            if let Movement::PushOut { asset, amount, .. } = *movement {
                let total = outflow.entry(asset).or_default();
                *total = total.checked_add(amount).ok_or(LedgerError::TransferFailed {
                    asset,
                    reason: AssetError::Overflow.to_string(),
                })?;
            }
        }

        for (asset, required) in outflow {
            let available = self.custody(assets, asset)?;
            if available < required {
                return Err(LedgerError::transfer_failed(
                    asset,
                    &AssetError::InsufficientBalance { available, required },
                ));
            }
        }
        Ok(())
    }

    /// Reverse applied movements newest-first. Keeps going after a failure
    /// so as much as possible is restored, then reports the first failure.
    fn unwind(&self, assets: &mut AssetRegistry, journal: &[Movement]) -> Result<()> {
        let mut first_failure = None;

        for movement in journal.iter().rev() {
            let outcome = match *movement {
                Movement::PullIn { asset, from, amount } => assets
                    .get_mut(asset)
                    .map(|handle| handle.transfer(self.account, from, amount)),
                Movement::PushOut { asset, to, amount } => assets
                    .get_mut(asset)
                    .map(|handle| handle.transfer(to, self.account, amount)),
            };

            let failure = match outcome {
                Ok(Ok(true)) => None,
                Ok(Ok(false)) => Some("asset returned false".to_string()),
                Ok(Err(err)) => Some(err.to_string()),
                Err(err) => Some(err.to_string()),
            };

            if let Some(reason) = failure {
                error!(?movement, %reason, "rollback step failed");
                first_failure.get_or_insert(LedgerError::RollbackFailed {
                    asset: movement.asset(),
                    reason,
                });
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Map both failure signals of an asset call onto `TransferFailed`.
fn check(asset: AssetId, outcome: std::result::Result<bool, AssetError>) -> Result<()> {
    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => Err(LedgerError::TransferFailed {
            asset,
            reason: "asset returned false".to_string(),
        }),
        Err(err) => Err(LedgerError::transfer_failed(asset, &err)),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
