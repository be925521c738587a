//! In-memory ERC-20 style token.
//!
//! Backs the demo binary, the integration tests and the benchmarks. Supports
//! a per-recipient block list (transfers to a blocked account return
//! `Ok(false)`) and a halt switch (every transfer errors), which covers both
//! ways a real token can refuse a transfer.

use std::collections::{HashMap, HashSet};

use crate::error::AssetError;
use crate::types::AccountId;
use crate::vault::FungibleAsset;

#[derive(Debug, Clone, Default)]
pub struct InMemoryToken {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    total_supply: u128,
    balances: HashMap<AccountId, u128>,
    allowances: HashMap<(AccountId, AccountId), u128>,
    blocked: HashSet<AccountId>,
    halted: bool,
}

impl InMemoryToken {
    pub fn new(name: &str, symbol: &str, decimals: u32) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            ..Self::default()
        }
    }

    /// Create a token whose whole `supply` is minted to `holder`.
    pub fn with_supply(name: &str, symbol: &str, decimals: u32, holder: AccountId, supply: u128) -> Self {
        let mut token = Self::new(name, symbol, decimals);
        token.balances.insert(holder, supply);
        token.total_supply = supply;
        token
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn mint(&mut self, to: AccountId, amount: u128) -> Result<(), AssetError> {
        let supply = self.total_supply.checked_add(amount).ok_or(AssetError::Overflow)?;
        let balance = self.balance_of(to).checked_add(amount).ok_or(AssetError::Overflow)?;
        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    /// Refuse (with `Ok(false)`) any transfer whose recipient is `account`.
    pub fn block(&mut self, account: AccountId) {
        self.blocked.insert(account);
    }

    pub fn unblock(&mut self, account: AccountId) {
        self.blocked.remove(&account);
    }

    /// Make every transfer fail with [`AssetError::Rejected`].
    pub fn set_halted(&mut self, halted: bool) {
        self.halted = halted;
    }

    fn move_balance(&mut self, from: AccountId, to: AccountId, amount: u128) -> Result<bool, AssetError> {
        if self.halted {
            return Err(AssetError::Rejected(format!("{} transfers are halted", self.symbol)));
        }
        if self.blocked.contains(&to) {
            return Ok(false);
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(AssetError::InsufficientBalance { available, required: amount });
        }
        if from == to {
            return Ok(true);
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(AssetError::Overflow)?;

        self.balances.insert(from, available - amount);
        self.balances.insert(to, credited);
        Ok(true)
    }
}

impl FungibleAsset for InMemoryToken {
    fn balance_of(&self, account: AccountId) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: AccountId, spender: AccountId) -> u128 {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    fn approve(&mut self, owner: AccountId, spender: AccountId, amount: u128) -> Result<bool, AssetError> {
        self.allowances.insert((owner, spender), amount);
        Ok(true)
    }

    fn transfer(&mut self, caller: AccountId, to: AccountId, amount: u128) -> Result<bool, AssetError> {
        self.move_balance(caller, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<bool, AssetError> {
        let available = self.allowance(owner, spender);
        if available < amount {
            return Err(AssetError::InsufficientAllowance { available, required: amount });
        }
        let moved = self.move_balance(owner, to, amount)?;
        if moved {
            self.allowances.insert((owner, spender), available - amount);
        }
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_supply() {
        let token = InMemoryToken::with_supply("Web3Bridge", "W3B", 18, 1, 1_000);
        assert_eq!(token.total_supply(), 1_000);
        assert_eq!(token.balance_of(1), 1_000);
        assert_eq!(token.balance_of(2), 0);
    }

    #[test]
    fn test_transfer() {
        let mut token = InMemoryToken::with_supply("A", "A", 18, 1, 100);
        assert_eq!(token.transfer(1, 2, 40), Ok(true));
        assert_eq!(token.balance_of(1), 60);
        assert_eq!(token.balance_of(2), 40);

        assert_eq!(
            token.transfer(2, 1, 41),
            Err(AssetError::InsufficientBalance { available: 40, required: 41 })
        );
    }

    #[test]
    fn test_transfer_from_consumes_allowance() {
        let mut token = InMemoryToken::with_supply("A", "A", 18, 1, 100);
        token.approve(1, 9, 50).unwrap();

        assert_eq!(token.transfer_from(9, 1, 3, 30), Ok(true));
        assert_eq!(token.allowance(1, 9), 20);
        assert_eq!(token.balance_of(3), 30);

        assert_eq!(
            token.transfer_from(9, 1, 3, 21),
            Err(AssetError::InsufficientAllowance { available: 20, required: 21 })
        );
    }

    #[test]
    fn test_blocked_recipient_returns_false() {
        let mut token = InMemoryToken::with_supply("A", "A", 18, 1, 100);
        token.approve(1, 9, 50).unwrap();
        token.block(3);

        assert_eq!(token.transfer(1, 3, 10), Ok(false));
        assert_eq!(token.transfer_from(9, 1, 3, 10), Ok(false));
        // nothing moved, allowance untouched
        assert_eq!(token.balance_of(1), 100);
        assert_eq!(token.allowance(1, 9), 50);

        token.unblock(3);
        assert_eq!(token.transfer(1, 3, 10), Ok(true));
    }

    #[test]
    fn test_halted_errors() {
        let mut token = InMemoryToken::with_supply("A", "A", 18, 1, 100);
        token.set_halted(true);
        assert!(matches!(token.transfer(1, 2, 1), Err(AssetError::Rejected(_))));
        assert_eq!(token.balance_of(1), 100);
    }

    #[test]
    fn test_mint_overflow() {
        let mut token = InMemoryToken::with_supply("A", "A", 18, 1, u128::MAX);
        assert_eq!(token.mint(2, 1), Err(AssetError::Overflow));
    }
}
