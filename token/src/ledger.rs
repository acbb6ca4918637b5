//! In-memory allowance-based token ledger.
//!
//! Thread-safe: all state sits behind one mutex so every call is atomic with
//! respect to every other call, the way a host chain serialises transactions.

use crate::error::TokenError;
use crate::gateway::TokenGateway;
use autonomix_types::{Address, TokenAmount, TOKEN_DECIMALS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Log entries emitted by the token, mirroring the ERC-20 events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    /// Tokens moved. Mints come from [`Address::ZERO`].
    Transfer {
        from: Address,
        to: Address,
        amount: TokenAmount,
    },
    /// An allowance was set.
    Approval {
        owner: Address,
        spender: Address,
        amount: TokenAmount,
    },
}

#[derive(Default)]
struct TokenBook {
    balances: HashMap<Address, TokenAmount>,
    allowances: HashMap<(Address, Address), TokenAmount>,
    total_supply: TokenAmount,
    events: Vec<TokenEvent>,
}

impl TokenBook {
    fn balance(&self, account: &Address) -> TokenAmount {
        self.balances.get(account).copied().unwrap_or(TokenAmount::ZERO)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Validate a balance move without applying it.
    fn check_move(
        &self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let available = self.balance(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                account: *from,
                needed: amount,
                available,
            });
        }
        if from != to {
            self.balance(to)
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
        }
        Ok(())
    }

    /// Apply a move previously accepted by [`check_move`](Self::check_move).
    fn apply_move(&mut self, from: &Address, to: &Address, amount: TokenAmount) {
        if from != to {
            let from_balance = self.balance(from).saturating_sub(amount);
            let to_balance = self.balance(to).saturating_add(amount);
            self.balances.insert(*from, from_balance);
            self.balances.insert(*to, to_balance);
        }
        self.events.push(TokenEvent::Transfer {
            from: *from,
            to: *to,
            amount,
        });
    }
}

/// The in-memory token.
pub struct TokenLedger {
    name: String,
    symbol: String,
    decimals: u8,
    book: Mutex<TokenBook>,
}

impl TokenLedger {
    /// Create a token and mint `initial_supply` to `deployer`.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        deployer: Address,
        initial_supply: TokenAmount,
    ) -> Self {
        let ledger = Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: TOKEN_DECIMALS,
            book: Mutex::new(TokenBook::default()),
        };
        if !initial_supply.is_zero() {
            // A fresh book cannot overflow on its first mint.
            let _ = ledger.mint(&deployer, initial_supply);
        }
        ledger
    }

    /// The AUTOX staking token.
    pub fn autox(deployer: Address, initial_supply: TokenAmount) -> Self {
        Self::new("Autonomix Token", "AUTOX", deployer, initial_supply)
    }

    /// Create new tokens out of thin air.
    pub fn mint(&self, to: &Address, amount: TokenAmount) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let mut book = self.book();
        let supply = book
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = book.balance(to).checked_add(amount).ok_or(TokenError::Overflow)?;
        book.total_supply = supply;
        book.balances.insert(*to, balance);
        book.events.push(TokenEvent::Transfer {
            from: Address::ZERO,
            to: *to,
            amount,
        });
        Ok(())
    }

    /// All events emitted so far, oldest first.
    pub fn events(&self) -> Vec<TokenEvent> {
        self.book().events.clone()
    }

    fn book(&self) -> MutexGuard<'_, TokenBook> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenGateway for TokenLedger {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn symbol(&self) -> String {
        self.symbol.clone()
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn total_supply(&self) -> TokenAmount {
        self.book().total_supply
    }

    fn balance_of(&self, account: &Address) -> TokenAmount {
        self.book().balance(account)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        self.book().allowance(owner, spender)
    }

    fn approve(
        &self,
        owner: &Address,
        spender: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        if spender.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let mut book = self.book();
        book.allowances.insert((*owner, *spender), amount);
        book.events.push(TokenEvent::Approval {
            owner: *owner,
            spender: *spender,
            amount,
        });
        Ok(())
    }

    fn transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        let mut book = self.book();
        book.check_move(from, to, amount)?;
        book.apply_move(from, to, amount);
        tracing::trace!(%from, %to, %amount, "token transfer");
        Ok(())
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        let mut book = self.book();
        let allowance = book.allowance(from, spender);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                owner: *from,
                spender: *spender,
                needed: amount,
                available: allowance,
            });
        }
        book.check_move(from, to, amount)?;
        if allowance != TokenAmount::MAX {
            book.allowances
                .insert((*from, *spender), allowance.saturating_sub(amount));
        }
        book.apply_move(from, to, amount);
        tracing::trace!(%spender, %from, %to, %amount, "token transfer_from");
        Ok(())
    }
}
