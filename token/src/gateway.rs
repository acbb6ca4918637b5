//! The allowance-based token interface the core calls to move funds.

use crate::error::TokenError;
use autonomix_types::{Address, TokenAmount};
use std::sync::Arc;

/// Fungible token with ERC-20 allowance semantics.
///
/// Implementations must make every mutating call all-or-nothing: a failed
/// `transfer` or `transfer_from` leaves balances and allowances untouched.
pub trait TokenGateway: Send + Sync {
    fn name(&self) -> String;
    fn symbol(&self) -> String;
    fn decimals(&self) -> u8;
    fn total_supply(&self) -> TokenAmount;

    fn balance_of(&self, account: &Address) -> TokenAmount;
    fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount;

    /// Set `spender`'s allowance over `owner`'s tokens, replacing any previous value.
    fn approve(
        &self,
        owner: &Address,
        spender: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to`, authorised by `from` itself.
    fn transfer(&self, from: &Address, to: &Address, amount: TokenAmount)
        -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError>;
}

impl<T: TokenGateway + ?Sized> TokenGateway for Arc<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn symbol(&self) -> String {
        (**self).symbol()
    }

    fn decimals(&self) -> u8 {
        (**self).decimals()
    }

    fn total_supply(&self) -> TokenAmount {
        (**self).total_supply()
    }

    fn balance_of(&self, account: &Address) -> TokenAmount {
        (**self).balance_of(account)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        (**self).allowance(owner, spender)
    }

    fn approve(
        &self,
        owner: &Address,
        spender: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        (**self).approve(owner, spender, amount)
    }

    fn transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        (**self).transfer(from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        (**self).transfer_from(spender, from, to, amount)
    }
}
