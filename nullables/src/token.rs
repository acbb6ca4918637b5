//! Nullable token gateway: a real in-memory token that records every
//! mutating call and can be told to fail.

use autonomix_token::{TokenError, TokenGateway, TokenLedger};
use autonomix_types::{Address, TokenAmount};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A mutating gateway call, as observed by [`NullToken`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayCall {
    Approve {
        owner: Address,
        spender: Address,
        amount: TokenAmount,
    },
    Transfer {
        from: Address,
        to: Address,
        amount: TokenAmount,
    },
    TransferFrom {
        spender: Address,
        from: Address,
        to: Address,
        amount: TokenAmount,
    },
}

/// Token gateway for tests.
///
/// Balances behave exactly like [`TokenLedger`]. Calls are tracked whether
/// they succeed or not. Queued failures are returned by the next transfers
/// without touching the underlying ledger.
pub struct NullToken {
    inner: TokenLedger,
    calls: Mutex<Vec<GatewayCall>>,
    failures: Mutex<Vec<TokenError>>,
}

impl NullToken {
    pub fn new(deployer: Address, initial_supply: TokenAmount) -> Self {
        Self {
            inner: TokenLedger::autox(deployer, initial_supply),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Mint on the underlying ledger. Not tracked.
    pub fn mint(&self, to: &Address, amount: TokenAmount) -> Result<(), TokenError> {
        self.inner.mint(to, amount)
    }

    /// Make the next `transfer` or `transfer_from` fail with `error`.
    ///
    /// Queued failures are consumed in order.
    pub fn fail_next_transfer(&self, error: TokenError) {
        lock(&self.failures).push(error);
    }

    /// All mutating calls so far, oldest first.
    pub fn calls(&self) -> Vec<GatewayCall> {
        lock(&self.calls).clone()
    }

    /// Number of `transfer`/`transfer_from` calls attempted.
    pub fn transfer_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| !matches!(c, GatewayCall::Approve { .. }))
            .count()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    pub fn ledger(&self) -> &TokenLedger {
        &self.inner
    }

    fn take_failure(&self) -> Option<TokenError> {
        let mut failures = lock(&self.failures);
        if failures.is_empty() {
            None
        } else {
            Some(failures.remove(0))
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TokenGateway for NullToken {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn symbol(&self) -> String {
        self.inner.symbol()
    }

    fn decimals(&self) -> u8 {
        self.inner.decimals()
    }

    fn total_supply(&self) -> TokenAmount {
        self.inner.total_supply()
    }

    fn balance_of(&self, account: &Address) -> TokenAmount {
        self.inner.balance_of(account)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        self.inner.allowance(owner, spender)
    }

    fn approve(
        &self,
        owner: &Address,
        spender: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        lock(&self.calls).push(GatewayCall::Approve {
            owner: *owner,
            spender: *spender,
            amount,
        });
        self.inner.approve(owner, spender, amount)
    }

    fn transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        lock(&self.calls).push(GatewayCall::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.inner.transfer(from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        lock(&self.calls).push(GatewayCall::TransferFrom {
            spender: *spender,
            from: *from,
            to: *to,
            amount,
        });
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.inner.transfer_from(spender, from, to, amount)
    }
}
