use std::time::Duration;

use thiserror::Error;

use crate::{
    account::{Account, AccountId, BalanceError},
    money::{Money, MoneyError},
};

pub mod lock_ordered;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Impossible to transfer to the same account #{0}")]
    SameAccountTransfer(AccountId),
    #[error(transparent)]
    InsufficientBalance(#[from] BalanceError),
    #[error(transparent)]
    InvalidAmount(#[from] MoneyError),
    #[error("Could not lock account #{account} within {timeout:?}")]
    LockTimeout {
        account: AccountId,
        timeout: Duration,
    },
}

pub trait TransferService {
    /// Moves `amount` from `from` to `to` as one unit: either both balances
    /// change or neither does.
    fn transfer(&self, from: &Account, to: &Account, amount: Money) -> Result<(), TransferError>;
}

/// Orders two accounts by ascending id, independent of transfer direction.
///
/// Every code path that holds more than one balance lock must acquire them in
/// this order.
pub fn lock_order<'a>(a: &'a Account, b: &'a Account) -> (&'a Account, &'a Account) {
    if a.id() <= b.id() { (a, b) } else { (b, a) }
}
