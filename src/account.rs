use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use thiserror::Error;

use crate::money::{Money, MoneyError};

pub type AccountId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: Money, requested: Money },
}

/// Current funds of a single account.
///
/// The held [`Money`] is only ever read or replaced while the balance lock is held.
#[derive(Debug, Default)]
pub struct Balance {
    total: Mutex<Money>,
}

impl Balance {
    pub fn new(initial: Money) -> Self {
        Self {
            total: Mutex::new(initial),
        }
    }

    pub fn read(&self) -> Money {
        self.guard().read()
    }

    /// Fails with [`MoneyError::Overflow`], leaving the balance untouched, when
    /// the new total would not fit.
    pub fn deposit(&self, amount: Money) -> Result<(), MoneyError> {
        self.guard().deposit(amount)
    }

    pub fn withdraw(&self, amount: Money) -> Result<(), BalanceError> {
        self.guard().withdraw(amount)
    }

    /// Blocks until this balance is exclusively held by the caller.
    pub(crate) fn guard(&self) -> BalanceGuard<'_> {
        BalanceGuard {
            total: self.total.lock(),
        }
    }

    pub(crate) fn try_guard_for(&self, timeout: Duration) -> Option<BalanceGuard<'_>> {
        self.total
            .try_lock_for(timeout)
            .map(|total| BalanceGuard { total })
    }
}

/// Exclusive access to a [`Balance`]. The lock is released when the guard is dropped.
///
/// Never hand one of these out of the crate; composing several of them is only
/// deadlock free when they are taken in ascending [`AccountId`] order.
pub(crate) struct BalanceGuard<'a> {
    total: MutexGuard<'a, Money>,
}

impl BalanceGuard<'_> {
    pub(crate) fn read(&self) -> Money {
        *self.total
    }

    pub(crate) fn deposit(&mut self, amount: Money) -> Result<(), MoneyError> {
        let credited = self.credited(amount)?;
        self.replace(credited);
        Ok(())
    }

    /// The sufficiency check and the replacement happen under the same lock.
    pub(crate) fn withdraw(&mut self, amount: Money) -> Result<(), BalanceError> {
        let debited = self.debited(amount)?;
        self.replace(debited);
        Ok(())
    }

    /// Total after depositing `amount`, without applying it.
    pub(crate) fn credited(&self, amount: Money) -> Result<Money, MoneyError> {
        self.total.checked_add(amount)
    }

    /// Total after withdrawing `amount`, without applying it.
    pub(crate) fn debited(&self, amount: Money) -> Result<Money, BalanceError> {
        let available = *self.total;
        available
            .subtract(amount)
            .map_err(|_| BalanceError::InsufficientBalance {
                available,
                requested: amount,
            })
    }

    pub(crate) fn replace(&mut self, total: Money) {
        *self.total = total;
    }
}

#[derive(Debug)]
pub struct Account {
    id: AccountId,
    balance: Balance,
}

impl Account {
    pub fn new(id: AccountId, initial: Money) -> Self {
        Self {
            id,
            balance: Balance::new(initial),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn balance(&self) -> &Balance {
        &self.balance
    }

    pub fn current_balance(&self) -> Money {
        self.balance.read()
    }
}
