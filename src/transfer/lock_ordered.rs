use std::time::Duration;

use tracing::{debug, trace};

use crate::{
    account::{Account, BalanceGuard},
    money::Money,
};

use super::{TransferError, TransferService, lock_order};

/// Transfers between two accounts while holding both balance locks, taken in
/// ascending account id order so that opposite transfers between the same pair
/// queue up on the same first lock instead of waiting on each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockOrderedTransfer {
    lock_timeout: Option<Duration>,
}

impl LockOrderedTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives up with [`TransferError::LockTimeout`] when a balance lock cannot
    /// be taken within `timeout`.
    pub fn with_lock_timeout(timeout: Duration) -> Self {
        Self {
            lock_timeout: Some(timeout),
        }
    }

    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout
    }

    fn acquire<'a>(&self, account: &'a Account) -> Result<BalanceGuard<'a>, TransferError> {
        match self.lock_timeout {
            None => Ok(account.balance().guard()),
            Some(timeout) => account
                .balance()
                .try_guard_for(timeout)
                .ok_or(TransferError::LockTimeout {
                    account: account.id(),
                    timeout,
                }),
        }
    }
}

impl TransferService for LockOrderedTransfer {
    fn transfer(&self, from: &Account, to: &Account, amount: Money) -> Result<(), TransferError> {
        if from.id() == to.id() {
            return Err(TransferError::SameAccountTransfer(from.id()));
        }

        let (first, second) = lock_order(from, to);
        trace!(first = first.id(), second = second.id(), "acquiring balance locks");
        let mut first_guard = self.acquire(first)?;
        let mut second_guard = self.acquire(second)?;

        let (source, destination) = if first.id() == from.id() {
            (&mut first_guard, &mut second_guard)
        } else {
            (&mut second_guard, &mut first_guard)
        };
        // both new totals are computed before either is written
        let debited = source.debited(amount)?;
        let credited = destination.credited(amount)?;
        source.replace(debited);
        destination.replace(credited);

        debug!(from = from.id(), to = to.id(), %amount, "transfer committed");
        Ok(())
    }
}
