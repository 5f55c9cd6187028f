use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::Arc,
};

use thiserror::Error;

use crate::{
    account::{Account, AccountId},
    command::TransferCommand,
    money::{Money, MoneyError},
    transfer::{TransferError, TransferService},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Account #{0} already exists")]
    DuplicateAccount(AccountId),
    #[error("Account #{0} does not exist")]
    UnknownAccount(AccountId),
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// Registry of shared accounts.
///
/// Every caller transferring between accounts gets the same [`Account`]
/// instance for a given id, so they all contend on the same balance locks.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: BTreeMap<AccountId, Arc<Account>>,
}

impl Ledger {
    pub fn open(&mut self, id: AccountId, initial: Money) -> Result<Arc<Account>, LedgerError> {
        match self.accounts.entry(id) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateAccount(id)),
            Entry::Vacant(entry) => Ok(Arc::clone(
                entry.insert(Arc::new(Account::new(id, initial))),
            )),
        }
    }

    pub fn account(&self, id: AccountId) -> Result<Arc<Account>, LedgerError> {
        self.accounts
            .get(&id)
            .cloned()
            .ok_or(LedgerError::UnknownAccount(id))
    }

    /// Accounts in ascending id order.
    pub fn accounts(&self) -> impl Iterator<Item = &Arc<Account>> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn execute<S>(&self, service: &S, command: &TransferCommand) -> Result<(), LedgerError>
    where
        S: TransferService + ?Sized,
    {
        let from = self.account(command.from)?;
        let to = self.account(command.to)?;
        service.transfer(&from, &to, command.amount)?;
        Ok(())
    }

    /// Consistent view of every balance.
    ///
    /// All balance locks are held at once, taken in ascending id order like
    /// transfers do, so no transfer can be half-applied in the result.
    pub fn snapshot(&self) -> Vec<(AccountId, Money)> {
        let guards: Vec<_> = self
            .accounts
            .values()
            .map(|account| (account.id(), account.balance().guard()))
            .collect();
        guards
            .iter()
            .map(|(id, guard)| (*id, guard.read()))
            .collect()
    }

    pub fn total(&self) -> Result<Money, MoneyError> {
        self.snapshot()
            .into_iter()
            .try_fold(Money::ZERO, |total, (_, amount)| total.checked_add(amount))
    }
}
