use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    account::AccountId,
    money::{Money, MoneyError},
};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Open,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAccountCommand {
    pub id: AccountId,
    pub initial: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCommand {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Counterparty account is required for {kind:?}")]
    CounterpartyRequired { kind: CommandKind },
    #[error("Counterparty account is not allowed for {kind:?}")]
    UnexpectedCounterparty { kind: CommandKind },
    #[error("Invalid amount for {kind:?}: {source}")]
    InvalidAmount {
        kind: CommandKind,
        #[source]
        source: MoneyError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    Open(OpenAccountCommand),
    Transfer(TransferCommand),
}

impl LedgerCommand {
    pub fn parse_command(
        kind: CommandKind,
        account: AccountId,
        to: Option<AccountId>,
        amount: Option<Decimal>,
    ) -> Result<Self, CommandError> {
        let amount =
            Money::try_from(amount).map_err(|source| CommandError::InvalidAmount { kind, source })?;
        match (kind, to) {
            (CommandKind::Open, None) => Ok(Self::Open(OpenAccountCommand {
                id: account,
                initial: amount,
            })),
            (CommandKind::Open, Some(_)) => Err(CommandError::UnexpectedCounterparty { kind }),
            (CommandKind::Transfer, Some(to)) => Ok(Self::Transfer(TransferCommand {
                from: account,
                to,
                amount,
            })),
            (CommandKind::Transfer, None) => Err(CommandError::CounterpartyRequired { kind }),
        }
    }
}
