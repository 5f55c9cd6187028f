use std::io::Write;

use crate::{account::AccountId, money::Money};
use anyhow::Context;
use csv::Writer;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct AccountBalance {
    account: AccountId,
    balance: Money,
}

/// Writes a ledger snapshot as `account,balance` rows, in snapshot order.
pub fn print_balances<W>(output: &mut W, snapshot: &[(AccountId, Money)]) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for &(account, balance) in snapshot {
        writer
            .serialize(AccountBalance { account, balance })
            .with_context(|| format!("Failed to write balance of account #{account} to CSV"))?;
    }
    writer.flush().context("Failed to flush CSV writer")
}
