//! This module could be a separate crate on its own, to bootstrap [`money_transfer`] within binary
//! but for simplicity purposes, I include this module directly in the library.

use std::{
    io::{Read, Write},
    time::Duration,
};

use crate::{
    command::{CommandError, LedgerCommand, TransferCommand},
    ledger::{Ledger, LedgerError},
    transfer::lock_ordered::LockOrderedTransfer,
};
use anyhow::{Context, Result};
use csv_parser::CsvRowParser;
use csv_printer::print_balances;
use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Parse(#[from] csv::Error),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Reads `open` and `transfer` rows, provisions every account first and then
/// runs all transfers concurrently against the shared ledger.
pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub workers: usize,
    pub lock_timeout: Option<Duration>,
    pub error_printer: Box<dyn FnMut(u64, ProcessError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let mut ledger = Ledger::default();
        let mut transfers: Vec<(u64, TransferCommand)> = Vec::new();

        for (line, row) in CsvRowParser::new(self.input) {
            let command = row.map_err(ProcessError::from).and_then(|row| {
                LedgerCommand::parse_command(row.kind, row.account, row.to, row.amount)
                    .map_err(ProcessError::from)
            });
            match command {
                Ok(LedgerCommand::Open(open)) => {
                    if let Err(err) = ledger.open(open.id, open.initial) {
                        (self.error_printer)(line, err.into());
                    }
                }
                Ok(LedgerCommand::Transfer(transfer)) => transfers.push((line, transfer)),
                Err(err) => (self.error_printer)(line, err),
            }
        }

        let service = match self.lock_timeout {
            Some(timeout) => LockOrderedTransfer::with_lock_timeout(timeout),
            None => LockOrderedTransfer::new(),
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .context("Failed to start transfer workers")?;

        info!(
            accounts = ledger.len(),
            transfers = transfers.len(),
            workers = pool.current_num_threads(),
            "running transfers"
        );
        let failures: Vec<(u64, LedgerError)> = pool.install(|| {
            transfers
                .par_iter()
                .filter_map(|(line, transfer)| {
                    ledger
                        .execute(&service, transfer)
                        .err()
                        .map(|err| (*line, err))
                })
                .collect()
        });
        for (line, err) in failures {
            (self.error_printer)(line, err.into());
        }

        print_balances(self.output, &ledger.snapshot())
    }
}
