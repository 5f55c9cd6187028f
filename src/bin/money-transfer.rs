use std::{fs::File, time::Duration};

use anyhow::{Context, Result};
use money_transfer::{
    bin_utils::{ProcessError, Service},
    ledger::LedgerError,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: money-transfer <file> [workers] [lock-timeout-ms]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let filename = args
        .next()
        .with_context(|| format!("Expected a file name as the first argument\n{USAGE}"))?;
    // 0 lets the pool pick one worker per logical CPU
    let workers = args
        .next()
        .map(|arg| arg.parse::<usize>())
        .transpose()
        .with_context(|| format!("Workers must be a non-negative integer\n{USAGE}"))?
        .unwrap_or(0);
    let lock_timeout = args
        .next()
        .map(|arg| arg.parse::<u64>().map(Duration::from_millis))
        .transpose()
        .with_context(|| format!("Lock timeout must be a number of milliseconds\n{USAGE}"))?;

    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        workers,
        lock_timeout,
        error_printer: Box::new(|line, err| match err {
            ProcessError::Ledger(LedgerError::Transfer(err)) => {
                info!(line, %err, "transfer rejected")
            }
            err => warn!(line, %err, "row skipped"),
        }),
    };
    service.run()
}
