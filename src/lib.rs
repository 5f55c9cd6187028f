/// Exact, immutable, non-negative monetary values.
pub mod money;

/// Accounts and their lock-protected balances.
pub mod account;

/// Atomic transfers between two accounts.
///
/// Balance locks are always taken in ascending account id order, whatever the
/// direction of the transfer, so concurrent transfers cannot deadlock.
pub mod transfer;

/// Registry of shared accounts, plus consistent snapshots across all of them.
pub mod ledger;

/// Validated commands built from raw input rows.
pub mod command;

/// Ideally, this module should exist on its own crate, as a way to
/// bootstrap core logic. However, I want to use it for integration test
/// so I put it here.
pub mod bin_utils;
