use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    thread,
    time::Duration,
};

use money_transfer::{
    account::{Account, AccountId},
    ledger::Ledger,
    money::Money,
    transfer::{TransferError, TransferService, lock_ordered::LockOrderedTransfer},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn money(amount: Decimal) -> Money {
    Money::new(amount).unwrap()
}

/// Small deterministic generator, good enough to scatter transfers around.
struct Lcg(u64);

impl Lcg {
    fn next_below(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

#[test]
fn opposite_transfers_settle_to_the_same_balances() {
    for _ in 0..100 {
        let a = Arc::new(Account::new(1, money(dec!(1000))));
        let b = Arc::new(Account::new(2, money(dec!(100))));
        let service = LockOrderedTransfer::new();

        let workers: Vec<_> = (0..5)
            .map(|_| {
                let (a, b) = (Arc::clone(&a), Arc::clone(&b));
                thread::spawn(move || {
                    service.transfer(&a, &b, money(dec!(10))).unwrap();
                    service.transfer(&b, &a, money(dec!(20))).unwrap();
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(a.current_balance(), money(dec!(1050)));
        assert_eq!(b.current_balance(), money(dec!(50)));
    }
}

#[test]
fn opposite_transfers_never_deadlock() {
    let (done_tx, done_rx) = mpsc::channel();
    let a = Arc::new(Account::new(1, money(dec!(500))));
    let b = Arc::new(Account::new(2, money(dec!(500))));

    for worker in 0..8u64 {
        let (a, b) = (Arc::clone(&a), Arc::clone(&b));
        let done_tx = done_tx.clone();
        thread::spawn(move || {
            let service = LockOrderedTransfer::new();
            let mut rng = Lcg(worker);
            for round in 0..200 {
                let (from, to) = if (round + worker) % 2 == 0 {
                    (&a, &b)
                } else {
                    (&b, &a)
                };
                // insufficient funds are fine here, only completion matters
                let _ = service.transfer(from, to, money(Decimal::from(rng.next_below(20))));
                if rng.next_below(4) == 0 {
                    thread::sleep(Duration::from_micros(rng.next_below(50)));
                }
            }
            done_tx.send(worker).unwrap();
        });
    }
    drop(done_tx);

    for _ in 0..8 {
        done_rx
            .recv_timeout(Duration::from_secs(30))
            .expect("a transfer worker is stuck");
    }
    assert_eq!(
        a.current_balance().add(b.current_balance()),
        money(dec!(1000))
    );
}

#[test]
fn concurrent_audits_see_conserved_totals() {
    const ACCOUNTS: AccountId = 6;

    let mut ledger = Ledger::default();
    for id in 0..ACCOUNTS {
        ledger.open(id, money(dec!(250.25))).unwrap();
    }
    let ledger = &ledger;
    let expected = ledger.total().unwrap();
    assert_eq!(expected, money(dec!(1501.5)));

    let service = LockOrderedTransfer::new();
    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        let auditor = scope.spawn(|| {
            let mut audits = 0;
            while !stop.load(Ordering::Relaxed) {
                let snapshot = ledger.snapshot();
                let total: Money = snapshot.iter().map(|(_, amount)| *amount).sum();
                assert_eq!(total, expected);
                audits += 1;
            }
            audits
        });

        let workers: Vec<_> = (0..6u64)
            .map(|worker| {
                scope.spawn(move || {
                    let mut rng = Lcg(worker + 1);
                    for _ in 0..500 {
                        let from = ledger.account(rng.next_below(ACCOUNTS.into()) as AccountId).unwrap();
                        let to = ledger.account(rng.next_below(ACCOUNTS.into()) as AccountId).unwrap();
                        let amount = money(Decimal::new(rng.next_below(10_000) as i64, 2));
                        match service.transfer(&from, &to, amount) {
                            Ok(())
                            | Err(TransferError::SameAccountTransfer(_))
                            | Err(TransferError::InsufficientBalance(_)) => {}
                            Err(err) => panic!("unexpected transfer error: {err}"),
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        stop.store(true, Ordering::Relaxed);
        assert!(auditor.join().unwrap() > 0);
    });

    assert_eq!(ledger.total().unwrap(), expected);
    assert!(ledger.snapshot().iter().all(|(_, amount)| *amount >= Money::ZERO));
}

#[test]
fn timed_transfers_fail_cleanly_under_contention() {
    let a = Arc::new(Account::new(1, money(dec!(1000))));
    let b = Arc::new(Account::new(2, money(dec!(1000))));
    let service = LockOrderedTransfer::with_lock_timeout(Duration::from_micros(1));

    thread::scope(|scope| {
        for worker in 0..4 {
            let (a, b) = (&a, &b);
            scope.spawn(move || {
                for round in 0..500 {
                    let (from, to) = if (round + worker) % 2 == 0 { (a, b) } else { (b, a) };
                    match service.transfer(from, to, money(dec!(1))) {
                        Ok(()) | Err(TransferError::LockTimeout { .. }) => {}
                        Err(err) => panic!("unexpected transfer error: {err}"),
                    }
                }
            });
        }
    });

    assert_eq!(
        a.current_balance().add(b.current_balance()),
        money(dec!(2000))
    );
}
