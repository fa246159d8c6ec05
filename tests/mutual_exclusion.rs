#![cfg(not(loom))]

mod util;

use std::thread;
use util::Counter;

fn hammer(threads: usize, increments: usize) {
    util::trace_init();
    let counter = Counter::new();

    thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                for _ in 0..increments {
                    counter.increment();
                }
            });
        }
    });

    assert_eq!(
        counter.get(),
        (threads * increments) as u64,
        "{threads} threads x {increments} increments lost updates"
    );
}

#[test]
fn two_threads_1k() {
    hammer(2, 1_000);
}

#[test]
fn two_threads_10k() {
    hammer(2, 10_000);
}

#[test]
fn four_threads_1k() {
    hammer(4, 1_000);
}

#[test]
fn four_threads_10k() {
    hammer(4, 10_000);
}

#[test]
fn sixteen_threads_1k() {
    hammer(16, 1_000);
}

#[test]
fn sixteen_threads_10k() {
    hammer(16, 10_000);
}

#[test]
fn try_lock_increments_are_exact() {
    util::trace_init();
    let counter = Counter::new();
    let mut succeeded = 0;

    thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    let mut ok = 0u64;
                    for _ in 0..5_000 {
                        if counter.try_increment() {
                            ok += 1;
                        }
                    }
                    ok
                })
            })
            .collect();
        for h in handles {
            succeeded += h.join().unwrap();
        }
    });

    assert_eq!(counter.get(), succeeded);
}

#[cfg(feature = "lock_api")]
#[test]
fn lock_api_mutex_counts_exactly() {
    use timed_spinlock::Mutex;

    util::trace_init();
    let counter: Mutex<u64> = Mutex::new(0);
    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..10_000 {
                    *counter.lock() += 1;
                }
            });
        }
    });

    assert_eq!(counter.into_inner(), 80_000);
}
