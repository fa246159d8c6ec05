//! Demonstrates `timed-spinlock` under heavy contention.
//!
//! Spawns 100 threads, each incrementing a shared counter a hundred thousand
//! times. The counter lives in a `Mutex<i64>` backed by a `SpinLock` that
//! spins for 20µs before each yield.

use std::thread;
use std::time::Instant;

use timed_spinlock::{unit::Micros, Mutex};

const THREADS: usize = 100;
const INCREMENTS: i64 = 100_000;

// Shared static counter behind a spinlock.
static COUNTER: Mutex<i64, Micros, 20> = Mutex::new(0);

fn add() {
    for _ in 0..INCREMENTS {
        *COUNTER.lock() += 1;
    }
}

fn main() {
    println!("Starting spinlock test with {THREADS} threads...");
    let started = Instant::now();

    let mut threads = Vec::with_capacity(THREADS);
    for _ in 0..THREADS {
        threads.push(thread::spawn(add));
    }

    for t in threads {
        if t.join().is_err() {
            eprintln!("a worker thread panicked");
        }
    }

    let total = *COUNTER.lock();
    println!(
        "Final counter value: {total} (expected {}), took {:?}",
        THREADS as i64 * INCREMENTS,
        started.elapsed()
    );
}
