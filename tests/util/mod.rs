#![allow(dead_code)]

use std::cell::UnsafeCell;
use timed_spinlock::{unit::Micros, SpinLock};

pub fn trace_init() {
    use tracing_subscriber::filter::{EnvFilter, LevelFilter};
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub type Lock = SpinLock<Micros, 10>;

/// A plain `u64` protected by a raw `SpinLock`.
pub struct Counter {
    lock: Lock,
    value: UnsafeCell<u64>,
}

// Safety: `value` is only touched while `lock` is held.
unsafe impl Sync for Counter {}

impl Counter {
    pub const fn new() -> Self {
        Self {
            lock: SpinLock::new(),
            value: UnsafeCell::new(0),
        }
    }

    pub fn increment(&self) {
        self.lock.lock();
        unsafe {
            *self.value.get() += 1;
            self.lock.unlock();
        }
    }

    pub fn try_increment(&self) -> bool {
        if !self.lock.try_lock() {
            return false;
        }
        unsafe {
            *self.value.get() += 1;
            self.lock.unlock();
        }
        true
    }

    pub fn get(&self) -> u64 {
        self.lock.lock();
        let value = unsafe { *self.value.get() };
        unsafe { self.lock.unlock() };
        value
    }
}
