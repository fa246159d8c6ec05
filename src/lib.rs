//! # timed-spinlock
//!
//! A busy-wait **spinlock** for protecting short critical sections, where a
//! context switch would cost more than polling.
//!
//! A contended [`SpinLock`] spins on an atomic test-and-set for a bounded,
//! configurable amount of wall-clock time, then yields the thread to the
//! scheduler and starts spinning again. It never parks on a kernel wait queue.
//!
//! The crate includes:
//!
//! - [`SpinLock`]: the lock itself, with `lock`/`try_lock`/`unlock` and
//!   RAII [`SpinGuard`]s.
//! - [`BackOff`]: the timed spin-then-yield policy `SpinLock` waits with.
//! - [`WaitUnit`] and the unit types in [`unit`], which set a lock's default
//!   wait time at compile time.
//! - [`Mutex`] (feature `lock_api`, on by default): a [`lock_api::Mutex`]
//!   holding data behind a `SpinLock`.
//!
//! ## Quick Example
//!
//! ```rust
//! use timed_spinlock::{SpinLock, unit::Micros};
//! use std::sync::Arc;
//! use std::thread;
//!
//! // Spin for 20µs before each yield.
//! let lock: Arc<SpinLock<Micros, 20>> = Arc::new(SpinLock::new());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let lock = lock.clone();
//!         thread::spawn(move || lock.with_lock(|| { /* critical section */ }))
//!     })
//!     .collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//! assert!(!lock.is_locked());
//! ```
//!
//! ## Feature flags
//!
//! - **`lock_api`** (default): implements [`lock_api::RawMutex`] for
//!   [`SpinLock`] and exports the [`Mutex`] and [`MutexGuard`] aliases.
//! - **`tracing`**: emits [`tracing`] events when a waiter escalates from
//!   spinning to yielding.
//!
//! ## Usage Notes
//!
//! - Keep critical sections short. Never block while holding the lock.
//! - `SpinLock` is **not reentrant** and **not fair**.
//! - Misuse (unlocking a lock you don't hold, dropping a held lock) is not
//!   detected. See [`SpinLock::unlock`].
//!
//! [`tracing`]: https://docs.rs/tracing
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs, missing_debug_implementations)]

#[macro_use]
mod util;
mod loom;

pub mod backoff;
pub mod spinlock;
pub mod unit;

pub use backoff::BackOff;
pub use spinlock::{SpinGuard, SpinLock, DEFAULT_WAIT};
pub use unit::WaitUnit;

/// A mutual exclusion lock protecting a `T`, backed by a [`SpinLock`].
///
/// `U` and `WAIT` configure the underlying lock's wait time, as on
/// [`SpinLock`].
///
/// # Example
/// ```
/// use timed_spinlock::Mutex;
///
/// static COUNTER: Mutex<u32> = Mutex::new(0);
///
/// *COUNTER.lock() += 1;
/// assert_eq!(*COUNTER.lock(), 1);
/// ```
#[cfg(all(feature = "lock_api", not(loom)))]
#[cfg_attr(docsrs, doc(cfg(feature = "lock_api")))]
pub type Mutex<T, U = unit::Micros, const WAIT: u64 = DEFAULT_WAIT> =
    lock_api::Mutex<SpinLock<U, WAIT>, T>;

/// An RAII guard for a [`Mutex`]. The data is unlocked when it is dropped.
#[cfg(all(feature = "lock_api", not(loom)))]
#[cfg_attr(docsrs, doc(cfg(feature = "lock_api")))]
pub type MutexGuard<'a, T, U = unit::Micros, const WAIT: u64 = DEFAULT_WAIT> =
    lock_api::MutexGuard<'a, SpinLock<U, WAIT>, T>;
