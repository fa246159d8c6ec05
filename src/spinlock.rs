//! # SpinLock
//!
//! A busy-wait mutual exclusion lock for short critical sections, where
//! polling is cheaper than the context switch a blocking lock would cost.
//!
//! Acquiring a contended [`SpinLock`] happens in two phases, repeated until
//! the lock is acquired:
//!
//! 1. **Spin** for up to the lock's *wait time*, polling the flag with a CPU
//!    spin hint between reads and retrying the atomic test-and-set whenever
//!    it reads as free.
//! 2. **Yield** the thread once with [`std::thread::yield_now`], then start
//!    spinning again with a fresh wait time.
//!
//! The default wait time is part of the lock's type: `SpinLock<Millis, 2>`
//! spins for 2ms before each yield. The plain `SpinLock` type spins for
//! 50µs. A different wait time can be passed per call with
//! [`SpinLock::lock_for`].
//!
//! Acquiring the lock (through [`lock`], [`try_lock`] or a guard) is an
//! `Acquire` operation and releasing it is a `Release` operation, so every
//! write made while holding the lock is visible to the next thread that
//! acquires it.
//!
//! ## Example
//! ```rust
//! use timed_spinlock::SpinLock;
//! use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
//!
//! static LOCK: SpinLock = SpinLock::new();
//! static TOTAL: AtomicU64 = AtomicU64::new(0);
//!
//! fn add(n: u64) {
//!     let _guard = LOCK.guard();
//!     // The lock orders these, so a load/store pair can't lose updates.
//!     let total = TOTAL.load(Relaxed);
//!     TOTAL.store(total + n, Relaxed);
//! }
//!
//! add(2);
//! add(3);
//! assert_eq!(TOTAL.load(Relaxed), 5);
//! ```
//!
//! ## Caller obligations
//!
//! The lock validates nothing at runtime. In particular:
//!
//! - It is **not reentrant**. A thread calling [`lock`] on a lock it already
//!   holds spins forever.
//! - Only the owner may [`unlock`], and only once per acquisition. This is why
//!   [`unlock`] is `unsafe`, and why [`SpinGuard`] is neither [`Send`] nor
//!   [`Sync`].
//! - A lock should not be dropped while it is held.
//! - There is no fairness. Under sustained contention a given waiter may wait
//!   indefinitely.
//!
//! [`lock`]: SpinLock::lock
//! [`try_lock`]: SpinLock::try_lock
//! [`unlock`]: SpinLock::unlock

use core::fmt;
use core::marker::PhantomData;
use core::time::Duration;

use crate::loom::sync::atomic::{
    AtomicBool,
    Ordering::{Acquire, Relaxed, Release},
};
use crate::unit::{self, Micros, WaitUnit};
use crate::BackOff;

/// Default wait count of a [`SpinLock`], in [`Micros`].
pub const DEFAULT_WAIT: u64 = 50;

/// A busy-wait mutual exclusion lock with a timed spin-then-yield backoff.
///
/// `U` is the unit and `WAIT` the number of units a contended [`lock`] spins
/// for before yielding. `WAIT` must be nonzero. A zero count is rejected when
/// the constructor is compiled to code, so `cargo build` and `cargo test`
/// report it but `cargo check` does not:
///
/// ```compile_fail
/// use timed_spinlock::{SpinLock, unit::Micros};
///
/// let lock: SpinLock<Micros, 0> = SpinLock::new();
/// ```
///
/// The lock protects no data of its own. It guards whatever critical section
/// the caller brackets with [`lock`] and [`unlock`], or with a [`SpinGuard`].
/// To protect a value, use [`Mutex`](crate::Mutex).
///
/// A `SpinLock` is neither [`Clone`] nor [`Copy`]. Waiting threads borrow it,
/// so it cannot be moved while anything can contend on it.
///
/// [`lock`]: SpinLock::lock
/// [`unlock`]: SpinLock::unlock
pub struct SpinLock<U: WaitUnit = Micros, const WAIT: u64 = DEFAULT_WAIT> {
    locked: AtomicBool,
    _unit: PhantomData<fn() -> U>,
}

/// A scope guard that unlocks its [`SpinLock`] when dropped.
///
/// Returned by [`SpinLock::guard`] and [`SpinLock::try_guard`]. The guard is
/// neither [`Send`] nor [`Sync`]: the thread that acquired the lock is the one
/// that releases it.
///
/// ```compile_fail
/// use timed_spinlock::SpinLock;
///
/// static LOCK: SpinLock = SpinLock::new();
///
/// let guard = LOCK.guard();
/// std::thread::spawn(move || drop(guard));
/// ```
///
/// ```compile_fail
/// use timed_spinlock::SpinLock;
///
/// fn assert_sync<T: Sync>(_: &T) {}
///
/// let lock: SpinLock = SpinLock::new();
/// assert_sync(&lock.guard());
/// ```
#[must_use = "if unused the SpinLock will immediately unlock"]
pub struct SpinGuard<'a, U: WaitUnit = Micros, const WAIT: u64 = DEFAULT_WAIT> {
    lock: &'a SpinLock<U, WAIT>,
    _not_send_or_sync: PhantomData<*const ()>,
}

// === impl SpinLock ===

impl<U: WaitUnit, const WAIT: u64> SpinLock<U, WAIT> {
    const CONFIG_IS_VALID: () = {
        assert!(WAIT > 0, "default wait count must be nonzero");
        let _ = unit::wait_time::<U>(WAIT);
    };

    /// How long a contended [`lock`](Self::lock) spins before each yield.
    pub const DEFAULT_WAIT_TIME: Duration = unit::wait_time::<U>(WAIT);

    loom_const_fn! {
        /// Returns a new `SpinLock`, in the unlocked state.
        ///
        /// # Example
        /// ```
        /// use timed_spinlock::{SpinLock, unit::Millis};
        ///
        /// let lock: SpinLock<Millis, 1> = SpinLock::new();
        /// assert!(lock.try_lock());
        /// # unsafe { lock.unlock() };
        /// ```
        #[must_use]
        pub fn new() -> Self {
            let () = Self::CONFIG_IS_VALID;
            Self {
                locked: AtomicBool::new(false),
                _unit: PhantomData,
            }
        }
    }

    /// Acquires the lock, spinning and yielding until it becomes available.
    ///
    /// Spins for [`DEFAULT_WAIT_TIME`](Self::DEFAULT_WAIT_TIME) between
    /// yields. Never times out.
    #[inline]
    pub fn lock(&self) {
        self.lock_for(Self::DEFAULT_WAIT_TIME)
    }

    /// Acquires the lock, spinning for `wait_time` between yields.
    ///
    /// `wait_time` only decides when spinning gives way to yielding. The call
    /// still returns only once the lock has been acquired. With a zero
    /// `wait_time`, every failed attempt yields.
    ///
    /// While the lock is held, waiters poll it with plain loads and only retry
    /// the test-and-set once it reads as free, so a waiter never writes to a
    /// flag it cannot take.
    #[inline]
    pub fn lock_for(&self, wait_time: Duration) {
        if self.try_lock() {
            return;
        }

        let backoff = BackOff::new(wait_time);
        loop {
            while self.is_locked() {
                backoff.wait();
            }

            if self.try_lock() {
                return;
            }
        }
    }

    /// Attempts to acquire the lock without waiting.
    ///
    /// Returns `true` if the lock was free and is now held by the caller, and
    /// `false` otherwise. Never spins or yields.
    #[inline]
    #[must_use]
    pub fn try_lock(&self) -> bool {
        !self.locked.swap(true, Acquire)
    }

    /// Releases the lock.
    ///
    /// # Safety
    ///
    /// The caller must hold the lock: it must have acquired it with
    /// [`lock`](Self::lock), [`lock_for`](Self::lock_for) or a successful
    /// [`try_lock`](Self::try_lock) on this thread, and not released it since.
    /// Releasing a lock that is held by another thread breaks mutual exclusion.
    #[inline]
    pub unsafe fn unlock(&self) {
        self.locked.store(false, Release);
    }

    /// Returns `true` if the lock is currently held.
    ///
    /// The answer may be stale by the time it is returned, and reading it
    /// does not synchronize with the last owner. Only a successful
    /// [`try_lock`](Self::try_lock) does that.
    #[inline(always)]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Relaxed)
    }

    /// Returns how long a contended [`lock`](Self::lock) spins before each
    /// yield.
    #[inline(always)]
    #[must_use]
    pub fn default_wait_time(&self) -> Duration {
        Self::DEFAULT_WAIT_TIME
    }

    /// Acquires the lock and returns a guard that releases it on drop.
    #[inline]
    pub fn guard(&self) -> SpinGuard<'_, U, WAIT> {
        self.lock();
        SpinGuard {
            lock: self,
            _not_send_or_sync: PhantomData,
        }
    }

    /// Attempts to acquire the lock without waiting, returning a guard that
    /// releases it on drop.
    #[inline]
    pub fn try_guard(&self) -> Option<SpinGuard<'_, U, WAIT>> {
        if self.try_lock() {
            Some(SpinGuard {
                lock: self,
                _not_send_or_sync: PhantomData,
            })
        } else {
            None
        }
    }

    /// Runs `f` while holding the lock.
    ///
    /// # Example
    /// ```
    /// use timed_spinlock::SpinLock;
    ///
    /// let lock: SpinLock = SpinLock::new();
    /// let held = lock.with_lock(|| lock.is_locked());
    /// assert!(held);
    /// assert!(!lock.is_locked());
    /// ```
    #[inline]
    pub fn with_lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.guard();
        f()
    }
}

impl<U: WaitUnit, const WAIT: u64> Default for SpinLock<U, WAIT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: WaitUnit, const WAIT: u64> fmt::Debug for SpinLock<U, WAIT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinLock")
            .field("locked", &self.is_locked())
            .field("wait", &format_args!("{}{}", WAIT, U::NAME))
            .field("default_wait_time", &Self::DEFAULT_WAIT_TIME)
            .finish()
    }
}

#[cfg(all(feature = "lock_api", not(loom)))]
unsafe impl<U: WaitUnit, const WAIT: u64> lock_api::RawMutex for SpinLock<U, WAIT> {
    // The point of this constant is to make a *new* lock every time it's used.
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self::new();

    type GuardMarker = lock_api::GuardNoSend;

    #[inline]
    fn lock(&self) {
        SpinLock::lock(self)
    }

    #[inline]
    fn try_lock(&self) -> bool {
        SpinLock::try_lock(self)
    }

    #[inline]
    unsafe fn unlock(&self) {
        // Safety: `lock_api` only unlocks a raw mutex it has locked.
        unsafe { SpinLock::unlock(self) }
    }

    #[inline]
    fn is_locked(&self) -> bool {
        SpinLock::is_locked(self)
    }
}

// === impl SpinGuard ===

impl<U: WaitUnit, const WAIT: u64> Drop for SpinGuard<'_, U, WAIT> {
    #[inline]
    fn drop(&mut self) {
        // Safety: a guard only exists while its lock is held by this thread.
        unsafe { self.lock.unlock() }
    }
}

impl<U: WaitUnit, const WAIT: u64> fmt::Debug for SpinGuard<'_, U, WAIT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinGuard").field("lock", self.lock).finish()
    }
}
