//! # BackOff
//!
//! The two-phase waiting policy used by [`SpinLock::lock`](crate::SpinLock::lock).
//!
//! A waiter first busy-spins, issuing [`core::hint::spin_loop`] between
//! attempts, for up to a fixed wall-clock budget (the *wait time*). Once the
//! budget is spent, it yields its time slice with [`std::thread::yield_now`]
//! and starts a fresh budget. This repeats until the caller stops calling
//! [`BackOff::wait`], i.e. until the lock is acquired.
//!
//! Yielding is a scheduling hint only. The thread stays runnable and is never
//! parked on a wait queue.
//!
//! ## Example
//! ```rust
//! use timed_spinlock::BackOff;
//! use core::sync::atomic::{AtomicBool, Ordering};
//! use core::time::Duration;
//!
//! let flag = AtomicBool::new(true);
//! let backoff = BackOff::new(Duration::from_micros(10));
//!
//! let mut attempts = 0;
//! while flag.load(Ordering::Acquire) {
//!     attempts += 1;
//!     if attempts == 3 {
//!         flag.store(false, Ordering::Release);
//!     }
//!     backoff.wait();
//! }
//! ```

use core::cell::Cell;
use core::fmt;
use core::time::Duration;
use std::time::Instant;

use crate::loom::thread;

/// A timed spin-then-yield backoff.
///
/// Each call to [`wait`](BackOff::wait) represents one failed attempt. The
/// first calls only spin; the first call made after [`wait_time`] has elapsed
/// since the timer last started yields the thread and restarts the timer.
///
/// [`wait_time`]: BackOff::wait_time
pub struct BackOff {
    wait_time: Duration,
    start: Cell<Instant>,
    yields: Cell<u64>,
}

impl BackOff {
    /// Creates a new [`BackOff`] and starts its spin timer.
    ///
    /// # Examples
    /// ```
    /// use timed_spinlock::BackOff;
    /// use core::time::Duration;
    ///
    /// let b = BackOff::new(Duration::from_micros(50));
    /// assert_eq!(b.yields(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub fn new(wait_time: Duration) -> Self {
        Self {
            wait_time,
            start: Cell::new(Instant::now()),
            yields: Cell::new(0),
        }
    }

    /// Waits once after a failed attempt.
    ///
    /// Spins if the current budget has time left. Otherwise yields the thread
    /// once and restarts the budget. Returns `true` if it yielded.
    #[inline]
    pub fn wait(&self) -> bool {
        // Under loom every wait yields, or the model can't make progress.
        #[cfg(not(loom))]
        if self.elapsed() < self.wait_time {
            crate::loom::hint::spin_loop();
            return false;
        }

        let yields = self.yields.get() + 1;
        self.yields.set(yields);
        trace!(
            yields,
            wait_time = ?self.wait_time,
            "BackOff::wait: spin budget exhausted, yielding"
        );
        thread::yield_now();
        self.start.set(Instant::now());
        true
    }

    /// Time spent in the current spin budget.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.get().elapsed()
    }

    /// How long each spin phase lasts before the thread yields.
    #[inline(always)]
    #[must_use]
    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }

    /// Number of times this backoff has yielded the thread.
    #[inline(always)]
    #[must_use]
    pub fn yields(&self) -> u64 {
        self.yields.get()
    }

    /// Restarts the spin timer and clears the yield count.
    #[inline]
    pub fn reset(&self) {
        self.start.set(Instant::now());
        self.yields.set(0);
    }
}

impl fmt::Debug for BackOff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackOff")
            .field("wait_time", &self.wait_time)
            .field("elapsed", &self.elapsed())
            .field("yields", &self.yields())
            .finish()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    /// The first yield never comes before the budget has elapsed.
    #[test]
    fn does_not_yield_before_wait_time() {
        let _trace = crate::util::test::trace_init();
        let wait_time = Duration::from_millis(20);

        let started = Instant::now();
        let b = BackOff::new(wait_time);
        while !b.wait() {}
        let waited = started.elapsed();

        assert_eq!(b.yields(), 1);
        assert!(
            waited >= wait_time,
            "yielded after {waited:?}, budget was {wait_time:?}"
        );
    }

    /// After a yield the budget starts over rather than yielding every call.
    #[test]
    fn yield_restarts_the_timer() {
        let _trace = crate::util::test::trace_init();
        let b = BackOff::new(Duration::from_millis(100));

        while !b.wait() {}
        assert!(
            b.elapsed() < b.wait_time(),
            "timer was not restarted: {b:?}"
        );
        assert!(!b.wait(), "yielded twice in a row: {b:?}");
    }

    #[test]
    fn zero_wait_time_yields_every_time() {
        let b = BackOff::new(Duration::ZERO);
        for _ in 0..5 {
            assert!(b.wait());
        }
        assert_eq!(b.yields(), 5);
    }

    #[test]
    fn reset_clears_yields() {
        let b = BackOff::new(Duration::ZERO);
        b.wait();
        b.wait();
        assert_eq!(b.yields(), 2);

        b.reset();
        assert_eq!(b.yields(), 0);
    }
}
