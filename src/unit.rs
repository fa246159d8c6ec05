//! # Wait units
//!
//! A [`SpinLock`](crate::SpinLock) is configured at compile time with a unit
//! type and a count: `SpinLock<Micros, 50>` spins for 50µs before yielding.
//! The unit is a zero-sized marker implementing [`WaitUnit`], which tells the
//! lock how many nanoseconds one unit is worth.
//!
//! Whatever the unit, the wait time is stored as a [`Duration`]. `Duration`
//! has nanosecond resolution, so a coarse compile-time default and a finer
//! wait time passed to [`SpinLock::lock_for`](crate::SpinLock::lock_for) are
//! compared without truncating either one.
//!
//! Custom units are allowed:
//!
//! ```rust
//! use timed_spinlock::{SpinLock, WaitUnit};
//! use core::time::Duration;
//!
//! /// One scheduler tick on some platform.
//! struct Ticks;
//!
//! impl WaitUnit for Ticks {
//!     const NANOS: u64 = 250;
//!     const NAME: &'static str = "ticks";
//! }
//!
//! let lock: SpinLock<Ticks, 8> = SpinLock::new();
//! assert_eq!(lock.default_wait_time(), Duration::from_nanos(2_000));
//! ```

use core::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// A unit of time in which a spinlock's default wait count is expressed.
pub trait WaitUnit {
    /// Length of one unit, in nanoseconds. Must be nonzero.
    const NANOS: u64;

    /// Short human-readable name, used in `Debug` output.
    const NAME: &'static str;
}

/// Nanoseconds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Nanos;

/// Microseconds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Micros;

/// Milliseconds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Millis;

/// Seconds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Secs;

impl WaitUnit for Nanos {
    const NANOS: u64 = 1;
    const NAME: &'static str = "ns";
}

impl WaitUnit for Micros {
    const NANOS: u64 = 1_000;
    const NAME: &'static str = "µs";
}

impl WaitUnit for Millis {
    const NANOS: u64 = 1_000_000;
    const NAME: &'static str = "ms";
}

impl WaitUnit for Secs {
    const NANOS: u64 = 1_000_000_000;
    const NAME: &'static str = "s";
}

/// Converts `count` units of `U` into a [`Duration`] without losing precision.
///
/// # Panics
///
/// If `U::NANOS` is zero, or if the result does not fit in a `Duration`. When
/// evaluated in a const context (as `SpinLock` does) these are compile errors.
///
/// # Examples
///
/// ```rust
/// use timed_spinlock::unit::{wait_time, Micros, Secs};
/// use core::time::Duration;
///
/// assert_eq!(wait_time::<Micros>(1_500), Duration::from_micros(1_500));
/// assert_eq!(wait_time::<Secs>(u64::MAX), Duration::from_secs(u64::MAX));
/// ```
#[must_use]
pub const fn wait_time<U: WaitUnit>(count: u64) -> Duration {
    assert!(U::NANOS > 0, "a wait unit must be at least one nanosecond long");

    let total = count as u128 * U::NANOS as u128;
    let secs = total / NANOS_PER_SEC;
    assert!(
        secs <= u64::MAX as u128,
        "wait time does not fit in a `Duration`"
    );

    Duration::new(secs as u64, (total % NANOS_PER_SEC) as u32)
}
