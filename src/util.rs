//! Internal macros and test helpers.

#[cfg(any(test, feature = "tracing"))]
macro_rules! trace {
    ($($t:tt)*) => { tracing::trace!($($t)*) }
}

#[cfg(not(any(test, feature = "tracing")))]
macro_rules! trace {
    ($($t:tt)*) => {};
}

#[cfg(test)]
macro_rules! test_debug {
    ($($t:tt)*) => { tracing::debug!($($t)*) }
}

#[cfg(not(test))]
#[allow(unused_macros)]
macro_rules! test_debug {
    ($($t:tt)*) => {};
}

/// Declares a `const fn`, except under `loom`, where atomics can't be
/// constructed in const contexts.
macro_rules! loom_const_fn {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident($($arg:ident: $T:ty),*) -> $Ret:ty $body:block
    ) => {
        $(#[$meta])*
        #[cfg(not(loom))]
        $vis const fn $name($($arg: $T),*) -> $Ret $body

        $(#[$meta])*
        #[cfg(loom)]
        $vis fn $name($($arg: $T),*) -> $Ret $body
    }
}

#[cfg(test)]
pub(crate) mod test {
    /// Holds the default subscriber for the duration of a test.
    #[must_use]
    pub(crate) struct TestGuard {
        _guard: tracing::subscriber::DefaultGuard,
    }

    /// Initialize tracing with a default filter directive.
    ///
    /// The returned [`TestGuard`] must be held until the end of the test so
    /// that events actually reach the fmt subscriber.
    pub(crate) fn trace_init() -> TestGuard {
        trace_init_with_default("timed_spinlock=trace")
    }

    pub(crate) fn trace_init_with_default(default: &str) -> TestGuard {
        use tracing_subscriber::{
            filter::{EnvFilter, LevelFilter},
            util::SubscriberInitExt,
        };
        const ENV: &str = if cfg!(loom) { "LOOM_LOG" } else { "RUST_LOG" };

        let env = std::env::var(ENV).unwrap_or_default();
        let builder = EnvFilter::builder().with_default_directive(LevelFilter::INFO.into());
        let filter = if env.is_empty() {
            builder.parse_lossy(default)
        } else {
            builder.parse_lossy(env)
        };
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .finish();

        TestGuard {
            _guard: subscriber.set_default(),
        }
    }
}
