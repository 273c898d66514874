//! Conditional logging macros for library-level tracing.
//!
//! With the `logging` feature enabled these forward to tracing; without
//! it they compile to no-ops. Consumers provide their own subscriber.

/// Emit a debug-level log (operation details).
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Emit an info-level log (lifecycle events).
#[cfg(feature = "logging")]
macro_rules! log_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

pub(crate) use log_debug as debug;
pub(crate) use log_info as info;
