//! Feature-gated diagnostics for the ranking core.
//!
//! With the `logging` feature these forward to `tracing`; without it every call
//! expands to nothing, so the engine never depends on a subscriber being installed.
//!
//! ```rust,ignore
//! use crate::logging::{debug, warn};
//!
//! warn!(top_n, "requested a non-positive number of teams");
//! debug!(account_id, team_id, "excluding invalid player");
//! ```

/// Per-record detail (excluded players, chosen selection strategy).
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Lifecycle events such as a ranking run starting or a fetch completing.
#[cfg(feature = "logging")]
macro_rules! log_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

/// Batch-level problems that degrade the result to empty.
#[cfg(feature = "logging")]
macro_rules! log_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

/// Upstream failures about to be returned to the caller.
#[cfg(feature = "logging")]
macro_rules! log_error {
    ($($arg:tt)*) => { tracing::error!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

pub(crate) use log_debug as debug;
#[cfg_attr(not(feature = "fetch"), allow(unused_imports))]
pub(crate) use log_error as error;
pub(crate) use log_info as info;
pub(crate) use log_warn as warn;
