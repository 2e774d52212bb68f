//! # Etacast Common
//!
//! Shared vocabulary for every crate in the workspace.
//!
//! * **[`delivery`]**: the delivery record entity and the model kinds that predict it.
//! * **[`store`]**: the outbound port through which historical records are read and written.
//! * **[`error`]**: the error taxonomy shared by training, prediction and analytics.
//! * **[`config`]**: runtime configuration assembled by the binary.
//!
//! The logging macros exported here wrap `tracing` so that all crates emit
//! through the same targets and the CLI formatter can style them uniformly.

pub mod config;
pub mod delivery;
pub mod error;
pub mod store;

#[doc(hidden)]
pub use tracing;

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "etacast::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::tracing::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::tracing::debug!($($arg)*)
    };
}
