#![forbid(unsafe_code)]

//! Logging shim.
//!
//! With the `tracing` feature enabled the usual `tracing` macros are
//! re-exported from here. Without it, no-op stand-ins with the same names are
//! exported at the crate root so call sites never need their own `cfg`:
//!
//! ```ignore
//! #[cfg(feature = "tracing")]
//! use crate::logging::{debug, info};
//! #[cfg(not(feature = "tracing"))]
//! use crate::{debug, info};
//! ```
//!
//! The `tracing-json` feature additionally provides [`init_json`], a one-call
//! subscriber setup emitting newline-delimited JSON filtered by `RUST_LOG`.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

#[cfg(not(feature = "tracing"))]
mod noop {
    #[macro_export]
    #[doc(hidden)]
    macro_rules! trace {
        ($($arg:tt)*) => {{}};
    }

    #[macro_export]
    #[doc(hidden)]
    macro_rules! debug {
        ($($arg:tt)*) => {{}};
    }

    #[macro_export]
    #[doc(hidden)]
    macro_rules! info {
        ($($arg:tt)*) => {{}};
    }

    #[macro_export]
    #[doc(hidden)]
    macro_rules! warn {
        ($($arg:tt)*) => {{}};
    }

    #[macro_export]
    #[doc(hidden)]
    macro_rules! error {
        ($($arg:tt)*) => {{}};
    }
}

/// Install a JSON `tracing` subscriber honoring `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .try_init()
        .is_ok()
}
