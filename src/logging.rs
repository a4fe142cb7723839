//! Conditional logging macros for library-level tracing.
//!
//! With the `logging` feature these forward to `tracing`; without it they
//! only borrow the field values, so nothing is formatted or emitted. The
//! library never installs a subscriber.
//!
//! ```rust,ignore
//! use crate::logging::{debug, warn};
//!
//! debug!(store = store.name(), key = key, "reading value");
//! warn!(key = key, error = %err, "decode mismatch, treating as absent");
//! ```

/// Very detailed internal operations.
#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { tracing::trace!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {{ $crate::logging::log_fields!($($arg)*); }};
}

/// Operation details useful for debugging.
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{ $crate::logging::log_fields!($($arg)*); }};
}

/// Lifecycle events such as opening a backend.
#[cfg(feature = "logging")]
macro_rules! log_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_info {
    ($($arg:tt)*) => {{ $crate::logging::log_fields!($($arg)*); }};
}

/// Failures that were handled, e.g. a group member skipped on read.
#[cfg(feature = "logging")]
macro_rules! log_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{ $crate::logging::log_fields!($($arg)*); }};
}

/// Failures that propagate to the caller.
#[cfg(feature = "logging")]
macro_rules! log_error {
    ($($arg:tt)*) => { tracing::error!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_error {
    ($($arg:tt)*) => {{ $crate::logging::log_fields!($($arg)*); }};
}

/// Borrows every field value of a disabled event so bindings that only feed
/// logging stay used.
#[cfg(not(feature = "logging"))]
macro_rules! log_fields {
    () => {};
    ($key:ident = % $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $( $crate::logging::log_fields!($($rest)*); )?
    };
    ($key:ident = ? $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $( $crate::logging::log_fields!($($rest)*); )?
    };
    ($key:ident = $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $( $crate::logging::log_fields!($($rest)*); )?
    };
    ($msg:literal $(, $arg:expr)* $(,)?) => {
        $( let _ = &$arg; )*
    };
}

#[cfg(not(feature = "logging"))]
pub(crate) use log_fields;

#[allow(unused_imports)]
pub(crate) use log_debug as debug;
#[allow(unused_imports)]
pub(crate) use log_error as error;
#[allow(unused_imports)]
pub(crate) use log_info as info;
#[allow(unused_imports)]
pub(crate) use log_trace as trace;
#[allow(unused_imports)]
pub(crate) use log_warn as warn;
