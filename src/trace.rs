//! Diagnostic verbosity for embedders.
//!
//! Grounded on the teacher crate's `cli::constants::{DISPLAY_LEVEL,
//! displaylevel!}`: a crate-level atomic verbosity level plus a macro that
//! conditionally writes to stderr. This crate has no CLI of its own to own
//! that flag, so the embedding application sets it directly with
//! [`set_trace_level`]; the codec itself only ever reads it.
//!
//! 0 = silent (default); 1 = buffer promotions and error returns; 2 = every
//! container open/close.

use std::sync::atomic::{AtomicU32, Ordering};

static TRACE_LEVEL: AtomicU32 = AtomicU32::new(0);

/// Returns the current trace level.
#[inline]
pub fn trace_level() -> u32 {
    TRACE_LEVEL.load(Ordering::Relaxed)
}

/// Sets the trace level. Call once during embedder startup; the codec does
/// not mutate this itself.
#[inline]
pub fn set_trace_level(level: u32) {
    TRACE_LEVEL.store(level, Ordering::Relaxed);
}

/// Conditionally write a diagnostic line to stderr — equivalent to the
/// teacher crate's `displaylevel!`.
macro_rules! flat_trace {
    ($level:expr, $($arg:tt)*) => {
        if $crate::trace::trace_level() >= $level {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use flat_trace;
