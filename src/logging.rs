//! Logging abstraction
//!
//! Provides unified logging macros that work across different targets:
//! - Embedded (`defmt` feature): Uses defmt deferred formatting
//! - Host tests: Uses println!/eprintln!
//! - Host non-test: No-op
//!
//! Format strings must stay within the subset defmt understands: plain `{}`
//! placeholders with integers, floats, and `&str` arguments.

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($fmt $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        ::std::println!(::core::concat!("[DEBUG] ", $fmt) $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), not(test)))]
        { $( let _ = &$arg; )* }
    }};
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($fmt $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        ::std::println!(::core::concat!("[INFO] ", $fmt) $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), not(test)))]
        { $( let _ = &$arg; )* }
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($fmt $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        ::std::println!(::core::concat!("[WARN] ", $fmt) $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), not(test)))]
        { $( let _ = &$arg; )* }
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($fmt $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        ::std::eprintln!(::core::concat!("[ERROR] ", $fmt) $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), not(test)))]
        { $( let _ = &$arg; )* }
    }};
}
