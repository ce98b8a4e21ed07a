//! Optional logging
//!
//! Dispatches to `log` when the `log` feature is on, to `defmt` on embedded
//! builds, and expands to nothing otherwise.

#[cfg(feature = "log")]
macro_rules! log_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! log_trace {
    ($($arg:tt)*) => { defmt::trace!($($arg)*) };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! log_debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! log_warn {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}
