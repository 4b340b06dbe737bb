//! Days elapsed since a reference date, shown on a multiplexed 4-digit 7-segment LED.
//!
//! The pure parts (DST rules, local-time conversion, day arithmetic, segment
//! encoding, the render cycle and the refresh state machine) build on any target,
//! including the host with `--no-default-features --features host`. The device
//! tasks that own GPIO, Wi-Fi and the executor are only built for the Pico W.
#![cfg_attr(not(test), no_std)]
#![allow(clippy::future_not_send, reason = "single-threaded")]

pub mod bit_matrix_led4;
pub mod config;
pub mod days_cell;
pub mod dst;
pub mod elapsed_days;
mod error;
pub mod led4;
pub mod local_time;
pub mod output_array;
pub mod scheduler;
pub mod time_sync;
pub mod unix_seconds;

#[cfg(feature = "pico1")]
pub mod hardware;
#[cfg(all(feature = "wifi", feature = "pico1"))]
pub mod wifi;

// Re-export commonly used items
pub use days_cell::DaysCell;
pub use error::{Error, Result};
pub use unix_seconds::UnixSeconds;
