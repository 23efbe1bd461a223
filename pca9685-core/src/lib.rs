//! Board-agnostic core logic for the PCA9685 PWM controller
//!
//! This crate contains everything about the chip that does not need a bus:
//!
//! - Register map and MODE1/MODE2 bit definitions
//! - Channel timing encoding (ON/OFF counters, force flags, byte packing)
//! - Prescaler computation for the PWM refresh rate
//! - EMI-reducing phase spreading for multi-channel updates
//! - Controller configuration
//! - Diagnostic events and the injectable sink they are reported through
//!
//! The bus-facing controller lives in `pca9685-driver`.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod channel;
pub mod config;
pub mod diag;
pub mod prescaler;
pub mod registers;
pub mod spread;
pub mod timing;

pub use channel::{Channel, ChannelOutOfRange, CHANNEL_COUNT};
pub use config::ControllerConfig;
pub use diag::{DiagnosticSink, Event, NoopSink};
pub use registers::OutputDisabledState;
pub use spread::{spread_duty_cycles, TooManyChannels};
pub use timing::{ChannelTiming, DutyClass};
