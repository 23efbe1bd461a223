//! PCA9685 driver
//!
//! [`ChannelController`] turns PWM intents (frequency, output drive, channel
//! duty cycles) into PCA9685 register transactions over any
//! `embedded_hal::i2c::I2c` bus. Encoding and the EMI-spreading allocator
//! come from `pca9685-core`.
//!
//! ```ignore
//! let mut pwm = ChannelController::new(i2c, delay);
//! pwm.initialize()?;
//! pwm.set_output_mode(true)?;
//! pwm.set_channel_duty_cycle(0, 2048)?;
//! pwm.set_all_duty_cycles(&[1000, 1000, 1000])?;
//! ```
//!
//! The driver keeps no copy of register state. Every read-modify-write goes
//! to the chip. It is not reentrant; share it between tasks behind a mutex.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod controller;
pub mod error;

pub use controller::ChannelController;
pub use error::Error;

pub use pca9685_core::{
    ChannelTiming, ControllerConfig, DiagnosticSink, Event, NoopSink, OutputDisabledState,
};
#[cfg(feature = "defmt")]
pub use pca9685_core::diag::DefmtSink;
