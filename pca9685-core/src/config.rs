//! Controller configuration

use crate::prescaler::DEFAULT_FREQUENCY_HZ;
use crate::registers::DEFAULT_ADDRESS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-device controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerConfig {
    /// 7-bit I2C address (0x40-0x7F depending on the A0-A5 pins)
    pub address: u8,
    /// PWM frequency applied by `initialize()`
    pub frequency_hz: u16,
    /// Put the oscillator to sleep around prescaler writes
    ///
    /// The datasheet only accepts PRESCALE writes while MODE1.SLEEP is set.
    /// Some clones latch it regardless; disable to skip the sleep/wake cycle.
    pub sleep_during_prescale: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            sleep_during_prescale: true,
        }
    }
}

impl ControllerConfig {
    /// Default configuration for a device at `address`
    pub fn with_address(address: u8) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }
}
