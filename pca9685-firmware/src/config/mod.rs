//! Board configuration
//!
//! Parsed from the `board.toml` compiled into the firmware by a custom
//! no_std parser. The same file is validated at build time by `build.rs`.

pub mod toml;

use heapless::Vec;
use pca9685_core::{ControllerConfig, CHANNEL_COUNT};

pub use toml::{parse_config, ParseError};

/// Everything the bring-up firmware needs to drive one board
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    /// Address, frequency and prescaler handling
    pub controller: ControllerConfig,
    /// Totem-pole outputs (false = open drain)
    pub totem_pole: bool,
    /// I2C SCL frequency in Hz
    pub i2c_frequency: u32,
    /// Initial duty for channels 0..len, applied as one spread update
    pub duty: Vec<u16, CHANNEL_COUNT>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            totem_pole: true,
            i2c_frequency: 400_000,
            duty: Vec::new(),
        }
    }
}
