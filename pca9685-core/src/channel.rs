//! Channel addressing

use crate::registers::reg;

/// Number of PWM channels on the chip
pub const CHANNEL_COUNT: usize = 16;

/// Channel index outside 0-15
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelOutOfRange(pub u8);

/// A validated channel index (0-15)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(u8);

impl Channel {
    /// Validate a raw channel index
    pub fn new(index: u8) -> Result<Self, ChannelOutOfRange> {
        if (index as usize) < CHANNEL_COUNT {
            Ok(Self(index))
        } else {
            Err(ChannelOutOfRange(index))
        }
    }

    /// Raw index
    pub fn index(self) -> u8 {
        self.0
    }

    /// Address of this channel's ON_L register
    pub fn base_register(self) -> u8 {
        reg::FIRST_LED + reg::LED_STRIDE * self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_channels() {
        for i in 0..16u8 {
            let ch = Channel::new(i).unwrap();
            assert_eq!(ch.index(), i);
            assert_eq!(ch.base_register(), 0x06 + 4 * i);
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(Channel::new(16), Err(ChannelOutOfRange(16)));
        assert_eq!(Channel::new(255), Err(ChannelOutOfRange(255)));
    }
}
