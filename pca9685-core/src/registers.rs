//! PCA9685 register map
//!
//! Addresses and bit masks must match the datasheet exactly; they go on the
//! wire unchanged.

/// Default 7-bit I2C address (all address pins tied low)
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Register addresses
pub mod reg {
    /// Mode register 1
    pub const MODE1: u8 = 0x00;
    /// Mode register 2
    pub const MODE2: u8 = 0x01;
    /// LED0_ON_L. Each channel owns ON_L, ON_H, OFF_L, OFF_H from here on.
    pub const FIRST_LED: u8 = 0x06;
    /// Registers per channel
    pub const LED_STRIDE: u8 = 4;
    /// Prescaler for the PWM output frequency
    pub const PRESCALER: u8 = 0xFE;
}

/// MODE1 bits
pub mod mode1 {
    /// Restart enabled (write 1 to clear)
    pub const RESTART: u8 = 0x80;
    /// Use the EXTCLK pin clock
    pub const EXTCLK: u8 = 0x40;
    /// Register auto-increment
    pub const AUTO_INCREMENT: u8 = 0x20;
    /// Low power mode, oscillator off
    pub const SLEEP: u8 = 0x10;
    /// Respond to I2C subaddress 1
    pub const SUB1: u8 = 0x08;
    /// Respond to I2C subaddress 2
    pub const SUB2: u8 = 0x04;
    /// Respond to I2C subaddress 3
    pub const SUB3: u8 = 0x02;
    /// Respond to the LED All Call address
    pub const ALLCALL: u8 = 0x01;
}

/// MODE2 bits
pub mod mode2 {
    /// Output logic inverted
    pub const INVRT: u8 = 0x10;
    /// Outputs change on ACK instead of STOP
    pub const OCH: u8 = 0x08;
    /// Totem pole outputs (cleared = open drain)
    pub const OUTDRV: u8 = 0x04;
    /// Output state while OE is high
    pub const OUTNE: u8 = 0x03;
}

/// Output level while the chip's OE pin is held high (MODE2 OUTNE field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDisabledState {
    /// Outputs driven low
    #[default]
    Low,
    /// Outputs driven high (totem pole) or high-impedance (open drain)
    High,
    /// Outputs high-impedance
    HighImpedance,
}

impl OutputDisabledState {
    /// OUTNE field bits
    pub fn bits(self) -> u8 {
        match self {
            OutputDisabledState::Low => 0b00,
            OutputDisabledState::High => 0b01,
            OutputDisabledState::HighImpedance => 0b10,
        }
    }

    /// Replace the OUTNE field of a MODE2 value, leaving other bits alone
    pub fn apply(self, mode2: u8) -> u8 {
        (mode2 & !mode2::OUTNE) | self.bits()
    }
}

/// Set or clear `mask` in a register value
pub fn with_bit(value: u8, mask: u8, set: bool) -> u8 {
    if set {
        value | mask
    } else {
        value & !mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_map() {
        assert_eq!(reg::MODE1, 0x00);
        assert_eq!(reg::MODE2, 0x01);
        assert_eq!(reg::FIRST_LED, 0x06);
        assert_eq!(reg::PRESCALER, 0xFE);
        // Last channel's OFF_H must sit below the ALL_LED block at 0xFA
        assert_eq!(reg::FIRST_LED + 15 * reg::LED_STRIDE + 3, 0x45);
    }

    #[test]
    fn test_with_bit() {
        assert_eq!(with_bit(0x00, mode2::OUTDRV, true), 0x04);
        assert_eq!(with_bit(0xFF, mode2::OUTDRV, false), 0xFB);
        assert_eq!(with_bit(0x04, mode2::OUTDRV, true), 0x04);
    }

    #[test]
    fn test_output_disabled_apply() {
        assert_eq!(OutputDisabledState::HighImpedance.apply(0x07), 0x06);
        assert_eq!(OutputDisabledState::High.apply(0x10), 0x11);
        assert_eq!(OutputDisabledState::Low.apply(0xFF), 0xFC);
    }
}
