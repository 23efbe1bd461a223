//! Channel ON/OFF timing
//!
//! Each channel has two 13-bit counters. The low 12 bits are a tick position
//! within the 4096-tick PWM period; bit 12 forces the output fully on (ON
//! counter) or fully off (OFF counter) regardless of position.

/// Ticks in one PWM period
pub const PERIOD_TICKS: u16 = 4096;

/// Force flag value (bit 12) in either counter
pub const FULL: u16 = 0x1000;

/// Duty values at or above this saturate to fully on
pub const MAX_DUTY: u16 = 4095;

/// How a requested duty value is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DutyClass {
    /// Duty 0, forced off
    Off,
    /// Duty 4095 and above, forced on
    On,
    /// Duty 1-4094, switched within the period
    Dimmed(u16),
}

impl DutyClass {
    /// Classify a duty value
    ///
    /// 4095 is treated as fully on rather than "off for one tick".
    pub fn of(duty: u16) -> Self {
        if duty == 0 {
            DutyClass::Off
        } else if duty >= MAX_DUTY {
            DutyClass::On
        } else {
            DutyClass::Dimmed(duty)
        }
    }
}

/// ON/OFF counter pair for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelTiming {
    /// Tick at which the output turns on, or [`FULL`]
    pub on: u16,
    /// Tick at which the output turns off, or [`FULL`]
    pub off: u16,
}

impl ChannelTiming {
    /// Output held high for the whole period
    pub const FULLY_ON: Self = Self { on: FULL, off: 0 };

    /// Output held low for the whole period
    pub const FULLY_OFF: Self = Self { on: 0, off: FULL };

    /// Raw timing; values above 4096 saturate to the force flag
    pub fn new(on: u16, off: u16) -> Self {
        Self {
            on: on.min(FULL),
            off: off.min(FULL),
        }
    }

    /// Timing for a duty value, starting at tick 0
    pub fn from_duty(duty: u16) -> Self {
        match DutyClass::of(duty) {
            DutyClass::Off => Self::FULLY_OFF,
            DutyClass::On => Self::FULLY_ON,
            DutyClass::Dimmed(d) => Self { on: 0, off: d },
        }
    }

    /// Register payload: ON_L, ON_H, OFF_L, OFF_H
    ///
    /// High bytes carry bits 8-12; the top three bits are always zero.
    pub fn to_bytes(self) -> [u8; 4] {
        [
            (self.on & 0xFF) as u8,
            ((self.on >> 8) & 0x1F) as u8,
            (self.off & 0xFF) as u8,
            ((self.off >> 8) & 0x1F) as u8,
        ]
    }

    /// Decode a register payload read back from the chip
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            on: u16::from(bytes[0]) | (u16::from(bytes[1] & 0x1F) << 8),
            off: u16::from(bytes[2]) | (u16::from(bytes[3] & 0x1F) << 8),
        }
    }

    /// Output forced high (OFF force takes precedence on the chip)
    pub fn is_fully_on(&self) -> bool {
        self.on & FULL != 0 && self.off & FULL == 0
    }

    /// Output forced low
    pub fn is_fully_off(&self) -> bool {
        self.off & FULL != 0
    }

    /// Ticks per period the output is high
    pub fn high_ticks(&self) -> u16 {
        if self.is_fully_off() {
            0
        } else if self.is_fully_on() {
            PERIOD_TICKS
        } else {
            let on = self.on % PERIOD_TICKS;
            let off = self.off % PERIOD_TICKS;
            (off + PERIOD_TICKS - on) % PERIOD_TICKS
        }
    }
}
