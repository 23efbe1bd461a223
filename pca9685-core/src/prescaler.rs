//! PWM frequency to prescaler conversion
//!
//! The internal oscillator runs at 25 MHz and one PWM period is 4096 ticks:
//!
//! ```text
//! prescaler = round(25_000_000 / (4096 * f)) - 1
//! ```
//!
//! Computed in integers (round half up) so it works without a float
//! rounding routine.

use crate::timing::PERIOD_TICKS;

/// Internal oscillator frequency
pub const OSCILLATOR_HZ: u32 = 25_000_000;

/// Lowest reachable PWM frequency (prescaler 255)
pub const MIN_FREQUENCY_HZ: u16 = 24;

/// Highest reachable PWM frequency (prescaler 3)
pub const MAX_FREQUENCY_HZ: u16 = 1526;

/// Frequency applied by `initialize()` unless configured otherwise
pub const DEFAULT_FREQUENCY_HZ: u16 = 1000;

/// Clamp a requested frequency into the reachable range
pub fn clamp_frequency(frequency_hz: u16) -> u16 {
    frequency_hz.clamp(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ)
}

/// Prescaler register value for a requested frequency (clamped first)
pub fn prescaler_for(frequency_hz: u16) -> u8 {
    let divisor = PERIOD_TICKS as u32 * clamp_frequency(frequency_hz) as u32;
    let rounded = (OSCILLATOR_HZ + divisor / 2) / divisor;
    // 4..=254 for the clamped range, so the subtraction and cast cannot wrap
    (rounded - 1) as u8
}

/// PWM frequency produced by a prescaler value, rounded to the nearest Hz
pub fn frequency_for(prescaler: u8) -> u32 {
    let divisor = PERIOD_TICKS as u32 * (prescaler as u32 + 1);
    (OSCILLATOR_HZ + divisor / 2) / divisor
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_values() {
        // 25e6 / 4096000 - 1 = 5.1035
        assert_eq!(prescaler_for(1000), 5);
        assert_eq!(prescaler_for(24), 253);
        assert_eq!(prescaler_for(1526), 3);
        // 25e6 / 204800 - 1 = 121.07
        assert_eq!(prescaler_for(50), 121);
        // 25e6 / 819200 - 1 = 29.52
        assert_eq!(prescaler_for(200), 30);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(prescaler_for(0), prescaler_for(24));
        assert_eq!(prescaler_for(23), prescaler_for(24));
        assert_eq!(prescaler_for(1527), prescaler_for(1526));
        assert_eq!(prescaler_for(u16::MAX), prescaler_for(1526));
    }

    #[test]
    fn test_frequency_for() {
        assert_eq!(frequency_for(5), 1017);
        assert_eq!(frequency_for(121), 50);
        assert_eq!(frequency_for(3), 1526);
    }

    proptest! {
        #[test]
        fn prop_prescaler_in_hardware_range(f in any::<u16>()) {
            let p = prescaler_for(f);
            prop_assert!((3..=255).contains(&p));
        }

        #[test]
        fn prop_prescaler_is_nearest(f in MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ) {
            let error = |p: i64| (OSCILLATOR_HZ as i64 - 4096 * f as i64 * (p + 1)).abs();
            let p = prescaler_for(f) as i64;
            prop_assert!(error(p) <= error(p - 1));
            prop_assert!(error(p) <= error(p + 1));
        }

        #[test]
        fn prop_monotonic(f in MIN_FREQUENCY_HZ..MAX_FREQUENCY_HZ) {
            prop_assert!(prescaler_for(f) >= prescaler_for(f + 1));
        }
    }
}
