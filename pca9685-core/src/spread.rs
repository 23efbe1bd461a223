//! EMI-reducing phase spreading for multi-channel updates
//!
//! Starting every dimmed channel at tick 0 makes all outputs switch on at
//! the same instant, which shows up as a current spike and radiated noise.
//! Instead, dimmed channels are laid out one after another around the
//! 4096-tick period. When their combined on-time exceeds one period the
//! slots overlap by an equal share; when it is shorter they are separated
//! by equal gaps.
//!
//! ```text
//! overlap = floor((sum(dimmed) - 4095) / dimmed_count)
//! on[i]   = offset mod 4096
//! off[i]  = (offset + duty[i]) mod 4096
//! offset += 4096 + duty[i] - overlap
//! ```
//!
//! Only the phase moves; every dimmed channel keeps its exact duty length.
//! Fully off and fully on channels get the force flags and do not take a
//! slot.

use heapless::Vec;

use crate::channel::CHANNEL_COUNT;
use crate::timing::{ChannelTiming, DutyClass, MAX_DUTY, PERIOD_TICKS};

/// More duty values than the chip has channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TooManyChannels(pub usize);

/// Average overlap between consecutive dimmed slots
///
/// Negative when the slots fit with room to spare. `None` when no channel is
/// dimmed.
pub fn slot_overlap(duties: &[u16]) -> Option<i32> {
    let (total, count) = duties
        .iter()
        .filter_map(|&d| match DutyClass::of(d) {
            DutyClass::Dimmed(d) => Some(d as i32),
            _ => None,
        })
        .fold((0i32, 0i32), |(total, count), d| (total + d, count + 1));

    if count == 0 {
        return None;
    }

    // Floor division: a negative numerator rounds toward negative infinity
    Some((total - MAX_DUTY as i32).div_euclid(count))
}

/// Compute staggered timings for channels `0..duties.len()`
pub fn spread_duty_cycles(
    duties: &[u16],
) -> Result<Vec<ChannelTiming, CHANNEL_COUNT>, TooManyChannels> {
    if duties.len() > CHANNEL_COUNT {
        return Err(TooManyChannels(duties.len()));
    }

    let period = PERIOD_TICKS as i32;
    let overlap = slot_overlap(duties).unwrap_or(0);
    let mut offset = 0i32;
    let mut timings = Vec::new();

    for &duty in duties {
        let timing = match DutyClass::of(duty) {
            DutyClass::Off => ChannelTiming::FULLY_OFF,
            DutyClass::On => ChannelTiming::FULLY_ON,
            DutyClass::Dimmed(d) => {
                let d = d as i32;
                let timing = ChannelTiming {
                    on: offset.rem_euclid(period) as u16,
                    off: (offset + d).rem_euclid(period) as u16,
                };
                offset = (offset + period + d - overlap).rem_euclid(period);
                timing
            }
        };
        // Length checked above
        let _ = timings.push(timing);
    }

    Ok(timings)
}
