//! Driver errors

use core::fmt;

use pca9685_core::{ChannelOutOfRange, TooManyChannels};

/// Errors returned by [`ChannelController`](crate::ChannelController)
///
/// Argument errors are raised before any bus traffic. Transport errors are
/// passed through untouched; the driver never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Bus transaction failed (NACK, arbitration loss, device absent)
    Transport(E),
    /// Channel index outside 0-15
    InvalidChannel(u8),
    /// Block update with more values than channels
    TooManyChannels(usize),
}

impl<E> From<ChannelOutOfRange> for Error<E> {
    fn from(e: ChannelOutOfRange) -> Self {
        Error::InvalidChannel(e.0)
    }
}

impl<E> From<TooManyChannels> for Error<E> {
    fn from(e: TooManyChannels) -> Self {
        Error::TooManyChannels(e.0)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "I2C transaction failed: {:?}", e),
            Error::InvalidChannel(ch) => write!(f, "channel {} out of range 0-15", ch),
            Error::TooManyChannels(n) => write!(f, "{} duty values for 16 channels", n),
        }
    }
}
