//! PCA9685 channel controller
//!
//! # Bus transactions
//!
//! | Operation               | Transaction                                   |
//! |-------------------------|-----------------------------------------------|
//! | register read           | write `[reg]`, repeated start, read 1 byte    |
//! | register write          | write `[reg, value]`                          |
//! | one channel             | write `[base, ON_L, ON_H, OFF_L, OFF_H]`      |
//! | all channels            | write `[LED0_ON_L, 4 bytes x count]`          |
//!
//! Multi-byte transfers rely on MODE1.AI (auto-increment), which
//! [`ChannelController::initialize`] turns on.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use pca9685_core::channel::{Channel, CHANNEL_COUNT};
use pca9685_core::prescaler::{clamp_frequency, prescaler_for};
use pca9685_core::registers::{mode1, mode2, reg, with_bit};
use pca9685_core::spread::spread_duty_cycles;
use pca9685_core::{
    ChannelTiming, ControllerConfig, DiagnosticSink, Event, NoopSink, OutputDisabledState,
};

use crate::error::Error;

/// Oscillator start-up time after clearing SLEEP
const OSCILLATOR_SETTLE_US: u32 = 500;

/// Register address byte plus four timing bytes per channel
const BLOCK_LEN: usize = 1 + 4 * CHANNEL_COUNT;

/// Driver for one PCA9685 on an I2C bus
///
/// The device address is fixed at construction. Several controllers can
/// share a bus through a bus-sharing wrapper, one per chip.
pub struct ChannelController<I2C, D, S = NoopSink> {
    i2c: I2C,
    delay: D,
    sink: S,
    config: ControllerConfig,
}

impl<I2C, D> ChannelController<I2C, D, NoopSink>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a controller for a chip at the default address (0x40)
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_config(i2c, delay, ControllerConfig::default())
    }

    /// Create a controller with explicit configuration
    pub fn with_config(i2c: I2C, delay: D, config: ControllerConfig) -> Self {
        Self {
            i2c,
            delay,
            sink: NoopSink,
            config,
        }
    }
}

impl<I2C, D, S> ChannelController<I2C, D, S>
where
    I2C: I2c,
    D: DelayNs,
    S: DiagnosticSink,
{
    /// Report diagnostics to `sink` instead
    pub fn with_sink<S2: DiagnosticSink>(self, sink: S2) -> ChannelController<I2C, D, S2> {
        ChannelController {
            i2c: self.i2c,
            delay: self.delay,
            sink,
            config: self.config,
        }
    }

    /// 7-bit bus address of the chip
    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Give back the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Put the chip into a known operating mode
    ///
    /// Enables register auto-increment with the restart flag set, then
    /// applies the configured PWM frequency.
    pub fn initialize(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_register(reg::MODE1, mode1::RESTART | mode1::AUTO_INCREMENT)?;
        self.set_frequency(self.config.frequency_hz)
    }

    /// Set the PWM refresh rate
    ///
    /// Requests outside 24-1526 Hz are clamped. When
    /// `sleep_during_prescale` is enabled the oscillator is stopped for the
    /// prescaler write and restarted afterwards; a chip that was already
    /// asleep stays asleep.
    ///
    /// A bus fault aborts the sequence where it happens. If that is after
    /// the SLEEP write the chip is left asleep; call [`wake`](Self::wake)
    /// once the bus recovers.
    pub fn set_frequency(&mut self, frequency_hz: u16) -> Result<(), Error<I2C::Error>> {
        let prescaler = prescaler_for(frequency_hz);
        self.sink.record(&Event::PrescalerComputed {
            requested_hz: frequency_hz,
            clamped_hz: clamp_frequency(frequency_hz),
            prescaler,
        });

        if !self.config.sleep_during_prescale {
            return self.write_register(reg::PRESCALER, prescaler);
        }

        // Writing RESTART back as 1 would clear it, so drop it from the copy
        let restore = self.read_register(reg::MODE1)? & !mode1::RESTART;
        self.write_register(reg::MODE1, restore | mode1::SLEEP)?;
        self.write_register(reg::PRESCALER, prescaler)?;
        self.write_register(reg::MODE1, restore)?;

        if restore & mode1::SLEEP == 0 {
            self.delay.delay_us(OSCILLATOR_SETTLE_US);
            self.write_register(reg::MODE1, restore | mode1::RESTART)?;
        }

        Ok(())
    }

    /// Select totem-pole (`true`) or open-drain (`false`) outputs
    pub fn set_output_mode(&mut self, totem_pole: bool) -> Result<(), Error<I2C::Error>> {
        self.update_register(reg::MODE2, |m| with_bit(m, mode2::OUTDRV, totem_pole))
    }

    /// Invert the output logic of all channels
    pub fn set_output_inverted(&mut self, inverted: bool) -> Result<(), Error<I2C::Error>> {
        self.update_register(reg::MODE2, |m| with_bit(m, mode2::INVRT, inverted))
    }

    /// Latch new outputs on each ACK instead of on the STOP condition
    pub fn set_output_change_on_ack(&mut self, on_ack: bool) -> Result<(), Error<I2C::Error>> {
        self.update_register(reg::MODE2, |m| with_bit(m, mode2::OCH, on_ack))
    }

    /// Choose the output level while the OE pin is high
    pub fn set_output_disabled_state(
        &mut self,
        state: OutputDisabledState,
    ) -> Result<(), Error<I2C::Error>> {
        self.update_register(reg::MODE2, |m| state.apply(m))
    }

    /// Stop the oscillator; all outputs turn off
    pub fn sleep(&mut self) -> Result<(), Error<I2C::Error>> {
        self.update_register(reg::MODE1, |m| (m & !mode1::RESTART) | mode1::SLEEP)
    }

    /// Restart the oscillator, resuming PWM outputs where the chip allows
    pub fn wake(&mut self) -> Result<(), Error<I2C::Error>> {
        let current = self.read_register(reg::MODE1)?;
        if current & mode1::SLEEP == 0 {
            return Ok(());
        }

        let awake = current & !(mode1::SLEEP | mode1::RESTART);
        self.write_register(reg::MODE1, awake)?;
        self.delay.delay_us(OSCILLATOR_SETTLE_US);

        if current & mode1::RESTART != 0 {
            self.write_register(reg::MODE1, awake | mode1::RESTART)?;
        }

        Ok(())
    }

    /// Write raw ON/OFF counters for one channel
    ///
    /// `4096` in `on` forces the output fully on, `4096` in `off` forces it
    /// fully off. Larger values saturate to 4096.
    pub fn set_channel_timing(
        &mut self,
        channel: u8,
        on: u16,
        off: u16,
    ) -> Result<(), Error<I2C::Error>> {
        let channel = Channel::new(channel)?;
        self.write_timing(channel, ChannelTiming::new(on, off))
    }

    /// Set one channel's duty cycle in ticks out of 4096
    ///
    /// 0 is fully off, 4095 and above is fully on, anything between turns
    /// on at tick 0 and off at `duty`.
    pub fn set_channel_duty_cycle(
        &mut self,
        channel: u8,
        duty: u16,
    ) -> Result<(), Error<I2C::Error>> {
        let channel = Channel::new(channel)?;
        self.write_timing(channel, ChannelTiming::from_duty(duty))
    }

    /// Set duty cycles for channels `0..duties.len()` in one transaction
    ///
    /// Dimmed channels are phase-shifted around the period so they do not
    /// all switch at once; each keeps its exact on-time.
    pub fn set_all_duty_cycles(&mut self, duties: &[u16]) -> Result<(), Error<I2C::Error>> {
        let timings = spread_duty_cycles(duties)?;
        if timings.is_empty() {
            return Ok(());
        }

        let mut buf = [0u8; BLOCK_LEN];
        buf[0] = reg::FIRST_LED;
        for (chunk, timing) in buf[1..].chunks_exact_mut(4).zip(timings.iter()) {
            chunk.copy_from_slice(&timing.to_bytes());
        }

        self.write_block(&buf[..1 + 4 * timings.len()])
    }

    /// Read one channel's ON/OFF counters back from the chip
    pub fn channel_timing(&mut self, channel: u8) -> Result<ChannelTiming, Error<I2C::Error>> {
        let channel = Channel::new(channel)?;
        let register = channel.base_register();
        let mut bytes = [0u8; 4];
        let result = self
            .i2c
            .write_read(self.config.address, &[register], &mut bytes);
        self.check(register, result)?;
        Ok(ChannelTiming::from_bytes(bytes))
    }

    /// Raw MODE1 value
    pub fn mode1(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register(reg::MODE1)
    }

    /// Raw MODE2 value
    pub fn mode2(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register(reg::MODE2)
    }

    /// Current prescaler value
    pub fn prescaler(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register(reg::PRESCALER)
    }

    fn write_timing(
        &mut self,
        channel: Channel,
        timing: ChannelTiming,
    ) -> Result<(), Error<I2C::Error>> {
        let mut buf = [0u8; 5];
        buf[0] = channel.base_register();
        buf[1..].copy_from_slice(&timing.to_bytes());
        self.write_block(&buf)
    }

    /// Read-modify-write a single register
    fn update_register<F>(&mut self, register: u8, f: F) -> Result<(), Error<I2C::Error>>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read_register(register)?;
        self.write_register(register, f(value))
    }

    fn read_register(&mut self, register: u8) -> Result<u8, Error<I2C::Error>> {
        let mut value = [0u8; 1];
        let result = self
            .i2c
            .write_read(self.config.address, &[register], &mut value);
        self.check(register, result)?;
        self.sink.record(&Event::RegisterRead {
            register,
            value: value[0],
        });
        Ok(value[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        let result = self.i2c.write(self.config.address, &[register, value]);
        self.check(register, result)?;
        self.sink.record(&Event::RegisterWrite { register, value });
        Ok(())
    }

    /// `data[0]` is the start register, the rest lands in consecutive registers
    fn write_block(&mut self, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        let register = data[0];
        let result = self.i2c.write(self.config.address, data);
        self.check(register, result)?;
        self.sink.record(&Event::BlockWrite {
            register,
            len: data.len() - 1,
        });
        Ok(())
    }

    fn check<T>(
        &mut self,
        register: u8,
        result: Result<T, I2C::Error>,
    ) -> Result<T, Error<I2C::Error>> {
        result.map_err(|e| {
            self.sink.record(&Event::TransportFault { register });
            Error::Transport(e)
        })
    }
}
