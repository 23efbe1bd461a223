//! PCA9685 bring-up firmware
//!
//! Brings up a PCA9685 on I2C0 of an RP2040 (SDA = GPIO4, SCL = GPIO5)
//! from the embedded `board.toml`, applies the initial duty table through
//! the phase-spreading path, then reports MODE1 and PRESCALE periodically
//! so a missing or reset chip shows up in the log.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_time::{Delay, Duration, Ticker};
use {defmt_rtt as _, panic_probe as _};

use pca9685_core::prescaler::frequency_for;
use pca9685_core::registers::mode1;
use pca9685_driver::{ChannelController, DefmtSink};

use crate::config::{parse_config, BoardConfig};

mod config;

/// Embedded board configuration (compiled into firmware)
/// Edit board.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../board.toml");

/// How often the chip's mode registers are read back
const STATUS_INTERVAL: Duration = Duration::from_secs(5);

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("PCA9685 bring-up starting...");

    let p = embassy_rp::init(Default::default());

    let board = match parse_config(EMBEDDED_CONFIG) {
        Ok(board) => board,
        Err(e) => {
            error!("Failed to parse board.toml: {:?}", e);
            BoardConfig::default()
        }
    };
    info!(
        "Board: addr={=u8:#x}, {} Hz, totem_pole={}, {} channels preset",
        board.controller.address,
        board.controller.frequency_hz,
        board.totem_pole,
        board.duty.len()
    );

    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = board.i2c_frequency;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    let mut pwm = ChannelController::with_config(i2c, Delay, board.controller).with_sink(DefmtSink);

    if let Err(e) = pwm.initialize() {
        error!("PCA9685 initialization failed: {}", e);
    }
    if let Err(e) = pwm.set_output_mode(board.totem_pole) {
        error!("Failed to set output mode: {}", e);
    }
    if !board.duty.is_empty() {
        match pwm.set_all_duty_cycles(&board.duty) {
            Ok(()) => info!("Applied duty table: {}", board.duty.as_slice()),
            Err(e) => error!("Failed to apply duty table: {}", e),
        }
    }

    let mut ticker = Ticker::every(STATUS_INTERVAL);
    loop {
        ticker.next().await;

        match (pwm.mode1(), pwm.prescaler()) {
            (Ok(mode), Ok(prescaler)) => {
                if mode & mode1::SLEEP != 0 {
                    warn!("PCA9685 is asleep (MODE1={=u8:#x})", mode);
                } else {
                    debug!(
                        "PCA9685 MODE1={=u8:#x} PRESCALE={} (~{} Hz)",
                        mode,
                        prescaler,
                        frequency_for(prescaler)
                    );
                }
            }
            (Err(e), _) | (_, Err(e)) => warn!("PCA9685 not responding: {}", e),
        }
    }
}
