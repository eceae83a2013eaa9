//! Infrared emitter on a gpio pin.

use std::result;
use std::thread;
use std::time::Duration;

use rppal::gpio::{Gpio, OutputPin};
use thiserror::Error;

use crate::types::{IrSequence, IrTransmitter};

pub const IR_OUTPUT_PIN: u8 = 13;

// marks are modulated at the carrier with an even on/off split
const DUTY_CYCLE: f64 = 0.5;

#[derive(Error, Debug)]
pub enum IrOutError {
    #[error("Could not initialize gpio")]
    Initialization,
    #[error("Could not get pin {0}")]
    Pin(u8),
    #[error("Could not set up pwm for ir output")]
    Pwm(#[source] rppal::gpio::Error),
    #[error("Invalid carrier frequency {0}")]
    Frequency(u32),
}

pub type Result<T> = result::Result<T, IrOutError>;

/// Drives an ir led with software pwm, holding the pin low between marks.
pub struct IrOut {
    pin: OutputPin,
}

impl IrOut {
    pub fn start(pin: u8) -> Result<IrOut> {
        let pin = Gpio::new()
            .map_err(|_| IrOutError::Initialization)?
            .get(pin)
            .map_err(|_| IrOutError::Pin(pin))?
            .into_output_low();
        Ok(IrOut { pin })
    }

    pub fn default_pin() -> Result<IrOut> {
        Self::start(IR_OUTPUT_PIN)
    }
}

impl IrTransmitter for IrOut {
    type Error = IrOutError;

    fn transmit(&mut self, sequence: &IrSequence, carrier_hz: u32) -> Result<()> {
        if carrier_hz == 0 {
            return Err(IrOutError::Frequency(carrier_hz));
        }
        let period = Duration::from_nanos(1_000_000_000 / u64::from(carrier_hz));
        let width = period.mul_f64(DUTY_CYCLE);
        debug!(
            "sending {} pulses at {} hz",
            sequence.as_ref().len(),
            carrier_hz
        );
        for (i, pulse) in sequence.as_ref().iter().enumerate() {
            // marks sit at even offsets, spaces at odd ones
            if i % 2 == 0 {
                self.pin.set_pwm(period, width).map_err(IrOutError::Pwm)?;
            } else {
                self.pin.clear_pwm().map_err(IrOutError::Pwm)?;
            }
            thread::sleep(Duration::from_micros(pulse.into_inner()));
        }
        self.pin.clear_pwm().map_err(IrOutError::Pwm)?;
        self.pin.set_low();
        trace!("sequence finished, pin low");
        Ok(())
    }
}
