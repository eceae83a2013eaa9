use std::fmt;

use itertools::Itertools;
use num_traits::AsPrimitive;
use thiserror::Error;

/// One mark or space duration in microseconds.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct IrPulse(pub u64);

impl IrPulse {
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl AsPrimitive<f64> for IrPulse {
    fn as_(self) -> f64 {
        self.0.as_()
    }
}

/// Alternating mark/space durations, starting with a mark.
#[derive(Debug, Clone, PartialOrd, PartialEq)]
pub struct IrSequence(pub Vec<IrPulse>);

impl IrSequence {
    pub fn into_inner(self) -> Vec<IrPulse> {
        self.0
    }
}

impl AsRef<[IrPulse]> for IrSequence {
    fn as_ref(&self) -> &[IrPulse] {
        &self.0
    }
}

/// A pulse-coding scheme between raw bytes and timed pulses.
pub trait IrFormat {
    /// Carrier modulation frequency in hertz.
    const CARRIER_HZ: u32;
    /// Accepted deviation of a received pulse from its nominal length.
    const TOLERANCE: f64 = 0.25;

    fn in_bounds(pulse: IrPulse, target: u64) -> bool {
        in_bounds(pulse, target, Self::TOLERANCE)
    }

    fn decode<T: AsRef<[IrPulse]>>(data: T) -> Result<IrPulseBytes, IrDecodeError>;
    fn encode<T: AsRef<[u8]>>(bytes: T) -> Result<IrSequence, IrEncodeError>;
}

/// Hardware able to emit a pulse sequence at a carrier frequency.
pub trait IrTransmitter {
    type Error: std::error::Error;

    fn transmit(&mut self, sequence: &IrSequence, carrier_hz: u32) -> Result<(), Self::Error>;
}

fn in_bounds<L: AsPrimitive<f64>, T: AsPrimitive<f64>>(
    length: L,
    target: T,
    tolerance: f64,
) -> bool {
    length.as_() > target.as_() * (1f64 - tolerance)
        && length.as_() < target.as_() * (1f64 + tolerance)
}

#[derive(Error, Debug, Clone)]
pub enum IrDecodeError {
    #[error("Input is too short")]
    TooShort,
    #[error("Leader does not match")]
    UnknownLeader,
    #[error("Section header does not match")]
    UnknownHeader,
    #[error("Unknown bit")]
    UnknownBit,
    #[error("Section end does not match")]
    UnknownEnd,
    #[error("Unexpected end of data")]
    UnexpectedEnd,
}

#[derive(Error, Debug, Clone)]
pub enum IrEncodeError {
    #[error("State code must be {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

#[derive(Clone, Debug)]
pub struct IrPulseBytes(pub Vec<u8>);

impl AsRef<[u8]> for IrPulseBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for IrPulseBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.iter().map(|b| format!("0x{:02X}", b)).join(", ")
        )
    }
}
