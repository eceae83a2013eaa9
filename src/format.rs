//! Pulse timing for the ARC468A3 remote.
//!
//! A message is a fixed ten-pulse leader followed by two sections, each
//! made of a header pair, the section bytes least-significant-bit first,
//! a footer mark and a long gap. All durations are microseconds.

use itertools::Itertools;

use crate::daikin468::types::STATE_LENGTH;
use crate::types::{IrDecodeError, IrEncodeError, IrFormat, IrPulse, IrPulseBytes, IrSequence};

pub struct Arc468;

impl Arc468 {
    pub const LEADER: [u64; 10] = [1260, 420, 420, 420, 420, 420, 420, 420, 420, 25_300];
    pub const HDR_MARK: u64 = 3_500;
    pub const HDR_SPACE: u64 = 1_728;
    pub const BIT_MARK: u64 = 460;
    pub const ONE_SPACE: u64 = 1_270;
    pub const ZERO_SPACE: u64 = 420;
    pub const GAP: u64 = 35_204;

    pub const SECTION1_LENGTH: usize = 20;
    pub const SECTION2_LENGTH: usize = 19;
    /// Pulses in one full message: leader plus two framed sections.
    pub const SEQUENCE_LENGTH: usize =
        Self::LEADER.len() + (Self::SECTION1_LENGTH + Self::SECTION2_LENGTH) * 16 + 8;

    /// Encodes a complete state image. The fixed-size input makes this
    /// infallible; the trait entry point validates slices instead.
    pub fn encode_state(code: &[u8; STATE_LENGTH]) -> IrSequence {
        let mut pulses = Vec::with_capacity(Self::SEQUENCE_LENGTH);
        pulses.extend(Self::LEADER.into_iter().map(IrPulse));
        Self::push_section(&mut pulses, &code[..Self::SECTION1_LENGTH]);
        Self::push_section(&mut pulses, &code[Self::SECTION1_LENGTH..]);
        IrSequence(pulses)
    }

    fn push_section(pulses: &mut Vec<IrPulse>, bytes: &[u8]) {
        pulses.push(IrPulse(Self::HDR_MARK));
        pulses.push(IrPulse(Self::HDR_SPACE));
        for byte in bytes {
            let mut bits = *byte;
            for _ in 0..8 {
                pulses.push(IrPulse(Self::BIT_MARK));
                pulses.push(IrPulse(if bits & 1 == 0 {
                    Self::ZERO_SPACE
                } else {
                    Self::ONE_SPACE
                }));
                bits >>= 1;
            }
        }
        pulses.push(IrPulse(Self::BIT_MARK));
        pulses.push(IrPulse(Self::GAP));
    }

    /// Reads one section off the front of `pulses` into `bytes` and
    /// returns what follows its gap. The gap may be cut off by the end
    /// of a capture.
    fn decode_section<'a>(
        pulses: &'a [IrPulse],
        count: usize,
        bytes: &mut Vec<u8>,
    ) -> Result<&'a [IrPulse], IrDecodeError> {
        let body = count * 16;
        if pulses.len() < body + 3 {
            return Err(IrDecodeError::UnexpectedEnd);
        }
        if !Self::in_bounds(pulses[0], Self::HDR_MARK)
            || !Self::in_bounds(pulses[1], Self::HDR_SPACE)
        {
            return Err(IrDecodeError::UnknownHeader);
        }
        let mut byte = 0u8;
        let mut bit_counter = 0usize;
        for (mark, space) in pulses[2..2 + body].iter().tuples() {
            if !Self::in_bounds(*mark, Self::BIT_MARK) {
                return Err(IrDecodeError::UnknownBit);
            }
            if Self::in_bounds(*space, Self::ONE_SPACE) {
                byte += 1 << bit_counter;
            } else if !Self::in_bounds(*space, Self::ZERO_SPACE) {
                return Err(IrDecodeError::UnknownBit);
            }
            bit_counter = (bit_counter + 1) % 8;
            if bit_counter == 0 {
                bytes.push(byte);
                byte = 0;
            }
        }
        if !Self::in_bounds(pulses[2 + body], Self::BIT_MARK) {
            return Err(IrDecodeError::UnknownEnd);
        }
        match pulses.get(2 + body + 1) {
            Some(gap) if !Self::in_bounds(*gap, Self::GAP) => Err(IrDecodeError::UnknownEnd),
            Some(_) => Ok(&pulses[2 + body + 2..]),
            None => Ok(&pulses[pulses.len()..]),
        }
    }
}

impl IrFormat for Arc468 {
    const CARRIER_HZ: u32 = 36_700;
    // the protocol needs an extra five points over the usual window
    const TOLERANCE: f64 = 0.30;

    /// Decodes the first complete message; trailing repeats are ignored.
    fn decode<T: AsRef<[IrPulse]>>(data: T) -> Result<IrPulseBytes, IrDecodeError> {
        let data = data.as_ref();
        if data.len() < Self::LEADER.len() {
            return Err(IrDecodeError::TooShort);
        }
        if data
            .iter()
            .zip(Self::LEADER)
            .any(|(pulse, expected)| !Self::in_bounds(*pulse, expected))
        {
            return Err(IrDecodeError::UnknownLeader);
        }
        let mut bytes = Vec::with_capacity(STATE_LENGTH);
        let rest = &data[Self::LEADER.len()..];
        let rest = Self::decode_section(rest, Self::SECTION1_LENGTH, &mut bytes)?;
        Self::decode_section(rest, Self::SECTION2_LENGTH, &mut bytes)?;
        Ok(IrPulseBytes(bytes))
    }

    fn encode<T: AsRef<[u8]>>(bytes: T) -> Result<IrSequence, IrEncodeError> {
        let bytes = bytes.as_ref();
        let code: &[u8; STATE_LENGTH] =
            bytes.try_into().map_err(|_| IrEncodeError::WrongLength {
                expected: STATE_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self::encode_state(code))
    }
}
