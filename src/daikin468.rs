//! State handling for the Daikin ARC468A3 remote.

pub mod types;

use std::convert::TryFrom;
use std::str::FromStr;

use thiserror::Error;

use crate::daikin468::types::{FanSpeed, Mode, SwingMode, STATE_LENGTH};
use crate::format::Arc468;
use crate::types::{IrDecodeError, IrFormat, IrPulse, IrSequence, IrTransmitter};

const SUM1_BYTE: usize = 19;
const SUM2_BYTE: usize = 38;
const POWER_BYTE: usize = 25;
const MODE_BYTE: usize = 25;
const TEMP_BYTE: usize = 26;
const FAN_BYTE: usize = 28;
const SWING_V_BYTE: usize = 28;
const SWING_H_BYTE: usize = 29;

const POWER_MASK: u8 = 0b0000_0001;
const MODE_MASK: u8 = 0b0111_0000;
const TEMP_MASK: u8 = 0b0111_1110;
const LOW_NIBBLE: u8 = 0x0F;
const HIGH_NIBBLE: u8 = 0xF0;

#[derive(Error, Debug, Clone)]
pub enum Daikin468Error {
    #[error("Could not decode ir sequence")]
    Decode(#[from] IrDecodeError),
    #[error("State code must be 39 bytes, got {0}")]
    InvalidLength(usize),
    #[error("State string must be 78 hex digits, got {0}")]
    InvalidHexLength(usize),
    #[error("Invalid hex digit at offset {0}")]
    InvalidDigit(usize),
    #[error("Section checksum mismatch")]
    Checksum,
}

pub type Result<T> = std::result::Result<T, Daikin468Error>;

/// In-memory image of the remote's 39-byte message.
///
/// Setters normalize their input the way the handset does (clamping,
/// coercing unknown codes to auto) instead of failing. The two checksum
/// bytes are refreshed by every read or transmit path, not after each
/// write.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Daikin468 {
    raw: [u8; STATE_LENGTH],
}

impl Daikin468 {
    pub const MIN_TEMP: u8 = 10;
    pub const MAX_TEMP: u8 = 32;
    pub const MIN_COOL_TEMP: u8 = 18;
    pub const DEFAULT_REPEAT: u16 = 0;

    pub fn new() -> Daikin468 {
        let mut state = Daikin468 {
            raw: [0; STATE_LENGTH],
        };
        state.reset();
        state
    }

    /// Restores the power-on state: power off, cool, 28 degrees, fan at
    /// full speed, both swings off.
    pub fn reset(&mut self) {
        self.raw = [0; STATE_LENGTH];
        // section headers
        self.raw[0] = 0x11;
        self.raw[1] = 0xDA;
        self.raw[2] = 0x27;
        self.raw[20] = 0x11;
        self.raw[21] = 0xDA;
        self.raw[22] = 0x27;
        // constants the handset always sends
        self.raw[4] = 0x01;
        self.raw[31] = 0x06;
        self.raw[32] = 0x60;
        self.raw[35] = 0xC1;
        self.raw[36] = 0x90;
        self.raw[25] = 0x38; // power off, mode cool
        self.raw[26] = 0x38; // 28 degrees
        self.raw[28] = 0x70; // fan 5, vertical swing off
        self.checksum();
    }

    fn section_sum(bytes: &[u8]) -> u8 {
        bytes.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
    }

    fn checksum(&mut self) {
        self.raw[SUM1_BYTE] = Self::section_sum(&self.raw[..SUM1_BYTE]);
        self.raw[SUM2_BYTE] = Self::section_sum(&self.raw[Arc468::SECTION1_LENGTH..SUM2_BYTE]);
    }

    /// Checks both section sums of a wire-format state image.
    pub fn valid_checksum(code: &[u8; STATE_LENGTH]) -> bool {
        code[SUM1_BYTE] == Self::section_sum(&code[..SUM1_BYTE])
            && code[SUM2_BYTE] == Self::section_sum(&code[Arc468::SECTION1_LENGTH..SUM2_BYTE])
    }

    pub fn power(&self) -> bool {
        self.raw[POWER_BYTE] & POWER_MASK != 0
    }

    pub fn set_power(&mut self, on: bool) {
        self.raw[POWER_BYTE] = (self.raw[POWER_BYTE] & !POWER_MASK) | u8::from(on);
    }

    pub fn mode(&self) -> Mode {
        Mode::from((self.raw[MODE_BYTE] & MODE_MASK) >> 4)
    }

    /// Changing mode re-applies the stored temperature, since the floor
    /// depends on the mode: moving to cool can raise a low setting to 18.
    pub fn set_mode(&mut self, mode: Mode) {
        self.raw[MODE_BYTE] = (self.raw[MODE_BYTE] & !MODE_MASK) | (u8::from(mode) << 4);
        self.set_temp(self.temp());
    }

    pub fn temp(&self) -> u8 {
        (self.raw[TEMP_BYTE] & TEMP_MASK) >> 1
    }

    /// Clamps to [10, 32] with an 18 degree floor while cooling. The
    /// half-degree bit next to the field is left untouched.
    pub fn set_temp(&mut self, degrees: u8) {
        let floor = if self.mode() == Mode::Cool {
            Self::MIN_COOL_TEMP
        } else {
            Self::MIN_TEMP
        };
        let degrees = degrees.clamp(floor, Self::MAX_TEMP);
        self.raw[TEMP_BYTE] = (self.raw[TEMP_BYTE] & !TEMP_MASK) | (degrees << 1);
    }

    pub fn fan(&self) -> FanSpeed {
        FanSpeed::from(self.raw[FAN_BYTE] >> 4)
    }

    pub fn set_fan(&mut self, speed: FanSpeed) {
        self.raw[FAN_BYTE] = (self.raw[FAN_BYTE] & LOW_NIBBLE) | (u8::from(speed) << 4);
    }

    pub fn swing_vertical(&self) -> SwingMode {
        SwingMode::try_from(self.raw[SWING_V_BYTE] & LOW_NIBBLE).unwrap_or(SwingMode::Off)
    }

    pub fn set_swing_vertical(&mut self, position: SwingMode) {
        self.raw[SWING_V_BYTE] = (self.raw[SWING_V_BYTE] & HIGH_NIBBLE) | u8::from(position);
    }

    pub fn swing_horizontal(&self) -> SwingMode {
        SwingMode::try_from(self.raw[SWING_H_BYTE] & LOW_NIBBLE).unwrap_or(SwingMode::Off)
    }

    pub fn set_swing_horizontal(&mut self, position: SwingMode) {
        self.raw[SWING_H_BYTE] = (self.raw[SWING_H_BYTE] & HIGH_NIBBLE) | u8::from(position);
    }

    /// Refreshes the checksums and returns a snapshot of the wire bytes.
    pub fn raw(&mut self) -> [u8; STATE_LENGTH] {
        self.checksum();
        self.raw
    }

    /// Replaces the state verbatim. Nothing is validated here; field
    /// getters normalize whatever they find.
    pub fn set_raw(&mut self, code: [u8; STATE_LENGTH]) {
        self.raw = code;
    }

    /// Refreshes the checksums and renders the state as 78 uppercase hex
    /// digits.
    pub fn to_hex(&mut self) -> String {
        self.checksum();
        self.raw.iter().map(|byte| format!("{:02X}", byte)).collect()
    }

    /// Builds the pulse sequence for one transmission: the message once,
    /// then repeated `repeat` more times.
    pub fn sequence(&mut self, repeat: u16) -> IrSequence {
        self.checksum();
        let message = Arc468::encode_state(&self.raw);
        if repeat == 0 {
            return message;
        }
        let mut pulses = Vec::with_capacity(message.as_ref().len() * (usize::from(repeat) + 1));
        for _ in 0..=repeat {
            pulses.extend_from_slice(message.as_ref());
        }
        IrSequence(pulses)
    }

    pub fn send<T: IrTransmitter>(
        &mut self,
        out: &mut T,
        repeat: u16,
    ) -> std::result::Result<(), T::Error> {
        let sequence = self.sequence(repeat);
        out.transmit(&sequence, Arc468::CARRIER_HZ)
    }

    /// Rebuilds a state from captured pulses, verifying both section sums.
    pub fn from_sequence<T: AsRef<[IrPulse]>>(pulses: T) -> Result<Daikin468> {
        let bytes = Arc468::decode(pulses)?;
        let state = Daikin468::try_from(bytes.as_ref())?;
        if !Self::valid_checksum(&state.raw) {
            return Err(Daikin468Error::Checksum);
        }
        Ok(state)
    }
}

impl Default for Daikin468 {
    fn default() -> Self {
        Daikin468::new()
    }
}

impl FromStr for Daikin468 {
    type Err = Daikin468Error;

    fn from_str(s: &str) -> Result<Daikin468> {
        if s.len() != STATE_LENGTH * 2 {
            return Err(Daikin468Error::InvalidHexLength(s.len()));
        }
        let mut raw = [0u8; STATE_LENGTH];
        for (i, (byte, digits)) in raw.iter_mut().zip(s.as_bytes().chunks(2)).enumerate() {
            let digits =
                std::str::from_utf8(digits).map_err(|_| Daikin468Error::InvalidDigit(i * 2))?;
            *byte = u8::from_str_radix(digits, 16)
                .map_err(|_| Daikin468Error::InvalidDigit(i * 2))?;
        }
        Ok(Daikin468 { raw })
    }
}

impl TryFrom<&[u8]> for Daikin468 {
    type Error = Daikin468Error;

    fn try_from(code: &[u8]) -> Result<Daikin468> {
        let raw = <[u8; STATE_LENGTH]>::try_from(code)
            .map_err(|_| Daikin468Error::InvalidLength(code.len()))?;
        Ok(Daikin468 { raw })
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use assert_matches::assert_matches;

    use super::*;

    const RESET_HEX: &str =
        "11DA27000100000000000000000000000000001311DA27000038380070000006600000C19000A9";

    struct Recorder {
        sent: Vec<(Vec<IrPulse>, u32)>,
    }

    impl Recorder {
        fn new() -> Recorder {
            Recorder { sent: Vec::new() }
        }
    }

    impl IrTransmitter for Recorder {
        type Error = Infallible;

        fn transmit(
            &mut self,
            sequence: &IrSequence,
            carrier_hz: u32,
        ) -> std::result::Result<(), Infallible> {
            self.sent.push((sequence.as_ref().to_vec(), carrier_hz));
            Ok(())
        }
    }

    #[test]
    fn reset_state_is_the_known_good_default() {
        let mut ac = Daikin468::new();
        assert!(!ac.power());
        assert_eq!(ac.mode(), Mode::Cool);
        assert_eq!(ac.temp(), 28);
        assert_eq!(ac.fan(), FanSpeed::F5);
        assert_eq!(ac.swing_vertical(), SwingMode::Off);
        assert_eq!(ac.swing_horizontal(), SwingMode::Off);
        let code = ac.raw();
        assert_eq!(code[19], 0x13);
        assert_eq!(code[38], 0xA9);
        assert_eq!(ac.to_hex(), RESET_HEX);
    }

    #[test]
    fn hex_rendering_is_stable() {
        let mut ac = Daikin468::new();
        ac.set_temp(19);
        assert_eq!(ac.to_hex(), ac.to_hex());
    }

    #[test]
    fn checksums_follow_field_changes() {
        let mut ac = Daikin468::new();
        ac.set_power(true);
        ac.set_mode(Mode::Heat);
        ac.set_temp(20);
        ac.set_fan(FanSpeed::Auto);
        let code = ac.raw();
        assert_eq!(code[25], 0x49);
        assert_eq!(code[26], 0x28);
        assert_eq!(code[28], 0xA0);
        assert_eq!(code[19], Daikin468::section_sum(&code[..19]));
        assert_eq!(code[38], Daikin468::section_sum(&code[20..38]));
        assert_eq!(code[38], 0xDA);
    }

    #[test]
    fn cool_mode_has_a_higher_temperature_floor() {
        let mut ac = Daikin468::new();
        ac.set_temp(5);
        assert_eq!(ac.temp(), 18);
        ac.set_mode(Mode::Heat);
        ac.set_temp(5);
        assert_eq!(ac.temp(), 10);
        ac.set_temp(99);
        assert_eq!(ac.temp(), 32);
        ac.set_mode(Mode::Cool);
        ac.set_temp(99);
        assert_eq!(ac.temp(), 32);
    }

    #[test]
    fn switching_to_cool_reclamps_the_temperature() {
        let mut ac = Daikin468::new();
        ac.set_mode(Mode::Heat);
        ac.set_temp(15);
        assert_eq!(ac.temp(), 15);
        ac.set_mode(Mode::Cool);
        assert_eq!(ac.temp(), 18);
    }

    #[test]
    fn undefined_codes_in_raw_state_read_as_auto() {
        let mut ac = Daikin468::new();
        let mut code = ac.raw();
        code[25] = (code[25] & !0x70) | (0b111 << 4);
        code[28] = (code[28] & 0x0F) | 0xF0;
        ac.set_raw(code);
        assert_eq!(ac.mode(), Mode::Auto);
        assert_eq!(ac.fan(), FanSpeed::Auto);
    }

    #[test]
    fn rejected_swing_codes_leave_the_field_alone() {
        let mut ac = Daikin468::new();
        ac.set_swing_vertical(SwingMode::On);
        let attempted = SwingMode::try_from(0x3);
        assert!(attempted.is_err());
        assert_eq!(ac.swing_vertical(), SwingMode::On);
        assert_eq!(ac.swing_horizontal(), SwingMode::Off);
    }

    #[test]
    fn setters_preserve_neighboring_constant_bits() {
        let mut ac = Daikin468::new();
        ac.set_power(true);
        ac.set_mode(Mode::Fan);
        assert_eq!(ac.raw()[25] & 0b0000_1110, 0b0000_1000);
        ac.set_power(false);
        assert_eq!(ac.raw()[25] & 0b0000_1110, 0b0000_1000);
    }

    #[test]
    fn temperature_writes_leave_the_half_degree_bit_alone() {
        let mut ac = Daikin468::new();
        let mut code = ac.raw();
        code[26] |= 0x01;
        ac.set_raw(code);
        ac.set_temp(25);
        assert_eq!(ac.temp(), 25);
        assert_eq!(ac.raw()[26] & 0x01, 0x01);
    }

    #[test]
    fn hex_round_trips() {
        let mut ac = Daikin468::new();
        ac.set_power(true);
        ac.set_temp(22);
        ac.set_fan(FanSpeed::Quiet);
        ac.set_swing_horizontal(SwingMode::On);
        let hex = ac.to_hex();
        assert_eq!(hex.len(), 78);
        let mut parsed: Daikin468 = hex.parse().unwrap();
        assert_eq!(parsed.raw(), ac.raw());
        assert_eq!(parsed, ac);
    }

    #[test]
    fn hex_parsing_is_case_insensitive_on_input() {
        let lower = RESET_HEX.to_lowercase();
        let mut parsed: Daikin468 = lower.parse().unwrap();
        assert_eq!(parsed.to_hex(), RESET_HEX);
    }

    #[test]
    fn hex_parsing_reports_bad_input() {
        assert_matches!(
            "11DA27".parse::<Daikin468>(),
            Err(Daikin468Error::InvalidHexLength(6))
        );
        let mangled = format!("G{}", &RESET_HEX[1..]);
        assert_matches!(
            mangled.parse::<Daikin468>(),
            Err(Daikin468Error::InvalidDigit(0))
        );
    }

    #[test]
    fn byte_slices_must_be_exactly_one_state_long() {
        let short = [0u8; 38];
        assert_matches!(
            Daikin468::try_from(&short[..]),
            Err(Daikin468Error::InvalidLength(38))
        );
        let mut ac = Daikin468::new();
        let code = ac.raw();
        let copy = Daikin468::try_from(&code[..]).unwrap();
        assert_eq!(copy, ac);
    }

    #[test]
    fn sequences_repeat_the_whole_message() {
        let mut ac = Daikin468::new();
        let single = ac.sequence(Daikin468::DEFAULT_REPEAT);
        assert_eq!(single.as_ref().len(), Arc468::SEQUENCE_LENGTH);
        let doubled = ac.sequence(1);
        assert_eq!(doubled.as_ref().len(), Arc468::SEQUENCE_LENGTH * 2);
        assert_eq!(&doubled.as_ref()[..Arc468::SEQUENCE_LENGTH], single.as_ref());
        assert_eq!(&doubled.as_ref()[Arc468::SEQUENCE_LENGTH..], single.as_ref());
    }

    #[test]
    fn send_refreshes_checksums_first() {
        let mut ac = Daikin468::new();
        // leaves a stale checksum byte behind until the next read
        ac.set_temp(21);
        let mut out = Recorder::new();
        ac.send(&mut out, 0).unwrap();
        assert_eq!(out.sent.len(), 1);
        let (pulses, carrier) = &out.sent[0];
        assert_eq!(*carrier, 36_700);
        let received = Daikin468::from_sequence(pulses).unwrap();
        assert_eq!(received.temp(), 21);
        assert_eq!(received, ac);
    }

    #[test]
    fn send_repeats_on_request() {
        let mut ac = Daikin468::new();
        let mut out = Recorder::new();
        ac.send(&mut out, 2).unwrap();
        assert_eq!(out.sent[0].0.len(), Arc468::SEQUENCE_LENGTH * 3);
    }

    #[test]
    fn from_sequence_round_trips() {
        let mut ac = Daikin468::new();
        ac.set_power(true);
        ac.set_mode(Mode::Dry);
        ac.set_fan(FanSpeed::F2);
        ac.set_swing_vertical(SwingMode::On);
        let sequence = ac.sequence(0);
        let received = Daikin468::from_sequence(&sequence).unwrap();
        assert_eq!(received, ac);
    }

    #[test]
    fn received_frames_must_have_valid_checksums() {
        let mut ac = Daikin468::new();
        let mut code = ac.raw();
        code[19] = code[19].wrapping_add(1);
        let sequence = Arc468::encode(&code[..]).unwrap();
        assert_matches!(
            Daikin468::from_sequence(&sequence),
            Err(Daikin468Error::Checksum)
        );
    }

    #[test]
    fn from_sequence_rejects_garbage() {
        assert_matches!(
            Daikin468::from_sequence(vec![IrPulse(100); 5]),
            Err(Daikin468Error::Decode(IrDecodeError::TooShort))
        );
    }
}
