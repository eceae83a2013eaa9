use std::convert::TryFrom;
use std::str::FromStr;

use strum_macros::EnumIter;
use thiserror::Error;

/// Number of bytes in one full remote message.
pub const STATE_LENGTH: usize = 39;

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, EnumIter)]
pub enum Mode {
    Auto = 0b000,
    Dry = 0b010,
    Cool = 0b011,
    Fan = 0b110,
    Heat = 0b100,
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> Self {
        mode as u8
    }
}

impl From<u8> for Mode {
    fn from(code: u8) -> Self {
        match code {
            0b010 => Mode::Dry,
            0b011 => Mode::Cool,
            0b110 => Mode::Fan,
            0b100 => Mode::Heat,
            // the handset treats every other code as auto
            _ => Mode::Auto,
        }
    }
}

#[derive(Error, Debug)]
#[error("Invalid operating mode")]
pub struct InvalidMode;

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Mode::Auto),
            "dry" => Ok(Mode::Dry),
            "cool" => Ok(Mode::Cool),
            "fan" => Ok(Mode::Fan),
            "heat" => Ok(Mode::Heat),
            _ => Err(InvalidMode),
        }
    }
}

/// Fan speed nibble. Speeds one through five sit at codes 3 through 7.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, EnumIter)]
pub enum FanSpeed {
    F1 = 0x3,
    F2 = 0x4,
    F3 = 0x5,
    F4 = 0x6,
    F5 = 0x7,
    Auto = 0xA,
    Quiet = 0xB,
}

impl From<FanSpeed> for u8 {
    fn from(speed: FanSpeed) -> Self {
        speed as u8
    }
}

impl From<u8> for FanSpeed {
    fn from(code: u8) -> Self {
        match code {
            0x3 => FanSpeed::F1,
            0x4 => FanSpeed::F2,
            0x5 => FanSpeed::F3,
            0x6 => FanSpeed::F4,
            0x7 => FanSpeed::F5,
            0xB => FanSpeed::Quiet,
            _ => FanSpeed::Auto,
        }
    }
}

#[derive(Error, Debug)]
#[error("Invalid fan speed")]
pub struct InvalidFanSpeed;

impl FromStr for FanSpeed {
    type Err = InvalidFanSpeed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "min" => Ok(FanSpeed::F1),
            "2" => Ok(FanSpeed::F2),
            "3" => Ok(FanSpeed::F3),
            "4" => Ok(FanSpeed::F4),
            "5" | "max" => Ok(FanSpeed::F5),
            "auto" => Ok(FanSpeed::Auto),
            "quiet" => Ok(FanSpeed::Quiet),
            _ => Err(InvalidFanSpeed),
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, EnumIter)]
pub enum SwingMode {
    Off = 0x0,
    On = 0xF,
}

impl From<SwingMode> for u8 {
    fn from(position: SwingMode) -> Self {
        position as u8
    }
}

#[derive(Error, Debug)]
#[error("Invalid swing position")]
pub struct InvalidSwingMode;

impl TryFrom<u8> for SwingMode {
    type Error = InvalidSwingMode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0x0 => Ok(SwingMode::Off),
            0xF => Ok(SwingMode::On),
            _ => Err(InvalidSwingMode),
        }
    }
}

impl FromStr for SwingMode {
    type Err = InvalidSwingMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" => Ok(SwingMode::On),
            "off" => Ok(SwingMode::Off),
            _ => Err(InvalidSwingMode),
        }
    }
}
