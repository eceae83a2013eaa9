//! Infrared control of a Daikin air conditioner over its ARC468A3
//! remote protocol.
//!
//! [`daikin468::Daikin468`] holds the remote's 39-byte message and exposes
//! the fields a handset can change. [`output::IrOut`] emits the encoded
//! pulse train on a gpio pin.
//!
//! ```no_run
//! use daikin_arc468::daikin468::types::Mode;
//! use daikin_arc468::daikin468::Daikin468;
//! use daikin_arc468::output::IrOut;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ac = Daikin468::new();
//! ac.set_power(true);
//! ac.set_mode(Mode::Cool);
//! ac.set_temp(24);
//!
//! let mut out = IrOut::default_pin()?;
//! ac.send(&mut out, 0)?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub mod daikin468;
pub mod format;
pub mod output;
pub mod types;
