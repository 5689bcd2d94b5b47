//! Hardware access used by chip-backed encoders
//!
//! Encoders with a discrete chip talk to it through two collaborators:
//!
//! - [`RegisterBus`] - byte-addressed register access (typically I2C), only
//!   used during bring-up
//! - [`OutputPin`] - a discrete output line, used for the power-down control
//!
//! [`RegisterMap`] layers bulk reads and read-modify-write updates on top of a
//! bus. The [`mock`] module (feature `mock-hardware`) provides recording fakes.

#[cfg(feature = "mock-hardware")]
pub mod mock;
pub mod regmap;

use crate::error::Result;

pub use regmap::RegisterMap;

/// Logic level of an output pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinLevel {
    Low,
    High,
}

impl From<bool> for PinLevel {
    fn from(high: bool) -> Self {
        if high {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

/// Register-mapped control bus with 8-bit register addresses
#[cfg_attr(test, mockall::automock)]
pub trait RegisterBus: Send {
    /// Read `buf.len()` consecutive registers starting at `register`
    fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<()>;

    /// Write `data` to consecutive registers starting at `register`
    fn write(&mut self, register: u8, data: &[u8]) -> Result<()>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for Box<B> {
    fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<()> {
        (**self).read(register, buf)
    }

    fn write(&mut self, register: u8, data: &[u8]) -> Result<()> {
        (**self).write(register, data)
    }
}

/// A discrete output line
#[cfg_attr(test, mockall::automock)]
pub trait OutputPin: Send {
    fn set_level(&mut self, level: PinLevel);
}

impl<P: OutputPin + ?Sized> OutputPin for Box<P> {
    fn set_level(&mut self, level: PinLevel) {
        (**self).set_level(level)
    }
}
