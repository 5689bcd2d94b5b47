//! Register map over a [`RegisterBus`]
//!
//! Wraps a bus session with the two operations bring-up needs: a bulk read of
//! a register block and a masked read-modify-write. Every bus error is tagged
//! with the register that failed.

use super::RegisterBus;
use crate::error::{EncoderError, Result};

/// An open session on a register bus
///
/// The bus is owned for the lifetime of the map and released when the map is
/// dropped, whichever way the caller leaves.
pub struct RegisterMap<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> RegisterMap<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Read `N` consecutive registers starting at `register`
    pub fn bulk_read<const N: usize>(&mut self, register: u8) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.bus
            .read(register, &mut buf)
            .map_err(|e| tag(register, e))?;
        Ok(buf)
    }

    /// Read a single register
    pub fn read(&mut self, register: u8) -> Result<u8> {
        let [value] = self.bulk_read::<1>(register)?;
        Ok(value)
    }

    /// Write a single register
    pub fn write(&mut self, register: u8, value: u8) -> Result<()> {
        self.bus
            .write(register, &[value])
            .map_err(|e| tag(register, e))
    }

    /// Replace the bits selected by `mask` with those of `value`
    ///
    /// Bits outside `mask` keep their current contents. The write is skipped
    /// when the register already holds the wanted value. Returns the value
    /// the register holds afterwards.
    pub fn update_bits(&mut self, register: u8, mask: u8, value: u8) -> Result<u8> {
        let current = self.read(register)?;
        let updated = (current & !mask) | (value & mask);

        if updated != current {
            self.write(register, updated)?;
        }

        Ok(updated)
    }
}

/// Attach the failing register to a bus error
fn tag(register: u8, err: EncoderError) -> EncoderError {
    match err {
        EncoderError::Bus { .. } => err,
        other => EncoderError::Bus {
            register,
            message: other.to_string(),
        },
    }
}
