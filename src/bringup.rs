//! One-shot chip bring-up over a register bus
//!
//! Before a chip-backed encoder may carry a signal its chip must identify
//! itself and be switched into normal operation:
//!
//! 1. open a session on the register bus
//! 2. read the four-register identification block
//! 3. compare it byte for byte against the expected signature
//! 4. read-modify-write the mode register, touching only the masked bits
//!
//! The silicon revision is read for diagnostics only; a failed read is logged
//! and never gates bring-up. Any other bus error is fatal. The session is owned by [`bring_up`] and dropped
//! before it returns, on success and on every failure path.

use crate::error::{EncoderError, Result, ResultExt};
use crate::hal::{RegisterBus, RegisterMap};

/// What a chip must report and how to switch it on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipSignature {
    /// Human-readable part name, used in logs
    pub part: &'static str,
    /// First register of the identification block
    pub id_register: u8,
    /// Expected contents of the identification block
    pub id: [u8; 4],
    /// Register holding the silicon revision
    pub revision_register: u8,
    /// Register selecting the operating mode
    pub mode_register: u8,
    /// Bits of `mode_register` owned by bring-up
    pub mode_mask: u8,
    /// Value written into the masked bits
    pub mode_value: u8,
}

impl ChipSignature {
    /// Vendor id as reported in the identification block (little endian)
    pub fn vendor_id(&self) -> u16 {
        u16::from_le_bytes([self.id[0], self.id[1]])
    }

    /// Device id as reported in the identification block (little endian)
    pub fn device_id(&self) -> u16 {
        u16::from_le_bytes([self.id[2], self.id[3]])
    }
}

/// Identity of a chip that came up successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipInfo {
    pub vendor_id: u16,
    pub device_id: u16,
    /// Silicon revision, `None` if it could not be read
    pub revision: Option<u8>,
    /// Mode register contents after configuration
    pub mode: u8,
}

/// Identify and configure the chip behind `bus`
///
/// Consumes the bus; it is not retained past bring-up.
pub fn bring_up<B: RegisterBus>(bus: B, signature: &ChipSignature) -> Result<ChipInfo> {
    let mut map = RegisterMap::new(bus);

    let id: [u8; 4] = map
        .bulk_read::<4>(signature.id_register)
        .context("Failed to read device ID")
        .inspect_err(|e| tracing::error!("{}: {}", signature.part, e))?;

    if id != signature.id {
        let err = EncoderError::Identification {
            vendor_id: u16::from_le_bytes([id[0], id[1]]),
            device_id: u16::from_le_bytes([id[2], id[3]]),
        };
        tracing::error!("{}: {}", signature.part, err);
        return Err(err);
    }

    let revision = match map.read(signature.revision_register) {
        Ok(rev) => Some(rev),
        Err(e) => {
            tracing::warn!("{}: Failed to read revision: {}", signature.part, e);
            None
        }
    };

    let mode = map
        .update_bits(
            signature.mode_register,
            signature.mode_mask,
            signature.mode_value,
        )
        .with_context(|| format!("Failed to set mode register 0x{:02X}", signature.mode_register))
        .inspect_err(|e| tracing::error!("{}: {}", signature.part, e))?;

    let info = ChipInfo {
        vendor_id: signature.vendor_id(),
        device_id: signature.device_id(),
        revision,
        mode,
    };
    tracing::info!(
        "{} identified (VEN_ID=0x{:04x}, DEV_ID=0x{:04x}, REV={:?})",
        signature.part,
        info.vendor_id,
        info.device_id,
        info.revision
    );

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hal::MockRegisterBus;
    use mockall::Sequence;

    const TEST_CHIP: ChipSignature = ChipSignature {
        part: "test",
        id_register: 0x00,
        id: [0x4c, 0x01, 0x10, 0x04],
        revision_register: 0x04,
        mode_register: 0x08,
        mode_mask: 0x7f,
        mode_value: 0x37,
    };

    #[test]
    fn test_signature_ids() {
        assert_eq!(TEST_CHIP.vendor_id(), 0x014c);
        assert_eq!(TEST_CHIP.device_id(), 0x0410);
    }

    #[test]
    fn test_bring_up_sequence() {
        let mut seq = Sequence::new();
        let mut bus = MockRegisterBus::new();
        bus.expect_read()
            .withf(|reg, buf| *reg == 0x00 && buf.len() == 4)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, buf| {
                buf.copy_from_slice(&[0x4c, 0x01, 0x10, 0x04]);
                Ok(())
            });
        bus.expect_read()
            .withf(|reg, buf| *reg == 0x04 && buf.len() == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, buf| {
                buf[0] = 0x02;
                Ok(())
            });
        bus.expect_read()
            .withf(|reg, buf| *reg == 0x08 && buf.len() == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, buf| {
                buf[0] = 0x80;
                Ok(())
            });
        bus.expect_write()
            .withf(|reg, data| *reg == 0x08 && data.len() == 1 && data[0] == 0xB7)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let info = bring_up(bus, &TEST_CHIP).unwrap();
        assert_eq!(info.vendor_id, 0x014c);
        assert_eq!(info.device_id, 0x0410);
        assert_eq!(info.revision, Some(0x02));
        assert_eq!(info.mode, 0xB7);
    }

    #[test]
    fn test_revision_read_failure_is_not_fatal() {
        let mut bus = MockRegisterBus::new();
        bus.expect_read()
            .withf(|reg, buf| *reg == 0x00 && buf.len() == 4)
            .returning(|_, buf| {
                buf.copy_from_slice(&[0x4c, 0x01, 0x10, 0x04]);
                Ok(())
            });
        bus.expect_read()
            .withf(|reg, _| *reg == 0x04)
            .returning(|reg, _| {
                Err(EncoderError::Bus {
                    register: reg,
                    message: "no acknowledge".to_string(),
                })
            });
        bus.expect_read()
            .withf(|reg, _| *reg == 0x08)
            .returning(|_, buf| {
                buf[0] = 0x00;
                Ok(())
            });
        bus.expect_write()
            .withf(|reg, data| *reg == 0x08 && data.len() == 1 && data[0] == 0x37)
            .times(1)
            .returning(|_, _| Ok(()));

        let info = bring_up(bus, &TEST_CHIP).unwrap();
        assert_eq!(info.revision, None);
        assert_eq!(info.mode, 0x37);
    }

    #[test]
    fn test_signature_mismatch_stops_before_mode_write() {
        let mut bus = MockRegisterBus::new();
        bus.expect_read().times(1).returning(|_, buf| {
            buf.copy_from_slice(&[0x4c, 0x01, 0x11, 0x04]);
            Ok(())
        });
        bus.expect_write().never();

        let err = bring_up(bus, &TEST_CHIP).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Identification);
        assert!(matches!(
            err,
            EncoderError::Identification {
                vendor_id: 0x014c,
                device_id: 0x0411
            }
        ));
    }

    #[test]
    fn test_id_read_failure_is_fatal() {
        let mut bus = MockRegisterBus::new();
        bus.expect_read().times(1).returning(|reg, _| {
            Err(EncoderError::Bus {
                register: reg,
                message: "no acknowledge".to_string(),
            })
        });
        bus.expect_write().never();

        let err = bring_up(bus, &TEST_CHIP).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bus);
        assert!(err.to_string().contains("Failed to read device ID"));
    }
}
