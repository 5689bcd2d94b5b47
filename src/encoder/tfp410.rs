//! TFP410 DPI-to-DVI encoder
//!
//! A discrete chip fed with parallel RGB. It samples data and syncs on the
//! rising pixel-clock edge with an active-high data enable, so those fields of
//! every requested mode are overridden before they reach the source. An
//! optional power-down line (active low) switches the chip on and off, and an
//! optional I2C control bus is used once to identify the chip and take it out
//! of power-down/test mode.

use crate::bringup::{self, ChipInfo, ChipSignature};
use crate::error::Result;
use crate::hal::{OutputPin, PinLevel, RegisterBus};
use crate::types::{SignalEdge, SignalLevel, VideoTiming};

pub const TFP410_VEN_ID_L: u8 = 0x00;
pub const TFP410_VEN_ID_H: u8 = 0x01;
pub const TFP410_DEV_ID_L: u8 = 0x02;
pub const TFP410_DEV_ID_H: u8 = 0x03;
pub const TFP410_REV_ID: u8 = 0x04;
pub const TFP410_CTL_1_MODE: u8 = 0x08;

/// Identification block and mode setup for normal operation
pub const TFP410_SIGNATURE: ChipSignature = ChipSignature {
    part: "tfp410",
    id_register: TFP410_VEN_ID_L,
    id: [0x4c, 0x01, 0x10, 0x04],
    revision_register: TFP410_REV_ID,
    mode_register: TFP410_CTL_1_MODE,
    mode_mask: 0x7f,
    mode_value: 0x37,
};

/// Parallel bus widths the chip can be strapped for
pub const SUPPORTED_DATA_LINES: [u8; 4] = [12, 16, 18, 24];

/// Chip-specific part of a TFP410 encoder node
pub struct Tfp410 {
    power_down: Option<Box<dyn OutputPin>>,
    data_lines: Option<u8>,
    chip: Option<ChipInfo>,
}

impl Tfp410 {
    /// Take ownership of the power-down line, if wired
    ///
    /// The line is driven low straight away so the chip stays powered down
    /// until the link is enabled.
    pub fn new(power_down: Option<Box<dyn OutputPin>>) -> Self {
        let mut power_down = power_down;
        if let Some(pin) = power_down.as_mut() {
            pin.set_level(PinLevel::Low);
        }

        Self {
            power_down,
            data_lines: None,
            chip: None,
        }
    }

    /// Number of parallel data lines to request from the source on enable
    pub fn with_data_lines(mut self, lines: u8) -> Self {
        self.data_lines = Some(lines);
        self
    }

    /// Identify and configure the chip over its control bus
    pub fn bring_up<B: RegisterBus>(&mut self, bus: B) -> Result<ChipInfo> {
        let info = bringup::bring_up(bus, &TFP410_SIGNATURE)?;
        self.chip = Some(info);
        Ok(info)
    }

    /// Chip identity, if bring-up has run
    pub fn chip(&self) -> Option<ChipInfo> {
        self.chip
    }

    pub fn data_lines(&self) -> Option<u8> {
        self.data_lines
    }

    pub fn has_power_control(&self) -> bool {
        self.power_down.is_some()
    }

    /// Force the edge and data-enable conventions the chip samples with
    pub fn fix_timings(timing: &mut VideoTiming) {
        timing.data_pclk_edge = SignalEdge::Rising;
        timing.sync_pclk_edge = SignalEdge::Rising;
        timing.de_level = SignalLevel::ActiveHigh;
    }

    pub(crate) fn power_on(&mut self) {
        if let Some(pin) = self.power_down.as_mut() {
            pin.set_level(PinLevel::High);
        }
    }

    pub(crate) fn power_off(&mut self) {
        if let Some(pin) = self.power_down.as_mut() {
            pin.set_level(PinLevel::Low);
        }
    }
}
