//! Per-encoder configuration

use crate::encoder::{EncoderKind, SUPPORTED_DATA_LINES};
use crate::error::{EncoderError, Result};
use serde::{Deserialize, Serialize};

/// Highest 7-bit I2C address
pub const MAX_I2C_ADDRESS: u8 = 0x7f;

/// Description of one encoder stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncoderConfig {
    /// Name the encoder registers its output under
    pub name: String,

    /// Name of the output feeding this encoder
    pub source: String,

    pub kind: EncoderKind,

    /// Label of the power-down line, if wired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_down_pin: Option<String>,

    /// Address of the chip's control bus, if wired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i2c_address: Option<u8>,

    /// Parallel data lines to request from a DPI source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_lines: Option<u8>,
}

impl EncoderConfig {
    pub fn new(name: impl Into<String>, source: impl Into<String>, kind: EncoderKind) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            kind,
            power_down_pin: None,
            i2c_address: None,
            data_lines: None,
        }
    }

    pub fn with_power_down_pin(mut self, label: impl Into<String>) -> Self {
        self.power_down_pin = Some(label.into());
        self
    }

    pub fn with_i2c_address(mut self, address: u8) -> Self {
        self.i2c_address = Some(address);
        self
    }

    pub fn with_data_lines(mut self, lines: u8) -> Self {
        self.data_lines = Some(lines);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(EncoderError::Config(format!("{}: {}", self.name, msg)));

        if self.name.trim().is_empty() {
            return Err(EncoderError::Config("encoder name is empty".to_string()));
        }
        if self.source.trim().is_empty() {
            return invalid("source is empty".to_string());
        }
        if self.source == self.name {
            return invalid("encoder cannot be its own source".to_string());
        }

        match self.kind {
            EncoderKind::Tfp410 => {
                if let Some(lines) = self.data_lines {
                    if !SUPPORTED_DATA_LINES.contains(&lines) {
                        return invalid(format!(
                            "unsupported data line count {} (expected one of {:?})",
                            lines, SUPPORTED_DATA_LINES
                        ));
                    }
                }
                if let Some(addr) = self.i2c_address {
                    if addr > MAX_I2C_ADDRESS {
                        return invalid(format!("i2c address 0x{:02x} is not 7-bit", addr));
                    }
                }
            }
            EncoderKind::HdmiToDvi => {
                if self.power_down_pin.is_some()
                    || self.i2c_address.is_some()
                    || self.data_lines.is_some()
                {
                    return invalid("hdmi-to-dvi has no pins, bus or data lines".to_string());
                }
            }
        }

        Ok(())
    }
}
