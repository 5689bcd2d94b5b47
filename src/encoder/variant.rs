//! Enum dispatch over the supported encoder kinds.
//!
//! The kind is fixed when a node is built; every hook is a plain match so the
//! link state machine never needs a trait object for it.

use super::{HdmiToDvi, Tfp410};
use crate::types::{DisplayType, VideoTiming};
use serde::{Deserialize, Serialize};

/// Name of an encoder kind, as used in board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncoderKind {
    Tfp410,
    HdmiToDvi,
}

impl EncoderKind {
    /// Interface the encoder consumes
    pub fn input_type(self) -> DisplayType {
        match self {
            EncoderKind::Tfp410 => DisplayType::Dpi,
            EncoderKind::HdmiToDvi => DisplayType::Hdmi,
        }
    }

    /// Interface the encoder produces
    pub fn output_type(self) -> DisplayType {
        DisplayType::Dvi
    }
}

impl std::fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncoderKind::Tfp410 => write!(f, "tfp410"),
            EncoderKind::HdmiToDvi => write!(f, "hdmi-to-dvi"),
        }
    }
}

pub enum EncoderVariant {
    Tfp410(Tfp410),
    HdmiToDvi(HdmiToDvi),
}

impl EncoderVariant {
    pub fn kind(&self) -> EncoderKind {
        match self {
            EncoderVariant::Tfp410(_) => EncoderKind::Tfp410,
            EncoderVariant::HdmiToDvi(_) => EncoderKind::HdmiToDvi,
        }
    }

    /// Apply the fixed overrides this kind needs
    pub fn normalize(&self, timing: &VideoTiming) -> VideoTiming {
        let mut fixed = *timing;
        match self {
            EncoderVariant::Tfp410(_) => Tfp410::fix_timings(&mut fixed),
            EncoderVariant::HdmiToDvi(_) => HdmiToDvi::fix_timings(&mut fixed),
        }
        fixed
    }

    pub fn data_lines(&self) -> Option<u8> {
        match self {
            EncoderVariant::Tfp410(chip) => chip.data_lines(),
            EncoderVariant::HdmiToDvi(_) => None,
        }
    }

    pub fn power_on(&mut self) {
        match self {
            EncoderVariant::Tfp410(chip) => chip.power_on(),
            EncoderVariant::HdmiToDvi(_) => {}
        }
    }

    pub fn power_off(&mut self) {
        match self {
            EncoderVariant::Tfp410(chip) => chip.power_off(),
            EncoderVariant::HdmiToDvi(_) => {}
        }
    }
}

impl From<Tfp410> for EncoderVariant {
    fn from(chip: Tfp410) -> Self {
        EncoderVariant::Tfp410(chip)
    }
}

impl From<HdmiToDvi> for EncoderVariant {
    fn from(conv: HdmiToDvi) -> Self {
        EncoderVariant::HdmiToDvi(conv)
    }
}
