//! Encoder stages
//!
//! An encoder sits between an upstream video source and a downstream
//! consumer, converting one interface into another. Two kinds exist:
//!
//! - [`Tfp410`] - DPI-to-DVI chip with optional power-down pin and I2C bus
//! - [`HdmiToDvi`] - passive HDMI-to-DVI routing with no hardware of its own
//!
//! Both are driven through [`EncoderNode`], which owns the link state machine
//! and dispatches the few kind-specific hooks through [`EncoderVariant`].
//!
//! # Example
//!
//! ```ignore
//! use encoder_link::encoder::{EncoderNode, Tfp410};
//!
//! let chip = Tfp410::new(Some(Box::new(pd_pin))).with_data_lines(24);
//! let mut dvi = EncoderNode::tfp410(DeviceId(2), "dvi0", dpi, chip, Some(Box::new(i2c)))?;
//!
//! dvi.connect(&connector)?;
//! dvi.set_timings(&VideoTiming::xga60());
//! dvi.enable()?;
//! ```

pub mod hdmi_to_dvi;
pub mod node;
pub mod tfp410;
pub mod variant;

pub use hdmi_to_dvi::HdmiToDvi;
pub use node::{EncoderNode, EncoderStatus, OUTPUT_PORT};
pub use tfp410::{Tfp410, SUPPORTED_DATA_LINES, TFP410_SIGNATURE};
pub use variant::{EncoderKind, EncoderVariant};
