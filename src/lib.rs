//! # encoder-link: display encoder stages
//!
//! Models the encoder stage of a display pipeline: a device that takes video
//! from an upstream source (a DPI or HDMI output) and re-drives it to a
//! downstream consumer (usually a DVI connector). Two stages are provided, the
//! TI TFP410 DPI-to-DVI transmitter and a passive HDMI-to-DVI adapter.
//!
//! ## Architecture
//!
//! - **Link**: [`VideoSource`] is the upstream-facing contract every stage
//!   speaks; [`Endpoint`] carries the back-link a source writes on connect
//! - **Encoder**: [`EncoderNode`] runs the Disconnected/Connected/Enabled state
//!   machine and dispatches chip-specific hooks through [`EncoderVariant`]
//! - **Bring-up**: identifies a chip over its register bus and writes its
//!   initial configuration
//! - **HAL**: [`RegisterBus`] and [`OutputPin`] abstract the I2C bus and the
//!   power-down line
//! - **Probe**: builds stages from a [`BoardConfig`] and registers them in an
//!   [`OutputRegistry`]
//!
//! ## Example
//!
//! ```ignore
//! use encoder_link::{
//!     config::BoardConfig,
//!     probe::{probe_board, HardwareResources},
//!     registry::OutputRegistry,
//! };
//!
//! let board = BoardConfig::load("board.toml")?;
//! let mut registry = OutputRegistry::new();
//! registry.register_output("dpi.0", dpi)?;
//!
//! let encoders = probe_board(&board, &mut registry, |cfg| platform.resources_for(cfg))?;
//! ```
//!
//! [`VideoSource`]: link::VideoSource
//! [`Endpoint`]: link::Endpoint
//! [`EncoderNode`]: encoder::EncoderNode
//! [`EncoderVariant`]: encoder::EncoderVariant
//! [`RegisterBus`]: hal::RegisterBus
//! [`OutputPin`]: hal::OutputPin
//! [`BoardConfig`]: config::BoardConfig
//! [`OutputRegistry`]: registry::OutputRegistry

pub mod bringup;
pub mod config;
pub mod encoder;
pub mod error;
pub mod hal;
pub mod link;
pub mod probe;
pub mod registry;
pub mod types;

pub use config::{BoardConfig, EncoderConfig};
pub use encoder::{EncoderKind, EncoderNode, EncoderStatus, HdmiToDvi, Tfp410};
pub use error::{EncoderError, ErrorKind, Result, ResultExt};
pub use link::{DeviceId, Endpoint, EndpointRef, SharedSource, VideoSource};
pub use probe::{probe_board, probe_encoder, remove_encoder, HardwareResources, SharedEncoder};
pub use registry::OutputRegistry;
pub use types::{DisplayType, LinkState, SignalEdge, SignalLevel, VideoTiming};
