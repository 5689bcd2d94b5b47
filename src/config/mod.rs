//! Configuration module for encoder-link
//!
//! A board description lists the encoder stages present on a board, in the
//! order they should be probed. It stands in for platform data or a device
//! tree: which kind of encoder, what it is fed by, and which optional control
//! lines are wired.
//!
//! # File Format
//!
//! Board files are TOML with one `[[encoder]]` table per stage:
//!
//! ```toml
//! [[encoder]]
//! name = "dvi0"
//! source = "dpi.0"
//! kind = "tfp410"
//! power_down_pin = "gpio2_7"
//! i2c_address = 0x38
//! data_lines = 24
//!
//! [[encoder]]
//! name = "dvi1"
//! source = "hdmi"
//! kind = "hdmi-to-dvi"
//! ```
//!
//! # Example
//!
//! ```ignore
//! use encoder_link::config::BoardConfig;
//!
//! let board = BoardConfig::load("board.toml")?;
//! for encoder in &board.encoders {
//!     println!("{} <- {}", encoder.name, encoder.source);
//! }
//! ```

pub mod encoder;

pub use encoder::EncoderConfig;

use crate::error::{EncoderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Board file extension
pub const BOARD_FILE_EXTENSION: &str = "toml";

/// Every encoder stage on a board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    #[serde(rename = "encoder", default)]
    pub encoders: Vec<EncoderConfig>,
}

impl BoardConfig {
    /// Parse and validate a board description
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let board: BoardConfig = toml::from_str(content)?;
        board.validate()?;
        Ok(board)
    }

    /// Load a board file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EncoderError::Config(format!("Failed to read board file {:?}: {}", path, e))
        })?;

        Self::from_toml_str(&content)
            .map_err(|e| e.with_context(format!("Failed to parse board file {:?}", path)))
    }

    /// Save the board description as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EncoderError::Config(format!("Failed to create board directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| EncoderError::Serialization(format!("Failed to serialize board: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            EncoderError::Config(format!("Failed to write board file {:?}: {}", path, e))
        })
    }

    /// Check every encoder and that names are unique
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for encoder in &self.encoders {
            encoder.validate()?;
            if !seen.insert(encoder.name.as_str()) {
                return Err(EncoderError::Config(format!(
                    "duplicate encoder name '{}'",
                    encoder.name
                )));
            }
        }
        Ok(())
    }

    /// Look up an encoder by name
    pub fn encoder(&self, name: &str) -> Option<&EncoderConfig> {
        self.encoders.iter().find(|e| e.name == name)
    }
}
