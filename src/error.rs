//! Error handling for the encoder link
//!
//! This module defines the closed set of failures an encoder stage can report
//! and a Result alias for use throughout the crate.

use crate::link::DeviceId;
use thiserror::Error;

/// Broad classification of an [`EncoderError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The pipeline owner called an operation out of order
    ContractViolation,
    /// A forwarded call was refused by the upstream device
    Upstream,
    /// Register bus I/O failed
    Bus,
    /// The chip did not identify as the expected part
    Identification,
    /// Configuration, registry or file problems while assembling the pipeline
    Setup,
}

/// Main error type for encoder link operations
#[derive(Error, Debug)]
pub enum EncoderError {
    /// `connect` called on a node that already has a downstream
    #[error("Encoder is already connected")]
    AlreadyConnected,

    /// The downstream endpoint is already attached to another source
    #[error("Downstream {downstream} is busy (attached to {source_id})")]
    Busy {
        downstream: DeviceId,
        source_id: DeviceId,
    },

    /// Operation requires a connected link
    #[error("Encoder is not connected")]
    NotConnected,

    /// `disconnect` called while the link is still enabled
    #[error("Encoder is still enabled")]
    StillEnabled,

    /// `disconnect` called with a device that is not the current downstream
    #[error("Downstream mismatch: expected {expected:?}, got {actual}")]
    DownstreamMismatch {
        expected: Option<DeviceId>,
        actual: DeviceId,
    },

    /// `enable` called on a node whose chip never came up
    #[error("Encoder hardware is not ready")]
    HardwareNotReady,

    /// Failure reported by an upstream source device
    #[error("Source {device} failed: {message}")]
    Source { device: String, message: String },

    /// Upstream cannot produce the requested timings
    #[error("Timings rejected: {0}")]
    TimingRejected(String),

    /// Register bus I/O errors
    #[error("Bus error at register 0x{register:02X}: {message}")]
    Bus { register: u8, message: String },

    /// The chip's identification block did not match
    #[error("Unrecognised device (VEN_ID=0x{vendor_id:04x}, DEV_ID=0x{device_id:04x})")]
    Identification { vendor_id: u16, device_id: u16 },

    /// Errors related to configuration loading/validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to output registration and lookup
    #[error("Registry error: {0}")]
    Registry(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EncoderError>,
    },
}

impl EncoderError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EncoderError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Classify this error, looking through any added context
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncoderError::AlreadyConnected
            | EncoderError::Busy { .. }
            | EncoderError::NotConnected
            | EncoderError::StillEnabled
            | EncoderError::DownstreamMismatch { .. }
            | EncoderError::HardwareNotReady => ErrorKind::ContractViolation,
            EncoderError::Source { .. } | EncoderError::TimingRejected(_) => ErrorKind::Upstream,
            EncoderError::Bus { .. } => ErrorKind::Bus,
            EncoderError::Identification { .. } => ErrorKind::Identification,
            EncoderError::Config(_)
            | EncoderError::Registry(_)
            | EncoderError::Io(_)
            | EncoderError::Serialization(_) => ErrorKind::Setup,
            EncoderError::WithContext { source, .. } => source.kind(),
        }
    }

    /// True if the caller violated the link ordering contract
    pub fn is_contract_violation(&self) -> bool {
        self.kind() == ErrorKind::ContractViolation
    }
}

impl From<toml::de::Error> for EncoderError {
    fn from(err: toml::de::Error) -> Self {
        EncoderError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for EncoderError {
    fn from(err: serde_json::Error) -> Self {
        EncoderError::Serialization(err.to_string())
    }
}

/// Result type alias for encoder link operations
pub type Result<T> = std::result::Result<T, EncoderError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EncoderError::Source {
            device: "dpi.0".to_string(),
            message: "pixel clock out of range".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Source dpi.0 failed: pixel clock out of range"
        );
    }

    #[test]
    fn test_identification_error_display() {
        let err = EncoderError::Identification {
            vendor_id: 0x014c,
            device_id: 0x0411,
        };
        assert!(err.to_string().contains("VEN_ID=0x014c"));
        assert!(err.to_string().contains("DEV_ID=0x0411"));
    }

    #[test]
    fn test_error_with_context_keeps_kind() {
        let err = EncoderError::Bus {
            register: 0x08,
            message: "nak".to_string(),
        }
        .with_context("Failed to set CTL_1_MODE");
        assert!(err.to_string().contains("Failed to set CTL_1_MODE"));
        assert!(err.to_string().contains("0x08"));
        assert_eq!(err.kind(), ErrorKind::Bus);
    }

    #[test]
    fn test_contract_violations() {
        assert!(EncoderError::AlreadyConnected.is_contract_violation());
        assert!(EncoderError::StillEnabled.is_contract_violation());
        assert!(EncoderError::DownstreamMismatch {
            expected: Some(DeviceId(1)),
            actual: DeviceId(2),
        }
        .is_contract_violation());
        assert!(!EncoderError::TimingRejected("x".into()).is_contract_violation());
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(EncoderError::NotConnected);
        let err = result.context("enable dvi0").unwrap_err();
        assert_eq!(err.to_string(), "enable dvi0: Encoder is not connected");
    }
}
