//! Connection endpoints and the source back-link.
//!
//! Every device in a pipeline owns one [`Endpoint`]. When a source connects a
//! consumer it records the consumer's endpoint as its downstream and writes
//! its own id into the consumer's `source` slot. Neither side owns the other;
//! both are held by whoever assembled the pipeline.

use super::DeviceId;
use crate::types::DisplayType;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Shared handle to an endpoint.
pub type EndpointRef = Arc<Endpoint>;

/// The consumer-facing side of a pipeline device.
#[derive(Debug)]
pub struct Endpoint {
    id: DeviceId,
    name: String,
    display_type: DisplayType,
    /// Id of the attached source, `DeviceId::INVALID` when detached.
    source: AtomicU32,
}

impl Endpoint {
    pub fn new(id: DeviceId, name: impl Into<String>, display_type: DisplayType) -> Self {
        Self {
            id,
            name: name.into(),
            display_type,
            source: AtomicU32::new(DeviceId::INVALID.0),
        }
    }

    /// Create an endpoint already wrapped for sharing
    pub fn shared(id: DeviceId, name: impl Into<String>, display_type: DisplayType) -> EndpointRef {
        Arc::new(Self::new(id, name, display_type))
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_type(&self) -> DisplayType {
        self.display_type
    }

    /// The source currently driving this endpoint
    pub fn source(&self) -> Option<DeviceId> {
        DeviceId(self.source.load(Ordering::Acquire)).valid()
    }

    pub fn set_source(&self, source: Option<DeviceId>) {
        let raw = source.unwrap_or(DeviceId::INVALID).0;
        self.source.store(raw, Ordering::Release);
    }

    pub fn is_attached(&self) -> bool {
        self.source().is_some()
    }
}
