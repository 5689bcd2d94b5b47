//! Output registry
//!
//! Holds every device that can act as a video source, keyed by name. Encoder
//! stages look their upstream up here and register themselves once built, so
//! later stages (or the display driver) can find them in turn. The registry
//! also hands out device ids.

use crate::error::{EncoderError, Result};
use crate::link::{DeviceId, SharedSource};
use std::collections::BTreeMap;

#[derive(Default)]
pub struct OutputRegistry {
    outputs: BTreeMap<String, SharedSource>,
    next_id: u32,
}

impl OutputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh device id
    pub fn allocate_id(&mut self) -> DeviceId {
        let id = DeviceId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Make `output` available under `name`
    pub fn register_output(&mut self, name: impl Into<String>, output: SharedSource) -> Result<()> {
        let name = name.into();
        if self.outputs.contains_key(&name) {
            return Err(EncoderError::Registry(format!(
                "output '{}' is already registered",
                name
            )));
        }

        tracing::debug!("Registered output {}", name);
        self.outputs.insert(name, output);
        Ok(())
    }

    /// Remove `name`, handing back the registry's reference
    pub fn unregister_output(&mut self, name: &str) -> Option<SharedSource> {
        let removed = self.outputs.remove(name);
        if removed.is_some() {
            tracing::debug!("Unregistered output {}", name);
        }
        removed
    }

    /// Look up a source by name
    ///
    /// The returned handle keeps the source alive for as long as the caller
    /// holds it.
    pub fn find_output(&self, name: &str) -> Result<SharedSource> {
        self.outputs
            .get(name)
            .cloned()
            .ok_or_else(|| EncoderError::Registry(format!("video source '{}' not found", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
