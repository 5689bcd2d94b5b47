//! VideoSource trait for the upstream capability interface
//!
//! This module provides the contract every device feeding a pipeline stage
//! implements. Encoder nodes consume it from their upstream and also
//! implement it themselves, so stages can be chained arbitrarily deep.

use super::{DeviceId, EndpointRef};
use crate::error::Result;
use crate::types::{LinkState, VideoTiming};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Unified interface for video sources
///
/// All calls are synchronous. Implementations must be `Send` so a pipeline
/// can be handed to whichever thread owns it, but a single device is never
/// driven from two threads at once.
///
/// # Example
///
/// ```ignore
/// fn bring_up_link(src: &mut dyn VideoSource, sink: &EndpointRef, t: &VideoTiming) -> Result<()> {
///     src.connect(sink)?;
///     src.set_timings(t);
///     src.enable()
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait VideoSource: Send {
    /// Identity of this device
    fn id(&self) -> DeviceId;

    /// Human-readable device name
    fn name(&self) -> &str;

    /// Current link state
    fn state(&self) -> LinkState;

    /// Attach `consumer` as this source's downstream
    ///
    /// On success the consumer's back-link points at this source.
    fn connect(&mut self, consumer: &EndpointRef) -> Result<()>;

    /// Detach `consumer`, which must be the current downstream
    fn disconnect(&mut self, consumer: &EndpointRef) -> Result<()>;

    /// Start driving the video signal
    fn enable(&mut self) -> Result<()>;

    /// Stop driving the video signal; a no-op when not enabled
    fn disable(&mut self);

    /// Apply a new video mode
    fn set_timings(&mut self, timing: &VideoTiming);

    /// Last applied video mode
    fn get_timings(&self) -> VideoTiming;

    /// Ask whether `timing` can be produced, without applying it
    fn check_timings(&self, timing: &VideoTiming) -> Result<()>;

    /// Configure the number of parallel data lines
    ///
    /// Only meaningful for parallel (DPI) sources; others ignore it.
    fn set_data_lines(&mut self, _lines: u8) {}
}

/// A source shared between the registry and the stages it feeds.
pub type SharedSource = Arc<Mutex<dyn VideoSource>>;

/// Wrap a device for sharing
pub fn shared_source<S: VideoSource + 'static>(source: S) -> SharedSource {
    Arc::new(Mutex::new(source))
}

/// Lock a shared source for one forwarded call
///
/// A poisoned lock only means another caller panicked mid-call; the device
/// state itself is still the best information available.
pub fn lock_source(source: &SharedSource) -> MutexGuard<'_, dyn VideoSource + 'static> {
    source.lock().unwrap_or_else(PoisonError::into_inner)
}
