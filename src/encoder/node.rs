//! Link state machine for one encoder stage.
//!
//! Every transition follows the same shape: validate against local state,
//! forward to the upstream source, and only commit local state once the
//! upstream has accepted the call. The node never believes something the
//! upstream does not.

use super::{EncoderKind, EncoderVariant, HdmiToDvi, Tfp410};
use crate::bringup::ChipInfo;
use crate::error::{EncoderError, Result};
use crate::hal::RegisterBus;
use crate::link::{lock_source, DeviceId, Endpoint, EndpointRef, SharedSource, VideoSource};
use crate::types::{DisplayType, LinkState, VideoTiming};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Output port encoders expose to their consumer
pub const OUTPUT_PORT: u32 = 1;

/// Point-in-time view of a node, for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderStatus {
    pub id: DeviceId,
    pub name: String,
    pub kind: EncoderKind,
    pub input_type: DisplayType,
    pub output_type: DisplayType,
    pub port: u32,
    pub state: LinkState,
    pub hardware_ready: bool,
    pub source: Option<DeviceId>,
    pub downstream: Option<DeviceId>,
    pub timing: Option<VideoTiming>,
}

impl EncoderStatus {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One encoder stage between an upstream source and a downstream consumer
pub struct EncoderNode {
    /// Our identity; its `source` slot is written by the upstream
    endpoint: EndpointRef,
    state: LinkState,
    upstream: SharedSource,
    downstream: Option<EndpointRef>,
    timing: Option<VideoTiming>,
    hardware_ready: bool,
    variant: EncoderVariant,
}

impl fmt::Debug for EncoderNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderNode")
            .field("endpoint", &self.endpoint)
            .field("kind", &self.variant.kind())
            .field("state", &self.state)
            .field("downstream", &self.downstream)
            .field("timing", &self.timing)
            .field("hardware_ready", &self.hardware_ready)
            .finish_non_exhaustive()
    }
}

impl EncoderNode {
    pub(crate) fn from_parts(
        id: DeviceId,
        name: impl Into<String>,
        upstream: SharedSource,
        variant: EncoderVariant,
        hardware_ready: bool,
    ) -> Self {
        let endpoint = Endpoint::shared(id, name, variant.kind().input_type());
        Self {
            endpoint,
            state: LinkState::Disconnected,
            upstream,
            downstream: None,
            timing: None,
            hardware_ready,
            variant,
        }
    }

    /// Build a virtual HDMI-to-DVI stage; there is no hardware to bring up
    pub fn hdmi_to_dvi(id: DeviceId, name: impl Into<String>, upstream: SharedSource) -> Self {
        Self::from_parts(id, name, upstream, HdmiToDvi::new().into(), true)
    }

    /// Build a TFP410 stage
    ///
    /// When a control bus is supplied the chip is identified and configured
    /// first; any failure there means the node is never built. Without a bus
    /// the chip is assumed to be strapped for normal operation.
    pub fn tfp410(
        id: DeviceId,
        name: impl Into<String>,
        upstream: SharedSource,
        mut chip: Tfp410,
        bus: Option<Box<dyn RegisterBus>>,
    ) -> Result<Self> {
        let name = name.into();
        if let Some(bus) = bus {
            if let Err(e) = chip.bring_up(bus) {
                tracing::error!("{}: bring-up failed: {}", name, e);
                return Err(e);
            }
        }
        Ok(Self::from_parts(id, name, upstream, chip.into(), true))
    }

    pub fn id(&self) -> DeviceId {
        self.endpoint.id()
    }

    pub fn name(&self) -> &str {
        self.endpoint.name()
    }

    /// The endpoint our upstream attaches to
    pub fn endpoint(&self) -> &EndpointRef {
        &self.endpoint
    }

    pub fn kind(&self) -> EncoderKind {
        self.variant.kind()
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_hardware_ready(&self) -> bool {
        self.hardware_ready
    }

    /// Id of the consumer we currently drive
    pub fn downstream(&self) -> Option<DeviceId> {
        self.downstream.as_ref().map(|d| d.id())
    }

    /// Id of the upstream device, as recorded by the upstream on connect
    pub fn source(&self) -> Option<DeviceId> {
        self.endpoint.source()
    }

    /// Identity of the chip, for variants that ran bring-up
    pub fn chip_info(&self) -> Option<ChipInfo> {
        match &self.variant {
            EncoderVariant::Tfp410(chip) => chip.chip(),
            EncoderVariant::HdmiToDvi(_) => None,
        }
    }

    pub fn status(&self) -> EncoderStatus {
        let kind = self.kind();
        EncoderStatus {
            id: self.id(),
            name: self.name().to_string(),
            kind,
            input_type: kind.input_type(),
            output_type: kind.output_type(),
            port: OUTPUT_PORT,
            state: self.state,
            hardware_ready: self.hardware_ready,
            source: self.source(),
            downstream: self.downstream(),
            timing: self.timing,
        }
    }

    /// True if `endpoint` is the very endpoint we drive, not just one with the same id
    fn is_downstream(&self, endpoint: &EndpointRef) -> bool {
        self.downstream
            .as_ref()
            .is_some_and(|d| Arc::ptr_eq(d, endpoint))
    }

    /// Attach `downstream` as our consumer
    pub fn connect(&mut self, downstream: &EndpointRef) -> Result<()> {
        if self.state.is_connected() || self.downstream.is_some() {
            tracing::warn!("{}: connect while already connected", self.name());
            return Err(EncoderError::AlreadyConnected);
        }

        if let Some(other) = downstream.source() {
            tracing::warn!(
                "{}: {} is already driven by {}",
                self.name(),
                downstream.name(),
                other
            );
            return Err(EncoderError::Busy {
                downstream: downstream.id(),
                source_id: other,
            });
        }

        tracing::debug!("{}: forwarding connect upstream", self.name());
        lock_source(&self.upstream).connect(&self.endpoint)?;

        downstream.set_source(Some(self.id()));
        self.downstream = Some(downstream.clone());
        self.state = LinkState::Connected;

        tracing::info!("{}: connected to {}", self.name(), downstream.name());
        Ok(())
    }

    /// Detach `downstream`, which must be our current consumer
    pub fn disconnect(&mut self, downstream: &EndpointRef) -> Result<()> {
        match self.state {
            LinkState::Disconnected => {
                tracing::warn!("{}: disconnect while not connected", self.name());
                return Err(EncoderError::NotConnected);
            }
            LinkState::Enabled => {
                tracing::warn!("{}: disconnect while still enabled", self.name());
                return Err(EncoderError::StillEnabled);
            }
            LinkState::Connected => {}
        }

        if !self.is_downstream(downstream) {
            let expected = self.downstream();
            tracing::warn!(
                "{}: disconnect from {} ({}) but connected to {:?}",
                self.name(),
                downstream.name(),
                downstream.id(),
                expected
            );
            return Err(EncoderError::DownstreamMismatch {
                expected,
                actual: downstream.id(),
            });
        }

        tracing::debug!("{}: forwarding disconnect upstream", self.name());
        lock_source(&self.upstream).disconnect(&self.endpoint)?;

        downstream.set_source(None);
        self.downstream = None;
        self.state = LinkState::Disconnected;

        tracing::info!("{}: disconnected from {}", self.name(), downstream.name());
        Ok(())
    }

    /// Start the link
    ///
    /// The cached timings are pushed upstream again first, since they may
    /// have been set before the upstream was connected. The chip is powered
    /// only after the upstream accepted the enable.
    pub fn enable(&mut self) -> Result<()> {
        match self.state {
            LinkState::Enabled => return Ok(()),
            LinkState::Disconnected => return Err(EncoderError::NotConnected),
            LinkState::Connected => {}
        }

        if !self.hardware_ready {
            return Err(EncoderError::HardwareNotReady);
        }

        let timing = self.get_timings();
        if self.timing.is_none() {
            tracing::warn!("{}: enabling without timings", self.name());
        }

        {
            let mut upstream = lock_source(&self.upstream);
            upstream.set_timings(&timing);
            if let Some(lines) = self.variant.data_lines() {
                upstream.set_data_lines(lines);
            }
            upstream.enable()?;
        }

        self.variant.power_on();
        self.state = LinkState::Enabled;

        tracing::info!("{}: enabled ({})", self.name(), timing);
        Ok(())
    }

    /// Stop the link; a no-op unless enabled
    ///
    /// The chip is powered down before the upstream stops driving it.
    pub fn disable(&mut self) {
        if self.state != LinkState::Enabled {
            return;
        }

        self.variant.power_off();
        lock_source(&self.upstream).disable();
        self.state = LinkState::Connected;

        tracing::info!("{}: disabled", self.name());
    }

    /// Store and forward a new mode, with this kind's overrides applied
    pub fn set_timings(&mut self, timing: &VideoTiming) {
        let fixed = self.variant.normalize(timing);
        self.timing = Some(fixed);

        tracing::debug!("{}: set timings {}", self.name(), fixed);
        lock_source(&self.upstream).set_timings(&fixed);
    }

    /// Last mode accepted by `set_timings`, all zero if none yet
    pub fn get_timings(&self) -> VideoTiming {
        self.timing.unwrap_or_default()
    }

    /// Ask the upstream whether the normalized form of `timing` is possible
    pub fn check_timings(&self, timing: &VideoTiming) -> Result<()> {
        let fixed = self.variant.normalize(timing);
        lock_source(&self.upstream).check_timings(&fixed)
    }

    /// Forward a data-line count to our own upstream
    pub fn set_data_lines(&mut self, lines: u8) {
        lock_source(&self.upstream).set_data_lines(lines);
    }

    /// Bring the link down in reverse order
    ///
    /// Safe to call repeatedly. Anything still active at this point is a
    /// caller bug and is logged as such.
    pub fn shutdown(&mut self) {
        if self.state.is_enabled() {
            tracing::warn!("{}: still enabled at teardown", self.name());
            self.disable();
        }

        if self.state.is_connected() {
            tracing::warn!("{}: still connected at teardown", self.name());
            if let Some(dst) = self.downstream.clone() {
                if let Err(e) = self.disconnect(&dst) {
                    tracing::error!("{}: forced disconnect failed: {}", self.name(), e);
                    self.detach_downstream();
                }
            }
        }
    }

    /// Drop our side of the link without the upstream's consent
    ///
    /// Only used at teardown, where nobody is left to retry. The consumer's
    /// back-link is cleared only if it still names us.
    fn detach_downstream(&mut self) {
        if let Some(dst) = self.downstream.take() {
            if dst.source() == Some(self.id()) {
                dst.set_source(None);
            }
        }
        self.state = LinkState::Disconnected;
    }
}

impl Drop for EncoderNode {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Encoder nodes are sources for whatever sits downstream of them
impl VideoSource for EncoderNode {
    fn id(&self) -> DeviceId {
        EncoderNode::id(self)
    }

    fn name(&self) -> &str {
        EncoderNode::name(self)
    }

    fn state(&self) -> LinkState {
        EncoderNode::state(self)
    }

    fn connect(&mut self, consumer: &EndpointRef) -> Result<()> {
        EncoderNode::connect(self, consumer)
    }

    fn disconnect(&mut self, consumer: &EndpointRef) -> Result<()> {
        EncoderNode::disconnect(self, consumer)
    }

    fn enable(&mut self) -> Result<()> {
        EncoderNode::enable(self)
    }

    fn disable(&mut self) {
        EncoderNode::disable(self)
    }

    fn set_timings(&mut self, timing: &VideoTiming) {
        EncoderNode::set_timings(self, timing)
    }

    fn get_timings(&self) -> VideoTiming {
        EncoderNode::get_timings(self)
    }

    fn check_timings(&self, timing: &VideoTiming) -> Result<()> {
        EncoderNode::check_timings(self, timing)
    }

    fn set_data_lines(&mut self, lines: u8) {
        EncoderNode::set_data_lines(self, lines)
    }
}
