//! Recording fakes for testing without real hardware
//!
//! This module provides stand-ins for every collaborator an encoder talks to.
//! All of them can share one [`EventLog`], so the relative order of pin
//! changes, bus accesses and forwarded source calls can be asserted.
//!
//! - [`RecordingSource`] - an upstream video source (e.g. a DPI or HDMI output)
//! - [`FakeRegisterBus`] - a 256-register file with optional fault injection
//! - [`RecordingPin`] - an output pin that remembers its level
//!
//! # Example
//!
//! ```ignore
//! use encoder_link::hal::mock::{EventLog, RecordingPin, RecordingSource};
//!
//! let log = EventLog::new();
//! let source = RecordingSource::new(DeviceId(1), "dpi.0").with_log(log.clone());
//! let pin = RecordingPin::new("tfp410 PD").with_log(log.clone());
//! // ... drive an encoder ...
//! assert!(log.position(|e| matches!(e, HwEvent::Enable { .. })).is_some());
//! ```
//!
//! # Enabling
//!
//! The fakes are behind the `mock-hardware` feature. It is off for normal
//! builds; the crate enables it for its own tests through a dev-dependency on
//! itself.

use super::{OutputPin, PinLevel, RegisterBus};
use crate::error::{EncoderError, Result};
use crate::link::{DeviceId, EndpointRef, VideoSource};
use crate::types::{LinkState, VideoTiming};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One observable hardware interaction
#[derive(Debug, Clone, PartialEq)]
pub enum HwEvent {
    Connect { source: String, consumer: DeviceId },
    Disconnect { source: String, consumer: DeviceId },
    SetTimings { source: String, timing: VideoTiming },
    SetDataLines { source: String, lines: u8 },
    CheckTimings { source: String, timing: VideoTiming },
    Enable { source: String },
    Disable { source: String },
    Pin { pin: String, level: PinLevel },
    BusRead { register: u8, len: usize },
    BusWrite { register: u8, data: Vec<u8> },
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared, ordered record of hardware events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<HwEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: HwEvent) {
        lock(&self.events).push(event);
    }

    /// Snapshot of every event so far
    pub fn events(&self) -> Vec<HwEvent> {
        lock(&self.events).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.events).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.events).clear();
    }

    /// Index of the first event matching `pred`
    pub fn position(&self, pred: impl Fn(&HwEvent) -> bool) -> Option<usize> {
        lock(&self.events).iter().position(pred)
    }
}

// ==================== Video Source ====================

/// Switches for making a [`RecordingSource`] refuse calls
///
/// Cloned handles stay linked to the source, so faults can be flipped after
/// the source has been moved into a pipeline.
#[derive(Debug, Clone, Default)]
pub struct SourceFaults {
    connect: Arc<AtomicBool>,
    disconnect: Arc<AtomicBool>,
    enable: Arc<AtomicBool>,
}

impl SourceFaults {
    pub fn fail_connect(&self, fail: bool) {
        self.connect.store(fail, Ordering::SeqCst);
    }

    pub fn fail_disconnect(&self, fail: bool) {
        self.disconnect.store(fail, Ordering::SeqCst);
    }

    pub fn fail_enable(&self, fail: bool) {
        self.enable.store(fail, Ordering::SeqCst);
    }
}

/// A terminal video source that records every call it receives
pub struct RecordingSource {
    id: DeviceId,
    name: String,
    state: LinkState,
    dst: Option<EndpointRef>,
    timing: VideoTiming,
    data_lines: Option<u8>,
    max_pixel_clock_khz: u32,
    faults: SourceFaults,
    log: EventLog,
}

impl RecordingSource {
    pub fn new(id: DeviceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            state: LinkState::Disconnected,
            dst: None,
            timing: VideoTiming::default(),
            data_lines: None,
            max_pixel_clock_khz: 165_000,
            faults: SourceFaults::default(),
            log: EventLog::new(),
        }
    }

    /// Record into a shared log
    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    /// Reject timings above this pixel clock in `check_timings`
    pub fn with_max_pixel_clock(mut self, khz: u32) -> Self {
        self.max_pixel_clock_khz = khz;
        self
    }

    /// Handle for injecting failures later
    pub fn faults(&self) -> SourceFaults {
        self.faults.clone()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn data_lines(&self) -> Option<u8> {
        self.data_lines
    }

    fn refused(&self, what: &str) -> EncoderError {
        EncoderError::Source {
            device: self.name.clone(),
            message: format!("{} refused", what),
        }
    }
}

impl VideoSource for RecordingSource {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> LinkState {
        self.state
    }

    fn connect(&mut self, consumer: &EndpointRef) -> Result<()> {
        if self.dst.is_some() {
            return Err(EncoderError::AlreadyConnected);
        }
        if self.faults.connect.load(Ordering::SeqCst) {
            return Err(self.refused("connect"));
        }

        self.log.push(HwEvent::Connect {
            source: self.name.clone(),
            consumer: consumer.id(),
        });
        consumer.set_source(Some(self.id));
        self.dst = Some(consumer.clone());
        self.state = LinkState::Connected;
        Ok(())
    }

    fn disconnect(&mut self, consumer: &EndpointRef) -> Result<()> {
        if !self.dst.as_ref().is_some_and(|d| Arc::ptr_eq(d, consumer)) {
            return Err(EncoderError::DownstreamMismatch {
                expected: self.dst.as_ref().map(|d| d.id()),
                actual: consumer.id(),
            });
        }
        if self.faults.disconnect.load(Ordering::SeqCst) {
            return Err(self.refused("disconnect"));
        }

        self.log.push(HwEvent::Disconnect {
            source: self.name.clone(),
            consumer: consumer.id(),
        });
        consumer.set_source(None);
        self.dst = None;
        self.state = LinkState::Disconnected;
        Ok(())
    }

    fn enable(&mut self) -> Result<()> {
        if self.dst.is_none() {
            return Err(EncoderError::NotConnected);
        }
        if self.faults.enable.load(Ordering::SeqCst) {
            return Err(self.refused("enable"));
        }

        self.log.push(HwEvent::Enable {
            source: self.name.clone(),
        });
        self.state = LinkState::Enabled;
        Ok(())
    }

    fn disable(&mut self) {
        self.log.push(HwEvent::Disable {
            source: self.name.clone(),
        });
        if self.state == LinkState::Enabled {
            self.state = LinkState::Connected;
        }
    }

    fn set_timings(&mut self, timing: &VideoTiming) {
        self.log.push(HwEvent::SetTimings {
            source: self.name.clone(),
            timing: *timing,
        });
        self.timing = *timing;
    }

    fn get_timings(&self) -> VideoTiming {
        self.timing
    }

    fn check_timings(&self, timing: &VideoTiming) -> Result<()> {
        self.log.push(HwEvent::CheckTimings {
            source: self.name.clone(),
            timing: *timing,
        });
        if timing.pixel_clock_khz > self.max_pixel_clock_khz {
            return Err(EncoderError::TimingRejected(format!(
                "pixel clock {} kHz exceeds {} kHz",
                timing.pixel_clock_khz, self.max_pixel_clock_khz
            )));
        }
        Ok(())
    }

    fn set_data_lines(&mut self, lines: u8) {
        self.log.push(HwEvent::SetDataLines {
            source: self.name.clone(),
            lines,
        });
        self.data_lines = Some(lines);
    }
}

// ==================== Register Bus ====================

#[derive(Debug)]
struct BusState {
    registers: [u8; 256],
    fail_register: Option<u8>,
}

/// In-memory register file standing in for an I2C device
///
/// Clones share the same registers, so a test can keep one handle while the
/// other is consumed by bring-up.
#[derive(Debug, Clone)]
pub struct FakeRegisterBus {
    state: Arc<Mutex<BusState>>,
    log: Option<EventLog>,
}

impl FakeRegisterBus {
    /// All registers zero
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BusState {
                registers: [0; 256],
                fail_register: None,
            })),
            log: None,
        }
    }

    /// Preload registers starting at `register`
    ///
    /// Values past the last register are dropped.
    pub fn with_registers(self, register: u8, values: &[u8]) -> Self {
        {
            let mut state = lock(&self.state);
            let start = register as usize;
            let len = values.len().min(state.registers.len() - start);
            state.registers[start..start + len].copy_from_slice(&values[..len]);
        }
        self
    }

    /// Any access touching `register` fails
    pub fn with_failure_at(self, register: u8) -> Self {
        lock(&self.state).fail_register = Some(register);
        self
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Current contents of `register`
    pub fn register(&self, register: u8) -> u8 {
        lock(&self.state).registers[register as usize]
    }

    /// Number of live handles to this register file
    pub fn handles(&self) -> usize {
        Arc::strong_count(&self.state)
    }

    fn check(&self, state: &BusState, register: u8, len: usize) -> Result<()> {
        let end = register as usize + len;
        if end > state.registers.len() {
            return Err(EncoderError::Bus {
                register,
                message: format!("access of {} bytes runs past the register file", len),
            });
        }
        if let Some(bad) = state.fail_register {
            if (register as usize..end).contains(&(bad as usize)) {
                return Err(EncoderError::Bus {
                    register: bad,
                    message: "no acknowledge".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for FakeRegisterBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for FakeRegisterBus {
    fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<()> {
        let state = lock(&self.state);
        self.check(&state, register, buf.len())?;
        let start = register as usize;
        buf.copy_from_slice(&state.registers[start..start + buf.len()]);
        if let Some(log) = &self.log {
            log.push(HwEvent::BusRead {
                register,
                len: buf.len(),
            });
        }
        Ok(())
    }

    fn write(&mut self, register: u8, data: &[u8]) -> Result<()> {
        let mut state = lock(&self.state);
        self.check(&state, register, data.len())?;
        let start = register as usize;
        state.registers[start..start + data.len()].copy_from_slice(data);
        if let Some(log) = &self.log {
            log.push(HwEvent::BusWrite {
                register,
                data: data.to_vec(),
            });
        }
        Ok(())
    }
}

// ==================== Output Pin ====================

/// Output pin that remembers the last level driven
#[derive(Debug, Clone)]
pub struct RecordingPin {
    name: String,
    level: Arc<Mutex<Option<PinLevel>>>,
    log: Option<EventLog>,
}

impl RecordingPin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Arc::new(Mutex::new(None)),
            log: None,
        }
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Last level driven, `None` if never driven
    pub fn level(&self) -> Option<PinLevel> {
        *lock(&self.level)
    }
}

impl OutputPin for RecordingPin {
    fn set_level(&mut self, level: PinLevel) {
        *lock(&self.level) = Some(level);
        if let Some(log) = &self.log {
            log.push(HwEvent::Pin {
                pin: self.name.clone(),
                level,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Endpoint;
    use crate::types::DisplayType;

    #[test]
    fn test_recording_source_back_link() {
        let mut src = RecordingSource::new(DeviceId(1), "dpi.0");
        let ep = Endpoint::shared(DeviceId(2), "enc", DisplayType::Dpi);

        src.connect(&ep).unwrap();
        assert_eq!(ep.source(), Some(DeviceId(1)));
        assert!(matches!(
            src.connect(&ep),
            Err(EncoderError::AlreadyConnected)
        ));

        src.disconnect(&ep).unwrap();
        assert_eq!(ep.source(), None);
        assert_eq!(src.state(), LinkState::Disconnected);
    }

    #[test]
    fn test_recording_source_disconnect_checks_identity() {
        let mut src = RecordingSource::new(DeviceId(1), "dpi.0");
        let ep = Endpoint::shared(DeviceId(2), "enc", DisplayType::Dpi);
        let twin = Endpoint::shared(DeviceId(2), "other", DisplayType::Dpi);
        src.connect(&ep).unwrap();

        assert!(matches!(
            src.disconnect(&twin),
            Err(EncoderError::DownstreamMismatch { .. })
        ));
        assert_eq!(ep.source(), Some(DeviceId(1)));
        assert_eq!(src.state(), LinkState::Connected);
    }

    #[test]
    fn test_recording_source_faults() {
        let mut src = RecordingSource::new(DeviceId(1), "dpi.0");
        let faults = src.faults();
        let ep = Endpoint::shared(DeviceId(2), "enc", DisplayType::Dpi);

        faults.fail_connect(true);
        assert!(src.connect(&ep).is_err());
        assert_eq!(ep.source(), None);

        faults.fail_connect(false);
        src.connect(&ep).unwrap();
        faults.fail_enable(true);
        assert!(src.enable().is_err());
        assert_eq!(src.state(), LinkState::Connected);
    }

    #[test]
    fn test_fake_bus_shared_registers() {
        let bus = FakeRegisterBus::new().with_registers(0x00, &[0x4c, 0x01]);
        let mut session = bus.clone();
        assert_eq!(bus.handles(), 2);

        let mut buf = [0u8; 2];
        session.read(0x00, &mut buf).unwrap();
        assert_eq!(buf, [0x4c, 0x01]);

        session.write(0x08, &[0x37]).unwrap();
        drop(session);
        assert_eq!(bus.register(0x08), 0x37);
        assert_eq!(bus.handles(), 1);
    }

    #[test]
    fn test_fake_bus_preload_at_end_of_file() {
        let bus = FakeRegisterBus::new().with_registers(0xfe, &[0x11, 0x22, 0x33, 0x44]);
        assert_eq!(bus.register(0xfe), 0x11);
        assert_eq!(bus.register(0xff), 0x22);
    }

    #[test]
    fn test_fake_bus_failure_injection() {
        let mut bus = FakeRegisterBus::new().with_failure_at(0x02);
        let mut buf = [0u8; 4];
        assert!(matches!(
            bus.read(0x00, &mut buf),
            Err(EncoderError::Bus { register: 0x02, .. })
        ));
        assert!(bus.read(0x04, &mut buf).is_ok());
    }

    #[test]
    fn test_pin_records_level() {
        let log = EventLog::new();
        let mut pin = RecordingPin::new("pd").with_log(log.clone());
        assert_eq!(pin.level(), None);

        pin.set_level(PinLevel::High);
        assert_eq!(pin.level(), Some(PinLevel::High));
        assert_eq!(
            log.events(),
            vec![HwEvent::Pin {
                pin: "pd".to_string(),
                level: PinLevel::High
            }]
        );
    }
}
