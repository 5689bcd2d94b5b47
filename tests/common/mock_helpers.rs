//! Mock construction helpers

use encoder_link::hal::mock::{EventLog, FakeRegisterBus, RecordingPin, RecordingSource, SourceFaults};
use encoder_link::link::shared_source;
use encoder_link::{DeviceId, Endpoint, EndpointRef, DisplayType, SharedSource};

pub const DPI_ID: DeviceId = DeviceId(1);
pub const ENCODER_ID: DeviceId = DeviceId(2);
pub const CONNECTOR_ID: DeviceId = DeviceId(3);

/// A register file that identifies as a TFP410
pub fn tfp410_bus() -> FakeRegisterBus {
    FakeRegisterBus::new()
        .with_registers(0x00, &[0x4c, 0x01, 0x10, 0x04])
        .with_registers(0x04, &[0x01])
}

/// A DVI connector endpoint
pub fn connector(id: DeviceId) -> EndpointRef {
    Endpoint::shared(id, format!("dvi-connector{}", id.0), DisplayType::Dvi)
}

/// Upstream source, pin and bus all recording into one log
pub struct Rig {
    pub log: EventLog,
    pub dpi: SharedSource,
    pub faults: SourceFaults,
    pub pin: RecordingPin,
    pub bus: FakeRegisterBus,
}

impl Rig {
    pub fn new() -> Self {
        let log = EventLog::new();
        let dpi = RecordingSource::new(DPI_ID, "dpi.0").with_log(log.clone());
        let faults = dpi.faults();
        Self {
            pin: RecordingPin::new("tfp410-pd").with_log(log.clone()),
            bus: tfp410_bus().with_log(log.clone()),
            dpi: shared_source(dpi),
            faults,
            log,
        }
    }
}
