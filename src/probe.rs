//! Probe and removal of encoder stages
//!
//! Turns an [`EncoderConfig`] plus the hardware handles the platform supplies
//! into a live [`EncoderNode`], registered as an output so the next stage can
//! find it. Removal reverses that: the output disappears from the registry and
//! the node's link is torn down.

use crate::config::{BoardConfig, EncoderConfig};
use crate::encoder::{EncoderKind, EncoderNode, Tfp410};
use crate::error::{EncoderError, Result, ResultExt};
use crate::hal::{OutputPin, RegisterBus};
use crate::link::SharedSource;
use crate::registry::OutputRegistry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle to a probed encoder, shared with the registry
pub type SharedEncoder = Arc<Mutex<EncoderNode>>;

/// Hardware the platform hands to an encoder at probe time
#[derive(Default)]
pub struct HardwareResources {
    pub power_down: Option<Box<dyn OutputPin>>,
    pub bus: Option<Box<dyn RegisterBus>>,
}

impl HardwareResources {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_power_down(mut self, pin: impl OutputPin + 'static) -> Self {
        self.power_down = Some(Box::new(pin));
        self
    }

    pub fn with_bus(mut self, bus: impl RegisterBus + 'static) -> Self {
        self.bus = Some(Box::new(bus));
        self
    }

    fn check_against(&self, config: &EncoderConfig) -> Result<()> {
        let pin_wanted = config.power_down_pin.is_some();
        let bus_wanted = config.i2c_address.is_some();

        if pin_wanted != self.power_down.is_some() {
            return Err(EncoderError::Config(format!(
                "{}: power-down pin {} but {} supplied",
                config.name,
                if pin_wanted { "configured" } else { "not configured" },
                if self.power_down.is_some() { "one was" } else { "none was" },
            )));
        }
        if bus_wanted != self.bus.is_some() {
            return Err(EncoderError::Config(format!(
                "{}: control bus {} but {} supplied",
                config.name,
                if bus_wanted { "configured" } else { "not configured" },
                if self.bus.is_some() { "one was" } else { "none was" },
            )));
        }
        Ok(())
    }
}

/// Lock an encoder, recovering the guard if a previous holder panicked
pub fn lock_encoder(encoder: &SharedEncoder) -> MutexGuard<'_, EncoderNode> {
    encoder.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build one encoder and register it as an output
///
/// Nothing is registered unless every step succeeds. If bring-up fails the
/// pin and bus handles are released and the upstream reference is dropped.
pub fn probe_encoder(
    config: &EncoderConfig,
    registry: &mut OutputRegistry,
    resources: HardwareResources,
) -> Result<SharedEncoder> {
    config.validate()?;
    resources.check_against(config)?;

    if registry.contains(&config.name) {
        return Err(EncoderError::Registry(format!(
            "output '{}' is already registered",
            config.name
        )));
    }

    let upstream = registry
        .find_output(&config.source)
        .with_context(|| format!("Failed to find video source for {}", config.name))?;

    let id = registry.allocate_id();
    let node = match config.kind {
        EncoderKind::Tfp410 => {
            let mut chip = Tfp410::new(resources.power_down);
            if let Some(lines) = config.data_lines {
                chip = chip.with_data_lines(lines);
            }
            EncoderNode::tfp410(id, config.name.clone(), upstream, chip, resources.bus)?
        }
        EncoderKind::HdmiToDvi => EncoderNode::hdmi_to_dvi(id, config.name.clone(), upstream),
    };

    let encoder: SharedEncoder = Arc::new(Mutex::new(node));
    let output: SharedSource = encoder.clone();
    if let Err(e) = registry.register_output(config.name.clone(), output) {
        tracing::error!("{}: failed to register output: {}", config.name, e);
        return Err(e);
    }

    tracing::info!(
        "Probed {} ({} <- {}, {})",
        config.name,
        config.kind,
        config.source,
        id
    );
    Ok(encoder)
}

/// Unregister an encoder and tear its link down
pub fn remove_encoder(registry: &mut OutputRegistry, encoder: &SharedEncoder) {
    let mut node = lock_encoder(encoder);
    let name = node.name().to_string();

    if registry.unregister_output(&name).is_none() {
        tracing::warn!("{}: removed encoder was not registered", name);
    }

    node.shutdown();
    tracing::info!("Removed {}", name);
}

/// Probe every encoder on a board, in file order
///
/// `resources` supplies the hardware for each entry. On the first failure the
/// encoders probed so far are removed again in reverse order.
pub fn probe_board<F>(
    board: &BoardConfig,
    registry: &mut OutputRegistry,
    mut resources: F,
) -> Result<Vec<SharedEncoder>>
where
    F: FnMut(&EncoderConfig) -> HardwareResources,
{
    board.validate()?;

    let mut probed = Vec::with_capacity(board.encoders.len());
    for config in &board.encoders {
        match probe_encoder(config, registry, resources(config)) {
            Ok(encoder) => probed.push(encoder),
            Err(e) => {
                tracing::error!("Board probe failed at {}: {}", config.name, e);
                for encoder in probed.iter().rev() {
                    remove_encoder(registry, encoder);
                }
                return Err(e.with_context(format!("Failed to probe {}", config.name)));
            }
        }
    }

    Ok(probed)
}
