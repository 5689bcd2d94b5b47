//! Identity type for devices in a display pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle distinguishing one pipeline device from another.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u32);

impl DeviceId {
    pub const INVALID: DeviceId = DeviceId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    /// `None` for [`DeviceId::INVALID`].
    #[inline]
    pub fn valid(self) -> Option<DeviceId> {
        self.is_valid().then_some(self)
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "DeviceId(INVALID)")
        } else {
            write!(f, "DeviceId({})", self.0)
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
