//! Virtual HDMI-to-DVI converter
//!
//! Some boards route an HDMI output straight to a DVI connector. There is no
//! chip to bring up and nothing to switch, so this variant passes timings
//! through untouched and is always ready.

use crate::types::VideoTiming;

#[derive(Debug, Default)]
pub struct HdmiToDvi;

impl HdmiToDvi {
    pub fn new() -> Self {
        Self
    }

    /// DVI carries HDMI timings as they are
    pub fn fix_timings(_timing: &mut VideoTiming) {}
}
