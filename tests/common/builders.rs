//! Test data builders for creating test objects

use encoder_link::{SignalEdge, SignalLevel, VideoTiming};

/// Builder for creating test timings
pub struct TimingBuilder {
    timing: VideoTiming,
}

impl TimingBuilder {
    pub fn new(x_res: u16, y_res: u16) -> Self {
        Self {
            timing: VideoTiming::new(x_res, y_res, 65_000),
        }
    }

    pub fn pixel_clock(mut self, khz: u32) -> Self {
        self.timing.pixel_clock_khz = khz;
        self
    }

    /// Polarities a TFP410 has to override
    pub fn falling_edges(mut self) -> Self {
        self.timing.data_pclk_edge = SignalEdge::Falling;
        self.timing.sync_pclk_edge = SignalEdge::Falling;
        self.timing.de_level = SignalLevel::ActiveLow;
        self
    }

    pub fn build(self) -> VideoTiming {
        self.timing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_builder() {
        let t = TimingBuilder::new(800, 600)
            .pixel_clock(40_000)
            .falling_edges()
            .build();

        assert_eq!(t.x_res, 800);
        assert_eq!(t.pixel_clock_khz, 40_000);
        assert_eq!(t.de_level, SignalLevel::ActiveLow);
    }
}
