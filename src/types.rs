//! Core types for the encoder link
//!
//! This module contains the value types shared by every stage of a display
//! pipeline: the video timing descriptor, signal conventions, link states and
//! display interface types.

use serde::{Deserialize, Serialize};

/// Which clock edge a signal is driven on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalEdge {
    /// Let the source pick its default
    #[default]
    Unspecified,
    /// Driven on the rising edge of the pixel clock
    Rising,
    /// Driven on the falling edge of the pixel clock
    Falling,
}

/// Active level of a control signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalLevel {
    #[default]
    Undefined,
    ActiveHigh,
    ActiveLow,
}

/// Description of one video mode
///
/// Horizontal values are in pixels, vertical values in lines. A default
/// descriptor is all zeroes and is what `get_timings` reports before any
/// timings have been set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VideoTiming {
    /// Active width
    pub x_res: u16,
    /// Active height
    pub y_res: u16,
    /// Pixel clock in kHz
    pub pixel_clock_khz: u32,

    /// Horizontal sync pulse width
    pub hsw: u16,
    /// Horizontal front porch
    pub hfp: u16,
    /// Horizontal back porch
    pub hbp: u16,
    /// Vertical sync pulse width
    pub vsw: u16,
    /// Vertical front porch
    pub vfp: u16,
    /// Vertical back porch
    pub vbp: u16,

    pub vsync_level: SignalLevel,
    pub hsync_level: SignalLevel,
    pub interlace: bool,

    /// Edge the pixel data is driven on
    pub data_pclk_edge: SignalEdge,
    /// Data-enable polarity
    pub de_level: SignalLevel,
    /// Edge the sync signals are driven on
    pub sync_pclk_edge: SignalEdge,
}

impl VideoTiming {
    /// Create a progressive mode with the given geometry and no porches
    pub fn new(x_res: u16, y_res: u16, pixel_clock_khz: u32) -> Self {
        Self {
            x_res,
            y_res,
            pixel_clock_khz,
            ..Default::default()
        }
    }

    /// Set horizontal sync width and porches
    pub fn with_horizontal(mut self, hsw: u16, hfp: u16, hbp: u16) -> Self {
        self.hsw = hsw;
        self.hfp = hfp;
        self.hbp = hbp;
        self
    }

    /// Set vertical sync width and porches
    pub fn with_vertical(mut self, vsw: u16, vfp: u16, vbp: u16) -> Self {
        self.vsw = vsw;
        self.vfp = vfp;
        self.vbp = vbp;
        self
    }

    /// Set sync polarities
    pub fn with_sync_levels(mut self, hsync: SignalLevel, vsync: SignalLevel) -> Self {
        self.hsync_level = hsync;
        self.vsync_level = vsync;
        self
    }

    /// Total line length including blanking
    pub fn h_total(&self) -> u32 {
        self.x_res as u32 + self.hsw as u32 + self.hfp as u32 + self.hbp as u32
    }

    /// Total frame height including blanking
    pub fn v_total(&self) -> u32 {
        self.y_res as u32 + self.vsw as u32 + self.vfp as u32 + self.vbp as u32
    }

    /// Refresh rate in Hz, or 0.0 for an empty descriptor
    pub fn refresh_hz(&self) -> f64 {
        let total = self.h_total() as f64 * self.v_total() as f64;
        if total == 0.0 {
            0.0
        } else {
            self.pixel_clock_khz as f64 * 1000.0 / total
        }
    }

    /// CEA-861 1920x1080@60
    pub fn hd1080p60() -> Self {
        Self::new(1920, 1080, 148_500)
            .with_horizontal(44, 88, 148)
            .with_vertical(5, 4, 36)
            .with_sync_levels(SignalLevel::ActiveHigh, SignalLevel::ActiveHigh)
    }

    /// VESA 1024x768@60
    pub fn xga60() -> Self {
        Self::new(1024, 768, 65_000)
            .with_horizontal(136, 24, 160)
            .with_vertical(6, 3, 29)
            .with_sync_levels(SignalLevel::ActiveLow, SignalLevel::ActiveLow)
    }
}

impl std::fmt::Display for VideoTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}{} @ {} kHz",
            self.x_res,
            self.y_res,
            if self.interlace { "i" } else { "p" },
            self.pixel_clock_khz
        )
    }
}

/// State of one stage's link
///
/// The only legal transitions are one step along
/// `Disconnected <-> Connected <-> Enabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    #[default]
    Disconnected,
    Connected,
    Enabled,
}

impl LinkState {
    pub fn is_connected(self) -> bool {
        self != LinkState::Disconnected
    }

    pub fn is_enabled(self) -> bool {
        self == LinkState::Enabled
    }
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkState::Disconnected => write!(f, "Disconnected"),
            LinkState::Connected => write!(f, "Connected"),
            LinkState::Enabled => write!(f, "Enabled"),
        }
    }
}

/// Electrical/protocol interface on either side of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayType {
    /// Parallel RGB
    Dpi,
    Hdmi,
    Dvi,
}

impl std::fmt::Display for DisplayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayType::Dpi => write!(f, "DPI"),
            DisplayType::Hdmi => write!(f, "HDMI"),
            DisplayType::Dvi => write!(f, "DVI"),
        }
    }
}
