//! Seams to the embedding application.
//!
//! The HUD never draws, reads memory or touches frame pacing itself; it goes
//! through these traits. Headless implementations are provided for tools and
//! tests.

use afps_common::{LabelAnchor, TextAlignment};
use serde::{Deserialize, Serialize};

/// Presentation settings for one anchored label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    /// Font name, `None` for the host default
    pub font: Option<String>,
    /// Font size, 0 for the font's own size
    pub font_size: u32,
    /// Line spacing multiplier
    pub line_spacing: f32,
    /// Pixel offset, already normalized for the anchor
    pub pixel_offset: (f32, f32),
    /// Normalized viewport position
    pub position: (f32, f32),
    /// Text alignment
    pub alignment: TextAlignment,
}

/// Draws label text. One label per anchor.
pub trait TextSurface {
    /// Creates or updates the label at `anchor` with markup `text`.
    fn show(&mut self, anchor: LabelAnchor, text: &str, style: &LabelStyle);

    /// Applies a changed style to an existing label.
    fn restyle(&mut self, anchor: LabelAnchor, style: &LabelStyle);

    /// Removes the label at `anchor`.
    fn hide(&mut self, anchor: LabelAnchor);
}

/// Memory readings, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoryReading {
    /// Memory reserved by the process
    pub total_reserved: u64,
    /// Memory currently allocated
    pub total_allocated: u64,
    /// Memory held by the managed heap / GC
    pub managed: u64,
}

/// Source of memory readings.
pub trait MemoryProbe {
    /// Takes a reading.
    fn read(&self) -> MemoryReading;
}

/// Probe that always reads zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMemoryProbe;

impl MemoryProbe for NullMemoryProbe {
    fn read(&self) -> MemoryReading {
        MemoryReading::default()
    }
}

/// Static hardware description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// CPU model name
    pub cpu_model: String,
    /// Logical core count
    pub cpu_cores: u32,
    /// GPU model name
    pub gpu_model: String,
    /// Graphics API and version
    pub gpu_api: String,
    /// Supported shader model, if known
    pub gpu_shader_model: Option<u32>,
    /// Video memory in MiB, if known
    pub vram_mb: Option<u32>,
    /// System memory in MiB
    pub ram_mb: u32,
    /// Screen width in pixels
    pub screen_width: u32,
    /// Screen height in pixels
    pub screen_height: u32,
    /// Screen DPI, if known
    pub screen_dpi: Option<f32>,
}

/// Source of device information.
pub trait DeviceProbe {
    /// Reads the device description.
    fn device_info(&self) -> DeviceInfo;
}

/// Probe returning a fixed description.
#[derive(Debug, Clone, Default)]
pub struct StaticDeviceProbe(pub DeviceInfo);

impl DeviceProbe for StaticDeviceProbe {
    fn device_info(&self) -> DeviceInfo {
        self.0.clone()
    }
}

/// Host frame pacing controls touched by the forced frame rate option.
pub trait FrameRateControl {
    /// Current vsync count (0 = off).
    fn vsync_count(&self) -> i32;
    /// Sets the vsync count.
    fn set_vsync_count(&mut self, count: i32);
    /// Current target frame rate (-1 = unlimited).
    fn target_frame_rate(&self) -> i32;
    /// Sets the target frame rate.
    fn set_target_frame_rate(&mut self, rate: i32);
}

/// Surface that keeps the last shown text per anchor in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    labels: [Option<String>; LabelAnchor::COUNT],
    styles: [Option<LabelStyle>; LabelAnchor::COUNT],
    show_calls: usize,
}

impl RecordingSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently displayed at `anchor`.
    #[must_use]
    pub fn text(&self, anchor: LabelAnchor) -> Option<&str> {
        self.labels[anchor.index()].as_deref()
    }

    /// Style currently applied at `anchor`.
    #[must_use]
    pub fn style(&self, anchor: LabelAnchor) -> Option<&LabelStyle> {
        self.styles[anchor.index()].as_ref()
    }

    /// Number of `show` calls received.
    #[must_use]
    pub const fn show_calls(&self) -> usize {
        self.show_calls
    }

    /// Anchors currently displaying a label.
    pub fn visible_anchors(&self) -> impl Iterator<Item = LabelAnchor> + '_ {
        LabelAnchor::ALL
            .into_iter()
            .filter(|a| self.labels[a.index()].is_some())
    }
}

impl TextSurface for RecordingSurface {
    fn show(&mut self, anchor: LabelAnchor, text: &str, style: &LabelStyle) {
        self.labels[anchor.index()] = Some(text.to_string());
        self.styles[anchor.index()] = Some(style.clone());
        self.show_calls += 1;
    }

    fn restyle(&mut self, anchor: LabelAnchor, style: &LabelStyle) {
        if self.labels[anchor.index()].is_some() {
            self.styles[anchor.index()] = Some(style.clone());
        }
    }

    fn hide(&mut self, anchor: LabelAnchor) {
        self.labels[anchor.index()] = None;
        self.styles[anchor.index()] = None;
    }
}
