//! HUD configuration.
//!
//! Everything a HUD starts with: operation mode, look & feel, and one section
//! per counter. Loaded from and saved to TOML.

use afps_common::{ConfigError, LabelAnchor, OperationMode, Rgba};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "afps.toml";

/// Shortest allowed seconds between counter readings.
pub const MIN_UPDATE_INTERVAL: f32 = 0.1;
/// Longest allowed seconds between counter readings.
pub const MAX_UPDATE_INTERVAL: f32 = 10.0;
/// Largest FPS averaging window.
pub const MAX_AVERAGE_SAMPLES: usize = 100;
/// Longest min/max warmup, in readings.
pub const MAX_INTERVALS_TO_SKIP: u32 = 10;

/// Top-level HUD configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// Initial operation mode
    pub operation_mode: OperationMode,
    /// Survive level loads (otherwise the HUD disposes itself)
    pub keep_alive: bool,
    /// Override the host frame rate while the HUD runs
    pub force_frame_rate: bool,
    /// Frame rate to force, -1 for unlimited
    pub forced_frame_rate: i32,
    /// Label presentation
    pub look: LookAndFeel,
    /// Frames-per-second counter
    pub fps: FpsCounterConfig,
    /// Memory counter
    pub memory: MemoryCounterConfig,
    /// Device information counter
    pub device: DeviceCounterConfig,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            operation_mode: OperationMode::Normal,
            keep_alive: true,
            force_frame_rate: false,
            forced_frame_rate: -1,
            look: LookAndFeel::default(),
            fps: FpsCounterConfig::default(),
            memory: MemoryCounterConfig::default(),
            device: DeviceCounterConfig::default(),
        }
    }
}

/// Label presentation settings shared by all anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookAndFeel {
    /// Pixel offset from the screen edge, applied to every anchor
    pub anchors_offset: (f32, f32),
    /// Font name, `None` for the host default
    pub font: Option<String>,
    /// Font size, 0 for the font's own size
    pub font_size: u32,
    /// Line spacing multiplier
    pub line_spacing: f32,
    /// Empty lines between counters sharing an anchor
    pub counters_spacing: u32,
}

impl Default for LookAndFeel {
    fn default() -> Self {
        Self {
            anchors_offset: (5.0, 5.0),
            font: None,
            font_size: 0,
            line_spacing: 1.0,
            counters_spacing: 0,
        }
    }
}

/// FPS counter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FpsCounterConfig {
    /// Counter enabled
    pub enabled: bool,
    /// Label anchor
    pub anchor: LabelAnchor,
    /// Normal-tier color
    pub color: Rgba,
    /// Warning-tier color
    pub color_warning: Rgba,
    /// Critical-tier color
    pub color_critical: Rgba,
    /// Seconds between readings
    pub update_interval: f32,
    /// FPS below this is a warning
    pub warning_level: i32,
    /// FPS at or below this is critical
    pub critical_level: i32,
    /// Show frame time in milliseconds
    pub show_milliseconds: bool,
    /// Show the average FPS
    pub show_average: bool,
    /// Readings to average over, 0 for all since start
    pub average_from_samples: usize,
    /// Show minimum and maximum FPS
    pub show_min_max: bool,
    /// Put min/max on their own line
    pub min_max_on_new_line: bool,
    /// Readings to ignore for min/max after a reset
    pub min_max_intervals_to_skip: u32,
    /// Reset the average when a level loads
    pub reset_average_on_new_scene: bool,
    /// Reset min/max when a level loads
    pub reset_min_max_on_new_scene: bool,
}

impl Default for FpsCounterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            anchor: LabelAnchor::UpperLeft,
            color: Rgba::rgb(85, 218, 102),
            color_warning: Rgba::rgb(236, 224, 88),
            color_critical: Rgba::rgb(249, 91, 91),
            update_interval: 0.5,
            warning_level: 50,
            critical_level: 20,
            show_milliseconds: true,
            show_average: true,
            average_from_samples: 50,
            show_min_max: false,
            min_max_on_new_line: false,
            min_max_intervals_to_skip: 3,
            reset_average_on_new_scene: false,
            reset_min_max_on_new_scene: false,
        }
    }
}

/// Memory counter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryCounterConfig {
    /// Counter enabled
    pub enabled: bool,
    /// Label anchor
    pub anchor: LabelAnchor,
    /// Text color
    pub color: Rgba,
    /// Seconds between readings
    pub update_interval: f32,
    /// Keep byte precision and print two decimals
    pub precise_values: bool,
    /// Show reserved memory
    pub total_reserved: bool,
    /// Show allocated memory
    pub allocated: bool,
    /// Show managed heap memory
    pub mono_usage: bool,
}

impl Default for MemoryCounterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            anchor: LabelAnchor::UpperLeft,
            color: Rgba::rgb(234, 238, 101),
            update_interval: 1.0,
            precise_values: false,
            total_reserved: true,
            allocated: true,
            mono_usage: false,
        }
    }
}

/// Device information counter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceCounterConfig {
    /// Counter enabled
    pub enabled: bool,
    /// Label anchor
    pub anchor: LabelAnchor,
    /// Text color
    pub color: Rgba,
    /// Show CPU model and core count
    pub cpu_model: bool,
    /// Show GPU model, API, shader model and VRAM
    pub gpu_model: bool,
    /// Show system RAM
    pub ram_size: bool,
    /// Show screen resolution and DPI
    pub screen_data: bool,
}

impl Default for DeviceCounterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            anchor: LabelAnchor::LowerLeft,
            color: Rgba::rgb(172, 172, 172),
            cpu_model: true,
            gpu_model: true,
            ram_size: true,
            screen_data: true,
        }
    }
}

impl HudConfig {
    /// Load configuration from `afps.toml` in the working directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("HUD config not found at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                info!("Loaded HUD config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to load HUD config: {e}");
                Self::default()
            },
        }
    }

    /// Load configuration from a path, surfacing errors.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> afps_common::AfpsResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&contents)?)
    }

    /// Parse configuration from TOML text and clamp it into range.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate();
        Ok(config)
    }

    /// Serialize configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = self
            .to_toml_string()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved HUD config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.forced_frame_rate = self.forced_frame_rate.clamp(-1, 200);

        // Look & feel
        self.look.font_size = self.look.font_size.min(100);
        self.look.line_spacing = clamp_finite(self.look.line_spacing, 0.0, 10.0, 1.0);
        self.look.counters_spacing = self.look.counters_spacing.min(10);

        // FPS
        self.fps.update_interval = clamp_update_interval(self.fps.update_interval, 0.5);
        self.fps.average_from_samples = self.fps.average_from_samples.min(MAX_AVERAGE_SAMPLES);
        self.fps.min_max_intervals_to_skip =
            self.fps.min_max_intervals_to_skip.min(MAX_INTERVALS_TO_SKIP);
        if self.fps.critical_level > self.fps.warning_level {
            warn!(
                "FPS critical level {} is above warning level {}; warning tier will never be shown",
                self.fps.critical_level, self.fps.warning_level
            );
        }

        // Memory
        self.memory.update_interval = clamp_update_interval(self.memory.update_interval, 1.0);
    }
}

/// Clamps a reading interval into range; non-finite values become `fallback`.
pub(crate) fn clamp_update_interval(secs: f32, fallback: f32) -> f32 {
    clamp_finite(secs, MIN_UPDATE_INTERVAL, MAX_UPDATE_INTERVAL, fallback)
}

fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
