//! Serializable point-in-time view of a HUD, for logs and tooling.

use afps_common::{LabelAnchor, OperationMode};
use serde::Serialize;

use crate::host::DeviceInfo;
use crate::hud::HudState;
use crate::stats::RollingSummary;
use crate::tier::Tier;

/// Whole-HUD snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    /// Lifecycle state
    pub state: HudState,
    /// Operation mode
    pub operation_mode: OperationMode,
    /// Frames seen since start
    pub frame_count: u64,
    /// FPS counter
    pub fps: FpsSnapshot,
    /// Memory counter
    pub memory: MemorySnapshot,
    /// Device information counter
    pub device: DeviceSnapshot,
}

impl HudSnapshot {
    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// FPS counter values as displayed. Unset min/max are `-1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FpsSnapshot {
    /// Counter enabled
    pub enabled: bool,
    /// Counter active
    pub active: bool,
    /// Label anchor
    pub anchor: LabelAnchor,
    /// Last reading, truncated
    pub value: i64,
    /// Frame time in milliseconds
    pub milliseconds: f64,
    /// Rounded average
    pub average: i64,
    /// Rounded minimum
    pub min: i64,
    /// Rounded maximum
    pub max: i64,
    /// Current tier
    pub level: Tier,
    /// Unrounded statistics
    pub summary: RollingSummary,
}

/// Memory counter values as displayed (MB, or bytes when `precise`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemorySnapshot {
    /// Counter enabled
    pub enabled: bool,
    /// Counter active
    pub active: bool,
    /// Label anchor
    pub anchor: LabelAnchor,
    /// Byte precision
    pub precise: bool,
    /// Reserved memory
    pub total_reserved: u64,
    /// Allocated memory
    pub allocated: u64,
    /// Managed heap memory
    pub mono: u64,
}

/// Device information counter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    /// Counter enabled
    pub enabled: bool,
    /// Counter active
    pub active: bool,
    /// Label anchor
    pub anchor: LabelAnchor,
    /// Last device description
    pub info: DeviceInfo,
}
