//! Screen anchors for HUD labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Screen corner or edge slot a label is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LabelAnchor {
    /// Top-left corner.
    #[default]
    UpperLeft,
    /// Top-right corner.
    UpperRight,
    /// Bottom-left corner.
    LowerLeft,
    /// Bottom-right corner.
    LowerRight,
    /// Top edge, centered.
    UpperCenter,
    /// Bottom edge, centered.
    LowerCenter,
}

/// Horizontal text alignment within a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextAlignment {
    /// Left aligned.
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

impl LabelAnchor {
    /// Number of anchors.
    pub const COUNT: usize = 6;

    /// All anchors in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::UpperLeft,
        Self::UpperRight,
        Self::LowerLeft,
        Self::LowerRight,
        Self::UpperCenter,
        Self::LowerCenter,
    ];

    /// Stable index of this anchor, usable for per-anchor arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Normalized viewport position (0..1, origin bottom-left).
    #[must_use]
    pub const fn viewport_position(self) -> (f32, f32) {
        match self {
            Self::UpperLeft => (0.0, 1.0),
            Self::UpperRight => (1.0, 1.0),
            Self::LowerLeft => (0.0, 0.0),
            Self::LowerRight => (1.0, 0.0),
            Self::UpperCenter => (0.5, 1.0),
            Self::LowerCenter => (0.5, 0.0),
        }
    }

    /// Text alignment matching the anchor's side of the screen.
    #[must_use]
    pub const fn alignment(self) -> TextAlignment {
        match self {
            Self::UpperLeft | Self::LowerLeft => TextAlignment::Left,
            Self::UpperRight | Self::LowerRight => TextAlignment::Right,
            Self::UpperCenter | Self::LowerCenter => TextAlignment::Center,
        }
    }

    /// Converts a user-facing offset (positive = towards screen center) into
    /// a pixel offset for this anchor.
    ///
    /// Upper anchors push down, right anchors push left, and centered anchors
    /// ignore the horizontal component.
    #[must_use]
    pub fn normalize_offset(self, offset: (f32, f32)) -> (f32, f32) {
        let (x, y) = offset;
        match self {
            Self::UpperLeft => (x, -y),
            Self::UpperRight => (-x, -y),
            Self::LowerLeft => (x, y),
            Self::LowerRight => (-x, y),
            Self::UpperCenter => (0.0, -y),
            Self::LowerCenter => (0.0, y),
        }
    }
}

impl fmt::Display for LabelAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UpperLeft => "UpperLeft",
            Self::UpperRight => "UpperRight",
            Self::LowerLeft => "LowerLeft",
            Self::LowerRight => "LowerRight",
            Self::UpperCenter => "UpperCenter",
            Self::LowerCenter => "LowerCenter",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_offset_per_anchor() {
        let offset = (5.0, 7.0);
        assert_eq!(LabelAnchor::UpperLeft.normalize_offset(offset), (5.0, -7.0));
        assert_eq!(LabelAnchor::UpperRight.normalize_offset(offset), (-5.0, -7.0));
        assert_eq!(LabelAnchor::LowerLeft.normalize_offset(offset), (5.0, 7.0));
        assert_eq!(LabelAnchor::LowerRight.normalize_offset(offset), (-5.0, 7.0));
        assert_eq!(LabelAnchor::UpperCenter.normalize_offset(offset), (0.0, -7.0));
        assert_eq!(LabelAnchor::LowerCenter.normalize_offset(offset), (0.0, 7.0));
    }

    #[test]
    fn test_alignment_follows_side() {
        assert_eq!(LabelAnchor::LowerLeft.alignment(), TextAlignment::Left);
        assert_eq!(LabelAnchor::UpperRight.alignment(), TextAlignment::Right);
        assert_eq!(LabelAnchor::LowerCenter.alignment(), TextAlignment::Center);
    }

    #[test]
    fn test_viewport_position() {
        assert_eq!(LabelAnchor::UpperCenter.viewport_position(), (0.5, 1.0));
        assert_eq!(LabelAnchor::LowerRight.viewport_position(), (1.0, 0.0));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(LabelAnchor::UpperLeft.to_string(), "UpperLeft");
        assert_eq!(LabelAnchor::LowerCenter.to_string(), "LowerCenter");
    }
}
