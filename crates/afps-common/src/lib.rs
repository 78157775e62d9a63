//! # AFPS Common
//!
//! Common types, utilities, and shared abstractions for the AFPS HUD.
//!
//! This crate provides foundational types used across the HUD crates:
//! - RGBA colors and their hex encoding
//! - Label anchors and per-anchor offset rules
//! - Operation modes
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod anchor;
pub mod color;
pub mod error;
pub mod mode;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::anchor::*;
    pub use crate::color::*;
    pub use crate::error::*;
    pub use crate::mode::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_count_matches_all() {
        assert_eq!(LabelAnchor::ALL.len(), LabelAnchor::COUNT);
        for (i, anchor) in LabelAnchor::ALL.iter().enumerate() {
            assert_eq!(anchor.index(), i);
        }
    }

    #[test]
    fn test_color_hex_roundtrip() {
        let color = Rgba::new(85, 218, 102, 255);
        assert_eq!(color.to_hex(), "55da66ff");
        assert_eq!(Rgba::from_hex("55da66ff").ok(), Some(color));
    }

    #[test]
    fn test_default_mode_is_normal() {
        assert_eq!(OperationMode::default(), OperationMode::Normal);
    }
}
