//! Threshold-based tier classification and the colors tied to each tier.

use afps_common::Rgba;
use serde::{Deserialize, Serialize};

/// Coarse health classification of a metric.
///
/// Ordered `Critical < Warning < Normal`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Tier {
    /// At or below the critical threshold.
    Critical,
    /// Between the thresholds.
    Warning,
    /// At or above the warning threshold.
    #[default]
    Normal,
}

impl Tier {
    /// Classifies `value` against `critical` and `warning` thresholds.
    ///
    /// The critical test runs first. With inverted thresholds
    /// (`critical > warning`) the warning band is empty: everything above
    /// `critical` is also at or above `warning`, so the result stays monotonic.
    #[must_use]
    pub fn classify(value: f64, critical: f64, warning: f64) -> Self {
        if value <= critical {
            Self::Critical
        } else if value < warning {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

/// A pair of tier thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Values at or below this are critical
    pub critical: f64,
    /// Values below this (and above critical) are warnings
    pub warning: f64,
}

impl Thresholds {
    /// Creates a threshold pair. Ordering is not enforced.
    #[must_use]
    pub const fn new(critical: f64, warning: f64) -> Self {
        Self { critical, warning }
    }

    /// Classifies a value.
    #[must_use]
    pub fn classify(&self, value: f64) -> Tier {
        Tier::classify(value, self.critical, self.warning)
    }

    /// Whether `critical > warning`, which leaves no warning band.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.critical > self.warning
    }
}

/// One color per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPalette {
    /// Normal-tier color
    pub normal: Rgba,
    /// Warning-tier color
    pub warning: Rgba,
    /// Critical-tier color
    pub critical: Rgba,
}

impl TierPalette {
    /// Uses the same color for every tier.
    #[must_use]
    pub const fn uniform(color: Rgba) -> Self {
        Self {
            normal: color,
            warning: color,
            critical: color,
        }
    }

    /// Color for a tier.
    #[must_use]
    pub const fn color(&self, tier: Tier) -> Rgba {
        match tier {
            Tier::Normal => self.normal,
            Tier::Warning => self.warning,
            Tier::Critical => self.critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_scenario() {
        let tiers: Vec<Tier> = [10.0, 20.0, 30.0]
            .into_iter()
            .map(|v| Tier::classify(v, 20.0, 25.0))
            .collect();
        assert_eq!(tiers, vec![Tier::Critical, Tier::Critical, Tier::Normal]);
    }

    #[test]
    fn test_classify_boundaries() {
        let t = Thresholds::new(20.0, 50.0);
        assert_eq!(t.classify(20.0), Tier::Critical);
        assert_eq!(t.classify(20.5), Tier::Warning);
        assert_eq!(t.classify(49.9), Tier::Warning);
        assert_eq!(t.classify(50.0), Tier::Normal);
        assert!(!t.is_inverted());
    }

    #[test]
    fn test_inverted_thresholds_have_no_warning_band() {
        let t = Thresholds::new(50.0, 20.0);
        assert!(t.is_inverted());
        assert_eq!(t.classify(10.0), Tier::Critical);
        assert_eq!(t.classify(30.0), Tier::Critical);
        assert_eq!(t.classify(50.0), Tier::Critical);
        assert_eq!(t.classify(50.1), Tier::Normal);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Critical < Tier::Warning);
        assert!(Tier::Warning < Tier::Normal);
    }

    #[test]
    fn test_palette_lookup() {
        let palette = TierPalette {
            normal: Rgba::rgb(0, 255, 0),
            warning: Rgba::rgb(255, 255, 0),
            critical: Rgba::rgb(255, 0, 0),
        };
        assert_eq!(palette.color(Tier::Warning), Rgba::rgb(255, 255, 0));
        assert_eq!(TierPalette::uniform(Rgba::WHITE).color(Tier::Critical), Rgba::WHITE);
    }

    proptest! {
        #[test]
        fn prop_classify_is_monotonic(
            a in -500.0f64..500.0,
            b in -500.0f64..500.0,
            critical in -200.0f64..200.0,
            warning in -200.0f64..200.0
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Tier::classify(lo, critical, warning) <= Tier::classify(hi, critical, warning));
        }
    }
}
