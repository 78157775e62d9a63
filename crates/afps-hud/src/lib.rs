//! # AFPS HUD
//!
//! On-screen performance HUD engine.
//!
//! This crate provides:
//! - Rolling statistics with windowed averages and warmed-up min/max
//! - Tier classification and colored markup fragments
//! - FPS, memory and device information counters
//! - Anchored labels and the [`Hud`] coordinator
//! - TOML configuration and an event bus for host notifications

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod counter;
pub mod events;
pub mod host;
pub mod hud;
pub mod label;
pub mod markup;
pub mod sampler;
pub mod snapshot;
pub mod stats;
pub mod tier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::counter::*;
    pub use crate::events::*;
    pub use crate::host::*;
    pub use crate::hud::*;
    pub use crate::label::*;
    pub use crate::markup::*;
    pub use crate::sampler::*;
    pub use crate::snapshot::*;
    pub use crate::stats::*;
    pub use crate::tier::*;
    pub use afps_common::prelude::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_stats_scenarios() {
        let mut running = RollingStats::new(0, 0);
        let tiers: Vec<Tier> = [10.0, 20.0, 30.0]
            .into_iter()
            .map(|v| {
                running.observe(v);
                Tier::classify(v, 20.0, 25.0)
            })
            .collect();
        assert_eq!(tiers, vec![Tier::Critical, Tier::Critical, Tier::Normal]);
        assert!((running.average() - 20.0).abs() < 1e-9);

        let mut windowed = RollingStats::new(2, 0);
        let averages: Vec<f64> = [4.0, 8.0, 12.0]
            .into_iter()
            .map(|v| {
                windowed.observe(v);
                windowed.average()
            })
            .collect();
        assert_eq!(averages, vec![4.0, 6.0, 10.0]);
    }

    #[test]
    fn test_hud_from_toml_config() {
        let config = HudConfig::from_toml_str(
            r#"
            [fps]
            anchor = "LowerRight"
            show_milliseconds = false
            show_average = false

            [memory]
            enabled = false

            [device]
            enabled = false
            "#,
        )
        .expect("valid config");

        let start = Instant::now();
        let mut hud = Hud::new(RecordingSurface::new(), config);
        hud.start(start);
        let mut now = start;
        for _ in 0..30 {
            now += Duration::from_millis(20);
            hud.frame(now);
        }

        let text = hud
            .surface()
            .text(LabelAnchor::LowerRight)
            .map(strip_markup);
        assert_eq!(text.as_deref(), Some("FPS: 50"));
    }
}
