//! Rolling statistics for periodically sampled metrics.
//!
//! A [`RollingStats`] folds one reading per update interval into a running or
//! windowed average plus a warmed-up minimum/maximum, and reports whether any
//! value a label would display has changed.

use serde::Serialize;

/// Displayed in place of a minimum or maximum that has not been recorded yet.
pub const UNSET: i64 = -1;

/// Selects which parts of the summary an observation folds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    /// Fold into the average
    pub average: bool,
    /// Fold into min/max (subject to warmup)
    pub extremes: bool,
}

impl Track {
    /// Fold into everything.
    pub const ALL: Self = Self {
        average: true,
        extremes: true,
    };

    /// Only update the current value.
    pub const NONE: Self = Self {
        average: false,
        extremes: false,
    };
}

/// Point-in-time view of a [`RollingStats`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingSummary {
    /// Last observed value
    pub current: f64,
    /// Running or windowed average
    pub average: f64,
    /// Lowest value since warmup, if any
    pub min: Option<f64>,
    /// Highest value since warmup, if any
    pub max: Option<f64>,
    /// Samples folded into the average since its last reset
    pub count: u64,
}

/// Running/windowed average with warmed-up min/max tracking.
#[derive(Debug, Clone)]
pub struct RollingStats {
    /// Window size; 0 means an unbounded running mean
    window: usize,
    /// Circular sample slots, `window` long
    ring: Vec<f64>,
    /// Samples folded into the average
    count: u64,
    /// Current average
    average: f64,
    /// Last observed value
    current: f64,
    /// Minimum since warmup
    min: Option<f64>,
    /// Maximum since warmup
    max: Option<f64>,
    /// Configured warmup, applied at the next min/max reset
    skip_intervals: u32,
    /// Warmup in effect since the last min/max reset
    warmup: u32,
    /// Observations ignored so far
    skipped: u32,
}

impl Default for RollingStats {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl RollingStats {
    /// Creates a tracker averaging over `window` samples (0 = all samples)
    /// and ignoring the first `skip_intervals` observations for min/max.
    #[must_use]
    pub fn new(window: usize, skip_intervals: u32) -> Self {
        Self {
            window,
            ring: vec![0.0; window],
            count: 0,
            average: 0.0,
            current: 0.0,
            min: None,
            max: None,
            skip_intervals,
            warmup: skip_intervals,
            skipped: 0,
        }
    }

    /// Folds a value into every part of the summary.
    ///
    /// Returns whether any rounded, displayable value changed.
    pub fn observe(&mut self, value: f64) -> bool {
        self.observe_parts(value, Track::ALL)
    }

    /// Folds a value into the selected parts of the summary.
    pub fn observe_parts(&mut self, value: f64, track: Track) -> bool {
        let before = self.visible();
        self.current = value;

        if track.average {
            self.fold_average(value);
        }

        if track.extremes {
            if self.skipped < self.warmup {
                self.skipped += 1;
            } else {
                self.min = Some(self.min.map_or(value, |m| m.min(value)));
                self.max = Some(self.max.map_or(value, |m| m.max(value)));
            }
        }

        self.visible() != before
    }

    fn fold_average(&mut self, value: f64) {
        if self.window == 0 {
            self.count += 1;
            self.average += (value - self.average) / self.count as f64;
        } else {
            let slot = (self.count % self.window as u64) as usize;
            self.ring[slot] = value;
            self.count += 1;

            // Unfilled slots are zero, so summing the whole ring is exact.
            let filled = self.count.min(self.window as u64);
            self.average = self.ring.iter().sum::<f64>() / filled as f64;
        }
    }

    fn visible(&self) -> (i64, i64, i64, i64) {
        (
            self.current.round() as i64,
            self.rounded_average(),
            self.rounded_min(),
            self.rounded_max(),
        )
    }

    /// Clears the average, the ring buffer and the sample count.
    pub fn reset_average(&mut self) {
        self.count = 0;
        self.average = 0.0;
        self.ring.fill(0.0);
    }

    /// Clears min/max and restarts the warmup.
    pub fn reset_min_max(&mut self) {
        self.min = None;
        self.max = None;
        self.warmup = self.skip_intervals;
        self.skipped = 0;
    }

    /// Clears all accumulated state.
    pub fn reset(&mut self) {
        self.reset_average();
        self.reset_min_max();
        self.current = 0.0;
    }

    /// Changes the averaging window; the average restarts from scratch.
    pub fn set_window(&mut self, window: usize) {
        if self.window == window {
            return;
        }
        self.window = window;
        self.ring = vec![0.0; window];
        self.reset_average();
    }

    /// Changes the min/max warmup length. Takes effect from the next reset.
    pub fn set_skip_intervals(&mut self, skip_intervals: u32) {
        self.skip_intervals = skip_intervals;
    }

    /// Window size (0 = unbounded).
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Configured min/max warmup length.
    #[must_use]
    pub const fn skip_intervals(&self) -> u32 {
        self.skip_intervals
    }

    /// Whether the warmup has elapsed and min/max are being recorded.
    #[must_use]
    pub const fn is_warmed_up(&self) -> bool {
        self.skipped >= self.warmup
    }

    /// Samples folded into the average since its last reset.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Last observed value.
    #[must_use]
    pub const fn current(&self) -> f64 {
        self.current
    }

    /// Current average.
    #[must_use]
    pub const fn average(&self) -> f64 {
        self.average
    }

    /// Recorded minimum.
    #[must_use]
    pub const fn min(&self) -> Option<f64> {
        self.min
    }

    /// Recorded maximum.
    #[must_use]
    pub const fn max(&self) -> Option<f64> {
        self.max
    }

    /// Average rounded to the nearest integer.
    #[must_use]
    pub fn rounded_average(&self) -> i64 {
        self.average.round() as i64
    }

    /// Minimum rounded to the nearest integer, or [`UNSET`].
    #[must_use]
    pub fn rounded_min(&self) -> i64 {
        self.min.map_or(UNSET, |v| v.round() as i64)
    }

    /// Maximum rounded to the nearest integer, or [`UNSET`].
    #[must_use]
    pub fn rounded_max(&self) -> i64 {
        self.max.map_or(UNSET, |v| v.round() as i64)
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn summary(&self) -> RollingSummary {
        RollingSummary {
            current: self.current,
            average: self.average,
            min: self.min,
            max: self.max,
            count: self.count,
        }
    }
}
