//! Frames-per-second counter.

use afps_common::Rgba;
use std::fmt::Write;
use tracing::{debug, warn};

use super::{Counter, CounterCore, CounterKind};
use crate::config::{
    clamp_update_interval, FpsCounterConfig, MAX_AVERAGE_SAMPLES, MAX_INTERVALS_TO_SKIP,
};
use crate::markup::{TierTags, CLOSE, NEW_LINE, SPACE};
use crate::stats::{RollingStats, RollingSummary, Track};
use crate::tier::{Thresholds, Tier, TierPalette};

const MS_CLOSE: &str = " MS]</b></color>";

/// Cached opening tags, one set per sub-metric.
#[derive(Debug, Clone)]
struct FpsTags {
    value: TierTags,
    milliseconds: TierTags,
    average: TierTags,
    min: TierTags,
    max: TierTags,
}

impl FpsTags {
    fn new(palette: &TierPalette) -> Self {
        Self {
            value: TierTags::new(palette, "", "FPS: "),
            milliseconds: TierTags::new(palette, " ", "["),
            average: TierTags::new(palette, " ", "AVG: "),
            min: TierTags::new(palette, "", "MIN: "),
            max: TierTags::new(palette, "", "MAX: "),
        }
    }
}

/// Shows frames per second with optional frame time, average and min/max,
/// each colored by its own tier.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    core: CounterCore,
    stats: RollingStats,
    warning_level: i32,
    critical_level: i32,
    color_warning: Rgba,
    color_critical: Rgba,
    update_interval: f32,
    show_milliseconds: bool,
    show_average: bool,
    show_min_max: bool,
    min_max_on_new_line: bool,
    reset_average_on_new_scene: bool,
    reset_min_max_on_new_scene: bool,
    /// Last reading before truncation
    last_raw: f64,
    /// Last reading, truncated
    last_value: i64,
    last_milliseconds: f64,
    level: Tier,
    tags: FpsTags,
}

impl FpsCounter {
    /// Creates an inactive counter from its configuration.
    #[must_use]
    pub fn new(config: &FpsCounterConfig) -> Self {
        let palette = TierPalette {
            normal: config.color,
            warning: config.color_warning,
            critical: config.color_critical,
        };
        Self {
            core: CounterCore::new(config.enabled, config.anchor, config.color),
            stats: RollingStats::new(
                config.average_from_samples,
                config.min_max_intervals_to_skip,
            ),
            warning_level: config.warning_level,
            critical_level: config.critical_level,
            color_warning: config.color_warning,
            color_critical: config.color_critical,
            update_interval: config.update_interval,
            show_milliseconds: config.show_milliseconds,
            show_average: config.show_average,
            show_min_max: config.show_min_max,
            min_max_on_new_line: config.min_max_on_new_line,
            reset_average_on_new_scene: config.reset_average_on_new_scene,
            reset_min_max_on_new_scene: config.reset_min_max_on_new_scene,
            last_raw: 0.0,
            last_value: 0,
            last_milliseconds: 0.0,
            level: Tier::Normal,
            tags: FpsTags::new(&palette),
        }
    }

    /// Folds one reading in and rebuilds the fragment if anything visible
    /// changed and `renders` is set.
    ///
    /// Returns the new tier when the reading moved the counter into a
    /// different one. A zero reading never changes the tier.
    pub fn update_value(&mut self, fps: f64, renders: bool) -> Option<Tier> {
        if !self.core.enabled() || !self.core.is_active() {
            return None;
        }

        let raw = if fps.is_finite() { fps.max(0.0) } else { 0.0 };
        let value = raw.trunc();
        let track = Track {
            average: self.show_average,
            extremes: self.show_min_max,
        };
        let changed = self.stats.observe_parts(value, track);
        self.last_raw = raw;
        self.last_value = value as i64;

        let mut level_change = None;
        let tier = self.tier_of(self.last_value);
        if self.last_value != 0 && tier != self.level {
            debug!(from = ?self.level, to = ?tier, fps = self.last_value, "FPS level changed");
            self.level = tier;
            level_change = Some(tier);
        }

        if changed {
            if self.show_milliseconds {
                self.last_milliseconds = milliseconds(raw);
            }
            self.core.mark_dirty();
            if renders {
                self.format();
            }
        }

        level_change
    }

    /// Rebuilds the fragment from the current values without folding a new
    /// reading in.
    pub fn refresh(&mut self, renders: bool) {
        if !self.core.enabled() || !self.core.is_active() {
            return;
        }
        if self.show_milliseconds {
            self.last_milliseconds = milliseconds(self.last_raw);
        }
        self.core.mark_dirty();
        if renders {
            self.format();
        }
    }

    /// Writes the fragment for the current values into the text buffer.
    fn format(&mut self) {
        let value_tier = self.tier_of(self.last_value);
        let average = self.stats.rounded_average();
        let min = self.stats.rounded_min();
        let max = self.stats.rounded_max();
        let tiers = (self.tier_of(average), self.tier_of(min), self.tier_of(max));

        let text = self.core.text_mut();
        text.clear();

        text.push_str(self.tags.value.get(value_tier));
        let _ = write!(text, "{}", self.last_value);
        text.push_str(CLOSE);

        if self.show_milliseconds {
            text.push_str(self.tags.milliseconds.get(value_tier));
            let _ = write!(text, "{:.2}", self.last_milliseconds);
            text.push_str(MS_CLOSE);
        }

        if self.show_average {
            text.push_str(self.tags.average.get(tiers.0));
            let _ = write!(text, "{average}");
            text.push_str(CLOSE);
        }

        if self.show_min_max {
            text.push(if self.min_max_on_new_line {
                NEW_LINE
            } else {
                SPACE
            });
            text.push_str(self.tags.min.get(tiers.1));
            let _ = write!(text, "{min}");
            text.push_str(CLOSE);
            text.push(SPACE);
            text.push_str(self.tags.max.get(tiers.2));
            let _ = write!(text, "{max}");
            text.push_str(CLOSE);
        }
    }

    fn tier_of(&self, value: i64) -> Tier {
        self.thresholds().classify(value as f64)
    }

    fn rebuild_tags(&mut self) {
        self.tags = FpsTags::new(&self.palette());
    }

    /// Clears the average.
    pub fn reset_average(&mut self) {
        if !self.core.is_live() {
            return;
        }
        self.stats.reset_average();
        self.core.request_refresh();
    }

    /// Clears min/max and restarts their warmup.
    pub fn reset_min_max(&mut self) {
        if !self.core.is_live() {
            return;
        }
        self.stats.reset_min_max();
        self.core.request_refresh();
    }

    /// Tier thresholds.
    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(f64::from(self.critical_level), f64::from(self.warning_level))
    }

    /// Per-tier colors.
    #[must_use]
    pub fn palette(&self) -> TierPalette {
        TierPalette {
            normal: self.core.color(),
            warning: self.color_warning,
            critical: self.color_critical,
        }
    }

    /// Last reading, truncated.
    #[must_use]
    pub const fn last_value(&self) -> i64 {
        self.last_value
    }

    /// Frame time derived from the last reading, in milliseconds.
    #[must_use]
    pub const fn last_milliseconds(&self) -> f64 {
        self.last_milliseconds
    }

    /// Rounded average, as displayed.
    #[must_use]
    pub fn last_average(&self) -> i64 {
        self.stats.rounded_average()
    }

    /// Rounded minimum, as displayed.
    #[must_use]
    pub fn last_minimum(&self) -> i64 {
        self.stats.rounded_min()
    }

    /// Rounded maximum, as displayed.
    #[must_use]
    pub fn last_maximum(&self) -> i64 {
        self.stats.rounded_max()
    }

    /// Current tier.
    #[must_use]
    pub const fn level(&self) -> Tier {
        self.level
    }

    /// Statistics snapshot.
    #[must_use]
    pub fn summary(&self) -> RollingSummary {
        self.stats.summary()
    }

    /// FPS below this is a warning.
    #[must_use]
    pub const fn warning_level(&self) -> i32 {
        self.warning_level
    }

    /// Sets the warning threshold.
    pub fn set_warning_level(&mut self, level: i32) {
        if self.warning_level == level || !self.core.is_live() {
            return;
        }
        self.warning_level = level;
        self.warn_if_inverted();
        self.core.request_refresh();
    }

    /// FPS at or below this is critical.
    #[must_use]
    pub const fn critical_level(&self) -> i32 {
        self.critical_level
    }

    /// Sets the critical threshold.
    pub fn set_critical_level(&mut self, level: i32) {
        if self.critical_level == level || !self.core.is_live() {
            return;
        }
        self.critical_level = level;
        self.warn_if_inverted();
        self.core.request_refresh();
    }

    fn warn_if_inverted(&self) {
        if self.thresholds().is_inverted() {
            warn!(
                critical = self.critical_level,
                warning = self.warning_level,
                "FPS critical level above warning level; warning tier will never be shown"
            );
        }
    }

    /// Seconds between readings.
    #[must_use]
    pub const fn update_interval(&self) -> f32 {
        self.update_interval
    }

    /// Sets the seconds between readings, clamped to 0.1..=10.
    pub fn set_update_interval(&mut self, secs: f32) {
        let secs = clamp_update_interval(secs, self.update_interval);
        if (self.update_interval - secs).abs() < 0.001 || !self.core.is_live() {
            return;
        }
        self.update_interval = secs;
        self.core.request_clock_restart();
    }

    /// Whether frame time is shown.
    #[must_use]
    pub const fn show_milliseconds(&self) -> bool {
        self.show_milliseconds
    }

    /// Shows or hides frame time.
    pub fn set_show_milliseconds(&mut self, show: bool) {
        if self.show_milliseconds == show || !self.core.is_live() {
            return;
        }
        self.show_milliseconds = show;
        if !show {
            self.last_milliseconds = 0.0;
        }
        self.core.request_refresh();
    }

    /// Whether the average is shown.
    #[must_use]
    pub const fn show_average(&self) -> bool {
        self.show_average
    }

    /// Shows or hides the average; hiding it resets it.
    pub fn set_show_average(&mut self, show: bool) {
        if self.show_average == show || !self.core.is_live() {
            return;
        }
        self.show_average = show;
        if !show {
            self.stats.reset_average();
        }
        self.core.request_refresh();
    }

    /// Readings to average over, 0 for all.
    #[must_use]
    pub const fn average_from_samples(&self) -> usize {
        self.stats.window()
    }

    /// Sets the averaging window, at most 100; the average restarts.
    pub fn set_average_from_samples(&mut self, samples: usize) {
        let samples = samples.min(MAX_AVERAGE_SAMPLES);
        if self.stats.window() == samples || !self.core.is_live() {
            return;
        }
        self.stats.set_window(samples);
        self.core.request_refresh();
    }

    /// Whether min/max are shown.
    #[must_use]
    pub const fn show_min_max(&self) -> bool {
        self.show_min_max
    }

    /// Shows or hides min/max; hiding them resets them.
    pub fn set_show_min_max(&mut self, show: bool) {
        if self.show_min_max == show || !self.core.is_live() {
            return;
        }
        self.show_min_max = show;
        if !show {
            self.stats.reset_min_max();
        }
        self.core.request_refresh();
    }

    /// Whether min/max sit on their own line.
    #[must_use]
    pub const fn min_max_on_new_line(&self) -> bool {
        self.min_max_on_new_line
    }

    /// Moves min/max to their own line or back.
    pub fn set_min_max_on_new_line(&mut self, new_line: bool) {
        if self.min_max_on_new_line == new_line || !self.core.is_live() {
            return;
        }
        self.min_max_on_new_line = new_line;
        self.core.request_refresh();
    }

    /// Readings ignored for min/max after a reset.
    #[must_use]
    pub const fn min_max_intervals_to_skip(&self) -> u32 {
        self.stats.skip_intervals()
    }

    /// Sets the min/max warmup, at most 10; applies from the next reset.
    pub fn set_min_max_intervals_to_skip(&mut self, intervals: u32) {
        let intervals = intervals.min(MAX_INTERVALS_TO_SKIP);
        if self.stats.skip_intervals() == intervals || !self.core.is_live() {
            return;
        }
        self.stats.set_skip_intervals(intervals);
    }

    /// Whether a level load resets the average.
    #[must_use]
    pub const fn reset_average_on_new_scene(&self) -> bool {
        self.reset_average_on_new_scene
    }

    /// Sets whether a level load resets the average.
    pub fn set_reset_average_on_new_scene(&mut self, reset: bool) {
        if !self.core.is_live() {
            return;
        }
        self.reset_average_on_new_scene = reset;
    }

    /// Whether a level load resets min/max.
    #[must_use]
    pub const fn reset_min_max_on_new_scene(&self) -> bool {
        self.reset_min_max_on_new_scene
    }

    /// Sets whether a level load resets min/max.
    pub fn set_reset_min_max_on_new_scene(&mut self, reset: bool) {
        if !self.core.is_live() {
            return;
        }
        self.reset_min_max_on_new_scene = reset;
    }

    /// Warning-tier color.
    #[must_use]
    pub const fn color_warning(&self) -> Rgba {
        self.color_warning
    }

    /// Sets the warning-tier color.
    pub fn set_color_warning(&mut self, color: Rgba) {
        if self.color_warning == color || !self.core.is_live() {
            return;
        }
        self.color_warning = color;
        self.rebuild_tags();
        self.core.request_refresh();
    }

    /// Critical-tier color.
    #[must_use]
    pub const fn color_critical(&self) -> Rgba {
        self.color_critical
    }

    /// Sets the critical-tier color.
    pub fn set_color_critical(&mut self, color: Rgba) {
        if self.color_critical == color || !self.core.is_live() {
            return;
        }
        self.color_critical = color;
        self.rebuild_tags();
        self.core.request_refresh();
    }
}

/// `1000 / fps`, or zero when there is no reading.
fn milliseconds(fps: f64) -> f64 {
    if fps > 0.0 {
        1000.0 / fps
    } else {
        0.0
    }
}

impl Counter for FpsCounter {
    fn kind(&self) -> CounterKind {
        CounterKind::Fps
    }

    fn core(&self) -> &CounterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CounterCore {
        &mut self.core
    }

    fn activate(&mut self, renders: bool) {
        if !self.core.enabled() || self.core.is_active() {
            return;
        }
        self.core.activate();
        self.last_value = 0;
        self.stats.reset_min_max();

        if renders {
            let text = self.core.text_mut();
            text.push_str(self.tags.value.get(Tier::Critical));
            text.push('0');
            text.push_str(CLOSE);
            self.core.mark_dirty();
        }
        debug!("FPS counter activated");
    }

    fn deactivate(&mut self) {
        if !self.core.is_active() {
            return;
        }
        self.core.deactivate();
        self.stats.reset();
        self.last_raw = 0.0;
        self.last_value = 0;
        self.last_milliseconds = 0.0;
        self.level = Tier::Normal;
        debug!("FPS counter deactivated");
    }

    fn set_color(&mut self, color: Rgba) {
        if self.core.replace_color(color) {
            self.rebuild_tags();
            self.core.request_refresh();
        }
    }
}
