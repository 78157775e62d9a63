//! Memory usage counter.

use afps_common::Rgba;
use std::fmt::Write;
use tracing::debug;

use super::{Counter, CounterCore, CounterKind};
use crate::config::{clamp_update_interval, MemoryCounterConfig};
use crate::host::MemoryReading;
use crate::markup::{open_tag, CLOSE, NEW_LINE};

/// Bytes per displayed megabyte.
pub const MEMORY_DIVIDER: u64 = 1_048_576;

const LINE_START_TOTAL: &str = "MEM TOTAL: ";
const LINE_START_ALLOCATED: &str = "MEM ALLOC: ";
const LINE_START_MONO: &str = "MEM MONO: ";
const LINE_END: &str = " MB";

/// Shows reserved, allocated and managed memory, one line each.
#[derive(Debug, Clone)]
pub struct MemoryCounter {
    core: CounterCore,
    update_interval: f32,
    precise_values: bool,
    total_reserved: bool,
    allocated: bool,
    mono_usage: bool,
    // Whole megabytes, or bytes when precise
    last_total: u64,
    last_allocated: u64,
    last_mono: u64,
    open: String,
}

impl MemoryCounter {
    /// Creates an inactive counter from its configuration.
    #[must_use]
    pub fn new(config: &MemoryCounterConfig) -> Self {
        Self {
            core: CounterCore::new(config.enabled, config.anchor, config.color),
            update_interval: config.update_interval,
            precise_values: config.precise_values,
            total_reserved: config.total_reserved,
            allocated: config.allocated,
            mono_usage: config.mono_usage,
            last_total: 0,
            last_allocated: 0,
            last_mono: 0,
            open: open_tag(config.color),
        }
    }

    /// Whether at least one line is switched on.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.total_reserved || self.allocated || self.mono_usage
    }

    /// Takes a periodic reading. The fragment is rebuilt when a displayed
    /// value changed and `renders` is set.
    pub fn update_value(&mut self, reading: MemoryReading, renders: bool) {
        if !self.core.enabled() || !self.core.is_active() {
            return;
        }
        if self.fold(reading, false) && renders {
            self.format();
        }
    }

    /// Forced update: activates or deactivates the counter when its set of
    /// lines became non-empty or empty, otherwise re-reads every line.
    pub fn refresh(&mut self, reading: MemoryReading, renders: bool) {
        if !self.core.enabled() {
            return;
        }
        let active = self.core.is_active();
        if !active && self.has_data() {
            self.activate(renders);
            return;
        }
        if active && !self.has_data() {
            self.deactivate();
            return;
        }
        if active {
            self.fold(reading, true);
            if renders {
                self.format();
            }
        }
    }

    fn fold(&mut self, reading: MemoryReading, force: bool) -> bool {
        let precise = self.precise_values;
        let scale = |bytes: u64| {
            if precise {
                bytes
            } else {
                bytes / MEMORY_DIVIDER
            }
        };

        let mut changed = false;
        let mut apply = |enabled: bool, last: &mut u64, bytes: u64| {
            if !enabled {
                return;
            }
            let value = scale(bytes);
            if *last != value || force {
                *last = value;
                changed = true;
            }
        };
        apply(self.total_reserved, &mut self.last_total, reading.total_reserved);
        apply(self.allocated, &mut self.last_allocated, reading.total_allocated);
        apply(self.mono_usage, &mut self.last_mono, reading.managed);

        if changed {
            self.core.mark_dirty();
        }
        changed
    }

    fn format(&mut self) {
        let precise = self.precise_values;
        let lines = [
            (self.total_reserved, LINE_START_TOTAL, self.last_total),
            (self.allocated, LINE_START_ALLOCATED, self.last_allocated),
            (self.mono_usage, LINE_START_MONO, self.last_mono),
        ];

        let text = self.core.text_mut();
        text.clear();
        text.push_str(&self.open);

        let mut first = true;
        for (_, caption, value) in lines.into_iter().filter(|(shown, ..)| *shown) {
            if !first {
                text.push(NEW_LINE);
            }
            first = false;
            text.push_str(caption);
            if precise {
                let _ = write!(text, "{:.2}", value as f64 / MEMORY_DIVIDER as f64);
            } else {
                let _ = write!(text, "{value}");
            }
            text.push_str(LINE_END);
        }

        text.push_str(CLOSE);
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

    /// Whether values keep byte precision.
    #[must_use]
    pub const fn precise_values(&self) -> bool {
        self.precise_values
    }

    /// Switches between whole megabytes and two-decimal megabytes.
    pub fn set_precise_values(&mut self, precise: bool) {
        if self.precise_values == precise || !self.core.is_live() {
            return;
        }
        self.precise_values = precise;
        self.core.request_refresh();
    }

    /// Whether reserved memory is shown.
    #[must_use]
    pub const fn total_reserved(&self) -> bool {
        self.total_reserved
    }

    /// Shows or hides reserved memory.
    pub fn set_total_reserved(&mut self, show: bool) {
        if self.total_reserved == show || !self.core.is_live() {
            return;
        }
        self.total_reserved = show;
        if !show {
            self.last_total = 0;
        }
        self.core.request_refresh();
    }

    /// Whether allocated memory is shown.
    #[must_use]
    pub const fn allocated(&self) -> bool {
        self.allocated
    }

    /// Shows or hides allocated memory.
    pub fn set_allocated(&mut self, show: bool) {
        if self.allocated == show || !self.core.is_live() {
            return;
        }
        self.allocated = show;
        if !show {
            self.last_allocated = 0;
        }
        self.core.request_refresh();
    }

    /// Whether managed heap memory is shown.
    #[must_use]
    pub const fn mono_usage(&self) -> bool {
        self.mono_usage
    }

    /// Shows or hides managed heap memory.
    pub fn set_mono_usage(&mut self, show: bool) {
        if self.mono_usage == show || !self.core.is_live() {
            return;
        }
        self.mono_usage = show;
        if !show {
            self.last_mono = 0;
        }
        self.core.request_refresh();
    }

    /// Last reserved value (MB, or bytes when precise).
    #[must_use]
    pub const fn last_total(&self) -> u64 {
        self.last_total
    }

    /// Last allocated value (MB, or bytes when precise).
    #[must_use]
    pub const fn last_allocated(&self) -> u64 {
        self.last_allocated
    }

    /// Last managed heap value (MB, or bytes when precise).
    #[must_use]
    pub const fn last_mono(&self) -> u64 {
        self.last_mono
    }
}

impl Counter for MemoryCounter {
    fn kind(&self) -> CounterKind {
        CounterKind::Memory
    }

    fn core(&self) -> &CounterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CounterCore {
        &mut self.core
    }

    fn activate(&mut self, renders: bool) {
        if !self.core.enabled() || !self.has_data() || self.core.is_active() {
            return;
        }
        self.core.activate();
        self.last_total = 0;
        self.last_allocated = 0;
        self.last_mono = 0;

        if renders {
            self.format();
            self.core.mark_dirty();
        }
        debug!("Memory counter activated");
    }

    fn deactivate(&mut self) {
        if !self.core.is_active() {
            return;
        }
        self.core.deactivate();
        self.last_total = 0;
        self.last_allocated = 0;
        self.last_mono = 0;
        debug!("Memory counter deactivated");
    }

    fn set_color(&mut self, color: Rgba) {
        if self.core.replace_color(color) {
            self.open = open_tag(color);
            self.core.request_refresh();
        }
    }
}
