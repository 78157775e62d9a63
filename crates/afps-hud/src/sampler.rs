//! Interval timing for periodic counter updates.

use std::time::{Duration, Instant};

/// Shortest interval a counter may sample at.
pub const MIN_INTERVAL_SECS: f32 = 0.001;

/// Fallback used when an interval cannot be represented.
const FALLBACK_INTERVAL: Duration = Duration::from_millis(500);

/// One reading taken at an interval boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSample {
    /// Measured value
    pub value: f64,
    /// Host frame index the reading was taken on
    pub frame: u64,
    /// When the reading was taken
    pub at: Instant,
}

/// Converts seconds to a duration, clamping to [`MIN_INTERVAL_SECS`].
#[must_use]
pub fn interval_from_secs(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs.max(MIN_INTERVAL_SECS)).unwrap_or(FALLBACK_INTERVAL)
}

/// Tracks when a periodic update is due and how many frames passed since the
/// previous one.
#[derive(Debug, Clone)]
pub struct IntervalClock {
    /// Time between updates
    interval: Duration,
    /// Start of the current interval
    last: Instant,
    /// Host frame count at the start of the current interval
    frames_at_last: u64,
}

impl IntervalClock {
    /// Creates a clock whose first interval starts at `now`.
    #[must_use]
    pub fn new(interval_secs: f32, now: Instant) -> Self {
        Self {
            interval: interval_from_secs(interval_secs),
            last: now,
            frames_at_last: 0,
        }
    }

    /// Changes the interval; the current interval keeps its start time.
    pub fn set_interval(&mut self, interval_secs: f32) {
        self.interval = interval_from_secs(interval_secs);
    }

    /// Time between updates.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts a fresh interval at `now`.
    pub fn restart(&mut self, now: Instant, frame: u64) {
        self.last = now;
        self.frames_at_last = frame;
    }

    /// Whether the current interval has elapsed.
    #[must_use]
    pub fn due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last) >= self.interval
    }

    /// Restarts the interval and returns `true` if it had elapsed.
    pub fn poll(&mut self, now: Instant, frame: u64) -> bool {
        if !self.due(now) {
            return false;
        }
        self.restart(now, frame);
        true
    }

    /// If the interval elapsed, returns frames per second over it and starts
    /// the next one.
    ///
    /// A zero-length interval yields a zero reading instead of dividing.
    pub fn measure_fps(&mut self, now: Instant, frame: u64) -> Option<MetricSample> {
        if !self.due(now) {
            return None;
        }

        let elapsed = now.saturating_duration_since(self.last).as_secs_f64();
        let frames = frame.saturating_sub(self.frames_at_last);
        let value = if elapsed > 0.0 {
            frames as f64 / elapsed
        } else {
            0.0
        };

        self.restart(now, frame);
        Some(MetricSample {
            value,
            frame,
            at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_fps_over_interval() {
        let start = Instant::now();
        let mut clock = IntervalClock::new(0.5, start);

        assert!(clock.measure_fps(start + Duration::from_millis(250), 15).is_none());

        let sample = clock
            .measure_fps(start + Duration::from_millis(500), 30)
            .expect("interval elapsed");
        assert!((sample.value - 60.0).abs() < 1e-9);
        assert_eq!(sample.frame, 30);

        // Next interval counts from frame 30.
        let sample = clock
            .measure_fps(start + Duration::from_millis(1000), 45)
            .expect("interval elapsed");
        assert!((sample.value - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_poll_restarts() {
        let start = Instant::now();
        let mut clock = IntervalClock::new(1.0, start);
        assert!(!clock.poll(start, 0));
        assert!(clock.poll(start + Duration::from_secs(1), 10));
        assert!(!clock.poll(start + Duration::from_millis(1500), 20));
    }

    #[test]
    fn test_interval_clamped() {
        assert_eq!(interval_from_secs(0.0), Duration::from_secs_f32(MIN_INTERVAL_SECS));
        assert_eq!(interval_from_secs(-3.0), Duration::from_secs_f32(MIN_INTERVAL_SECS));
        assert_eq!(interval_from_secs(f32::INFINITY), FALLBACK_INTERVAL);
        assert_eq!(interval_from_secs(2.0), Duration::from_secs(2));
    }

    #[test]
    fn test_set_interval_keeps_start() {
        let start = Instant::now();
        let mut clock = IntervalClock::new(10.0, start);
        clock.set_interval(0.1);
        assert!(clock.due(start + Duration::from_millis(150)));
    }
}
