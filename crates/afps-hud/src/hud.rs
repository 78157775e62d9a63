//! The HUD coordinator.
//!
//! [`Hud`] owns the counters, the six anchored labels and the host seams. The
//! host calls [`Hud::frame`] once per rendered frame; everything periodic is
//! driven from there.

use afps_common::{LabelAnchor, OperationMode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

use crate::config::{HudConfig, LookAndFeel};
use crate::counter::{Counter, CounterKind, DeviceInfoCounter, FpsCounter, MemoryCounter};
use crate::events::{HudEvent, HudEventBus};
use crate::host::{
    DeviceProbe, FrameRateControl, MemoryProbe, NullMemoryProbe, StaticDeviceProbe, TextSurface,
};
use crate::label::DrawableLabel;
use crate::sampler::IntervalClock;
use crate::snapshot::{DeviceSnapshot, FpsSnapshot, HudSnapshot, MemorySnapshot};

/// Delay between enabling the HUD and overriding the host frame rate.
pub const FORCED_FRAME_RATE_DELAY: Duration = Duration::from_millis(500);

const COUNTERS: [CounterKind; 3] = [CounterKind::Fps, CounterKind::Memory, CounterKind::Device];

/// Lifecycle of a [`Hud`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HudState {
    /// Constructed, not started
    #[default]
    Created,
    /// Between `start` and `dispose`
    Running,
    /// Disposed; every call is a no-op
    Disposed,
}

/// Performance HUD bound to a text surface.
pub struct Hud<S: TextSurface> {
    surface: S,
    labels: [DrawableLabel; LabelAnchor::COUNT],
    fps: FpsCounter,
    memory: MemoryCounter,
    device: DeviceInfoCounter,
    memory_probe: Box<dyn MemoryProbe>,
    device_probe: Box<dyn DeviceProbe>,
    frame_rate: Option<Box<dyn FrameRateControl>>,
    events: HudEventBus,
    state: HudState,
    mode: OperationMode,
    keep_alive: bool,
    force_frame_rate: bool,
    forced_frame_rate: i32,
    look: LookAndFeel,
    /// Host vsync count and target frame rate saved while overriding them
    cached_frame_rate: Option<(i32, i32)>,
    frame_rate_due: Option<Instant>,
    fps_clock: IntervalClock,
    memory_clock: IntervalClock,
    frame_count: u64,
    now: Instant,
}

impl<S: TextSurface> Hud<S> {
    /// Creates a HUD from `config`. Nothing is shown until [`Hud::start`].
    #[must_use]
    pub fn new(surface: S, mut config: HudConfig) -> Self {
        config.validate();

        let now = Instant::now();
        let look = config.look.clone();
        Self {
            surface,
            labels: LabelAnchor::ALL.map(|anchor| DrawableLabel::new(anchor, &look)),
            fps: FpsCounter::new(&config.fps),
            memory: MemoryCounter::new(&config.memory),
            device: DeviceInfoCounter::new(&config.device),
            memory_probe: Box::new(NullMemoryProbe),
            device_probe: Box::new(StaticDeviceProbe::default()),
            frame_rate: None,
            events: HudEventBus::default(),
            state: HudState::Created,
            mode: config.operation_mode,
            keep_alive: config.keep_alive,
            force_frame_rate: config.force_frame_rate,
            forced_frame_rate: config.forced_frame_rate,
            look,
            cached_frame_rate: None,
            frame_rate_due: None,
            fps_clock: IntervalClock::new(config.fps.update_interval, now),
            memory_clock: IntervalClock::new(config.memory.update_interval, now),
            frame_count: 0,
            now,
        }
    }

    /// Uses `probe` for memory readings.
    #[must_use]
    pub fn with_memory_probe(mut self, probe: impl MemoryProbe + 'static) -> Self {
        self.memory_probe = Box::new(probe);
        self
    }

    /// Uses `probe` for device information.
    #[must_use]
    pub fn with_device_probe(mut self, probe: impl DeviceProbe + 'static) -> Self {
        self.device_probe = Box::new(probe);
        self
    }

    /// Gives the HUD control over host frame pacing.
    #[must_use]
    pub fn with_frame_rate_control(mut self, control: impl FrameRateControl + 'static) -> Self {
        self.frame_rate = Some(Box::new(control));
        self
    }

    /// Starts the session at `now`, activating counters unless disabled.
    pub fn start(&mut self, now: Instant) {
        if self.state != HudState::Created {
            warn!(state = ?self.state, "HUD start ignored");
            return;
        }

        self.now = now;
        self.state = HudState::Running;
        self.fps.core_mut().set_live(true);
        self.memory.core_mut().set_live(true);
        self.device.core_mut().set_live(true);
        info!(mode = ?self.mode, "HUD started");

        if self.mode != OperationMode::Disabled {
            self.enable();
        }
    }

    /// Advances one host frame.
    pub fn frame(&mut self, now: Instant) {
        if self.state != HudState::Running {
            return;
        }
        self.now = now;
        self.frame_count += 1;

        if !self.mode.is_running() {
            return;
        }

        if self.frame_rate_due.is_some_and(|due| now >= due) {
            self.frame_rate_due = None;
            self.refresh_forced_frame_rate(false);
        }

        let renders = self.mode.renders();
        let mut updated = false;

        if self.fps.core().is_active() {
            if let Some(sample) = self.fps_clock.measure_fps(now, self.frame_count) {
                trace!(fps = sample.value, frame = sample.frame, "FPS sample");
                if let Some(level) = self.fps.update_value(sample.value, renders) {
                    self.events.publish(HudEvent::FpsLevelChanged { level });
                }
                updated = true;
            }
        }

        if self.memory.core().is_active() && self.memory_clock.poll(now, self.frame_count) {
            let reading = self.memory_probe.read();
            trace!(?reading, "Memory sample");
            self.memory.update_value(reading, renders);
            updated = true;
        }

        if updated {
            self.update_texts();
        }
    }

    /// Deactivates all counters, restores the host frame rate and removes
    /// all labels. Every later call is a no-op.
    pub fn dispose(&mut self) {
        if self.state == HudState::Disposed {
            return;
        }

        if self.state == HudState::Running && self.mode != OperationMode::Disabled {
            self.disable();
        } else {
            self.refresh_forced_frame_rate(true);
        }

        self.fps.dispose();
        self.memory.dispose();
        self.device.dispose();
        for label in &mut self.labels {
            label.dispose(&mut self.surface);
        }

        self.state = HudState::Disposed;
        self.events.publish(HudEvent::Disposed);
        info!(frames = self.frame_count, "HUD disposed");
    }

    /// Current operation mode.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        self.mode
    }

    /// Switches the operation mode.
    pub fn set_operation_mode(&mut self, mode: OperationMode) {
        if self.mode == mode || self.state != HudState::Running {
            return;
        }
        let previous = std::mem::replace(&mut self.mode, mode);
        info!(?previous, current = ?mode, "HUD operation mode changed");
        self.events.publish(HudEvent::OperationModeChanged {
            previous,
            current: mode,
        });

        if mode == OperationMode::Disabled {
            self.disable();
            return;
        }

        if mode == OperationMode::Background {
            self.clear_labels();
        }

        // Counters that were already running only need their text rebuilt
        // for the new mode; fresh ones show their placeholder.
        let was_active = [
            self.fps.core().is_active(),
            self.memory.core().is_active(),
            self.device.core().is_active(),
        ];
        self.enable();
        for (kind, active) in COUNTERS.into_iter().zip(was_active) {
            if active {
                self.refresh_counter(kind);
            }
        }
        self.update_texts();
    }

    /// Flips between `Normal` and `Disabled`. `Background` is left alone.
    pub fn toggle(&mut self) {
        match self.mode {
            OperationMode::Disabled => self.set_operation_mode(OperationMode::Normal),
            OperationMode::Normal => self.set_operation_mode(OperationMode::Disabled),
            OperationMode::Background => {},
        }
    }

    /// Notifies the HUD that the host loaded a new level.
    ///
    /// Without keep-alive the HUD disposes itself; otherwise the FPS average
    /// and min/max are reset if so configured.
    pub fn level_loaded(&mut self) {
        if self.state != HudState::Running {
            return;
        }
        if !self.keep_alive {
            info!("Level loaded without keep-alive, disposing HUD");
            self.dispose();
            return;
        }

        if self.fps.enabled() {
            if self.fps.show_min_max() && self.fps.reset_min_max_on_new_scene() {
                self.fps.reset_min_max();
            }
            if self.fps.show_average() && self.fps.reset_average_on_new_scene() {
                self.fps.reset_average();
            }
            self.apply_pending(CounterKind::Fps);
        }
    }

    /// Rebuilds every label from the counters' fragments.
    pub fn update_texts(&mut self) {
        for anchor in [
            self.fps.core_mut().take_stale(),
            self.memory.core_mut().take_stale(),
            self.device.core_mut().take_stale(),
        ]
        .into_iter()
        .flatten()
        {
            if self.mode.renders() {
                self.labels[anchor.index()].mark_dirty();
            }
        }

        if !self.mode.renders() {
            return;
        }

        let spacing = self.look.counters_spacing;
        let mut any = collect_fragment(&mut self.labels, &mut self.fps, spacing);
        any |= collect_fragment(&mut self.labels, &mut self.memory, spacing);
        any |= collect_fragment(&mut self.labels, &mut self.device, spacing);

        if any {
            for label in &mut self.labels {
                label.check_and_update(&mut self.surface);
            }
        } else {
            self.clear_labels();
        }
    }

    /// Gives `f` mutable access to the FPS counter, then applies whatever
    /// its setters requested.
    pub fn fps<R>(&mut self, f: impl FnOnce(&mut FpsCounter) -> R) -> R {
        let out = f(&mut self.fps);
        self.apply_pending(CounterKind::Fps);
        out
    }

    /// Gives `f` mutable access to the memory counter.
    pub fn memory<R>(&mut self, f: impl FnOnce(&mut MemoryCounter) -> R) -> R {
        let out = f(&mut self.memory);
        self.apply_pending(CounterKind::Memory);
        out
    }

    /// Gives `f` mutable access to the device information counter.
    pub fn device<R>(&mut self, f: impl FnOnce(&mut DeviceInfoCounter) -> R) -> R {
        let out = f(&mut self.device);
        self.apply_pending(CounterKind::Device);
        out
    }

    /// FPS counter, read-only.
    #[must_use]
    pub const fn fps_counter(&self) -> &FpsCounter {
        &self.fps
    }

    /// Memory counter, read-only.
    #[must_use]
    pub const fn memory_counter(&self) -> &MemoryCounter {
        &self.memory
    }

    /// Device information counter, read-only.
    #[must_use]
    pub const fn device_counter(&self) -> &DeviceInfoCounter {
        &self.device
    }

    /// Event bus the HUD publishes to.
    #[must_use]
    pub const fn events(&self) -> &HudEventBus {
        &self.events
    }

    /// Text surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Text surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Label at `anchor`.
    #[must_use]
    pub fn label(&self, anchor: LabelAnchor) -> &DrawableLabel {
        &self.labels[anchor.index()]
    }

    /// Frame rate control, if the host provided one.
    #[must_use]
    pub fn frame_rate_control(&self) -> Option<&dyn FrameRateControl> {
        self.frame_rate.as_deref()
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> HudState {
        self.state
    }

    /// Frames seen since start.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether the HUD survives level loads.
    #[must_use]
    pub const fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// Sets whether the HUD survives level loads.
    pub fn set_keep_alive(&mut self, keep_alive: bool) {
        if self.keep_alive == keep_alive || self.state != HudState::Running {
            return;
        }
        self.keep_alive = keep_alive;
    }

    /// Whether the host frame rate is overridden.
    #[must_use]
    pub const fn force_frame_rate(&self) -> bool {
        self.force_frame_rate
    }

    /// Turns the frame rate override on or off.
    pub fn set_force_frame_rate(&mut self, force: bool) {
        if self.force_frame_rate == force || self.state != HudState::Running {
            return;
        }
        self.force_frame_rate = force;
        if self.mode == OperationMode::Disabled {
            return;
        }
        self.refresh_forced_frame_rate(false);
    }

    /// Frame rate forced on the host, -1 for unlimited.
    #[must_use]
    pub const fn forced_frame_rate(&self) -> i32 {
        self.forced_frame_rate
    }

    /// Changes the forced frame rate.
    pub fn set_forced_frame_rate(&mut self, rate: i32) {
        if self.forced_frame_rate == rate || self.state != HudState::Running {
            return;
        }
        self.forced_frame_rate = rate;
        if self.mode == OperationMode::Disabled {
            return;
        }
        self.refresh_forced_frame_rate(false);
    }

    /// Label presentation settings.
    #[must_use]
    pub const fn look(&self) -> &LookAndFeel {
        &self.look
    }

    /// Moves all labels away from the screen edges.
    pub fn set_anchors_offset(&mut self, offset: (f32, f32)) {
        if self.look.anchors_offset == offset || self.state != HudState::Running {
            return;
        }
        self.look.anchors_offset = offset;
        for label in &mut self.labels {
            label.change_offset(offset, &mut self.surface);
        }
        debug!(?offset, "Label offset changed");
    }

    /// Changes the label font.
    pub fn set_font(&mut self, font: Option<String>) {
        if self.look.font == font || self.state != HudState::Running {
            return;
        }
        self.look.font = font;
        for label in &mut self.labels {
            label.change_font(self.look.font.clone(), &mut self.surface);
        }
        debug!(font = ?self.look.font, "Label font changed");
    }

    /// Changes the label font size.
    pub fn set_font_size(&mut self, size: u32) {
        if self.look.font_size == size || self.state != HudState::Running {
            return;
        }
        self.look.font_size = size;
        for label in &mut self.labels {
            label.change_font_size(size, &mut self.surface);
        }
        debug!(size, "Label font size changed");
    }

    /// Changes the label line spacing.
    pub fn set_line_spacing(&mut self, spacing: f32) {
        if (self.look.line_spacing - spacing).abs() < 0.001 || self.state != HudState::Running {
            return;
        }
        self.look.line_spacing = spacing;
        for label in &mut self.labels {
            label.change_line_spacing(spacing, &mut self.surface);
        }
        debug!(spacing, "Label line spacing changed");
    }

    /// Changes the number of empty lines between counters on one anchor.
    pub fn set_counters_spacing(&mut self, spacing: u32) {
        if self.look.counters_spacing == spacing || self.state != HudState::Running {
            return;
        }
        self.look.counters_spacing = spacing;
        if self.mode == OperationMode::Disabled {
            return;
        }
        for label in &mut self.labels {
            label.mark_dirty();
        }
        self.update_texts();
    }

    /// Serializable view of the HUD.
    #[must_use]
    pub fn snapshot(&self) -> HudSnapshot {
        let fps = &self.fps;
        let memory = &self.memory;
        let device = &self.device;
        HudSnapshot {
            state: self.state,
            operation_mode: self.mode,
            frame_count: self.frame_count,
            fps: FpsSnapshot {
                enabled: fps.enabled(),
                active: fps.core().is_active(),
                anchor: fps.anchor(),
                value: fps.last_value(),
                milliseconds: fps.last_milliseconds(),
                average: fps.last_average(),
                min: fps.last_minimum(),
                max: fps.last_maximum(),
                level: fps.level(),
                summary: fps.summary(),
            },
            memory: MemorySnapshot {
                enabled: memory.enabled(),
                active: memory.core().is_active(),
                anchor: memory.anchor(),
                precise: memory.precise_values(),
                total_reserved: memory.last_total(),
                allocated: memory.last_allocated(),
                mono: memory.last_mono(),
            },
            device: DeviceSnapshot {
                enabled: device.enabled(),
                active: device.core().is_active(),
                anchor: device.anchor(),
                info: device.info().clone(),
            },
        }
    }

    /// Activates counters and schedules the frame rate override.
    fn enable(&mut self) {
        for kind in COUNTERS {
            self.activate_counter(kind);
        }
        if self.fps.enabled() || self.memory.enabled() || self.device.enabled() {
            self.update_texts();
        }
        if self.force_frame_rate {
            self.frame_rate_due = Some(self.now + FORCED_FRAME_RATE_DELAY);
        }
    }

    /// Deactivates counters, restores the frame rate and removes labels.
    fn disable(&mut self) {
        self.fps.deactivate();
        self.memory.deactivate();
        self.device.deactivate();
        self.frame_rate_due = None;
        self.refresh_forced_frame_rate(true);
        self.clear_labels();
    }

    fn clear_labels(&mut self) {
        for label in &mut self.labels {
            label.clear(&mut self.surface);
        }
    }

    /// Activates one counter if it is not active yet, restarting its clock.
    fn activate_counter(&mut self, kind: CounterKind) {
        let renders = self.mode.renders();
        match kind {
            CounterKind::Fps => {
                if self.fps.core().is_active() {
                    return;
                }
                self.fps.activate(renders);
                self.fps_clock.set_interval(self.fps.update_interval());
                self.fps_clock.restart(self.now, self.frame_count);
            },
            CounterKind::Memory => {
                if self.memory.core().is_active() {
                    return;
                }
                self.memory.activate(renders);
                self.memory_clock.set_interval(self.memory.update_interval());
                self.memory_clock.restart(self.now, self.frame_count);
                self.memory.update_value(self.memory_probe.read(), renders);
            },
            CounterKind::Device => {
                if self.device.core().is_active() {
                    return;
                }
                self.device.load(self.device_probe.device_info());
                self.device.activate(renders);
            },
        }
    }

    fn deactivate_counter(&mut self, kind: CounterKind) {
        match kind {
            CounterKind::Fps => self.fps.deactivate(),
            CounterKind::Memory => self.memory.deactivate(),
            CounterKind::Device => self.device.deactivate(),
        }
    }

    /// Forced update of one counter.
    fn refresh_counter(&mut self, kind: CounterKind) {
        let renders = self.mode.renders();
        match kind {
            CounterKind::Fps => self.fps.refresh(renders),
            CounterKind::Memory => {
                let was_active = self.memory.core().is_active();
                self.memory.refresh(self.memory_probe.read(), renders);
                if !was_active && self.memory.core().is_active() {
                    self.memory_clock.restart(self.now, self.frame_count);
                }
            },
            CounterKind::Device => self.device.refresh(self.device_probe.device_info(), renders),
        }
    }

    /// Carries out what a counter's setters requested.
    fn apply_pending(&mut self, kind: CounterKind) {
        let pending = match kind {
            CounterKind::Fps => self.fps.core_mut().take_pending(),
            CounterKind::Memory => self.memory.core_mut().take_pending(),
            CounterKind::Device => self.device.core_mut().take_pending(),
        };
        if pending.is_empty() {
            return;
        }
        debug!(counter = %kind, ?pending, "Applying counter changes");

        let running = self.state == HudState::Running && self.mode.is_running();
        if running {
            if pending.toggled {
                let enabled = match kind {
                    CounterKind::Fps => self.fps.enabled(),
                    CounterKind::Memory => self.memory.enabled(),
                    CounterKind::Device => self.device.enabled(),
                };
                if enabled {
                    self.activate_counter(kind);
                } else {
                    self.deactivate_counter(kind);
                }
            }
            if pending.restart_clock {
                match kind {
                    CounterKind::Fps => {
                        self.fps_clock.set_interval(self.fps.update_interval());
                        self.fps_clock.restart(self.now, self.frame_count);
                    },
                    CounterKind::Memory => {
                        self.memory_clock.set_interval(self.memory.update_interval());
                        self.memory_clock.restart(self.now, self.frame_count);
                    },
                    CounterKind::Device => {},
                }
            }
            if pending.refresh {
                self.refresh_counter(kind);
            }
        }

        self.update_texts();
    }

    /// Applies or restores the host frame rate override.
    fn refresh_forced_frame_rate(&mut self, disabling: bool) {
        let Some(control) = self.frame_rate.as_mut() else {
            return;
        };

        if self.force_frame_rate && !disabling {
            if self.cached_frame_rate.is_none() {
                self.cached_frame_rate =
                    Some((control.vsync_count(), control.target_frame_rate()));
                control.set_vsync_count(0);
            }
            control.set_target_frame_rate(self.forced_frame_rate);
            info!(rate = self.forced_frame_rate, "Forced frame rate applied");
        } else if let Some((vsync, target)) = self.cached_frame_rate.take() {
            control.set_vsync_count(vsync);
            control.set_target_frame_rate(target);
            info!(vsync, target, "Host frame rate restored");
        }
    }
}

/// Appends an enabled counter's fragment to the label at its anchor.
/// Returns whether the counter is enabled.
fn collect_fragment(
    labels: &mut [DrawableLabel; LabelAnchor::COUNT],
    counter: &mut dyn Counter,
    spacing: u32,
) -> bool {
    if !counter.enabled() {
        return false;
    }
    let core = counter.core_mut();
    let dirty = core.take_dirty();
    if !core.text().is_empty() {
        labels[core.anchor().index()].append(core.text(), spacing, dirty);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::CounterState;
    use crate::host::{MemoryReading, RecordingSurface};
    use crate::markup::strip_markup;
    use crate::tier::Tier;
    use std::cell::Cell;
    use std::rc::Rc;

    fn fps_only() -> HudConfig {
        let mut config = HudConfig::default();
        config.memory.enabled = false;
        config.device.enabled = false;
        config
    }

    fn plain(hud: &Hud<RecordingSurface>, anchor: LabelAnchor) -> Option<String> {
        hud.surface().text(anchor).map(strip_markup)
    }

    /// Calls `frame` `count` times, `step` apart, starting one step after `from`.
    fn run_frames(
        hud: &mut Hud<RecordingSurface>,
        from: Instant,
        step: Duration,
        count: u32,
    ) -> Instant {
        let mut now = from;
        for _ in 0..count {
            now += step;
            hud.frame(now);
        }
        now
    }

    #[derive(Debug, Clone)]
    struct FakePacing {
        vsync: Rc<Cell<i32>>,
        target: Rc<Cell<i32>>,
    }

    impl FrameRateControl for FakePacing {
        fn vsync_count(&self) -> i32 {
            self.vsync.get()
        }
        fn set_vsync_count(&mut self, count: i32) {
            self.vsync.set(count);
        }
        fn target_frame_rate(&self) -> i32 {
            self.target.get()
        }
        fn set_target_frame_rate(&mut self, rate: i32) {
            self.target.set(rate);
        }
    }

    struct FixedMemory(MemoryReading);

    impl MemoryProbe for FixedMemory {
        fn read(&self) -> MemoryReading {
            self.0
        }
    }

    #[test]
    fn test_start_shows_placeholders() {
        let mut hud = Hud::new(RecordingSurface::new(), HudConfig::default());
        assert_eq!(hud.surface().visible_anchors().count(), 0);

        hud.start(Instant::now());

        assert_eq!(
            plain(&hud, LabelAnchor::UpperLeft).as_deref(),
            Some("FPS: 0\nMEM TOTAL: 0 MB\nMEM ALLOC: 0 MB")
        );
        assert!(plain(&hud, LabelAnchor::LowerLeft)
            .is_some_and(|text| text.starts_with("CPU: ")));
        assert_eq!(hud.state(), HudState::Running);
    }

    #[test]
    fn test_frames_drive_fps_counter() {
        let start = Instant::now();
        let mut hud = Hud::new(RecordingSurface::new(), fps_only());
        hud.start(start);

        run_frames(&mut hud, start, Duration::from_millis(10), 50);

        assert_eq!(hud.fps_counter().last_value(), 100);
        assert_eq!(
            plain(&hud, LabelAnchor::UpperLeft).as_deref(),
            Some("FPS: 100 [10.00 MS] AVG: 100")
        );
    }

    #[test]
    fn test_level_change_published() {
        let start = Instant::now();
        let mut hud = Hud::new(RecordingSurface::new(), fps_only());
        hud.start(start);

        run_frames(&mut hud, start, Duration::from_millis(100), 5);

        assert_eq!(hud.fps_counter().last_value(), 10);
        assert!(hud.events().drain().contains(&HudEvent::FpsLevelChanged {
            level: Tier::Critical
        }));
    }

    #[test]
    fn test_memory_sampled_on_interval() {
        let start = Instant::now();
        let mut config = HudConfig::default();
        config.fps.enabled = false;
        config.device.enabled = false;
        let reading = MemoryReading {
            total_reserved: 256 * 1_048_576,
            total_allocated: 128 * 1_048_576,
            managed: 0,
        };
        let mut hud =
            Hud::new(RecordingSurface::new(), config).with_memory_probe(FixedMemory(reading));
        hud.start(start);

        // Sampled right away on activation.
        assert_eq!(hud.memory_counter().last_total(), 256);
        assert_eq!(
            plain(&hud, LabelAnchor::UpperLeft).as_deref(),
            Some("MEM TOTAL: 256 MB\nMEM ALLOC: 128 MB")
        );
    }

    #[test]
    fn test_toggle_disables_and_restores() {
        let mut hud = Hud::new(RecordingSurface::new(), fps_only());
        hud.start(Instant::now());
        hud.events().drain();

        hud.toggle();
        assert_eq!(hud.operation_mode(), OperationMode::Disabled);
        assert_eq!(hud.surface().visible_anchors().count(), 0);
        assert!(!hud.fps_counter().core().is_active());

        hud.toggle();
        assert_eq!(hud.operation_mode(), OperationMode::Normal);
        assert_eq!(plain(&hud, LabelAnchor::UpperLeft).as_deref(), Some("FPS: 0"));

        let events = hud.events().drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            HudEvent::OperationModeChanged {
                previous: OperationMode::Normal,
                current: OperationMode::Disabled
            }
        ));
    }

    #[test]
    fn test_background_samples_without_labels() {
        let start = Instant::now();
        let mut hud = Hud::new(RecordingSurface::new(), fps_only());
        hud.start(start);
        hud.set_operation_mode(OperationMode::Background);
        assert_eq!(hud.surface().visible_anchors().count(), 0);

        let now = run_frames(&mut hud, start, Duration::from_millis(10), 50);
        assert_eq!(hud.fps_counter().last_value(), 100);
        assert_eq!(hud.surface().visible_anchors().count(), 0);

        hud.frame(now);
        hud.set_operation_mode(OperationMode::Normal);
        assert!(plain(&hud, LabelAnchor::UpperLeft)
            .is_some_and(|text| text.starts_with("FPS: 100")));
    }

    #[test]
    fn test_moving_counter_between_anchors() {
        let mut hud = Hud::new(RecordingSurface::new(), HudConfig::default());
        hud.start(Instant::now());

        hud.fps(|c| c.set_anchor(LabelAnchor::UpperRight));

        assert_eq!(plain(&hud, LabelAnchor::UpperRight).as_deref(), Some("FPS: 0"));
        assert_eq!(
            plain(&hud, LabelAnchor::UpperLeft).as_deref(),
            Some("MEM TOTAL: 0 MB\nMEM ALLOC: 0 MB")
        );
    }

    #[test]
    fn test_disabling_counter_removes_fragment() {
        let mut hud = Hud::new(RecordingSurface::new(), HudConfig::default());
        hud.start(Instant::now());

        hud.memory(|c| c.set_enabled(false));
        assert_eq!(plain(&hud, LabelAnchor::UpperLeft).as_deref(), Some("FPS: 0"));

        hud.device(|c| c.set_enabled(false));
        assert!(hud.surface().text(LabelAnchor::LowerLeft).is_none());

        hud.memory(|c| c.set_enabled(true));
        assert_eq!(
            plain(&hud, LabelAnchor::UpperLeft).as_deref(),
            Some("FPS: 0\nMEM TOTAL: 0 MB\nMEM ALLOC: 0 MB")
        );
    }

    #[test]
    fn test_setters_ignored_before_start() {
        let mut hud = Hud::new(RecordingSurface::new(), fps_only());
        hud.fps(|c| c.set_show_average(false));
        hud.set_font_size(20);
        assert!(hud.fps_counter().show_average());
        assert_eq!(hud.look().font_size, 0);
    }

    #[test]
    fn test_setter_refreshes_label() {
        let start = Instant::now();
        let mut hud = Hud::new(RecordingSurface::new(), fps_only());
        hud.start(start);
        run_frames(&mut hud, start, Duration::from_millis(10), 50);

        hud.fps(|c| c.set_show_milliseconds(false));
        assert_eq!(
            plain(&hud, LabelAnchor::UpperLeft).as_deref(),
            Some("FPS: 100 AVG: 100")
        );
    }

    #[test]
    fn test_counters_spacing() {
        let mut hud = Hud::new(RecordingSurface::new(), HudConfig::default());
        hud.start(Instant::now());
        hud.set_counters_spacing(1);
        assert!(plain(&hud, LabelAnchor::UpperLeft)
            .is_some_and(|text| text.starts_with("FPS: 0\n\nMEM TOTAL")));
    }

    #[test]
    fn test_look_and_feel_restyles_labels() {
        let mut hud = Hud::new(RecordingSurface::new(), fps_only());
        hud.start(Instant::now());
        hud.set_font_size(24);
        hud.set_anchors_offset((8.0, 3.0));
        hud.set_font(Some("Mono".to_string()));
        hud.set_line_spacing(1.5);

        let style = hud
            .surface()
            .style(LabelAnchor::UpperLeft)
            .expect("label visible");
        assert_eq!(style.font_size, 24);
        assert_eq!(style.pixel_offset, (8.0, -3.0));
        assert_eq!(style.font.as_deref(), Some("Mono"));
        assert!((style.line_spacing - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_level_loaded_resets_min_max() {
        let start = Instant::now();
        let mut config = fps_only();
        config.fps.show_min_max = true;
        config.fps.min_max_intervals_to_skip = 0;
        config.fps.reset_min_max_on_new_scene = true;
        let mut hud = Hud::new(RecordingSurface::new(), config);
        hud.start(start);
        run_frames(&mut hud, start, Duration::from_millis(10), 50);
        assert_eq!(hud.fps_counter().last_minimum(), 100);

        hud.level_loaded();
        assert_eq!(hud.fps_counter().last_minimum(), -1);
        assert_eq!(hud.state(), HudState::Running);
        assert!(plain(&hud, LabelAnchor::UpperLeft)
            .is_some_and(|text| text.ends_with("MIN: -1 MAX: -1")));
    }

    #[test]
    fn test_level_loaded_without_keep_alive_disposes() {
        let mut config = fps_only();
        config.keep_alive = false;
        let mut hud = Hud::new(RecordingSurface::new(), config);
        hud.start(Instant::now());

        hud.level_loaded();
        assert_eq!(hud.state(), HudState::Disposed);
        assert_eq!(hud.surface().visible_anchors().count(), 0);
        assert!(hud.events().drain().contains(&HudEvent::Disposed));
    }

    #[test]
    fn test_keep_alive_changes_only_while_running() {
        let mut config = fps_only();
        config.keep_alive = false;
        let mut hud = Hud::new(RecordingSurface::new(), config);
        hud.set_keep_alive(true);
        assert!(!hud.keep_alive());

        hud.start(Instant::now());
        hud.set_keep_alive(true);
        hud.level_loaded();
        assert_eq!(hud.state(), HudState::Running);

        hud.dispose();
        hud.set_keep_alive(false);
        assert!(hud.keep_alive());
    }

    #[test]
    fn test_forced_frame_rate_applied_after_delay_and_restored() {
        let start = Instant::now();
        let vsync = Rc::new(Cell::new(1));
        let target = Rc::new(Cell::new(60));
        let mut config = fps_only();
        config.force_frame_rate = true;
        config.forced_frame_rate = 30;

        let mut hud = Hud::new(RecordingSurface::new(), config).with_frame_rate_control(
            FakePacing {
                vsync: Rc::clone(&vsync),
                target: Rc::clone(&target),
            },
        );
        hud.start(start);

        hud.frame(start + Duration::from_millis(100));
        assert_eq!((vsync.get(), target.get()), (1, 60));

        hud.frame(start + Duration::from_millis(600));
        assert_eq!((vsync.get(), target.get()), (0, 30));

        hud.set_forced_frame_rate(45);
        assert_eq!(target.get(), 45);

        hud.dispose();
        assert_eq!((vsync.get(), target.get()), (1, 60));
    }

    #[test]
    fn test_dispose_is_final() {
        let start = Instant::now();
        let mut hud = Hud::new(RecordingSurface::new(), HudConfig::default());
        hud.start(start);
        assert_eq!(hud.fps_counter().core().state(), CounterState::Active);
        assert_eq!(hud.memory_counter().core().state(), CounterState::Active);
        assert_eq!(hud.device_counter().core().state(), CounterState::Active);

        hud.dispose();
        assert_eq!(hud.fps_counter().core().state(), CounterState::Inactive);
        assert_eq!(hud.memory_counter().core().state(), CounterState::Inactive);
        assert_eq!(hud.device_counter().core().state(), CounterState::Inactive);
        hud.dispose();
        hud.dispose();

        run_frames(&mut hud, start, Duration::from_millis(10), 100);
        hud.set_operation_mode(OperationMode::Background);

        assert_eq!(hud.frame_count(), 0);
        assert_eq!(hud.operation_mode(), OperationMode::Normal);
        assert_eq!(hud.surface().visible_anchors().count(), 0);
        assert!(!hud.fps_counter().core().is_active());
        assert_eq!(
            hud.events()
                .drain()
                .iter()
                .filter(|e| **e == HudEvent::Disposed)
                .count(),
            1
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let start = Instant::now();
        let mut hud = Hud::new(RecordingSurface::new(), fps_only());
        hud.start(start);
        run_frames(&mut hud, start, Duration::from_millis(10), 50);

        let snapshot = hud.snapshot();
        assert_eq!(snapshot.fps.value, 100);
        assert_eq!(snapshot.frame_count, 50);

        let json = snapshot.to_json_pretty().expect("serializes");
        assert!(json.contains("\"operation_mode\": \"Normal\""));
    }
}
