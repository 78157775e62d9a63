//! Counters: sources of label fragments.
//!
//! Each counter owns a [`CounterCore`] holding what every counter shares: the
//! enabled flag, anchor, color, text buffer and dirty flag. Setters never call
//! back into the HUD; they record [`Pending`] work that the HUD drains right
//! after the caller is done with the counter.

mod device;
mod fps;
mod memory;

pub use device::*;
pub use fps::*;
pub use memory::*;

use afps_common::{LabelAnchor, Rgba};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which counter a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterKind {
    /// Frames per second
    Fps,
    /// Memory usage
    Memory,
    /// Device information
    Device,
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fps => "fps",
            Self::Memory => "memory",
            Self::Device => "device",
        })
    }
}

/// Lifecycle state of a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CounterState {
    /// Not sampling, no text
    #[default]
    Inactive,
    /// Sampling and producing text
    Active,
}

/// Work requested by counter setters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pending {
    /// Enabled flag flipped; activate or deactivate accordingly
    pub toggled: bool,
    /// Re-run the counter with `force` and rebuild labels
    pub refresh: bool,
    /// Update interval changed; restart the sampling clock
    pub restart_clock: bool,
    /// Labels must be rebuilt
    pub update_texts: bool,
}

impl Pending {
    /// Whether nothing was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// State shared by all counters.
#[derive(Debug, Clone)]
pub struct CounterCore {
    enabled: bool,
    anchor: LabelAnchor,
    color: Rgba,
    text: String,
    dirty: bool,
    state: CounterState,
    live: bool,
    pending: Pending,
    stale: Vec<LabelAnchor>,
}

impl CounterCore {
    /// Creates an inactive core.
    #[must_use]
    pub fn new(enabled: bool, anchor: LabelAnchor, color: Rgba) -> Self {
        Self {
            enabled,
            anchor,
            color,
            text: String::new(),
            dirty: false,
            state: CounterState::Inactive,
            live: false,
            pending: Pending::default(),
            stale: Vec::new(),
        }
    }

    /// Whether the counter is enabled.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Label anchor.
    #[must_use]
    pub const fn anchor(&self) -> LabelAnchor {
        self.anchor
    }

    /// Base color.
    #[must_use]
    pub const fn color(&self) -> Rgba {
        self.color
    }

    /// Current text fragment.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the fragment changed since labels last took it.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> CounterState {
        self.state
    }

    /// Whether the counter is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == CounterState::Active
    }

    /// Whether the owning HUD session is running.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.live
    }

    /// Enables or disables the counter.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled || !self.live {
            return;
        }
        self.enabled = enabled;
        self.pending.toggled = true;
    }

    /// Moves the counter to another anchor.
    pub fn set_anchor(&mut self, anchor: LabelAnchor) {
        if self.anchor == anchor || !self.live {
            return;
        }
        let previous = std::mem::replace(&mut self.anchor, anchor);
        if !self.enabled {
            return;
        }
        self.dirty = true;
        self.stale.push(previous);
        self.pending.update_texts = true;
    }

    /// Stores a new base color. Returns whether the enabled counter must
    /// rebuild its cached tags.
    pub(crate) fn replace_color(&mut self, color: Rgba) -> bool {
        if self.color == color || !self.live {
            return false;
        }
        self.color = color;
        self.enabled
    }

    /// Asks the HUD for a forced refresh if the counter is enabled.
    pub(crate) fn request_refresh(&mut self) {
        if self.enabled {
            self.pending.refresh = true;
        }
    }

    pub(crate) fn request_clock_restart(&mut self) {
        if self.enabled {
            self.pending.restart_clock = true;
        }
    }

    pub(crate) fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_live(&mut self, live: bool) {
        self.live = live;
    }

    /// Hands the fragment's dirty flag over to a label.
    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn take_pending(&mut self) -> Pending {
        std::mem::take(&mut self.pending)
    }

    /// Anchors whose labels lost or changed content outside a normal update.
    pub(crate) fn take_stale(&mut self) -> Vec<LabelAnchor> {
        std::mem::take(&mut self.stale)
    }

    /// Enters the active state with an empty buffer.
    pub(crate) fn activate(&mut self) {
        self.text.clear();
        self.state = CounterState::Active;
    }

    /// Leaves the active state, clearing the buffer.
    pub(crate) fn deactivate(&mut self) {
        self.text.clear();
        self.dirty = false;
        self.state = CounterState::Inactive;
        self.stale.push(self.anchor);
    }

    /// Releases the buffer and ends the session.
    pub(crate) fn dispose(&mut self) {
        self.text = String::new();
        self.live = false;
        self.pending = Pending::default();
        self.stale.clear();
    }
}

/// Lifecycle shared by all counters.
pub trait Counter {
    /// Which counter this is.
    fn kind(&self) -> CounterKind;

    /// Shared state.
    fn core(&self) -> &CounterCore;

    /// Shared state, mutably.
    fn core_mut(&mut self) -> &mut CounterCore;

    /// `Inactive -> Active`: allocates the buffer and writes the placeholder
    /// fragment when `renders`. No-op when disabled or already active.
    fn activate(&mut self, renders: bool);

    /// `Active -> Inactive`: clears the buffer and resets accumulators.
    fn deactivate(&mut self);

    /// Deactivates and releases everything the counter holds.
    fn dispose(&mut self) {
        self.deactivate();
        self.core_mut().dispose();
    }

    /// Whether the counter is enabled.
    fn enabled(&self) -> bool {
        self.core().enabled()
    }

    /// Enables or disables the counter.
    fn set_enabled(&mut self, enabled: bool) {
        self.core_mut().set_enabled(enabled);
    }

    /// Label anchor.
    fn anchor(&self) -> LabelAnchor {
        self.core().anchor()
    }

    /// Moves the counter to another anchor.
    fn set_anchor(&mut self, anchor: LabelAnchor) {
        self.core_mut().set_anchor(anchor);
    }

    /// Base color.
    fn color(&self) -> Rgba {
        self.core().color()
    }

    /// Changes the base color.
    fn set_color(&mut self, color: Rgba);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_core() -> CounterCore {
        let mut core = CounterCore::new(true, LabelAnchor::UpperLeft, Rgba::WHITE);
        core.set_live(true);
        core
    }

    #[test]
    fn test_setters_ignored_outside_session() {
        let mut core = CounterCore::new(true, LabelAnchor::UpperLeft, Rgba::WHITE);
        core.set_enabled(false);
        core.set_anchor(LabelAnchor::LowerRight);
        assert!(core.enabled());
        assert_eq!(core.anchor(), LabelAnchor::UpperLeft);
        assert!(core.take_pending().is_empty());
    }

    #[test]
    fn test_unchanged_value_is_noop() {
        let mut core = live_core();
        core.set_enabled(true);
        core.set_anchor(LabelAnchor::UpperLeft);
        assert!(core.take_pending().is_empty());
        assert!(core.take_stale().is_empty());
    }

    #[test]
    fn test_set_anchor_marks_previous_stale() {
        let mut core = live_core();
        core.set_anchor(LabelAnchor::LowerCenter);
        assert_eq!(core.anchor(), LabelAnchor::LowerCenter);
        assert_eq!(core.take_stale(), vec![LabelAnchor::UpperLeft]);
        assert!(core.take_pending().update_texts);
        assert!(core.is_dirty());
    }

    #[test]
    fn test_disabled_counter_only_stores_anchor() {
        let mut core = live_core();
        core.set_enabled(false);
        let _ = core.take_pending();
        core.set_anchor(LabelAnchor::LowerLeft);
        assert_eq!(core.anchor(), LabelAnchor::LowerLeft);
        assert!(core.take_pending().is_empty());
    }

    #[test]
    fn test_lifecycle_clears_text() {
        let mut core = live_core();
        core.activate();
        core.text_mut().push_str("x");
        core.mark_dirty();
        assert!(core.is_active());

        core.deactivate();
        assert_eq!(core.state(), CounterState::Inactive);
        assert!(core.text().is_empty());
        assert!(!core.is_dirty());
        assert_eq!(core.take_stale(), vec![LabelAnchor::UpperLeft]);

        core.dispose();
        assert!(!core.is_live());
    }
}
