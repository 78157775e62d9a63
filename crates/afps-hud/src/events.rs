//! Event bus for HUD notifications.
//!
//! Replaces per-field callbacks: the HUD publishes, the host drains whenever
//! it likes.

use afps_common::OperationMode;
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::tier::Tier;

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 64;

/// Notifications published by the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HudEvent {
    /// FPS moved into a different tier
    FpsLevelChanged {
        /// New tier
        level: Tier,
    },
    /// Operation mode changed
    OperationModeChanged {
        /// Mode before the change
        previous: OperationMode,
        /// Mode after the change
        current: OperationMode,
    },
    /// HUD was disposed
    Disposed,
}

/// Bounded event bus for broadcasting HUD events.
#[derive(Debug)]
pub struct HudEventBus {
    /// Sender for broadcasting events
    sender: Sender<HudEvent>,
    /// Receiver for collecting events
    receiver: Receiver<HudEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for HudEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HudEventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self {
            sender,
            receiver,
            capacity: capacity.max(1),
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: HudEvent) {
        // Non-blocking send - if full, event is dropped
        if self.sender.try_send(event).is_err() {
            tracing::trace!(?event, "HUD event dropped, bus full");
        }
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<HudEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a receiver handle that competes for the same events.
    #[must_use]
    pub fn subscriber(&self) -> Receiver<HudEvent> {
        self.receiver.clone()
    }
}
