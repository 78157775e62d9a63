//! HUD operation modes.

use serde::{Deserialize, Serialize};

/// How the HUD runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OperationMode {
    /// Labels removed and all counters stopped.
    Disabled,
    /// Counters keep sampling but no labels are drawn.
    Background,
    /// Counters sample and labels are drawn.
    #[default]
    Normal,
}

impl OperationMode {
    /// Whether counters should be sampling in this mode.
    #[must_use]
    pub const fn is_running(self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Whether label text should be produced in this mode.
    #[must_use]
    pub const fn renders(self) -> bool {
        matches!(self, Self::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_flags() {
        assert!(!OperationMode::Disabled.is_running());
        assert!(OperationMode::Background.is_running());
        assert!(!OperationMode::Background.renders());
        assert!(OperationMode::Normal.renders());
    }
}
