//! Reset detector — two-slot history of the most probable run length.
//!
//! The engine collapses its posterior whenever the most probable run length
//! decreases between consecutive steps. This module keeps the last two MAP
//! run lengths as an explicit state machine:
//!
//! - `Warming { seed }`: only the initial seed (0) is in the window.
//! - `Steady { previous, latest }`: both slots hold observed values.
//!
//! The signal compares the newest value against the one before it; in the
//! `Warming` state that is the seed. The window survives posterior resets.

/// Outcome of feeding one MAP run length to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetSignal {
    Reset,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetState {
    Warming { seed: usize },
    Steady { previous: usize, latest: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetDetector {
    state: ResetState,
}

impl ResetDetector {
    pub fn new() -> Self {
        ResetDetector { state: ResetState::Warming { seed: 0 } }
    }

    /// Record `map_run_length` and report whether it dropped strictly below
    /// the previous value.
    pub fn observe(&mut self, map_run_length: usize) -> ResetSignal {
        let previous = match self.state {
            ResetState::Warming { seed } => seed,
            ResetState::Steady { latest, .. } => latest,
        };
        self.state = ResetState::Steady { previous, latest: map_run_length };

        if map_run_length < previous { ResetSignal::Reset } else { ResetSignal::Continue }
    }

    /// Return to the initial `Warming { seed: 0 }` state.
    pub fn clear(&mut self) {
        self.state = ResetState::Warming { seed: 0 };
    }

    pub fn state(&self) -> ResetState {
        self.state
    }
}

impl Default for ResetDetector {
    fn default() -> Self {
        Self::new()
    }
}
