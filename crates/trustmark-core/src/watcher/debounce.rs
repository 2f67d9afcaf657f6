//! Resettable debounce timer.

use std::time::Duration;

use tokio::time::Instant;

/// Where the debouncer is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceState {
    /// No signal pending.
    #[default]
    Idle,
    /// Waiting for the window to pass without further signals.
    Debouncing {
        /// When the pending scan fires unless reset.
        deadline: Instant,
    },
}

/// Coalesces bursts of signals into one firing.
///
/// Time is passed in by the caller, so the state machine can be driven by a
/// real event loop or stepped through simulated bursts.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    state: DebounceState,
    pending_signals: usize,
}

impl Debouncer {
    /// Create an idle debouncer.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            state: DebounceState::Idle,
            pending_signals: 0,
        }
    }

    /// Record a signal, restarting the window.
    pub fn signal(&mut self, now: Instant) {
        self.state = DebounceState::Debouncing {
            deadline: now + self.window,
        };
        self.pending_signals += 1;
    }

    /// Fire if the window has passed. Returns the number of signals
    /// coalesced into this firing, or `None` if nothing fired.
    pub fn fire(&mut self, now: Instant) -> Option<usize> {
        match self.state {
            DebounceState::Debouncing { deadline } if now >= deadline => {
                self.state = DebounceState::Idle;
                Some(std::mem::take(&mut self.pending_signals))
            }
            _ => None,
        }
    }

    /// Drop any pending firing.
    pub fn cancel(&mut self) {
        self.state = DebounceState::Idle;
        self.pending_signals = 0;
    }

    /// When the pending firing is due.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Idle => None,
            DebounceState::Debouncing { deadline } => Some(deadline),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> DebounceState {
        self.state
    }
}
