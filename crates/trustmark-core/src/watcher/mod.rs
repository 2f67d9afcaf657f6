//! Row discovery over a continuously mutating list view.
//!
//! The host reports raw mutations; the watcher debounces them and, once the
//! list has been quiet for the debounce window, scans the live view for rows
//! that have not been annotated yet.
//!
//! ```text
//! Idle --signal--> Debouncing --signal (reset)--> Debouncing
//!                      |
//!                  deadline
//!                      v
//!                  Scanning --> deliver (row, email) pairs --> Idle
//! ```
//!
//! A row whose email attribute is missing at scan time is left unmarked and
//! picked up by the scan that follows its next mutation.

mod debounce;

use tokio::time::Instant;
use tracing::{debug, trace};

pub use debounce::{DebounceState, Debouncer};

use crate::config::Settings;
use crate::view::ListView;

/// Debounced scanner for unannotated rows.
#[derive(Debug, Clone)]
pub struct RowWatcher {
    debouncer: Debouncer,
}

impl RowWatcher {
    /// Create a watcher using the configured debounce window.
    #[must_use]
    pub const fn new(settings: &Settings) -> Self {
        Self {
            debouncer: Debouncer::new(settings.debounce),
        }
    }

    /// Record a raw mutation of the list.
    pub fn on_mutation(&mut self, now: Instant) {
        self.debouncer.signal(now);
    }

    /// Whether a debounced scan is due at `now`. Consumes the pending firing.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debouncer.fire(now) {
            Some(signals) => {
                debug!(signals, "mutation burst settled");
                true
            }
            None => false,
        }
    }

    /// When the pending scan is due, if any.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Drop a pending scan.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    /// Current debounce state.
    #[must_use]
    pub const fn state(&self) -> DebounceState {
        self.debouncer.state()
    }

    /// Enumerate unprocessed rows that expose a sender address.
    ///
    /// Reads the view as it is now; nothing from earlier passes is reused.
    pub fn scan<V: ListView>(&self, view: &V) -> Vec<(V::Row, String)> {
        let rows = view.rows();
        let total = rows.len();

        let found: Vec<(V::Row, String)> = rows
            .into_iter()
            .filter(|row| !view.is_processed(row))
            .filter_map(|row| match view.sender_email(&row) {
                Some(email) => Some((row, email)),
                None => {
                    trace!(?row, "row has no sender address yet");
                    None
                }
            })
            .collect();

        debug!(total, new = found.len(), "scanned list view");
        found
    }
}
