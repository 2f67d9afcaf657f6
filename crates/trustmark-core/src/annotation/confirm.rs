//! Auto-hide deadlines for toggle confirmations.

use tokio::time::Instant;

/// Pending confirmation removals, at most one per row.
#[derive(Debug, Clone)]
pub struct Confirmations<R> {
    pending: Vec<(R, Instant)>,
}

impl<R> Default for Confirmations<R> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<R: PartialEq> Confirmations<R> {
    /// Create with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule removal for `row`, replacing any earlier deadline for it.
    pub fn schedule(&mut self, row: R, deadline: Instant) {
        self.cancel(&row);
        self.pending.push((row, deadline));
    }

    /// Forget the pending removal for `row`. Returns whether one existed.
    pub fn cancel(&mut self, row: &R) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(r, _)| r != row);
        self.pending.len() != before
    }

    /// Take every row whose deadline has passed.
    pub fn expire(&mut self, now: Instant) -> Vec<R> {
        let (due, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(_, deadline)| *deadline <= now);
        self.pending = keep;
        due.into_iter().map(|(row, _)| row).collect()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(_, deadline)| *deadline).min()
    }

    /// Number of pending removals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
