//! Cross-tab change notification.
//!
//! Every open tab joins one shared [`SyncChannel`], regardless of which
//! account it shows. A tab that changes its whitelist broadcasts
//! [`SyncMessage::ListsChanged`]; every tab, the sender included, reloads its
//! own lists from storage on receipt. Messages carry no payload, so a
//! receiver never applies a delta and always converges on the last write.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, warn};

use crate::Result;

/// Messages buffered per receiver before it starts lagging.
pub const CHANNEL_CAPACITY: usize = 64;

/// Message exchanged between tabs.
///
/// Serializes as `{"type":"listsChanged"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SyncMessage {
    /// Some tab wrote an allow-list.
    #[serde(rename = "listsChanged")]
    ListsChanged,
}

impl SyncMessage {
    /// Encode for a host transport.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(self) -> Result<String> {
        Ok(serde_json::to_string(&self)?)
    }

    /// Decode a message from a host transport. Unknown types yield `None`.
    #[must_use]
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// The shared bus every tab joins.
#[derive(Debug, Clone)]
pub struct SyncChannel {
    sender: broadcast::Sender<SyncMessage>,
}

impl SyncChannel {
    /// Create a bus with no tabs joined.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Join the bus as a new tab.
    #[must_use]
    pub fn join(&self) -> CrossTabSync {
        CrossTabSync {
            sender: self.sender.clone(),
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of tabs currently joined.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SyncChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// One tab's endpoint on the [`SyncChannel`].
#[derive(Debug)]
pub struct CrossTabSync {
    sender: broadcast::Sender<SyncMessage>,
    receiver: broadcast::Receiver<SyncMessage>,
}

impl CrossTabSync {
    /// Fire-and-forget notification to every joined tab.
    ///
    /// Returns how many tabs the message was queued for.
    pub fn broadcast(&self, message: SyncMessage) -> usize {
        match self.sender.send(message) {
            Ok(count) => {
                debug!(?message, tabs = count, "broadcast");
                count
            }
            Err(_) => 0,
        }
    }

    /// Wait for the next message.
    ///
    /// A receiver that fell behind treats the overflow as a single change,
    /// since every message means "reload everything".
    pub async fn recv(&mut self) -> Option<SyncMessage> {
        match self.receiver.recv().await {
            Ok(message) => Some(message),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "sync receiver lagged");
                Some(SyncMessage::ListsChanged)
            }
            Err(RecvError::Closed) => None,
        }
    }

    /// Take a pending message without waiting.
    pub fn try_recv(&mut self) -> Option<SyncMessage> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Lagged(_)) => Some(SyncMessage::ListsChanged),
            Err(TryRecvError::Empty | TryRecvError::Closed) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        assert_eq!(
            SyncMessage::ListsChanged.to_json().unwrap(),
            r#"{"type":"listsChanged"}"#
        );
        assert_eq!(
            SyncMessage::from_json(r#"{"type":"listsChanged"}"#),
            Some(SyncMessage::ListsChanged)
        );
        assert_eq!(SyncMessage::from_json(r#"{"type":"updateLists"}"#), None);
    }

    #[test]
    fn test_every_tab_receives() {
        let channel = SyncChannel::new();
        let mut a = channel.join();
        let mut b = channel.join();
        assert_eq!(channel.tab_count(), 2);

        assert_eq!(a.broadcast(SyncMessage::ListsChanged), 2);

        assert_eq!(a.try_recv(), Some(SyncMessage::ListsChanged));
        assert_eq!(b.try_recv(), Some(SyncMessage::ListsChanged));
        assert_eq!(b.try_recv(), None);
    }

    #[test]
    fn test_late_joiner_sees_only_new_messages() {
        let channel = SyncChannel::new();
        let a = channel.join();
        a.broadcast(SyncMessage::ListsChanged);

        let mut late = channel.join();
        assert_eq!(late.try_recv(), None);
    }

    #[tokio::test]
    async fn test_lag_collapses_to_one_change() {
        let channel = SyncChannel::new();
        let sender = channel.join();
        let mut slow = channel.join();

        for _ in 0..CHANNEL_CAPACITY + 5 {
            sender.broadcast(SyncMessage::ListsChanged);
        }

        assert_eq!(slow.recv().await, Some(SyncMessage::ListsChanged));
    }
}
