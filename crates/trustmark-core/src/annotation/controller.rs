//! Annotation rendering and interaction.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, trace, warn};

use super::confirm::Confirmations;
use super::placement::place_detail;
use super::{Annotation, SenderDetail, TrustState};
use crate::Result;
use crate::config::Settings;
use crate::domain::domain;
use crate::storage::Storage;
use crate::sync::{CrossTabSync, SyncMessage};
use crate::view::{ListView, Point};
use crate::whitelist::{AllowList, Change, WhitelistStore};

/// Drives the annotations of one list view.
pub struct AnnotationController<V: ListView> {
    settings: Arc<Settings>,
    confirmations: Confirmations<V::Row>,
}

impl<V: ListView> AnnotationController<V> {
    /// Create a controller with the page-load settings.
    #[must_use]
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            confirmations: Confirmations::new(),
        }
    }

    /// Settings this controller renders with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Attach an annotation to a newly discovered row and mark it processed.
    ///
    /// A row that already carries an annotation is only marked. Returns
    /// `false` when the sender address cannot be classified; such rows stay
    /// unmarked.
    pub fn annotate(&self, view: &mut V, row: &V::Row, email: &str, lists: &AllowList) -> bool {
        if !view.has_annotation(row) {
            let state = TrustState::from_allowed(lists.is_allowed(email));
            match Annotation::new(email, &self.settings, state) {
                Ok(annotation) => view.attach_annotation(row, &annotation),
                Err(e) => {
                    trace!(email, "not annotating row: {e}");
                    return false;
                }
            }
        }
        view.mark_processed(row);
        true
    }

    /// Recompute the state of every annotated row and the row highlights.
    ///
    /// Returns the number of rows visited.
    pub fn refresh_all(&self, view: &mut V, lists: &AllowList) -> usize {
        let mut visited = 0;
        for row in view.rows() {
            let Some(email) = view.sender_email(&row) else {
                continue;
            };
            let allowed = lists.is_allowed(&email);

            if view.has_annotation(&row) {
                view.set_trust_state(&row, TrustState::from_allowed(allowed));
            }
            view.set_row_highlight(&row, self.settings.highlight_untrusted && !allowed);
            visited += 1;
        }
        trace!(visited, "refreshed annotations");
        visited
    }

    /// Handle a click on a row's annotation.
    ///
    /// Suppresses the host's default action, applies the click-to-toggle
    /// policy, reloads the store, re-renders every row, shows a transient
    /// confirmation on the clicked row and notifies other tabs.
    ///
    /// Returns `None` when the row has no sender address.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the toggle cannot be persisted. Nothing
    /// is re-rendered or broadcast in that case.
    pub async fn click<S: Storage>(
        &mut self,
        view: &mut V,
        row: &V::Row,
        store: &mut WhitelistStore<S>,
        sync: &CrossTabSync,
        now: Instant,
    ) -> Result<Option<Change>> {
        view.prevent_default(row);

        let Some(email) = view.sender_email(row) else {
            return Ok(None);
        };

        let change = store.toggle_sender(&email).await?;
        if let Err(e) = store.reload().await {
            // The write itself succeeded and memory already holds it.
            warn!("reload after toggle failed: {e}");
        }

        self.refresh_all(view, store.lists());
        self.confirm(view, row, &change.to_string(), now);
        sync.broadcast(SyncMessage::ListsChanged);

        debug!(%change, "toggled from annotation");
        Ok(Some(change))
    }

    /// Show `message` on the row and (re)start its auto-hide deadline.
    pub fn confirm(&mut self, view: &mut V, row: &V::Row, message: &str, now: Instant) {
        view.show_confirmation(row, message);
        self.confirmations
            .schedule(row.clone(), now + self.settings.confirmation_ttl);
    }

    /// Populate and position the shared detail surface for a row.
    ///
    /// Returns the chosen position, or `None` when the row has no sender
    /// address or no rendered annotation to anchor to.
    pub fn hover(&self, view: &mut V, row: &V::Row, lists: &AllowList) -> Option<Point> {
        let email = view.sender_email(row)?;
        let domain = domain(&email).ok()?;
        let anchor = view.anchor_rect(row)?;

        let detail = SenderDetail {
            whitelisted: lists.is_allowed(&email),
            email,
            domain,
        };
        let size = view.show_detail(&detail);
        let position = place_detail(anchor, size, view.viewport());
        view.move_detail(position);
        Some(position)
    }

    /// Hide the shared detail surface.
    pub fn hover_leave(&self, view: &mut V) {
        view.hide_detail();
    }

    /// Remove confirmations whose time is up. Returns how many were hidden.
    pub fn expire(&mut self, view: &mut V, now: Instant) -> usize {
        let due = self.confirmations.expire(now);
        for row in &due {
            view.hide_confirmation(row);
        }
        due.len()
    }

    /// Earliest confirmation deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.confirmations.next_deadline()
    }

    /// Rows with a confirmation still showing.
    #[must_use]
    pub fn pending_confirmations(&self) -> usize {
        self.confirmations.len()
    }
}
