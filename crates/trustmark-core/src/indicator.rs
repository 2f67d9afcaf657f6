//! Per-tab wiring of the trust indicator.
//!
//! A [`TrustIndicator`] owns one tab's view adapter, whitelist store, sync
//! endpoint, row watcher and annotation controller. The host either calls
//! its methods directly or feeds [`HostEvent`]s into [`TrustIndicator::run`],
//! which multiplexes them with sync messages and timer deadlines on a single
//! task.

use std::future;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info, warn};

use crate::Result;
use crate::annotation::AnnotationController;
use crate::config::{self, Settings};
use crate::identity::Identity;
use crate::menu::{CommandOutcome, MenuCommand};
use crate::storage::Storage;
use crate::sync::{CrossTabSync, SyncChannel, SyncMessage};
use crate::view::{ListView, Point};
use crate::watcher::RowWatcher;
use crate::whitelist::{AllowList, Change, ListKind, Panel, WhitelistStore};

/// Input delivered by the host to [`TrustIndicator::run`].
#[derive(Debug)]
pub enum HostEvent<R> {
    /// The list view changed.
    Mutation,
    /// An annotation was clicked.
    Click(R),
    /// The pointer entered an annotation.
    HoverEnter(R),
    /// The pointer left an annotation.
    HoverLeave,
    /// A menu command was chosen (and confirmed, where required).
    Command {
        /// Chosen command.
        command: MenuCommand,
        /// Where to send the outcome.
        reply: oneshot::Sender<Result<CommandOutcome>>,
    },
    /// The panel's add button was used.
    AddEntry {
        /// Target list.
        kind: ListKind,
        /// Raw text typed by the user.
        value: String,
        /// Where to send the outcome.
        reply: oneshot::Sender<Result<Change>>,
    },
    /// A panel entry's delete button was used.
    RemoveEntry {
        /// Target list.
        kind: ListKind,
        /// Entry value.
        value: String,
        /// Where to send the outcome.
        reply: oneshot::Sender<Result<Option<Change>>>,
    },
    /// Stop the event loop.
    Shutdown,
}

/// The trust indicator of one tab.
pub struct TrustIndicator<S, V: ListView> {
    settings: Arc<Settings>,
    store: WhitelistStore<S>,
    sync: CrossTabSync,
    watcher: RowWatcher,
    controller: AnnotationController<V>,
    view: V,
    inert: bool,
}

impl<S: Storage, V: ListView> TrustIndicator<S, V> {
    /// Start the indicator for a page.
    ///
    /// Resolves the account from `page_url`, reads settings and lists, joins
    /// the sync channel and annotates the rows already present. When nothing
    /// would ever be drawn (all display settings off and both lists empty)
    /// the indicator starts inert and ignores list mutations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdentityUnresolved`](crate::Error::IdentityUnresolved)
    /// when the page URL carries no account, or a storage error if settings
    /// or lists cannot be read. Nothing is attached to the view in either
    /// case.
    pub async fn start(
        page_url: &str,
        storage: S,
        channel: &SyncChannel,
        view: V,
    ) -> Result<Self> {
        let identity = Identity::from_page_url(page_url).inspect_err(|e| {
            error!("trust indicator disabled: {e}");
        })?;
        let settings = Arc::new(Settings::load(&storage).await?);
        Self::with_settings(identity, settings, storage, channel, view).await
    }

    /// Start with an already resolved identity and settings.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the lists cannot be read.
    pub async fn with_settings(
        identity: Identity,
        settings: Arc<Settings>,
        storage: S,
        channel: &SyncChannel,
        view: V,
    ) -> Result<Self> {
        let store = WhitelistStore::load(storage, identity).await?;
        let inert = settings.shows_nothing() && store.lists().is_empty();

        let mut indicator = Self {
            watcher: RowWatcher::new(&settings),
            controller: AnnotationController::new(Arc::clone(&settings)),
            sync: channel.join(),
            settings,
            store,
            view,
            inert,
        };

        if inert {
            info!(identity = %indicator.identity(), "nothing to display, staying inert");
        } else {
            indicator.scan();
        }
        Ok(indicator)
    }

    /// Account this tab shows.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        self.store.identity()
    }

    /// Settings read at startup.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current in-memory lists.
    #[must_use]
    pub const fn lists(&self) -> &AllowList {
        self.store.lists()
    }

    /// Whether the sender passes the allow check right now.
    #[must_use]
    pub fn is_allowed(&self, email: &str) -> bool {
        self.store.is_allowed(email)
    }

    /// Whether the indicator started inert.
    #[must_use]
    pub const fn is_inert(&self) -> bool {
        self.inert
    }

    /// The view adapter.
    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }

    /// The view adapter, for the host to apply its own mutations.
    pub const fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Record a list mutation; the scan follows after the debounce window.
    pub fn on_mutation(&mut self, now: Instant) {
        if !self.inert {
            self.watcher.on_mutation(now);
        }
    }

    /// Run whatever timers are due at `now`.
    pub fn poll(&mut self, now: Instant) {
        if self.watcher.poll(now) {
            self.scan();
        }
        self.expire_confirmations(now);
    }

    /// Hide confirmations whose time is up. Returns how many were hidden.
    pub fn expire_confirmations(&mut self, now: Instant) -> usize {
        self.controller.expire(&mut self.view, now)
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.watcher.next_deadline(), self.controller.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Annotate every unprocessed row now. Returns how many were annotated.
    pub fn scan(&mut self) -> usize {
        if self.inert {
            return 0;
        }

        let mut annotated = 0;
        for (row, email) in self.watcher.scan(&self.view) {
            if self
                .controller
                .annotate(&mut self.view, &row, &email, self.store.lists())
            {
                annotated += 1;
            }
        }

        if self.settings.highlight_untrusted {
            self.controller.refresh_all(&mut self.view, self.store.lists());
        }
        annotated
    }

    /// Handle a click on a row's annotation.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the toggle cannot be persisted.
    pub async fn click(&mut self, row: &V::Row, now: Instant) -> Result<Option<Change>> {
        self.controller
            .click(&mut self.view, row, &mut self.store, &self.sync, now)
            .await
    }

    /// Show the detail surface for a row.
    pub fn hover(&mut self, row: &V::Row) -> Option<Point> {
        self.controller.hover(&mut self.view, row, self.store.lists())
    }

    /// Hide the detail surface.
    pub fn hover_leave(&mut self) {
        self.controller.hover_leave(&mut self.view);
    }

    /// React to a message from another tab (or this one).
    ///
    /// # Errors
    ///
    /// Returns a storage error if the lists cannot be re-read.
    pub async fn handle_sync(&mut self, message: SyncMessage) -> Result<()> {
        match message {
            SyncMessage::ListsChanged => {
                self.store.reload().await?;
                debug!(identity = %self.identity(), "reloaded after sync signal");
                self.refresh();
            }
        }
        Ok(())
    }

    /// Apply every pending sync message without waiting.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the lists cannot be re-read.
    pub async fn drain_sync(&mut self) -> Result<usize> {
        let mut handled = 0;
        while let Some(message) = self.sync.try_recv() {
            self.handle_sync(message).await?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Snapshot for the management panel.
    #[must_use]
    pub fn panel(&self) -> Panel {
        Panel::from_lists(self.store.lists())
    }

    /// Validate and append a panel entry, then re-render and notify tabs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) for
    /// malformed input or a storage error; nothing is broadcast in either
    /// case.
    pub async fn add_entry(&mut self, kind: ListKind, value: &str) -> Result<Change> {
        let change = self.store.add(kind, value).await?;
        self.after_write().await;
        Ok(change)
    }

    /// Remove a panel entry, then re-render and notify tabs.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the list cannot be persisted.
    pub async fn remove_entry(
        &mut self,
        kind: ListKind,
        value: &str,
    ) -> Result<Option<Change>> {
        let change = self.store.remove(kind, value).await?;
        if change.is_some() {
            self.after_write().await;
        }
        Ok(change)
    }

    /// Empty both lists of this account, then re-render and notify tabs.
    ///
    /// # Errors
    ///
    /// Returns a storage error if either list cannot be persisted.
    pub async fn clear_lists(&mut self) -> Result<()> {
        self.store.clear().await?;
        self.after_write().await;
        Ok(())
    }

    /// Run a menu command.
    ///
    /// Commands with a [`confirmation_prompt`](MenuCommand::confirmation_prompt)
    /// must be confirmed by the host before they are passed here.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a setting or list cannot be persisted.
    pub async fn run_command(&mut self, command: MenuCommand) -> Result<CommandOutcome> {
        if let Some(flag) = command.flag() {
            let enabled = !self.settings.flag(flag);
            config::set_flag(self.store.storage(), flag, enabled).await?;
            info!(flag = flag.key(), enabled, "setting changed");
            return Ok(CommandOutcome::ReloadPage { flag, enabled });
        }

        match command {
            MenuCommand::ClearAll => {
                self.clear_lists().await?;
                Ok(CommandOutcome::ListsCleared)
            }
            _ => Ok(CommandOutcome::OpenPanel(self.panel())),
        }
    }

    /// Process host events, sync messages and timers until the host shuts
    /// down or drops its sender.
    ///
    /// Failed operations are logged and abandoned; the loop keeps running.
    pub async fn run(&mut self, mut events: mpsc::Receiver<HostEvent<V::Row>>) {
        loop {
            let deadline = self.next_deadline();

            tokio::select! {
                event = events.recv() => match event {
                    None | Some(HostEvent::Shutdown) => break,
                    Some(event) => self.dispatch(event).await,
                },
                message = self.sync.recv() => {
                    if let Some(message) = message
                        && let Err(e) = self.handle_sync(message).await
                    {
                        warn!("sync reload failed: {e}");
                    }
                }
                () = wait_until(deadline) => self.poll(Instant::now()),
            }
        }
        debug!(identity = %self.identity(), "event loop stopped");
    }

    async fn dispatch(&mut self, event: HostEvent<V::Row>) {
        match event {
            HostEvent::Mutation => self.on_mutation(Instant::now()),
            HostEvent::Click(row) => {
                if let Err(e) = self.click(&row, Instant::now()).await {
                    warn!("toggle abandoned: {e}");
                }
            }
            HostEvent::HoverEnter(row) => {
                self.hover(&row);
            }
            HostEvent::HoverLeave => self.hover_leave(),
            HostEvent::Command { command, reply } => {
                let _ = reply.send(self.run_command(command).await);
            }
            HostEvent::AddEntry { kind, value, reply } => {
                let _ = reply.send(self.add_entry(kind, &value).await);
            }
            HostEvent::RemoveEntry { kind, value, reply } => {
                let _ = reply.send(self.remove_entry(kind, &value).await);
            }
            HostEvent::Shutdown => {}
        }
    }

    fn refresh(&mut self) {
        if !self.inert {
            self.controller.refresh_all(&mut self.view, self.store.lists());
        }
    }

    async fn after_write(&mut self) {
        if let Err(e) = self.store.reload().await {
            warn!("reload after write failed: {e}");
        }
        self.refresh();
        self.sync.broadcast(SyncMessage::ListsChanged);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}
