//! Whitelist store for one account identity.

use tracing::{debug, error, info, warn};

use super::model::{AllowList, Change, ListKind};
use super::validation::validate_entry;
use crate::Result;
use crate::domain::domain;
use crate::identity::Identity;
use crate::storage::{self, Storage};

/// The allow-lists of one identity, backed by durable storage.
///
/// Every mutation writes the new list first and only then replaces the
/// in-memory copy, so a failed write leaves the store unchanged.
pub struct WhitelistStore<S> {
    storage: S,
    identity: Identity,
    lists: AllowList,
}

impl<S: Storage> WhitelistStore<S> {
    /// Load both lists of `identity` from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub async fn load(storage: S, identity: Identity) -> Result<Self> {
        let lists = read_lists(&storage, &identity).await?;
        debug!(
            %identity,
            domains = lists.domains.len(),
            emails = lists.emails.len(),
            "loaded whitelist"
        );
        Ok(Self {
            storage,
            identity,
            lists,
        })
    }

    /// Identity whose lists this store holds.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Current in-memory lists.
    #[must_use]
    pub const fn lists(&self) -> &AllowList {
        &self.lists
    }

    /// Backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether the sender's domain or exact address is whitelisted.
    #[must_use]
    pub fn is_allowed(&self, email: &str) -> bool {
        self.lists.is_allowed(email)
    }

    /// Discard memory and re-read both lists from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read. Memory is left as it was.
    pub async fn reload(&mut self) -> Result<()> {
        self.lists = read_lists(&self.storage, &self.identity).await?;
        Ok(())
    }

    /// Remove the email if listed, otherwise append it.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be persisted.
    pub async fn toggle_email(&mut self, email: &str) -> Result<Change> {
        match self.position(ListKind::Email, email) {
            Some(index) => self.remove_at(ListKind::Email, index).await,
            None => self.append(ListKind::Email, email.to_string()).await,
        }
    }

    /// Remove the domain if listed.
    ///
    /// Returns `None` without writing when the domain is not listed; domains
    /// are only ever added through [`add`](Self::add).
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be persisted.
    pub async fn toggle_domain(&mut self, domain: &str) -> Result<Option<Change>> {
        match self.position(ListKind::Domain, domain) {
            Some(index) => self.remove_at(ListKind::Domain, index).await.map(Some),
            None => Ok(None),
        }
    }

    /// Click-to-toggle policy for a sender.
    ///
    /// An individually listed address is removed. Otherwise a listed domain
    /// is removed, which untrusts every address under it. Otherwise the
    /// single address is added.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be persisted.
    pub async fn toggle_sender(&mut self, email: &str) -> Result<Change> {
        if let Some(index) = self.position(ListKind::Email, email) {
            return self.remove_at(ListKind::Email, index).await;
        }

        let listed_domain = domain(email)
            .ok()
            .and_then(|d| self.position(ListKind::Domain, &d));
        match listed_domain {
            Some(index) => self.remove_at(ListKind::Domain, index).await,
            None => self.append(ListKind::Email, email.to_string()).await,
        }
    }

    /// Validate and append an entry, even if it is already listed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) for
    /// malformed input, or a storage error if the list cannot be persisted.
    pub async fn add(&mut self, kind: ListKind, value: &str) -> Result<Change> {
        let value = validate_entry(kind, value).inspect_err(|e| {
            warn!(identity = %self.identity, kind = kind.noun(), input = value, "rejected entry: {e}");
        })?;
        self.append(kind, value).await
    }

    /// Remove the first entry equal to `value`.
    ///
    /// Returns `None` without writing when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be persisted.
    pub async fn remove(&mut self, kind: ListKind, value: &str) -> Result<Option<Change>> {
        match self.position(kind, value) {
            Some(index) => self.remove_at(kind, index).await.map(Some),
            None => Ok(None),
        }
    }

    /// Empty both lists.
    ///
    /// Both keys are written before memory changes. If the email list cannot
    /// be written, the domain list is put back so neither storage nor memory
    /// is left half cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if either list cannot be persisted.
    pub async fn clear(&mut self) -> Result<()> {
        self.persist(ListKind::Domain, &[]).await?;
        if let Err(e) = self.persist(ListKind::Email, &[]).await {
            let domains = self.lists.domains.clone();
            if let Err(restore) = self.persist(ListKind::Domain, &domains).await {
                error!(identity = %self.identity, "failed to restore domain whitelist: {restore}");
            }
            return Err(e);
        }

        self.lists = AllowList::new();
        info!(identity = %self.identity, "cleared whitelist");
        Ok(())
    }

    fn position(&self, kind: ListKind, value: &str) -> Option<usize> {
        self.lists.entries(kind).iter().position(|v| v == value)
    }

    async fn append(&mut self, kind: ListKind, value: String) -> Result<Change> {
        let mut values = self.lists.entries(kind).to_vec();
        values.push(value.clone());
        self.write(kind, values).await?;

        info!(identity = %self.identity, kind = kind.noun(), value, "added to whitelist");
        Ok(Change::Added { kind, value })
    }

    async fn remove_at(&mut self, kind: ListKind, index: usize) -> Result<Change> {
        let mut values = self.lists.entries(kind).to_vec();
        let value = values.remove(index);
        self.write(kind, values).await?;

        info!(identity = %self.identity, kind = kind.noun(), value, "removed from whitelist");
        Ok(Change::Removed { kind, value })
    }

    async fn write(&mut self, kind: ListKind, values: Vec<String>) -> Result<()> {
        self.persist(kind, &values).await?;

        match kind {
            ListKind::Domain => self.lists.domains = values,
            ListKind::Email => self.lists.emails = values,
        }
        Ok(())
    }

    async fn persist(&self, kind: ListKind, values: &[String]) -> Result<()> {
        let key = self.identity.storage_key(kind);
        storage::put(&self.storage, &key, values)
            .await
            .inspect_err(|e| warn!(key, "failed to persist whitelist: {e}"))
    }
}

async fn read_lists<S: Storage + ?Sized>(storage: &S, identity: &Identity) -> Result<AllowList> {
    Ok(AllowList {
        domains: storage::get_or(storage, &identity.storage_key(ListKind::Domain), Vec::new())
            .await?,
        emails: storage::get_or(storage, &identity.storage_key(ListKind::Email), Vec::new())
            .await?,
    })
}
