//! Account identity resolution.
//!
//! Webmail hosts serve several signed-in accounts from the same origin and
//! distinguish them by a `/u/<n>/` path segment. Every persisted list is
//! namespaced by that number so accounts never share a whitelist.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::whitelist::ListKind;
use crate::{Error, Result};

/// The active account discriminator for one page load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    /// Create an identity from an already known account number.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the identity from the host page URL.
    ///
    /// Looks for a `u` path segment followed by a numeric segment and a
    /// trailing slash, as in `https://mail.google.com/mail/u/1/#inbox`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdentityUnresolved`] if the URL does not parse or
    /// carries no account segment.
    pub fn from_page_url(page_url: &str) -> Result<Self> {
        let unresolved = || Error::IdentityUnresolved(page_url.to_string());

        let url = Url::parse(page_url).map_err(|_| unresolved())?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(Iterator::collect)
            .unwrap_or_default();

        segments
            .windows(3)
            .find(|w| w[0] == "u" && is_account_number(w[1]))
            .map(|w| Self::new(w[1]))
            .ok_or_else(unresolved)
    }

    /// The raw account number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key holding one of this identity's lists.
    #[must_use]
    pub fn storage_key(&self, kind: ListKind) -> String {
        format!("{}_{}", kind.storage_prefix(), self.0)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_account_number(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}
