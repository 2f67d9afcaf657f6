//! Per-row trust annotations.
//!
//! Each sender gets a small annotation holding the domain favicon and label,
//! styled by its [`TrustState`]. The state is recomputed from the current
//! allow-lists on every render; nothing is remembered per row.

mod confirm;
mod controller;
mod placement;

use serde::Serialize;

pub use confirm::Confirmations;
pub use controller::AnnotationController;
pub use placement::{DETAIL_GAP, DETAIL_NUDGE, place_detail};

use crate::Result;
use crate::config::Settings;
use crate::domain::{domain, favicon_url};

/// Whether a sender passes the allow check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrustState {
    /// Domain or address is whitelisted.
    Allowed,
    /// Neither is whitelisted.
    NotAllowed,
}

impl TrustState {
    /// State for an allow check result.
    #[must_use]
    pub const fn from_allowed(allowed: bool) -> Self {
        if allowed {
            Self::Allowed
        } else {
            Self::NotAllowed
        }
    }

    /// Whether this is [`TrustState::Allowed`].
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Style class applied to the annotation.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Allowed => "allowed-domain",
            Self::NotAllowed => "not-allowed-domain",
        }
    }
}

/// Content of a newly attached annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Sender address.
    pub email: String,
    /// Sender's registrable domain.
    pub domain: String,
    /// Favicon URL, when icons are enabled.
    pub icon_url: Option<String>,
    /// Domain text, when domain labels are enabled.
    pub label: Option<String>,
    /// Initial trust state.
    pub state: TrustState,
}

impl Annotation {
    /// Build the annotation for a sender.
    ///
    /// # Errors
    ///
    /// Returns an error if the address has no `@`.
    pub fn new(email: &str, settings: &Settings, state: TrustState) -> Result<Self> {
        let domain = domain(email)?;
        Ok(Self {
            email: email.to_string(),
            icon_url: settings.show_icon.then(|| favicon_url(&domain)),
            label: settings.show_domain.then(|| domain.clone()),
            domain,
            state,
        })
    }
}

/// Content of the shared hover detail surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderDetail {
    /// Sender address.
    pub email: String,
    /// Sender's registrable domain.
    pub domain: String,
    /// Whether the sender passes the allow check.
    pub whitelisted: bool,
}

impl std::fmt::Display for SenderDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Email Address: {}", self.email)?;
        writeln!(f, "Domain: {}", self.domain)?;
        write!(
            f,
            "Whitelisted: {}",
            if self.whitelisted { "Yes" } else { "No" }
        )
    }
}
