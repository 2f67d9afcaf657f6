//! Display settings.
//!
//! The three user-facing flags are read once per page load into an
//! immutable [`Settings`] value that every component receives by reference.
//! Changing a flag writes storage and requires a page reload to take effect.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;
use crate::storage::{self, Storage};

/// Quiet period after the last list mutation before rows are scanned.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// How long the toggle confirmation stays on a row.
pub const DEFAULT_CONFIRMATION_TTL: Duration = Duration::from_secs(3);

/// A persisted on/off setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Show the sender domain's favicon.
    ShowIcon,
    /// Show the sender domain as text.
    ShowDomain,
    /// Tint rows whose sender is not whitelisted.
    HighlightUntrusted,
}

impl Flag {
    /// All flags, in menu order.
    pub const ALL: [Self; 3] = [Self::ShowIcon, Self::ShowDomain, Self::HighlightUntrusted];

    /// Storage key for this flag.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::ShowIcon => "addIcon",
            Self::ShowDomain => "addDomain",
            Self::HighlightUntrusted => "highlightUntrusted",
        }
    }

    /// Value used when the key has never been written.
    #[must_use]
    pub const fn default_value(&self) -> bool {
        match self {
            Self::ShowIcon | Self::ShowDomain => true,
            Self::HighlightUntrusted => false,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::ShowIcon => "Show icons",
            Self::ShowDomain => "Show domains",
            Self::HighlightUntrusted => "Highlight untrusted emails",
        }
    }

    /// Parse a command-line style name (`icon`, `domain`, `highlight`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "icon" | "icons" | "addicon" => Some(Self::ShowIcon),
            "domain" | "domains" | "adddomain" => Some(Self::ShowDomain),
            "highlight" | "highlightuntrusted" => Some(Self::HighlightUntrusted),
            _ => None,
        }
    }
}

/// Settings resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Show the favicon of the sender domain.
    pub show_icon: bool,
    /// Show the sender domain as text.
    pub show_domain: bool,
    /// Highlight rows whose sender is not whitelisted.
    pub highlight_untrusted: bool,
    /// Debounce window for list mutations.
    #[serde(skip, default = "default_debounce")]
    pub debounce: Duration,
    /// Lifetime of the toggle confirmation.
    #[serde(skip, default = "default_confirmation_ttl")]
    pub confirmation_ttl: Duration,
}

const fn default_debounce() -> Duration {
    DEFAULT_DEBOUNCE
}

const fn default_confirmation_ttl() -> Duration {
    DEFAULT_CONFIRMATION_TTL
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_icon: Flag::ShowIcon.default_value(),
            show_domain: Flag::ShowDomain.default_value(),
            highlight_untrusted: Flag::HighlightUntrusted.default_value(),
            debounce: DEFAULT_DEBOUNCE,
            confirmation_ttl: DEFAULT_CONFIRMATION_TTL,
        }
    }
}

impl Settings {
    /// Read every flag from storage, using defaults for absent keys.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub async fn load<S: Storage + ?Sized>(storage: &S) -> Result<Self> {
        let settings = Self {
            show_icon: read_flag(storage, Flag::ShowIcon).await?,
            show_domain: read_flag(storage, Flag::ShowDomain).await?,
            highlight_untrusted: read_flag(storage, Flag::HighlightUntrusted).await?,
            ..Self::default()
        };
        debug!(?settings, "loaded settings");
        Ok(settings)
    }

    /// Current value of a flag.
    #[must_use]
    pub const fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::ShowIcon => self.show_icon,
            Flag::ShowDomain => self.show_domain,
            Flag::HighlightUntrusted => self.highlight_untrusted,
        }
    }

    /// Nothing would be drawn: no icon, no label, no highlighting.
    #[must_use]
    pub const fn shows_nothing(&self) -> bool {
        !self.show_icon && !self.show_domain && !self.highlight_untrusted
    }
}

async fn read_flag<S: Storage + ?Sized>(storage: &S, flag: Flag) -> Result<bool> {
    storage::get_or(storage, flag.key(), flag.default_value()).await
}

/// Persist a flag value.
///
/// # Errors
///
/// Returns an error if storage cannot be written.
pub async fn set_flag<S: Storage + ?Sized>(storage: &S, flag: Flag, value: bool) -> Result<()> {
    storage::put(storage, flag.key(), &value).await
}
