//! Commands registered with the host's menu.

use crate::config::Flag;
use crate::whitelist::Panel;

/// A named action offered in the host menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuCommand {
    /// Open the management panel.
    ManageWhitelist,
    /// Flip favicon display.
    ToggleIcons,
    /// Flip domain label display.
    ToggleDomains,
    /// Flip untrusted row highlighting.
    ToggleHighlight,
    /// Empty both lists of the current account.
    ClearAll,
}

impl MenuCommand {
    /// All commands, in menu order.
    pub const ALL: [Self; 5] = [
        Self::ManageWhitelist,
        Self::ToggleIcons,
        Self::ToggleDomains,
        Self::ToggleHighlight,
        Self::ClearAll,
    ];

    /// Menu label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ManageWhitelist => "Manage Whitelist",
            Self::ToggleIcons => "Show/Hide Icons",
            Self::ToggleDomains => "Show/Hide Domains",
            Self::ToggleHighlight => "Highlight Untrusted Emails",
            Self::ClearAll => "Clear All Whitelists",
        }
    }

    /// The setting this command flips, if any.
    #[must_use]
    pub const fn flag(&self) -> Option<Flag> {
        match self {
            Self::ToggleIcons => Some(Flag::ShowIcon),
            Self::ToggleDomains => Some(Flag::ShowDomain),
            Self::ToggleHighlight => Some(Flag::HighlightUntrusted),
            Self::ManageWhitelist | Self::ClearAll => None,
        }
    }

    /// Question the host must get a yes to before running the command.
    #[must_use]
    pub const fn confirmation_prompt(&self) -> Option<&'static str> {
        match self {
            Self::ClearAll => Some("Are you sure you want to clear all whitelists for this account?"),
            _ => None,
        }
    }
}

/// What the host should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Show the management panel with these entries.
    OpenPanel(Panel),
    /// A setting was written; reload the page so it takes effect.
    ReloadPage {
        /// Setting that changed.
        flag: Flag,
        /// Its new value.
        enabled: bool,
    },
    /// Both lists were emptied and every tab notified.
    ListsCleared,
}
