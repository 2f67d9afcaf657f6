//! Allow-list data models.

use serde::{Deserialize, Serialize};

use crate::domain::domain;

/// Which of the two lists an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListKind {
    /// Registrable domains; every address under the domain is trusted.
    Domain,
    /// Individual email addresses.
    Email,
}

impl ListKind {
    /// Prefix of the per-identity storage key.
    #[must_use]
    pub const fn storage_prefix(&self) -> &'static str {
        match self {
            Self::Domain => "allowedDomains",
            Self::Email => "allowedEmails",
        }
    }

    /// Lowercase noun used in user-facing messages.
    #[must_use]
    pub const fn noun(&self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Email => "email",
        }
    }
}

/// The pair of allow-lists for one identity.
///
/// Insertion order is preserved. Duplicates added by direct edits are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowList {
    /// Trusted domains.
    pub domains: Vec<String>,
    /// Trusted email addresses.
    pub emails: Vec<String>,
}

impl AllowList {
    /// Create empty lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the sender's domain or exact address is listed.
    #[must_use]
    pub fn is_allowed(&self, email: &str) -> bool {
        self.contains(ListKind::Email, email)
            || domain(email).is_ok_and(|d| self.contains(ListKind::Domain, &d))
    }

    /// Exact membership test on one list.
    #[must_use]
    pub fn contains(&self, kind: ListKind, value: &str) -> bool {
        self.entries(kind).iter().any(|v| v == value)
    }

    /// Entries of one list in insertion order.
    #[must_use]
    pub fn entries(&self, kind: ListKind) -> &[String] {
        match kind {
            ListKind::Domain => &self.domains,
            ListKind::Email => &self.emails,
        }
    }

    /// Both lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.emails.is_empty()
    }
}

/// A single applied whitelist edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Entry appended.
    Added {
        /// List that changed.
        kind: ListKind,
        /// Entry value.
        value: String,
    },
    /// Entry removed.
    Removed {
        /// List that changed.
        kind: ListKind,
        /// Entry value.
        value: String,
    },
}

impl Change {
    /// List that changed.
    #[must_use]
    pub const fn kind(&self) -> ListKind {
        match self {
            Self::Added { kind, .. } | Self::Removed { kind, .. } => *kind,
        }
    }

    /// Entry value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Added { value, .. } | Self::Removed { value, .. } => value,
        }
    }
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added { kind, value } => {
                write!(f, "Added {} to whitelist: {value}", kind.noun())
            }
            Self::Removed { kind, value } => {
                write!(f, "Removed {} from whitelist: {value}", kind.noun())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lists(domains: &[&str], emails: &[&str]) -> AllowList {
        AllowList {
            domains: domains.iter().map(ToString::to_string).collect(),
            emails: emails.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_allowed_by_domain() {
        let lists = lists(&["example.co.uk"], &[]);
        assert!(lists.is_allowed("a@mail.example.co.uk"));
        assert!(!lists.is_allowed("a@example.com"));
    }

    #[test]
    fn test_allowed_by_email() {
        let lists = lists(&[], &["x@y.com"]);
        assert!(lists.is_allowed("x@y.com"));
        assert!(!lists.is_allowed("z@y.com"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let lists = lists(&["example.com"], &["Boss@corp.com"]);
        assert!(!lists.is_allowed("a@EXAMPLE.COM"));
        assert!(!lists.is_allowed("boss@corp.com"));
        assert!(lists.is_allowed("Boss@corp.com"));
    }

    #[test]
    fn test_address_without_at_sign() {
        let lists = lists(&["example.com"], &["operator"]);
        assert!(lists.is_allowed("operator"));
        assert!(!lists.is_allowed("example.com"));
    }

    #[test]
    fn test_change_messages() {
        let added = Change::Added {
            kind: ListKind::Email,
            value: "x@y.com".into(),
        };
        let removed = Change::Removed {
            kind: ListKind::Domain,
            value: "y.com".into(),
        };

        assert_eq!(added.to_string(), "Added email to whitelist: x@y.com");
        assert_eq!(removed.to_string(), "Removed domain from whitelist: y.com");
        assert_eq!(removed.kind(), ListKind::Domain);
        assert_eq!(removed.value(), "y.com");
    }

    proptest! {
        #[test]
        fn prop_allowed_iff_domain_or_email_listed(
            local in "[a-z]{1,6}",
            host in "[a-z]{1,6}\\.(com|org|co\\.uk)",
            list_domain in any::<bool>(),
            list_email in any::<bool>(),
        ) {
            let email = format!("{local}@{host}");
            let sender_domain = domain(&email).unwrap_or_default();

            let mut allow = AllowList::new();
            if list_domain {
                allow.domains.push(sender_domain.clone());
            }
            if list_email {
                allow.emails.push(email.clone());
            }

            prop_assert_eq!(allow.is_allowed(&email), list_domain || list_email);
        }
    }
}
