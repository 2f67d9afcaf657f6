//! Management panel model.
//!
//! The panel shows every entry of the current identity, domains first, and
//! filters them with a search box. Markup is left to the host.

use super::model::{AllowList, ListKind};

/// One row of the management panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelEntry {
    /// List the entry belongs to.
    pub kind: ListKind,
    /// Domain or email address.
    pub value: String,
}

impl PanelEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(kind: ListKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Checks if the entry matches a search query (case-insensitive substring).
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.value.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Snapshot of the lists as shown in the panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    entries: Vec<PanelEntry>,
}

impl Panel {
    /// Build the panel from the current lists.
    #[must_use]
    pub fn from_lists(lists: &AllowList) -> Self {
        let entries = [ListKind::Domain, ListKind::Email]
            .into_iter()
            .flat_map(|kind| {
                lists
                    .entries(kind)
                    .iter()
                    .map(move |value| PanelEntry::new(kind, value.clone()))
            })
            .collect();
        Self { entries }
    }

    /// All entries, domains first, each list in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }

    /// Entries visible for a search query. An empty query shows everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&PanelEntry> {
        self.entries.iter().filter(|e| e.matches(query)).collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether both lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Panel {
        Panel::from_lists(&AllowList {
            domains: vec!["Example.com".into(), "corp.co.uk".into()],
            emails: vec!["boss@corp.co.uk".into()],
        })
    }

    #[test]
    fn test_domains_before_emails() {
        let panel = sample();
        let kinds: Vec<ListKind> = panel.entries().iter().map(|e| e.kind).collect();

        assert_eq!(
            kinds,
            vec![ListKind::Domain, ListKind::Domain, ListKind::Email]
        );
        assert_eq!(panel.entries()[0].value, "Example.com");
        assert_eq!(panel.len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let panel = sample();

        assert_eq!(panel.search("EXAMPLE").len(), 1);
        assert_eq!(panel.search("corp").len(), 2);
        assert!(panel.search("nowhere").is_empty());
    }

    #[test]
    fn test_empty_query_shows_all() {
        assert_eq!(sample().search("").len(), 3);
        assert!(Panel::default().is_empty());
    }
}
