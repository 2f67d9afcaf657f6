//! Sender domain classification.
//!
//! Reduces an email address to the registrable domain shown next to the
//! sender and used for domain-wide whitelist entries. This is a heuristic,
//! not a public suffix list lookup: only `com` and `co` are recognised as
//! second-level suffix labels, so hosts such as `example.org.uk` or
//! `city.state.us` collapse to their last two labels.

use crate::whitelist::ValidationError;
use crate::{Error, Result};

/// Second-level labels that sit under a country code (`co.uk`, `com.au`).
const SECOND_LEVEL_LABELS: [&str; 2] = ["com", "co"];

/// Favicon service addressed by domain.
const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// Extract the registrable domain of an email address.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when the address has no `@`.
///
/// # Examples
///
/// ```
/// use trustmark_core::domain::domain;
///
/// assert_eq!(domain("a@mail.example.co.uk").unwrap(), "example.co.uk");
/// assert_eq!(domain("a@sub.example.org").unwrap(), "example.org");
/// ```
pub fn domain(email: &str) -> Result<String> {
    let host = email
        .split('@')
        .nth(1)
        .ok_or(Error::InvalidInput(ValidationError::MissingAtSign))?;

    let labels: Vec<&str> = host.split('.').collect();
    let len = labels.len();
    let keep = if len >= 3 && SECOND_LEVEL_LABELS.contains(&labels[len - 2]) {
        3
    } else {
        2
    };

    Ok(labels[len.saturating_sub(keep)..].join("."))
}

/// URL of the 16px favicon for a domain.
#[must_use]
pub fn favicon_url(domain: &str) -> String {
    format!("{FAVICON_SERVICE}?domain={domain}&sz=16")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_label_domain() {
        assert_eq!(domain("a@example.com").unwrap(), "example.com");
    }

    #[test]
    fn test_subdomain_is_dropped() {
        assert_eq!(domain("a@sub.example.org").unwrap(), "example.org");
        assert_eq!(domain("a@a.b.c.example.net").unwrap(), "example.net");
    }

    #[test]
    fn test_country_code_second_level() {
        assert_eq!(domain("a@mail.example.co.uk").unwrap(), "example.co.uk");
        assert_eq!(domain("a@example.com.au").unwrap(), "example.com.au");
        assert_eq!(domain("a@shop.example.com.br").unwrap(), "example.com.br");
    }

    #[test]
    fn test_unknown_second_level_collapses() {
        // Known limitation: only com/co are recognised.
        assert_eq!(domain("a@example.org.uk").unwrap(), "org.uk");
    }

    #[test]
    fn test_single_label_host() {
        assert_eq!(domain("root@localhost").unwrap(), "localhost");
    }

    #[test]
    fn test_missing_at_sign() {
        let err = domain("not-an-email").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(ValidationError::MissingAtSign)
        ));
    }

    #[test]
    fn test_favicon_url() {
        assert_eq!(
            favicon_url("example.com"),
            "https://www.google.com/s2/favicons?domain=example.com&sz=16"
        );
    }

    proptest! {
        #[test]
        fn prop_domain_is_host_suffix(
            local in "[a-z0-9]{1,8}",
            labels in proptest::collection::vec("[a-z]{1,6}", 1..6),
        ) {
            let host = labels.join(".");
            let email = format!("{local}@{host}");
            let result = domain(&email).unwrap();

            prop_assert!(host.ends_with(&result));
            prop_assert!(result.split('.').count() <= 3);
        }
    }
}
