//! Whitelist entry validation.

use std::sync::OnceLock;

use regex::Regex;

use super::model::ListKind;

/// Validation error for user supplied whitelist entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing was entered.
    Empty,
    /// Domain has no `.` separator.
    InvalidDomain,
    /// Email address does not have a `user@host.tld` shape.
    InvalidEmail,
    /// Address has no `@` separator.
    MissingAtSign,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Empty => "A value is required",
            Self::InvalidDomain => {
                "Invalid domain format. Please enter a valid domain (e.g., example.com)."
            }
            Self::InvalidEmail => "Invalid email format. Please enter a valid email address.",
            Self::MissingAtSign => "Email address has no @ separator",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Empty => "value",
            Self::InvalidDomain => "domain",
            Self::InvalidEmail | Self::MissingAtSign => "email",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Validate a panel entry and return it trimmed.
///
/// Surrounding whitespace is stripped before the shape checks run, so
/// `"  x@y.com "` is accepted and stored as `x@y.com`.
///
/// # Errors
///
/// Returns a `ValidationError` when the trimmed value is empty or malformed
/// for its list.
pub fn validate_entry(kind: ListKind, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty);
    }

    match kind {
        ListKind::Domain if !is_valid_domain(value) => Err(ValidationError::InvalidDomain),
        ListKind::Email if !is_valid_email(value) => Err(ValidationError::InvalidEmail),
        _ => Ok(value.to_string()),
    }
}

fn is_valid_domain(domain: &str) -> bool {
    domain.contains('.')
}

#[allow(clippy::unwrap_used)]
fn email_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn is_valid_email(email: &str) -> bool {
    email_shape().is_match(email)
}
