//! Per-account allow-lists of trusted domains and email addresses.
//!
//! This module provides:
//! - **Allow-lists**: ordered domain and email sequences with membership checks
//! - **Store**: toggle, add, remove and reload against durable storage
//! - **Validation**: rejection of malformed panel input
//! - **Panel**: the searchable entry list behind the management panel
//!
//! # Classification
//!
//! A sender is allowed when its registrable domain is on the domain list or
//! its exact address is on the email list. Matching is case-sensitive.
//!
//! # Example
//!
//! ```ignore
//! use trustmark_core::whitelist::{ListKind, WhitelistStore};
//!
//! let mut store = WhitelistStore::load(storage, identity).await?;
//! store.add(ListKind::Domain, "example.com").await?;
//! assert!(store.is_allowed("anyone@mail.example.com"));
//! ```

mod model;
pub mod panel;
mod store;
mod validation;

pub use model::{AllowList, Change, ListKind};
pub use panel::{Panel, PanelEntry};
pub use store::WhitelistStore;
pub use validation::{ValidationError, validate_entry};
