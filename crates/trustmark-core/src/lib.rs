//! # trustmark-core
//!
//! Core logic for `Trustmark`, a sender trust indicator for webmail list
//! views.
//!
//! This crate provides:
//! - Domain classification of sender addresses
//! - Per-account allow-lists of domains and addresses (`SQLite` or memory)
//! - Click-to-toggle whitelisting with a fixed precedence policy
//! - Cross-tab change notification
//! - Debounced discovery of new rows in a mutating list view
//! - Annotation rendering, hover details and row highlighting
//! - **Management panel** - Search, add and remove whitelist entries
//! - **Menu commands** - Display settings and clearing an account's lists

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod annotation;
pub mod config;
pub mod domain;
mod error;
pub mod identity;
pub mod indicator;
pub mod menu;
pub mod storage;
pub mod sync;
pub mod view;
pub mod watcher;
pub mod whitelist;

pub use annotation::{Annotation, AnnotationController, SenderDetail, TrustState, place_detail};
pub use config::{Flag, Settings};
pub use domain::{domain, favicon_url};
pub use error::{Error, Result};
pub use identity::Identity;
pub use indicator::{HostEvent, TrustIndicator};
pub use menu::{CommandOutcome, MenuCommand};
pub use storage::{MemoryStorage, SqliteStorage, Storage};
pub use sync::{CrossTabSync, SyncChannel, SyncMessage};
pub use view::{ListView, Point, Rect, Size, Viewport};
pub use watcher::RowWatcher;
pub use whitelist::{
    AllowList, Change, ListKind, Panel, PanelEntry, ValidationError, WhitelistStore,
    validate_entry,
};
