//! Host list view contract.
//!
//! The core never touches page markup directly. A host adapter implements
//! [`ListView`] over whatever renders the inbox (a browser document, a test
//! double) and the watcher and annotation controller drive it through this
//! trait only.
//!
//! Row handles are observed, not held: the core asks for the current rows on
//! every pass and records "already annotated" by stamping a marker on the row
//! itself ([`ListView::mark_processed`]), so rows dropped by the host are
//! reclaimed with their marker.

use crate::annotation::{Annotation, SenderDetail, TrustState};

/// Selectors of the elements that hold a sender name in the list view.
pub const ROW_MARKERS: [&str; 3] = [".bA4", ".bAK", ".bAp"];

/// Attribute carrying the sender address on a descendant of a row.
pub const EMAIL_ATTRIBUTE: &str = "email";

/// Selector of the enclosing message row that receives the highlight.
pub const MESSAGE_ROW_MARKER: &str = ".zA";

/// Attribute stamped on rows that have been annotated.
pub const PROCESSED_ATTRIBUTE: &str = "data-trustmark";

/// Rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Rect {
    /// Rectangle from origin and size.
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }
}

/// Measured size of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// Visible window area and current vertical scroll.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Inner width.
    pub width: f64,
    /// Inner height.
    pub height: f64,
    /// Vertical page scroll offset.
    pub scroll_y: f64,
}

/// Position in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

/// The host's message list.
pub trait ListView {
    /// Handle to a sender element currently in the list.
    type Row: Clone + PartialEq + std::fmt::Debug;

    /// Sender elements matching [`ROW_MARKERS`], in document order, read
    /// from the live view.
    fn rows(&self) -> Vec<Self::Row>;

    /// Value of the [`EMAIL_ATTRIBUTE`] descendant, if rendered yet.
    fn sender_email(&self, row: &Self::Row) -> Option<String>;

    /// Whether the row carries the [`PROCESSED_ATTRIBUTE`] marker.
    fn is_processed(&self, row: &Self::Row) -> bool;

    /// Stamp the [`PROCESSED_ATTRIBUTE`] marker on the row.
    fn mark_processed(&mut self, row: &Self::Row);

    /// Whether an annotation is already attached below the sender.
    fn has_annotation(&self, row: &Self::Row) -> bool;

    /// Attach a new annotation below the sender.
    fn attach_annotation(&mut self, row: &Self::Row, annotation: &Annotation);

    /// Switch an attached annotation between allowed and not-allowed.
    fn set_trust_state(&mut self, row: &Self::Row, state: TrustState);

    /// Add or remove the untrusted highlight on the enclosing message row.
    fn set_row_highlight(&mut self, row: &Self::Row, untrusted: bool);

    /// Stop the host from opening the message for the click being handled.
    fn prevent_default(&mut self, row: &Self::Row);

    /// Show the transient confirmation text on the row's annotation.
    fn show_confirmation(&mut self, row: &Self::Row, message: &str);

    /// Remove the confirmation, if it is still there.
    ///
    /// Called when the confirmation's deadline passes, which may be after
    /// the host dropped the row. Adapters must treat a handle to a row that
    /// no longer exists as a no-op.
    fn hide_confirmation(&mut self, row: &Self::Row);

    /// Bounds of the row's annotation, if attached and rendered.
    fn anchor_rect(&self, row: &Self::Row) -> Option<Rect>;

    /// Current viewport.
    fn viewport(&self) -> Viewport;

    /// Fill the shared detail surface, make it visible, and measure it.
    fn show_detail(&mut self, detail: &SenderDetail) -> Size;

    /// Move the shared detail surface.
    fn move_detail(&mut self, position: Point);

    /// Hide the shared detail surface.
    fn hide_detail(&mut self);
}
