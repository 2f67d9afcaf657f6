//! Hover detail placement.

use crate::view::{Point, Rect, Size, Viewport};

/// Horizontal gap between the annotation and the detail surface.
pub const DETAIL_GAP: f64 = 10.0;

/// Vertical offset of the detail surface from the annotation edge.
pub const DETAIL_NUDGE: f64 = 5.0;

/// Page position for the detail surface next to `anchor`.
///
/// Placed to the right of the anchor, slightly above its top. Flips to the
/// left of the anchor when it would overflow the right edge, and bottom
/// aligns with the anchor when it would overflow the bottom edge.
#[must_use]
pub fn place_detail(anchor: Rect, size: Size, viewport: Viewport) -> Point {
    let mut x = anchor.right + DETAIL_GAP;
    let mut top = anchor.top - DETAIL_NUDGE;

    if x + size.width > viewport.width {
        x = anchor.left - size.width - DETAIL_GAP;
    }
    if top + size.height > viewport.height {
        top = anchor.bottom - size.height + DETAIL_NUDGE;
    }

    Point {
        x,
        y: top + viewport.scroll_y,
    }
}
