//! Shared test helpers.

#![allow(dead_code)]

use trustmark_core::{
    Annotation, ListView, Point, Rect, SenderDetail, Settings, Size, TrustState, Viewport,
};

/// Page URL of the first signed-in account.
pub const INBOX: &str = "https://mail.google.com/mail/u/0/#inbox";

/// Page URL of the second signed-in account.
pub const SECOND_INBOX: &str = "https://mail.google.com/mail/u/1/#inbox";

/// Size every rendered detail surface reports.
pub const DETAIL_SIZE: Size = Size {
    width: 200.0,
    height: 60.0,
};

/// One sender element of the fake list.
#[derive(Debug, Clone, Default)]
pub struct MockRow {
    pub email: Option<String>,
    pub processed: bool,
    pub annotation: Option<Annotation>,
    pub state: Option<TrustState>,
    pub highlighted: bool,
    pub confirmation: Option<String>,
    pub rect: Rect,
}

/// In-memory list view recording everything the core does to it.
#[derive(Debug, Clone)]
pub struct MockView {
    pub rows: Vec<MockRow>,
    pub viewport: Viewport,
    pub detail: Option<SenderDetail>,
    pub detail_position: Option<Point>,
    pub prevented: usize,
}

impl Default for MockView {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            viewport: Viewport {
                width: 1000.0,
                height: 800.0,
                scroll_y: 0.0,
            },
            detail: None,
            detail_position: None,
            prevented: 0,
        }
    }
}

impl MockView {
    /// A list with one row per sender, stacked vertically.
    pub fn with_senders(senders: &[&str]) -> Self {
        let mut view = Self::default();
        for sender in senders {
            view.push(Some(sender));
        }
        view
    }

    /// Append a row, optionally without its email attribute rendered yet.
    pub fn push(&mut self, email: Option<&str>) -> usize {
        let index = self.rows.len();
        #[allow(clippy::cast_precision_loss)]
        let top = 100.0 + 40.0 * index as f64;
        self.rows.push(MockRow {
            email: email.map(str::to_string),
            rect: Rect::new(100.0, top, 80.0, 12.0),
            ..MockRow::default()
        });
        index
    }

    /// Render the email attribute of a row that lacked one.
    pub fn set_email(&mut self, row: usize, email: &str) {
        self.rows[row].email = Some(email.to_string());
    }

    /// Trust state shown on a row, if annotated.
    pub fn state(&self, row: usize) -> Option<TrustState> {
        self.rows[row].state
    }

    /// Number of rows carrying an annotation.
    pub fn annotated(&self) -> usize {
        self.rows.iter().filter(|r| r.annotation.is_some()).count()
    }
}

impl ListView for MockView {
    type Row = usize;

    fn rows(&self) -> Vec<usize> {
        (0..self.rows.len()).collect()
    }

    fn sender_email(&self, row: &usize) -> Option<String> {
        self.rows[*row].email.clone()
    }

    fn is_processed(&self, row: &usize) -> bool {
        self.rows[*row].processed
    }

    fn mark_processed(&mut self, row: &usize) {
        self.rows[*row].processed = true;
    }

    fn has_annotation(&self, row: &usize) -> bool {
        self.rows[*row].annotation.is_some()
    }

    fn attach_annotation(&mut self, row: &usize, annotation: &Annotation) {
        let row = &mut self.rows[*row];
        row.state = Some(annotation.state);
        row.annotation = Some(annotation.clone());
    }

    fn set_trust_state(&mut self, row: &usize, state: TrustState) {
        self.rows[*row].state = Some(state);
    }

    fn set_row_highlight(&mut self, row: &usize, untrusted: bool) {
        self.rows[*row].highlighted = untrusted;
    }

    fn prevent_default(&mut self, _row: &usize) {
        self.prevented += 1;
    }

    fn show_confirmation(&mut self, row: &usize, message: &str) {
        self.rows[*row].confirmation = Some(message.to_string());
    }

    fn hide_confirmation(&mut self, row: &usize) {
        if let Some(row) = self.rows.get_mut(*row) {
            row.confirmation = None;
        }
    }

    fn anchor_rect(&self, row: &usize) -> Option<Rect> {
        let row = &self.rows[*row];
        row.annotation.as_ref().map(|_| row.rect)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn show_detail(&mut self, detail: &SenderDetail) -> Size {
        self.detail = Some(detail.clone());
        DETAIL_SIZE
    }

    fn move_detail(&mut self, position: Point) {
        self.detail_position = Some(position);
    }

    fn hide_detail(&mut self) {
        self.detail = None;
        self.detail_position = None;
    }
}

/// Settings with highlighting switched on.
pub fn highlighting() -> Settings {
    Settings {
        highlight_untrusted: true,
        ..Settings::default()
    }
}
