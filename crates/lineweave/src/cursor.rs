//! Bounded 2D cursor.

/// A bounded position tracker over a 2D field.
///
/// Used both as the screen cursor and as the selection index for lists and
/// tables (a list is a field of width 1). `height` and `width` are counts
/// of addressable positions, so the largest valid row is `height - 1`; a
/// dimension of 0 collapses its bound to position 0.
///
/// Every operation clamps silently instead of rejecting: callers that
/// resize the field on every keystroke (a table re-bounding its selection
/// to the filtered row count, say) rely on never having to re-validate the
/// position themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    row: usize,
    col: usize,
    height: usize,
    width: usize,
}

impl Cursor {
    /// A cursor at the origin of a `height` × `width` field.
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            row: 0,
            col: 0,
            height,
            width,
        }
    }

    /// Move up one row. Returns true iff the position changed.
    pub fn up(&mut self) -> bool {
        if self.row > 0 {
            self.row -= 1;
            true
        } else {
            false
        }
    }

    /// Move down one row. Returns true iff the position changed.
    pub fn down(&mut self) -> bool {
        if self.row + 1 < self.height {
            self.row += 1;
            true
        } else {
            false
        }
    }

    /// Move left one column. Returns true iff the position changed.
    pub fn left(&mut self) -> bool {
        if self.col > 0 {
            self.col -= 1;
            true
        } else {
            false
        }
    }

    /// Move right one column. Returns true iff the position changed.
    pub fn right(&mut self) -> bool {
        if self.col + 1 < self.width {
            self.col += 1;
            true
        } else {
            false
        }
    }

    /// Jump to the first row.
    pub fn top(&mut self) {
        self.row = 0;
    }

    /// Jump to the last row.
    pub fn bottom(&mut self) {
        self.row = self.height.saturating_sub(1);
    }

    /// Resize the field, re-clamping the current position.
    pub fn set_size(&mut self, height: usize, width: usize) {
        self.height = height;
        self.width = width;
        self.clamp();
    }

    /// Move to `(row, col)`, clamping silently to the field's bounds.
    pub fn set_position(&mut self, row: usize, col: usize) {
        self.row = row;
        self.col = col;
        self.clamp();
    }

    /// Current `(row, col)` position.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Current `(height, width)` of the field.
    #[must_use]
    pub fn size(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    fn clamp(&mut self) {
        self.row = self.row.min(self.height.saturating_sub(1));
        self.col = self.col.min(self.width.saturating_sub(1));
    }
}
