//! Fixed-size circular character grid backing one window.
//!
//! Invariant: the cursor row is always the newest (bottom) row on screen and the
//! row after it is the oldest. Rows are blanked when the cursor enters them, so a
//! scroll never shows stale content from the previous lap around the ring.

/// Marker written in place of any byte outside printable ASCII.
pub const REPLACEMENT_MARKER: u8 = b'?';

const BLANK: u8 = b' ';

pub(crate) fn is_printable(byte: u8) -> bool {
    (b' '..=b'~').contains(&byte)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    cells: Vec<u8>,
}

impl LineBuffer {
    /// Create a blank buffer. Zero dimensions are clamped to one cell.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            x: 0,
            y: 0,
            cells: vec![BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cursor as `(column, absolute row)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Apply `bytes` and return how many were consumed (always all of them).
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        for &byte in bytes {
            match byte {
                b'\r' => continue,
                b'\n' => {
                    self.blank_from_cursor();
                    self.x = self.width;
                }
                byte if is_printable(byte) => self.put(byte),
                _ => self.put(REPLACEMENT_MARKER),
            }

            if self.x >= self.width {
                self.advance_row();
            }
        }

        if self.x > 0 {
            self.blank_from_cursor();
        }

        bytes.len()
    }

    /// Reset every cell to a space and the cursor to the origin.
    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
        self.x = 0;
        self.y = 0;
    }

    /// Absolute row access, independent of scroll position.
    pub fn row(&self, index: usize) -> &[u8] {
        let start = (index % self.height) * self.width;
        &self.cells[start..start + self.width]
    }

    /// Rows in display order, oldest first. Always yields exactly `height` rows.
    pub fn render_lines(&self) -> RenderLines<'_> {
        RenderLines {
            buffer: self,
            next: 0,
        }
    }

    fn put(&mut self, byte: u8) {
        let idx = self.y * self.width + self.x;
        self.cells[idx] = byte;
        self.x += 1;
    }

    fn blank_from_cursor(&mut self) {
        if self.x >= self.width {
            return;
        }
        let row_start = self.y * self.width;
        self.cells[row_start + self.x..row_start + self.width].fill(BLANK);
    }

    fn advance_row(&mut self) {
        self.x = 0;
        self.y = (self.y + 1) % self.height;
        self.blank_from_cursor();
    }
}

/// Lazy, restartable view over a [`LineBuffer`] in display order.
#[derive(Debug, Clone)]
pub struct RenderLines<'a> {
    buffer: &'a LineBuffer,
    next: usize,
}

impl<'a> Iterator for RenderLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.buffer.height {
            return None;
        }
        let oldest = self.buffer.y + 1;
        let row = self.buffer.row(oldest + self.next);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.height - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RenderLines<'_> {}
