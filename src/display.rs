//! Double-buffered text frame for character displays.
//!
//! Character LCDs are slow over I2C expanders; redrawing the full screen
//! every frame costs milliseconds the main loop does not have. A
//! [`TextFrame`] keeps a pending buffer and a committed buffer and on
//! [`flush`](TextFrame::flush) writes only the cells that changed, batching
//! consecutive changed cells into a single cursor move.
//!
//! The frame is generic over geometry; typical panels are `TextFrame<16, 2>`
//! and `TextFrame<20, 4>`. Output goes through the
//! [`CharacterSink`](crate::traits::CharacterSink) trait so it tests on a
//! host without hardware.
//!
//! # Example
//!
//! ```rust
//! use rs_periph::display::TextFrame;
//! use rs_periph::hal::MockSink;
//!
//! let mut frame: TextFrame<16, 2> = TextFrame::new();
//! let mut sink = MockSink::new();
//!
//! frame.write_str(0, 0, "pos:");
//! frame.write_str(0, 5, "1234");
//! assert_eq!(frame.flush(&mut sink).unwrap(), 8);
//!
//! // Nothing changed, nothing written.
//! assert_eq!(frame.flush(&mut sink).unwrap(), 0);
//! ```

extern crate alloc;

use crate::traits::CharacterSink;

/// Double-buffered character frame, `COLS` x `ROWS` cells.
pub struct TextFrame<const COLS: usize, const ROWS: usize> {
    pending: [[u8; COLS]; ROWS],
    committed: [[u8; COLS]; ROWS],
}

impl<const COLS: usize, const ROWS: usize> TextFrame<COLS, ROWS> {
    /// Creates a frame with both buffers blank.
    pub fn new() -> Self {
        Self {
            pending: [[b' '; COLS]; ROWS],
            committed: [[b' '; COLS]; ROWS],
        }
    }

    /// Number of columns.
    pub const fn cols(&self) -> usize {
        COLS
    }

    /// Number of rows.
    pub const fn rows(&self) -> usize {
        ROWS
    }

    /// Blanks the pending buffer. The committed buffer is untouched, so the
    /// next flush erases exactly the cells that were previously drawn.
    pub fn clear(&mut self) {
        self.pending = [[b' '; COLS]; ROWS];
    }

    /// Writes `text` into the pending buffer at `(row, col)`.
    ///
    /// Text that runs past the last column is clipped; out-of-range rows are
    /// ignored. Bytes are written as-is (character LCDs use 8-bit glyph
    /// codes, not UTF-8).
    pub fn write_str(&mut self, row: u8, col: u8, text: &str) {
        let row = row as usize;
        if row >= ROWS {
            return;
        }
        let mut col = col as usize;
        for &byte in text.as_bytes() {
            if col >= COLS {
                break;
            }
            self.pending[row][col] = byte;
            col += 1;
        }
    }

    /// Writes a single glyph byte at `(row, col)`; out-of-range is ignored.
    pub fn write_byte(&mut self, row: u8, col: u8, byte: u8) {
        if (row as usize) < ROWS && (col as usize) < COLS {
            self.pending[row as usize][col as usize] = byte;
        }
    }

    /// Pending text of one row, for assertions and debugging. Glyph bytes
    /// outside ASCII render as `?`; an out-of-range row is empty, matching
    /// the write methods' tolerance of bad coordinates.
    pub fn row_text(&self, row: u8) -> alloc::string::String {
        self.pending
            .get(row as usize)
            .map(|cells| {
                cells
                    .iter()
                    .map(|&b| if b.is_ascii() { b as char } else { '?' })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pushes changed cells to the sink and commits them.
    ///
    /// Consecutive changed cells in a row share one cursor move. Returns the
    /// number of cells written. On error the committed buffer keeps its old
    /// contents for the unwritten cells, so a retry flushes the remainder.
    pub fn flush<S: CharacterSink>(&mut self, sink: &mut S) -> Result<usize, S::Error> {
        let mut written = 0;
        for row in 0..ROWS {
            let mut col = 0;
            while col < COLS {
                if self.pending[row][col] == self.committed[row][col] {
                    col += 1;
                    continue;
                }
                // Start of a dirty run.
                sink.set_cursor(col as u8, row as u8)?;
                while col < COLS && self.pending[row][col] != self.committed[row][col] {
                    sink.write_byte(self.pending[row][col])?;
                    self.committed[row][col] = self.pending[row][col];
                    written += 1;
                    col += 1;
                }
            }
        }
        Ok(written)
    }

    /// Forces every cell dirty so the next flush repaints the whole panel.
    /// Useful after re-initializing the display controller.
    pub fn invalidate(&mut self) {
        for row in self.committed.iter_mut() {
            // 0 is never a printable glyph we emit, so every cell differs.
            row.fill(0);
        }
    }
}

impl<const COLS: usize, const ROWS: usize> Default for TextFrame<COLS, ROWS> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockSink;

    #[test]
    fn flush_writes_only_changed_cells() {
        let mut frame: TextFrame<16, 2> = TextFrame::new();
        let mut sink = MockSink::new();

        frame.write_str(0, 0, "count: 100");
        // "count: 100" is ten cells, but column 6 holds a space identical
        // to the blank committed buffer: 9 dirty cells in two runs.
        assert_eq!(frame.flush(&mut sink).unwrap(), 9);
        assert_eq!(sink.cursor_moves(), 2);

        // Only the last digit changes.
        frame.write_str(0, 0, "count: 101");
        sink.reset();
        assert_eq!(frame.flush(&mut sink).unwrap(), 1);
        assert_eq!(sink.cursor_moves(), 1);
        assert_eq!(sink.bytes(), b"1");
    }

    #[test]
    fn dirty_run_shares_one_cursor_move() {
        let mut frame: TextFrame<16, 2> = TextFrame::new();
        let mut sink = MockSink::new();

        frame.write_str(1, 4, "abcd");
        assert_eq!(frame.flush(&mut sink).unwrap(), 4);
        assert_eq!(sink.cursor_moves(), 1);
        assert_eq!(sink.bytes(), b"abcd");
    }

    #[test]
    fn split_runs_get_separate_cursor_moves() {
        let mut frame: TextFrame<16, 2> = TextFrame::new();
        let mut sink = MockSink::new();

        frame.write_str(0, 0, "ab");
        frame.write_str(0, 8, "cd");
        assert_eq!(frame.flush(&mut sink).unwrap(), 4);
        assert_eq!(sink.cursor_moves(), 2);
    }

    #[test]
    fn clear_then_flush_erases_previous_text() {
        let mut frame: TextFrame<16, 2> = TextFrame::new();
        let mut sink = MockSink::new();

        frame.write_str(0, 2, "xyz");
        frame.flush(&mut sink).unwrap();

        frame.clear();
        sink.reset();
        // Exactly the three previously drawn cells get blanked.
        assert_eq!(frame.flush(&mut sink).unwrap(), 3);
        assert_eq!(sink.bytes(), b"   ");
    }

    #[test]
    fn writes_clip_at_frame_edges() {
        let mut frame: TextFrame<8, 2> = TextFrame::new();

        frame.write_str(0, 6, "long text");
        assert_eq!(frame.row_text(0), "      lo");

        // Out-of-range row is a no-op for writes and empty for reads.
        frame.write_str(5, 0, "nope");
        assert_eq!(frame.row_text(1), "        ");
        assert_eq!(frame.row_text(5), "");
    }

    #[test]
    fn invalidate_repaints_everything() {
        let mut frame: TextFrame<4, 1> = TextFrame::new();
        let mut sink = MockSink::new();

        frame.write_str(0, 0, "ab");
        frame.flush(&mut sink).unwrap();

        frame.invalidate();
        sink.reset();
        assert_eq!(frame.flush(&mut sink).unwrap(), 4);
        assert_eq!(sink.bytes(), b"ab  ");
    }
}
