//! Character-cell display sink trait.

/// A character-addressable display (HD44780-style LCD, terminal, OLED in
/// text mode).
///
/// The buffered renderer in [`crate::display`] drives this trait and only
/// touches cells that changed, so implementations can be slow serial
/// devices without hurting the main loop.
pub trait CharacterSink {
    /// Error type for display operations.
    type Error;

    /// Moves the write cursor to (column, row), zero-based.
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error>;

    /// Writes one character byte at the cursor; the cursor advances one
    /// column.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;
}
