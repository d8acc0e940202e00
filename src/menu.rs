//! On-device settings menu: an owning list of polymorphic entries.
//!
//! Entries implement [`MenuEntry`] and live in a `Vec<Box<dyn MenuEntry>>`
//! owned by the [`Menu`] — no intrusive lists, no shared-ownership escape
//! hatches. Navigation skips non-selectable entries (separators, captions);
//! while an entry holds edit focus, left/right route to the entry instead
//! of moving the cursor.
//!
//! Rendering writes into a [`TextFrame`](crate::display::TextFrame) row
//! window so only changed cells reach the display.
//!
//! # Example
//!
//! ```rust
//! use rs_periph::menu::{IntEntry, Menu, ToggleEntry};
//!
//! let mut menu = Menu::new();
//! menu.push(Box::new(IntEntry::new("PPR", 400, 1, 10_000, 1)));
//! menu.push(Box::new(ToggleEntry::new("Z-sync", false)));
//!
//! menu.select(); // enter edit mode on "PPR"
//! menu.right();  // 400 -> 401
//! menu.select(); // leave edit mode
//! menu.down();   // cursor to "Z-sync"
//! ```

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use heapless::String as HString;

/// Maximum rendered length of an entry's value text.
pub const MAX_VALUE_TEXT: usize = 16;

/// Rendered value text for one entry.
pub type ValueText = HString<MAX_VALUE_TEXT>;

/// One row of the settings menu.
///
/// The capability set mirrors what a two-line character display needs:
/// a label, a rendered value, and left/right adjustment while edited.
pub trait MenuEntry {
    /// Static label shown in the left column.
    fn label(&self) -> &str;

    /// Whether the cursor may land on this entry.
    fn is_selectable(&self) -> bool {
        true
    }

    /// Writes the current value text (may be empty for separators).
    fn render_value(&self, out: &mut ValueText);

    /// Adjusts the value downward / leftward while edited.
    fn move_left(&mut self);

    /// Adjusts the value upward / rightward while edited.
    fn move_right(&mut self);

    /// Called when the user selects the entry. Returns true if the entry
    /// takes edit focus (value entries); false for one-shot actions.
    fn enter_edit(&mut self) -> bool {
        false
    }

    /// Called when edit focus leaves the entry.
    fn exit_edit(&mut self) {}
}

// ============================================================================
// Built-in entries
// ============================================================================

/// Clamped integer entry with a step size.
pub struct IntEntry {
    label: &'static str,
    /// Current value, always within `[min, max]`.
    pub value: i32,
    min: i32,
    max: i32,
    step: i32,
}

impl IntEntry {
    /// Creates an integer entry; `value` is clamped into `[min, max]`.
    pub fn new(label: &'static str, value: i32, min: i32, max: i32, step: i32) -> Self {
        Self {
            label,
            value: value.clamp(min, max),
            min,
            max,
            step: step.max(1),
        }
    }
}

impl MenuEntry for IntEntry {
    fn label(&self) -> &str {
        self.label
    }

    fn render_value(&self, out: &mut ValueText) {
        let _ = core::fmt::write(out, format_args!("{}", self.value));
    }

    fn move_left(&mut self) {
        self.value = self.value.saturating_sub(self.step).clamp(self.min, self.max);
    }

    fn move_right(&mut self) {
        self.value = self.value.saturating_add(self.step).clamp(self.min, self.max);
    }

    fn enter_edit(&mut self) -> bool {
        true
    }
}

/// Boolean on/off entry.
pub struct ToggleEntry {
    label: &'static str,
    /// Current state.
    pub value: bool,
}

impl ToggleEntry {
    /// Creates a toggle entry.
    pub fn new(label: &'static str, value: bool) -> Self {
        Self { label, value }
    }
}

impl MenuEntry for ToggleEntry {
    fn label(&self) -> &str {
        self.label
    }

    fn render_value(&self, out: &mut ValueText) {
        let _ = out.push_str(if self.value { "on" } else { "off" });
    }

    fn move_left(&mut self) {
        self.value = !self.value;
    }

    fn move_right(&mut self) {
        self.value = !self.value;
    }

    // Selecting a toggle flips it directly instead of entering edit mode.
    fn enter_edit(&mut self) -> bool {
        self.value = !self.value;
        false
    }
}

/// One-shot action entry running a boxed closure on select.
pub struct ActionEntry {
    label: &'static str,
    action: Box<dyn FnMut() + Send>,
}

impl ActionEntry {
    /// Creates an action entry.
    pub fn new(label: &'static str, action: impl FnMut() + Send + 'static) -> Self {
        Self {
            label,
            action: Box::new(action),
        }
    }
}

impl MenuEntry for ActionEntry {
    fn label(&self) -> &str {
        self.label
    }

    fn render_value(&self, _out: &mut ValueText) {}

    fn move_left(&mut self) {}

    fn move_right(&mut self) {}

    fn enter_edit(&mut self) -> bool {
        (self.action)();
        false
    }
}

/// Non-selectable caption / separator row.
pub struct Separator {
    label: &'static str,
}

impl Separator {
    /// Creates a separator with the given caption (may be empty).
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl MenuEntry for Separator {
    fn label(&self) -> &str {
        self.label
    }

    fn is_selectable(&self) -> bool {
        false
    }

    fn render_value(&self, _out: &mut ValueText) {}

    fn move_left(&mut self) {}

    fn move_right(&mut self) {}
}

// ============================================================================
// Menu container
// ============================================================================

/// Owning menu over polymorphic entries.
pub struct Menu {
    entries: Vec<Box<dyn MenuEntry>>,
    cursor: usize,
    editing: bool,
    /// First row shown in the render window.
    scroll: usize,
}

impl Menu {
    /// Creates an empty menu.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            editing: false,
            scroll: 0,
        }
    }

    /// Appends an entry. The menu owns it from here on.
    pub fn push(&mut self, entry: Box<dyn MenuEntry>) {
        self.entries.push(entry);
        // Make sure the cursor starts on something selectable.
        if self.entries.len() == 1 || !self.entries[self.cursor].is_selectable() {
            self.seek_selectable_from(self.cursor, 1);
        }
    }

    /// Number of entries (including separators).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the menu holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the cursor row.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether an entry currently holds edit focus.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Immutable access to an entry (for assertions and rendering).
    pub fn entry(&self, index: usize) -> Option<&dyn MenuEntry> {
        self.entries.get(index).map(|e| e.as_ref())
    }

    fn seek_selectable_from(&mut self, start: usize, dir: isize) {
        if self.entries.is_empty() {
            return;
        }
        let len = self.entries.len() as isize;
        let mut idx = start as isize;
        for _ in 0..len {
            if self.entries[idx as usize].is_selectable() {
                self.cursor = idx as usize;
                return;
            }
            idx = (idx + dir).rem_euclid(len);
        }
    }

    fn step_cursor(&mut self, dir: isize) {
        if self.entries.is_empty() || self.editing {
            return;
        }
        let len = self.entries.len() as isize;
        let next = (self.cursor as isize + dir).rem_euclid(len);
        self.seek_selectable_from(next as usize, dir);
    }

    /// Moves the cursor up, wrapping and skipping non-selectable rows.
    /// Ignored while editing.
    pub fn up(&mut self) {
        self.step_cursor(-1);
    }

    /// Moves the cursor down, wrapping and skipping non-selectable rows.
    /// Ignored while editing.
    pub fn down(&mut self) {
        self.step_cursor(1);
    }

    /// Routes left to the edited entry; otherwise moves the cursor up.
    pub fn left(&mut self) {
        if self.editing {
            self.entries[self.cursor].move_left();
        } else {
            self.up();
        }
    }

    /// Routes right to the edited entry; otherwise moves the cursor down.
    pub fn right(&mut self) {
        if self.editing {
            self.entries[self.cursor].move_right();
        } else {
            self.down();
        }
    }

    /// Activates the cursor entry: enters/leaves edit mode for value
    /// entries, runs actions, flips toggles.
    pub fn select(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        if self.editing {
            self.entries[self.cursor].exit_edit();
            self.editing = false;
        } else {
            self.editing = self.entries[self.cursor].enter_edit();
        }
    }

    /// Renders `rows` entries into a text frame starting at the scroll
    /// offset, with a cursor marker in column 0 (`>` or `*` while editing).
    pub fn render<const COLS: usize, const ROWS: usize>(
        &mut self,
        frame: &mut crate::display::TextFrame<COLS, ROWS>,
    ) {
        // Keep the cursor row inside the window.
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + ROWS {
            self.scroll = self.cursor + 1 - ROWS;
        }

        frame.clear();
        for row in 0..ROWS {
            let idx = self.scroll + row;
            let Some(entry) = self.entries.get(idx) else {
                break;
            };

            let marker = if idx == self.cursor {
                if self.editing {
                    "*"
                } else {
                    ">"
                }
            } else {
                " "
            };
            frame.write_str(row as u8, 0, marker);
            frame.write_str(row as u8, 1, entry.label());

            let mut value = ValueText::new();
            entry.render_value(&mut value);
            if !value.is_empty() {
                let col = COLS.saturating_sub(value.len()) as u8;
                frame.write_str(row as u8, col, value.as_str());
            }
        }
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::TextFrame;
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};

    fn sample_menu() -> Menu {
        let mut menu = Menu::new();
        menu.push(Box::new(Separator::new("-- encoder --")));
        menu.push(Box::new(IntEntry::new("PPR", 400, 1, 10_000, 1)));
        menu.push(Box::new(ToggleEntry::new("Z-sync", false)));
        menu.push(Box::new(IntEntry::new("Offset", 0, -1000, 1000, 10)));
        menu
    }

    #[test]
    fn cursor_skips_separators() {
        let mut menu = sample_menu();
        assert_eq!(menu.cursor(), 1); // seeded past the separator

        menu.up(); // wraps past index 0
        assert_eq!(menu.cursor(), 3);
        menu.down();
        assert_eq!(menu.cursor(), 1);
    }

    #[test]
    fn edit_mode_routes_left_right_to_entry() {
        let mut menu = sample_menu();
        menu.select(); // edit PPR
        assert!(menu.is_editing());

        menu.right();
        menu.right();
        menu.left();
        menu.select(); // done
        assert!(!menu.is_editing());

        let mut text = ValueText::new();
        menu.entry(1).unwrap().render_value(&mut text);
        assert_eq!(text.as_str(), "401");
    }

    #[test]
    fn navigation_locked_while_editing() {
        let mut menu = sample_menu();
        menu.select();
        menu.down(); // ignored
        assert_eq!(menu.cursor(), 1);
    }

    #[test]
    fn int_entry_clamps_at_bounds() {
        let mut entry = IntEntry::new("x", 9_999, 1, 10_000, 1);
        entry.move_right();
        entry.move_right();
        assert_eq!(entry.value, 10_000);

        let mut entry = IntEntry::new("x", 2, 1, 10, 5);
        entry.move_left();
        assert_eq!(entry.value, 1);
    }

    #[test]
    fn toggle_flips_on_select_without_edit_focus() {
        let mut menu = sample_menu();
        menu.down(); // Z-sync
        menu.select();
        assert!(!menu.is_editing());

        let mut text = ValueText::new();
        menu.entry(2).unwrap().render_value(&mut text);
        assert_eq!(text.as_str(), "on");
    }

    #[test]
    fn action_runs_on_select() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        let mut menu = Menu::new();
        menu.push(Box::new(ActionEntry::new("Reset", move || {
            c.fetch_add(1, Ordering::SeqCst);
        })));

        menu.select();
        menu.select();
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!menu.is_editing());
    }

    #[test]
    fn render_marks_cursor_and_right_aligns_values() {
        let mut menu = sample_menu();
        let mut frame: TextFrame<16, 2> = TextFrame::new();

        menu.render(&mut frame);
        // Window scrolled to keep cursor (row 1) visible: rows 0..2 shown.
        assert_eq!(frame.row_text(0), " -- encoder --  ");
        assert_eq!(frame.row_text(1), ">PPR         400");

        menu.select();
        menu.render(&mut frame);
        assert_eq!(frame.row_text(1), "*PPR         400");
    }
}
