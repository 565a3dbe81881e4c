//! Diffing Engine: Generate minimal ANSI sequences from buffer changes.
//!
//! 1. Compare the displayed and the pending buffer
//! 2. Emit escape sequences only for changed cells
//! 3. Skip cursor moves between adjacent cells
//! 4. Track color state to avoid redundant SGR sequences
//!
//! Output is clipped to a column limit. The game grid may be one column
//! wider than the physical terminal (see `Surface::initialize`), and that
//! column must never reach the terminal or it would wrap.

use super::{Buffer, Cell, Color, Modifiers};
use std::io::Write;

/// State tracker for the diffing algorithm.
///
/// Mirrors what the terminal currently has (cursor position, colors,
/// modifiers) so repeated state is not re-emitted.
#[derive(Debug, Clone)]
pub struct DiffState {
    cursor_x: u16,
    cursor_y: u16,
    fg: Option<Color>,
    bg: Option<Color>,
    modifiers: Option<Modifiers>,
}

impl Default for DiffState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffState {
    /// Create a new diff state with the cursor at home.
    pub const fn new() -> Self {
        Self {
            cursor_x: 0,
            cursor_y: 0,
            fg: None,
            bg: None,
            modifiers: None,
        }
    }

    /// Reset the state (e.g., after a full screen clear).
    pub const fn reset(&mut self) {
        self.fg = None;
        self.bg = None;
        self.modifiers = None;
        // Force cursor move on next write
        self.cursor_x = u16::MAX;
        self.cursor_y = u16::MAX;
    }
}

/// Result of a diff operation.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Number of cells that were different.
    pub cells_changed: usize,
    /// Number of cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Number of color change sequences emitted.
    pub color_changes: usize,
}

/// Render the difference between two buffers into an ANSI sequence buffer.
///
/// Only columns `< clip_width` are considered.
pub fn render_diff(
    current: &Buffer,
    next: &Buffer,
    clip_width: u16,
    output: &mut Vec<u8>,
    state: &mut DiffState,
) -> DiffResult {
    debug_assert_eq!(current.width(), next.width());
    debug_assert_eq!(current.height(), next.height());

    let mut result = DiffResult::default();
    let width = current.width();
    let x_end = clip_width.min(width);

    for y in 0..current.height() {
        for x in 0..x_end {
            let idx = (y as usize) * (width as usize) + (x as usize);
            let next_cell = &next.cells()[idx];

            if current.cells()[idx] == *next_cell {
                continue;
            }

            result.cells_changed += 1;

            if state.cursor_y != y || state.cursor_x != x {
                emit_cursor_move(output, x, y);
                state.cursor_x = x;
                state.cursor_y = y;
                result.cursor_moves += 1;
            }

            result.color_changes += emit_style(output, next_cell, state);
            emit_glyph(output, next_cell);

            // The terminal holds the cursor on the last column instead of
            // advancing, so force an explicit move next time.
            state.cursor_x = if x + 1 >= x_end { u16::MAX } else { x + 1 };
        }
    }

    result
}

/// Generate a full redraw sequence (no diffing).
///
/// Used for the first frame and whenever the terminal state is unknown.
pub fn render_full(buffer: &Buffer, clip_width: u16, output: &mut Vec<u8>, state: &mut DiffState) {
    let x_end = clip_width.min(buffer.width());

    output.extend_from_slice(b"\x1b[0m");
    state.reset();

    for (y, row) in buffer.rows().enumerate() {
        emit_cursor_move(output, 0, y as u16);
        for cell in &row[..x_end as usize] {
            emit_style(output, cell, state);
            emit_glyph(output, cell);
        }
    }

    state.cursor_x = u16::MAX;
    state.cursor_y = u16::MAX;
}

/// Emit whatever SGR sequences are needed to paint `cell`.
///
/// Returns the number of color changes emitted.
fn emit_style(output: &mut Vec<u8>, cell: &Cell, state: &mut DiffState) -> usize {
    let style = cell.style();
    let mut changes = 0;

    // Removing a modifier needs a full reset, which also drops colors.
    let current_mods = state.modifiers.unwrap_or(Modifiers::empty());
    if !current_mods.difference(style.modifiers).is_empty() {
        output.extend_from_slice(b"\x1b[0m");
        state.fg = None;
        state.bg = None;
        state.modifiers = None;
    }

    if state.fg != Some(style.fg) {
        emit_fg_color(output, style.fg);
        state.fg = Some(style.fg);
        changes += 1;
    }

    if state.bg != Some(style.bg) {
        emit_bg_color(output, style.bg);
        state.bg = Some(style.bg);
        changes += 1;
    }

    if state.modifiers != Some(style.modifiers) {
        let added = style
            .modifiers
            .difference(state.modifiers.unwrap_or(Modifiers::empty()));
        emit_modifier_set(output, added);
        state.modifiers = Some(style.modifiers);
    }

    changes
}

/// Emit a cursor move sequence.
///
/// Uses the most compact representation:
/// - `\x1b[H` for home (1,1)
/// - `\x1b[{row};{col}H` for absolute positioning
#[inline]
fn emit_cursor_move(output: &mut Vec<u8>, x: u16, y: u16) {
    // ANSI uses 1-indexed positions
    let row = y + 1;
    let col = x + 1;

    if row == 1 && col == 1 {
        output.extend_from_slice(b"\x1b[H");
    } else if col == 1 {
        let _ = write!(output, "\x1b[{row}H");
    } else {
        let _ = write!(output, "\x1b[{row};{col}H");
    }
}

#[inline]
fn emit_fg_color(output: &mut Vec<u8>, color: Color) {
    match color {
        Color::Reset => output.extend_from_slice(b"\x1b[39m"),
        Color::Rgb(c) => {
            let _ = write!(output, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b);
        }
    }
}

#[inline]
fn emit_bg_color(output: &mut Vec<u8>, color: Color) {
    match color {
        Color::Reset => output.extend_from_slice(b"\x1b[49m"),
        Color::Rgb(c) => {
            let _ = write!(output, "\x1b[48;2;{};{};{}m", c.r, c.g, c.b);
        }
    }
}

/// Emit SGR sequences for newly added modifiers.
#[inline]
fn emit_modifier_set(output: &mut Vec<u8>, modifiers: Modifiers) {
    if modifiers.contains(Modifiers::BOLD) {
        output.extend_from_slice(b"\x1b[1m");
    }
}

#[inline]
fn emit_glyph(output: &mut Vec<u8>, cell: &Cell) {
    let mut utf8 = [0u8; 4];
    output.extend_from_slice(cell.ch().encode_utf8(&mut utf8).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Rgb, Style};

    #[test]
    fn test_diff_identical_buffers() {
        let a = Buffer::new(10, 5);
        let b = Buffer::new(10, 5);
        let mut output = Vec::new();
        let mut state = DiffState::new();

        let result = render_diff(&a, &b, 10, &mut output, &mut state);

        assert_eq!(result.cells_changed, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_diff_single_cell_change() {
        let a = Buffer::new(10, 5);
        let mut b = Buffer::new(10, 5);
        b.set(5, 2, Cell::new('X'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, 10, &mut output, &mut state);

        assert_eq!(result.cells_changed, 1);
        let output_str = String::from_utf8_lossy(&output);
        assert!(output_str.starts_with("\x1b[3;6H"));
        assert!(output_str.ends_with('X'));
    }

    #[test]
    fn test_diff_adjacent_cells_no_cursor_move() {
        let a = Buffer::new(10, 5);
        let mut b = Buffer::new(10, 5);
        b.set(0, 0, Cell::new('A'));
        b.set(1, 0, Cell::new('B'));
        b.set(2, 0, Cell::new('C'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, 10, &mut output, &mut state);

        assert_eq!(result.cells_changed, 3);
        // Cursor starts at (0,0) and the cells are adjacent
        assert_eq!(result.cursor_moves, 0);
    }

    #[test]
    fn test_diff_color_tracking() {
        let a = Buffer::new(10, 5);
        let mut b = Buffer::new(10, 5);
        let red = Style::RESET.fg(Rgb::new(255, 0, 0));
        b.set(0, 0, Cell::new('A').with_style(red));
        b.set(1, 0, Cell::new('B').with_style(red));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, 10, &mut output, &mut state);

        // fg and bg for the first cell, nothing for the second
        assert_eq!(result.color_changes, 2);
    }

    #[test]
    fn test_bold_set_then_reset() {
        let a = Buffer::new(4, 1);
        let mut b = Buffer::new(4, 1);
        let bold = Style::RESET.add_modifier(Modifiers::BOLD);
        b.set(0, 0, Cell::new('^').with_style(bold));
        b.set(1, 0, Cell::new('#'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        render_diff(&a, &b, 4, &mut output, &mut state);

        let output_str = String::from_utf8_lossy(&output);
        let bold_at = output_str.find("\x1b[1m^").unwrap();
        // Dropping bold needs a full reset before the plain glyph.
        let reset_at = output_str.rfind("\x1b[0m").unwrap();
        assert!(reset_at > bold_at);
        assert!(output_str.ends_with('#'));
    }

    #[test]
    fn test_diff_clips_extra_column() {
        let a = Buffer::new(11, 2);
        let mut b = Buffer::new(11, 2);
        b.set(10, 0, Cell::new('X'));
        b.set(9, 1, Cell::new('Y'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, 10, &mut output, &mut state);

        assert_eq!(result.cells_changed, 1);
        let output_str = String::from_utf8_lossy(&output);
        assert!(!output_str.contains('X'));
        assert!(output_str.contains('Y'));
    }

    #[test]
    fn test_cursor_move_after_last_column() {
        let a = Buffer::new(3, 2);
        let mut b = Buffer::new(3, 2);
        b.set(2, 0, Cell::new('A'));
        b.set(0, 1, Cell::new('B'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, 3, &mut output, &mut state);

        assert_eq!(result.cursor_moves, 2);
    }

    #[test]
    fn test_cursor_move_optimization() {
        let mut output = Vec::new();

        emit_cursor_move(&mut output, 0, 0);
        assert_eq!(&output, b"\x1b[H");

        output.clear();
        emit_cursor_move(&mut output, 0, 5);
        assert_eq!(&output, b"\x1b[6H");

        output.clear();
        emit_cursor_move(&mut output, 10, 5);
        assert_eq!(&output, b"\x1b[6;11H");
    }

    #[test]
    fn test_render_full() {
        let mut buffer = Buffer::new(4, 2);
        buffer.set(0, 0, Cell::new('A'));
        buffer.set(1, 0, Cell::new('B'));
        buffer.set(3, 0, Cell::new('Z'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        render_full(&buffer, 3, &mut output, &mut state);

        let output_str = String::from_utf8_lossy(&output);
        assert!(output_str.starts_with("\x1b[0m\x1b[H"));
        assert!(output_str.contains("AB "));
        assert!(output_str.contains("\x1b[2H"));
        assert!(!output_str.contains('Z'));
    }
}
