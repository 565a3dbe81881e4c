//! Message types for actor communication.
//!
//! Raw terminal events are decoded into a [`ControlSignal`] once, at the
//! input-polling boundary. Nothing downstream looks at raw events.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A high-level player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlSignal {
    /// No input this tick.
    #[default]
    None,
    /// Leave the game (Escape or Ctrl+C).
    Exit,
    /// Steer left (left arrow).
    MoveLeft,
    /// Steer right (right arrow).
    MoveRight,
    /// Fire (space bar).
    Fire,
}

impl ControlSignal {
    /// Decode a raw terminal event. Anything that is not a key press maps
    /// to [`ControlSignal::None`].
    pub fn from_event(event: &Event) -> Self {
        match event {
            Event::Key(key) => Self::from_key(key),
            _ => Self::None,
        }
    }

    /// Decode a key event.
    ///
    /// Only presses count; release and repeat reports from terminals with
    /// the kitty keyboard protocol are ignored.
    pub fn from_key(key: &KeyEvent) -> Self {
        if key.kind != KeyEventKind::Press {
            return Self::None;
        }
        match key.code {
            KeyCode::Esc => Self::Exit,
            KeyCode::Char('c' | 'C') if key.modifiers.contains(KeyModifiers::CONTROL) => Self::Exit,
            KeyCode::Left => Self::MoveLeft,
            KeyCode::Right => Self::MoveRight,
            KeyCode::Char(' ') => Self::Fire,
            _ => Self::None,
        }
    }

    /// Whether this is the exit command.
    #[inline]
    pub const fn is_exit(self) -> bool {
        matches!(self, Self::Exit)
    }
}
