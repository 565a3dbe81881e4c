//! Cell: The atomic unit of the game grid.
//!
//! A cell is one glyph plus the [`Style`] it is painted with. Glyphs are
//! single `char`s: sprites advance one column per character, so there is
//! no wide-character or grapheme-cluster bookkeeping here.

use bitflags::bitflags;

/// True-color RGB representation.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A foreground or background color.
///
/// `Reset` leaves the choice to the terminal's own default colors, which is
/// what the game uses for its background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Color {
    /// The terminal's default color.
    #[default]
    Reset,
    /// An explicit 24-bit color.
    Rgb(Rgb),
}

impl From<Rgb> for Color {
    #[inline]
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use spaceship::Modifiers;
    /// let style = Modifiers::empty() | Modifiers::BOLD;
    /// assert!(style.contains(Modifiers::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// Display attributes of a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Text modifiers.
    pub modifiers: Modifiers,
}

impl Style {
    /// Terminal default foreground and background, no modifiers.
    pub const RESET: Self = Self {
        fg: Color::Reset,
        bg: Color::Reset,
        modifiers: Modifiers::empty(),
    };

    /// Builder: set the foreground color.
    #[inline]
    #[must_use]
    pub fn fg(mut self, color: impl Into<Color>) -> Self {
        self.fg = color.into();
        self
    }

    /// Builder: set the background color.
    #[inline]
    #[must_use]
    pub fn bg(mut self, color: impl Into<Color>) -> Self {
        self.bg = color.into();
        self
    }

    /// Builder: add modifiers.
    #[inline]
    #[must_use]
    pub const fn add_modifier(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = self.modifiers.union(modifiers);
        self
    }
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    ch: char,
    style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// An empty cell (space with the terminal's default colors).
    pub const EMPTY: Self = Self {
        ch: ' ',
        style: Style::RESET,
    };

    /// Create a cell with the default style.
    #[inline]
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            style: Style::RESET,
        }
    }

    /// Create a blank cell painted with `style`.
    #[inline]
    pub const fn blank(style: Style) -> Self {
        Self { ch: ' ', style }
    }

    /// Builder: set the style.
    #[inline]
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// The glyph in this cell.
    #[inline]
    pub const fn ch(&self) -> char {
        self.ch
    }

    /// The style of this cell.
    #[inline]
    pub const fn style(&self) -> Style {
        self.style
    }
}
