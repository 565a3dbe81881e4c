//! Buffer module: the cell grid the game is drawn into.
//!
//! This module contains:
//! - [`Cell`]: one glyph and its [`Style`]
//! - [`Buffer`]: a grid of cells representing the screen
//! - [`Color`], [`Rgb`], [`Modifiers`]: style components
//! - [`diff`]: diffing engine for generating minimal ANSI sequences

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
pub mod diff;

pub use buffer::Buffer;
pub use cell::{Cell, Color, Modifiers, Rgb, Style};
