//! Object generators: the threads that move things around.
//!
//! Each entity runs on its own thread and talks to the frame loop only
//! through the render channel (see [`crate::object`]). Collisions and
//! scoring are not modelled; objects simply fly until they leave the
//! screen.

mod meteorite;
mod rng;
mod ship;

pub use meteorite::{generate_meteorites, Meteorite, METEORITE_VIEWS};
pub use rng::SimpleRng;
pub use ship::{generate_ship, Shell, Ship, SHELL_VIEW, SHIP_VIEW};

/// Width of a glyph block: its longest row, in characters.
pub fn view_width(view: &str) -> usize {
    view.lines().map(|line| line.chars().count()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_width() {
        assert_eq!(view_width(""), 0);
        assert_eq!(view_width("*"), 1);
        assert_eq!(view_width(" ___ \n/   \\\n\\___/"), 5);
        assert_eq!(view_width(SHIP_VIEW), 3);
    }
}
