//! The player's ship and the shells it fires.
//!
//! The ship's thread is the only consumer of control signals. It reads at
//! most one signal per frame, so a burst of key presses is played back one
//! step per frame in the order it was typed.

use super::view_width;
use crate::actor::ControlSignal;
use crate::buffer::{Modifiers, Rgb, Style};
use crate::object::{ObjectSender, Sprite};
use crate::screen::{ControlReceiver, ScreenBounds};
use std::thread::{self, JoinHandle};

/// Ship glyphs.
pub const SHIP_VIEW: &str = " ^ \n/#\\";

/// Shell glyph.
pub const SHELL_VIEW: &str = "|";

/// Shell speed in rows per frame.
const SHELL_SPEED: f64 = 0.5;

/// The player's ship, parked on the bottom rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    x: f64,
    y: f64,
    bounds: ScreenBounds,
}

impl Ship {
    /// A ship centered on the bottom edge.
    pub fn new(bounds: ScreenBounds) -> Self {
        let width = view_width(SHIP_VIEW) as f64;
        let height = SHIP_VIEW.lines().count() as f64;
        Self {
            x: ((f64::from(bounds.width()) - width) / 2.0).floor().max(0.0),
            y: (f64::from(bounds.height()) - height).max(0.0),
            bounds,
        }
    }

    /// Top-left corner.
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Apply one control signal. Returns a shell when firing.
    ///
    /// Moves that would push any part of the hull outside the screen are
    /// ignored.
    pub fn apply(&mut self, signal: ControlSignal) -> Option<Shell> {
        let right_edge = view_width(SHIP_VIEW) as f64 - 1.0;
        match signal {
            ControlSignal::MoveLeft if self.bounds.is_inside_screen(self.x - 1.0, self.y) => {
                self.x -= 1.0;
                None
            }
            ControlSignal::MoveRight
                if self.bounds.is_inside_screen(self.x + 1.0 + right_edge, self.y) =>
            {
                self.x += 1.0;
                None
            }
            ControlSignal::Fire => Some(Shell {
                x: self.x + (right_edge / 2.0).floor(),
                y: self.y - 1.0,
            }),
            _ => None,
        }
    }

    /// Publish the ship every frame, steering by control signals, until
    /// the frame loop stops.
    pub fn fly(mut self, objects: &ObjectSender, controls: &ControlReceiver) {
        let style = Style::RESET
            .fg(Rgb::new(120, 200, 255))
            .add_modifier(Modifiers::BOLD);
        loop {
            if let Some(shell) = self.apply(controls.next()) {
                spawn_shell(shell, objects.clone(), self.bounds);
            }
            if !Sprite::publish(objects, self.x, self.y, SHIP_VIEW, style) {
                break;
            }
        }
        log::debug!("ship stopped");
    }
}

/// A shell flying straight up.
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    x: f64,
    y: f64,
}

impl Shell {
    /// Top-left corner.
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Move up one frame's worth.
    pub fn advance(&mut self) {
        self.y -= SHELL_SPEED;
    }

    /// Fly until the shell leaves the screen or the frame loop stops.
    pub fn fly(mut self, objects: &ObjectSender, bounds: ScreenBounds) {
        let style = Style::RESET.fg(Rgb::new(255, 220, 90));
        while bounds.is_inside_screen(self.x, self.y) {
            if !Sprite::publish(objects, self.x, self.y, SHELL_VIEW, style) {
                return;
            }
            self.advance();
        }
    }
}

fn spawn_shell(shell: Shell, objects: ObjectSender, bounds: ScreenBounds) {
    let spawn = thread::Builder::new()
        .name("spaceship-shell".to_string())
        .spawn(move || shell.fly(&objects, bounds));
    if let Err(e) = spawn {
        log::warn!("failed to spawn shell: {e}");
    }
}

/// Spawn the ship's thread.
pub fn generate_ship(
    bounds: ScreenBounds,
    controls: ControlReceiver,
    objects: ObjectSender,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("spaceship-ship".to_string())
        .spawn(move || Ship::new(bounds).fly(&objects, &controls))
        .expect("Failed to spawn ship thread")
}
