//! Meteorites: rocks falling from the top edge, one thread each.

use super::rng::SimpleRng;
use super::view_width;
use crate::buffer::{Rgb, Style};
use crate::config::GameConfig;
use crate::object::{ObjectSender, Sprite};
use crate::screen::ScreenBounds;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Meteorite shapes, smallest first.
pub const METEORITE_VIEWS: [&str; 3] = ["*", "(@)", " ___ \n/   \\\n\\___/"];

/// Fall speed range in rows per frame.
const SPEED_RANGE: (f64, f64) = (0.02, 0.12);

/// A single falling rock.
#[derive(Debug, Clone, PartialEq)]
pub struct Meteorite {
    x: f64,
    y: f64,
    speed: f64,
    view: &'static str,
}

impl Meteorite {
    /// A meteorite entering at the top edge.
    pub const fn new(x: f64, speed: f64, view: &'static str) -> Self {
        Self {
            x,
            y: 0.0,
            speed,
            view,
        }
    }

    /// Pick shape, column and speed for a new meteorite.
    pub fn random(rng: &mut SimpleRng, bounds: ScreenBounds) -> Self {
        let view = METEORITE_VIEWS[rng.next_range(METEORITE_VIEWS.len() as u32) as usize];
        // Keep the whole block left of the right-edge margin.
        let free_columns = i32::from(bounds.width()) - 1 - view_width(view) as i32;
        let x = rng.next_range(u32::try_from(free_columns.max(1)).unwrap_or(1));
        let speed = rng.next_between(SPEED_RANGE.0, SPEED_RANGE.1);
        Self::new(f64::from(x), speed, view)
    }

    /// Top-left corner.
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Move down one frame's worth.
    pub fn advance(&mut self) {
        self.y += self.speed;
    }

    /// Fly until the meteorite leaves the screen or the frame loop stops.
    ///
    /// Returns `false` if the frame loop is gone.
    pub fn fly(mut self, objects: &ObjectSender, bounds: ScreenBounds) -> bool {
        while bounds.is_inside_screen(self.x, self.y) {
            if !Sprite::publish(objects, self.x, self.y, self.view, meteorite_style()) {
                return false;
            }
            self.advance();
        }
        true
    }
}

fn meteorite_style() -> Style {
    Style::RESET.fg(Rgb::new(170, 140, 110))
}

/// Spawn meteorites forever, one thread per rock, one rock every
/// `config.meteorite_interval`.
///
/// The spawner stops once a meteorite finds the frame loop gone.
pub fn generate_meteorites(
    objects: ObjectSender,
    bounds: ScreenBounds,
    config: &GameConfig,
) -> JoinHandle<()> {
    let interval = config.meteorite_interval;
    let mut rng = SimpleRng::new(config.seed);

    thread::Builder::new()
        .name("spaceship-meteorites".to_string())
        .spawn(move || {
            let closed = Arc::new(AtomicBool::new(false));
            let mut spawned = 0u64;
            while !closed.load(Ordering::Relaxed) {
                let meteorite = Meteorite::random(&mut rng, bounds);
                let objects = objects.clone();
                let closed = Arc::clone(&closed);
                let spawn = thread::Builder::new()
                    .name(format!("spaceship-meteorite-{spawned}"))
                    .spawn(move || {
                        if !meteorite.fly(&objects, bounds) {
                            closed.store(true, Ordering::Relaxed);
                        }
                    });
                if let Err(e) = spawn {
                    log::warn!("failed to spawn meteorite: {e}");
                }
                spawned += 1;
                thread::sleep(interval);
            }
            log::debug!("meteorite spawner stopped after {spawned} meteorites");
        })
        .expect("Failed to spawn meteorite thread")
}
