//! # Spaceship
//!
//! A terminal arcade game: a ship dodging and shooting meteorites on a
//! character grid.
//!
//! ## Core Concepts
//!
//! - **One thread per object**: every meteorite, shell and the ship runs
//!   its own loop and publishes a [`MovingObject`] each frame
//! - **Drain, draw, release**: the [`FrameOrchestrator`] draws everything
//!   published so far, then releases all of it at once, so no object moves
//!   twice within one displayed frame
//! - **Non-blocking input**: an input thread turns key presses into
//!   [`ControlSignal`]s on a bounded queue and fires a one-shot exit signal
//!
//! ## Example
//!
//! ```rust,ignore
//! use spaceship::{FrameOrchestrator, GameConfig, Surface};
//! use spaceship::terminal::{CrosstermBackend, CrosstermEvents};
//!
//! let config = GameConfig::default();
//! let mut surface = Surface::initialize(CrosstermBackend::acquire()?, &config)?;
//! surface.poll_events(CrosstermEvents);
//!
//! let (objects_tx, objects_rx) = crossbeam_channel::bounded(0);
//! spaceship::game::generate_ship(surface.bounds(), surface.controls(), objects_tx);
//!
//! FrameOrchestrator::with_config(objects_rx, &config).run(&mut surface)?;
//! surface.finish()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod config;
pub mod frame;
pub mod game;
pub mod object;
pub mod screen;
pub mod terminal;

// Re-exports for convenience
pub use actor::ControlSignal;
pub use buffer::{Buffer, Cell, Color, Modifiers, Rgb, Style};
pub use config::GameConfig;
pub use frame::{FrameCanvas, FrameOrchestrator, FrameState, FrameStats};
pub use object::{rendezvous, FrameWait, MovingObject, ObjectReceiver, ObjectSender, Release, Sprite};
pub use screen::{ControlReceiver, ScreenBounds, Surface};
