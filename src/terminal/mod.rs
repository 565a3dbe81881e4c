//! Terminal access: the seams between the game and a real terminal.
//!
//! - [`Backend`]: owns the output side (size, presenting a frame, restoring
//!   the user's terminal).
//! - [`EventSource`]: owns the input side (raw events for the input actor).
//!
//! [`CrosstermBackend`] and [`CrosstermEvents`] talk to the real terminal.
//! [`MemoryBackend`] and [`ChannelEvents`] run headless, for tests and
//! benchmarks.

mod crossterm_backend;
mod memory;

pub use crossterm_backend::{
    install_panic_hook, restore_terminal, CrosstermBackend, CrosstermEvents, PANIC_EXIT_CODE,
};
pub use memory::{channel_events, ChannelEvents, MemoryBackend};

use crate::buffer::Buffer;
use crossterm::event::Event;
use std::io;
use std::time::Duration;

/// Output side of a terminal.
pub trait Backend {
    /// Physical size in (columns, rows).
    fn size(&self) -> (u16, u16);

    /// Make `frame` visible.
    fn present(&mut self, frame: &Buffer) -> io::Result<()>;

    /// Give the terminal back to the user. Called at most once by the
    /// surface; implementations must tolerate repeated calls anyway.
    fn restore(&mut self) -> io::Result<()>;
}

/// Input side of a terminal.
pub trait EventSource: Send + 'static {
    /// Wait up to `timeout` for an event to become readable.
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Read the next event. Only called after `poll` returned `true`.
    fn read(&mut self) -> io::Result<Event>;
}
