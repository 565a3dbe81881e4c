//! Display surface: the game's view of the terminal.
//!
//! The surface owns the pending cell grid and the terminal backend, and
//! turns raw input into a bounded queue of [`ControlSignal`]s plus a
//! single-fire exit signal. Only the frame loop writes to it; generators
//! get read-only views ([`ScreenBounds`], [`ControlReceiver`]).
//!
//! Coordinates are rounded half away from zero (`f64::round`) everywhere,
//! so [`Surface::draw`] never paints a cell that
//! [`ScreenBounds::is_inside_screen`] calls outside.

use crate::actor::{ControlSignal, InputActor};
use crate::buffer::{Buffer, Cell, Style};
use crate::config::GameConfig;
use crate::frame::FrameCanvas;
use crate::object::MovingObject;
use crate::terminal::{Backend, EventSource};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::cell::Cell as Latch;
use std::io;
use std::time::Duration;

/// Round a real coordinate to a grid cell.
#[inline]
pub fn to_cell(value: f64) -> i32 {
    // `as` saturates, so huge or NaN inputs land far off-grid (NaN at 0).
    value.round() as i32
}

/// Screen dimensions, shareable with generator threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBounds {
    width: u16,
    height: u16,
}

impl ScreenBounds {
    /// Bounds of a `width` x `height` grid.
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Grid width in columns.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in rows.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Whether the rounded point lies in the playable area.
    ///
    /// The last column is excluded: the right edge keeps a one-column
    /// margin, and generators rely on it for their boundary checks.
    pub fn is_inside_screen(&self, x: f64, y: f64) -> bool {
        let (col, row) = (to_cell(x), to_cell(y));
        !(col >= i32::from(self.width) - 1
            || col < 0
            || row >= i32::from(self.height)
            || row < 0)
    }
}

/// Read side of the control queue, shareable with generator threads.
#[derive(Debug, Clone)]
pub struct ControlReceiver {
    rx: Receiver<ControlSignal>,
}

impl ControlReceiver {
    /// Pop the next control signal without blocking.
    ///
    /// [`ControlSignal::None`] means "no input this tick".
    pub fn next(&self) -> ControlSignal {
        self.rx.try_recv().unwrap_or_default()
    }
}

impl From<Receiver<ControlSignal>> for ControlReceiver {
    fn from(rx: Receiver<ControlSignal>) -> Self {
        Self { rx }
    }
}

/// The display surface.
pub struct Surface<B: Backend> {
    backend: B,
    /// Pending frame; nothing reaches the terminal before `show`.
    buffer: Buffer,
    controls: ControlReceiver,
    exit_rx: Receiver<()>,
    /// Channel ends handed to the input actor by `poll_events`.
    senders: Option<(Sender<ControlSignal>, Sender<()>)>,
    input: Option<InputActor>,
    poll_timeout: Duration,
    exited: Latch<bool>,
    finished: bool,
}

impl<B: Backend> Surface<B> {
    /// Take ownership of an acquired terminal backend and set up the grid.
    ///
    /// The grid is reset to the terminal's default colors and then widened
    /// by one column beyond the physical width. Some terminals only paint
    /// the first frame correctly after a resize, so the corrective resize
    /// happens unconditionally. The extra column is never sent to the
    /// terminal (output is clipped to the physical width) and the
    /// one-column margin in [`ScreenBounds::is_inside_screen`] keeps
    /// objects out of it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the terminal reports a zero size.
    pub fn initialize(backend: B, config: &GameConfig) -> io::Result<Self> {
        let (width, height) = backend.size();
        if width == 0 || height == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("terminal has no drawable area ({width}x{height})"),
            ));
        }

        let mut buffer = Buffer::new(width, height);
        buffer.set_default_style(Style::RESET);
        buffer.clear();
        buffer.resize(width.saturating_add(1), height);

        let (control_tx, control_rx) = bounded(config.control_capacity);
        let (exit_tx, exit_rx) = bounded(1);

        log::debug!(
            "surface initialized: {}x{} (terminal {width}x{height})",
            buffer.width(),
            buffer.height()
        );

        Ok(Self {
            backend,
            buffer,
            controls: ControlReceiver { rx: control_rx },
            exit_rx,
            senders: Some((control_tx, exit_tx)),
            input: None,
            poll_timeout: config.input_poll_timeout,
            exited: Latch::new(false),
            finished: false,
        })
    }

    /// Start the input-polling thread. Only the first call has an effect.
    pub fn poll_events<E: EventSource>(&mut self, source: E) {
        let Some((control_tx, exit_tx)) = self.senders.take() else {
            log::warn!("input polling already started");
            return;
        };
        self.input = Some(InputActor::spawn(
            source,
            control_tx,
            exit_tx,
            self.poll_timeout,
        ));
    }

    /// Non-blocking exit check. Stays `true` once it has been `true`.
    ///
    /// The exit channel fires once and is then closed, so both a message
    /// and a disconnect mean exit.
    pub fn is_exited(&self) -> bool {
        if self.exited.get() {
            return true;
        }
        let exited = match self.exit_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => true,
            Err(TryRecvError::Empty) => false,
        };
        self.exited.set(exited);
        exited
    }

    /// Pop the next control signal without blocking.
    pub fn next_control_signal(&self) -> ControlSignal {
        self.controls.next()
    }

    /// A handle for reading control signals from another thread.
    pub fn controls(&self) -> ControlReceiver {
        self.controls.clone()
    }

    /// Grid dimensions for generator threads.
    pub const fn bounds(&self) -> ScreenBounds {
        ScreenBounds::new(self.buffer.width(), self.buffer.height())
    }

    /// Grid size in (columns, rows).
    pub const fn size(&self) -> (u16, u16) {
        (self.buffer.width(), self.buffer.height())
    }

    /// See [`ScreenBounds::is_inside_screen`].
    pub fn is_inside_screen(&self, x: f64, y: f64) -> bool {
        self.bounds().is_inside_screen(x, y)
    }

    /// Paint an object's glyph block into the pending grid.
    ///
    /// Non-whitespace characters overwrite the cell beneath; whitespace
    /// only advances the column. Bounds are the caller's business; cells
    /// off the grid are silently discarded.
    pub fn draw(&mut self, object: &dyn MovingObject) {
        let (corner_x, corner_y) = object.corner();
        let (initial_x, mut y) = (to_cell(corner_x), to_cell(corner_y));
        let style = object.style();

        let mut x = initial_x;
        for ch in object.view().chars() {
            if ch == '\n' {
                y = y.saturating_add(1);
                x = initial_x;
                continue;
            }
            if !ch.is_whitespace() {
                self.buffer.set_signed(x, y, Cell::new(ch).with_style(style));
            }
            x = x.saturating_add(1);
        }
    }

    /// Discard everything drawn since the last clear.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Flush the pending grid to the terminal.
    pub fn show(&mut self) -> io::Result<()> {
        self.backend.present(&self.buffer)
    }

    /// Stop input polling and give the terminal back. Safe to call more
    /// than once; only the first call does anything, and `Drop` calls it
    /// too.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if let Some(input) = self.input.take() {
            input.join();
        }
        self.backend.restore()
    }

    /// The pending grid.
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// The terminal backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: Backend> FrameCanvas for Surface<B> {
    fn is_exited(&self) -> bool {
        Self::is_exited(self)
    }

    fn draw(&mut self, object: &dyn MovingObject) {
        Self::draw(self, object);
    }

    fn show(&mut self) -> io::Result<()> {
        Self::show(self)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }
}

impl<B: Backend> Drop for Surface<B> {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            log::warn!("failed to restore terminal: {e}");
        }
    }
}
