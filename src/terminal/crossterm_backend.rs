//! Crossterm-backed terminal: raw mode, alternate screen, diffed output.

use super::{Backend, EventSource};
use crate::buffer::diff::{render_diff, render_full, DiffState};
use crate::buffer::Buffer;
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// The real terminal.
///
/// Keeps the last presented frame and sends only the difference on the
/// next [`present`](Backend::present).
pub struct CrosstermBackend {
    stdout: Stdout,
    /// Physical terminal width, the clip limit for output.
    width: u16,
    /// Physical terminal height.
    height: u16,
    /// What the terminal currently shows. `None` forces a full redraw.
    current: Option<Buffer>,
    diff_state: DiffState,
    /// Pre-allocated output buffer, flushed in one write.
    output: Vec<u8>,
    /// Whether raw mode and the alternate screen are active.
    active: bool,
}

impl CrosstermBackend {
    /// Take over the terminal: raw mode, alternate screen, hidden cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no usable terminal.
    pub fn acquire() -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(
            stdout,
            EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            terminal::Clear(ClearType::All)
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }

        log::debug!("terminal acquired: {width}x{height}");

        Ok(Self {
            stdout,
            width,
            height,
            current: None,
            diff_state: DiffState::new(),
            output: Vec::with_capacity(65536),
            active: true,
        })
    }

    /// Pick up a physical resize. The logical grid keeps its size; only
    /// the clip width changes and the next frame is sent in full.
    fn sync_size(&mut self) {
        if let Ok((width, height)) = terminal::size() {
            if (width, height) != (self.width, self.height) {
                log::debug!("terminal resized to {width}x{height}");
                self.width = width;
                self.height = height;
                self.current = None;
                self.output.extend_from_slice(b"\x1b[0m\x1b[2J");
            }
        }
    }
}

impl Backend for CrosstermBackend {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: &Buffer) -> io::Result<()> {
        self.output.clear();
        self.sync_size();

        if let Some(current) = &self.current {
            if current.width() == frame.width() && current.height() == frame.height() {
                render_diff(current, frame, self.width, &mut self.output, &mut self.diff_state);
            } else {
                self.current = None;
            }
        }
        if self.current.is_none() {
            render_full(frame, self.width, &mut self.output, &mut self.diff_state);
        }

        if !self.output.is_empty() {
            self.stdout.write_all(&self.output)?;
            self.stdout.flush()?;
        }

        match &mut self.current {
            Some(current) => current.copy_from(frame),
            None => self.current = Some(frame.clone()),
        }
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.stdout.write_all(b"\x1b[0m")?;
        execute!(
            self.stdout,
            terminal::EnableLineWrap,
            cursor::Show,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        log::debug!("terminal restored");
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Best-effort terminal restore for paths that cannot reach the backend,
/// such as a panic hook.
pub fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(b"\x1b[0m");
    let _ = execute!(
        stdout,
        terminal::EnableLineWrap,
        cursor::Show,
        LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
}

/// Exit code after a panic, the same one the Rust runtime uses.
pub const PANIC_EXIT_CODE: i32 = 101;

/// Restore the terminal and end the process on any panic.
///
/// A panic on a generator thread would otherwise leave the frame loop
/// drawing onto the restored shell screen. The previous hook still prints
/// the panic report, after the terminal is back to normal.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        previous(info);
        std::process::exit(PANIC_EXIT_CODE);
    }));
}

/// Raw events read straight from the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}
