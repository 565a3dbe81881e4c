//! Headless terminal doubles.

use super::{Backend, EventSource};
use crate::buffer::Buffer;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use crossterm::event::Event;
use std::io;
use std::time::Duration;

/// A backend that keeps presented frames in memory.
#[derive(Debug)]
pub struct MemoryBackend {
    width: u16,
    height: u16,
    last_frame: Option<Buffer>,
    presents: usize,
    restores: usize,
}

impl MemoryBackend {
    /// Create a headless terminal of the given physical size.
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            last_frame: None,
            presents: 0,
            restores: 0,
        }
    }

    /// The most recently presented frame.
    pub const fn last_frame(&self) -> Option<&Buffer> {
        self.last_frame.as_ref()
    }

    /// How many frames were presented.
    pub const fn presents(&self) -> usize {
        self.presents
    }

    /// How many times the terminal was restored.
    pub const fn restores(&self) -> usize {
        self.restores
    }
}

impl Backend for MemoryBackend {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: &Buffer) -> io::Result<()> {
        self.presents += 1;
        match &mut self.last_frame {
            Some(last) if last.width() == frame.width() && last.height() == frame.height() => {
                last.copy_from(frame);
            }
            _ => self.last_frame = Some(frame.clone()),
        }
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        self.restores += 1;
        Ok(())
    }
}

/// An event source fed through a channel.
///
/// Dropping the sender makes the source fail with `BrokenPipe`, the same
/// way a closed terminal would.
#[derive(Debug)]
pub struct ChannelEvents {
    rx: Receiver<Event>,
    pending: Option<Event>,
}

/// Create a channel-fed event source and the sender that drives it.
pub fn channel_events() -> (Sender<Event>, ChannelEvents) {
    let (tx, rx) = unbounded();
    (tx, ChannelEvents { rx, pending: None })
}

impl EventSource for ChannelEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.pending = Some(event);
                Ok(true)
            }
            Err(RecvTimeoutError::Timeout) => Ok(false),
            Err(RecvTimeoutError::Disconnected) => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "event source closed",
            )),
        }
    }

    fn read(&mut self) -> io::Result<Event> {
        if let Some(event) = self.pending.take() {
            return Ok(event);
        }
        self.rx
            .recv()
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "event source closed"))
    }
}
