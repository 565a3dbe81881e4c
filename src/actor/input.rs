//! Input Actor: Dedicated thread for polling terminal events.
//!
//! The actor decodes raw events into [`ControlSignal`]s and pushes them onto
//! the bounded control queue. On Escape or Ctrl+C it fires the exit signal
//! once, drops its end of the exit channel and stops; events still pending
//! at that point are never processed.

use super::messages::ControlSignal;
use crate::terminal::EventSource;
use crossbeam_channel::{Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// # Arguments
    ///
    /// * `source` - Where raw events come from.
    /// * `controls` - Bounded queue for decoded control signals. When it is
    ///   full, new signals are dropped so the exit key is never stuck
    ///   behind an unread backlog.
    /// * `exit` - Single-fire exit notification. Dropped when the thread
    ///   ends for any reason.
    /// * `poll_timeout` - How long to wait for events before checking shutdown.
    pub fn spawn<E: EventSource>(
        source: E,
        controls: Sender<ControlSignal>,
        exit: Sender<()>,
        poll_timeout: Duration,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("spaceship-input".to_string())
            .spawn(move || {
                Self::run_loop(source, &controls, &exit, &shutdown_clone, poll_timeout);
            })
            .expect("Failed to spawn input thread");

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Whether the input thread has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    fn run_loop<E: EventSource>(
        mut source: E,
        controls: &Sender<ControlSignal>,
        exit: &Sender<()>,
        shutdown: &AtomicBool,
        poll_timeout: Duration,
    ) {
        let mut batch = Vec::with_capacity(16);

        loop {
            if shutdown.load(Ordering::Relaxed) {
                log::debug!("input actor shutting down");
                break;
            }

            match source.poll(poll_timeout) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    log::warn!("input polling failed: {e}");
                    break;
                }
            }

            batch.clear();
            if let Err(e) = Self::read_pending(&mut source, &mut batch) {
                log::warn!("reading input failed: {e}");
                break;
            }

            // An exit anywhere in the batch wins over everything queued
            // before it.
            if batch.iter().any(|signal| signal.is_exit()) {
                log::info!("exit requested");
                let _ = exit.try_send(());
                break;
            }

            for signal in batch.drain(..) {
                if signal == ControlSignal::None {
                    continue;
                }
                match controls.try_send(signal) {
                    Ok(()) => {}
                    Err(TrySendError::Full(dropped)) => {
                        log::debug!("control queue full, dropping {dropped:?}");
                    }
                    Err(TrySendError::Disconnected(_)) => return,
                }
            }
        }
    }

    /// Read every event that is already available.
    fn read_pending<E: EventSource>(
        source: &mut E,
        batch: &mut Vec<ControlSignal>,
    ) -> std::io::Result<()> {
        loop {
            let event = source.read()?;
            batch.push(ControlSignal::from_event(&event));
            if !source.poll(Duration::ZERO)? {
                return Ok(());
            }
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
