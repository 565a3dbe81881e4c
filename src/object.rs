//! Moving objects: what generators publish and the frame loop draws.
//!
//! A generator publishes one boxed [`MovingObject`] per frame on the render
//! channel, then parks on the [`FrameWait`] half of a [`rendezvous`]. The
//! frame loop draws the object, and only after every object of the frame
//! is drawn does it call [`MovingObject::release`], which wakes the
//! generator to compute its next position.

use crate::buffer::Style;
use crossbeam_channel::{bounded, Receiver, Sender};

/// The render channel's sending half, one clone per generator.
pub type ObjectSender = Sender<Box<dyn MovingObject>>;

/// The render channel's receiving half, owned by the frame loop.
pub type ObjectReceiver = Receiver<Box<dyn MovingObject>>;

/// Anything that can be drawn and frame-synchronized.
pub trait MovingObject: Send {
    /// Top-left corner in real-valued grid coordinates. Rounded to a cell
    /// at draw time.
    fn corner(&self) -> (f64, f64);

    /// Glyph block. Rows are separated by `'\n'`; whitespace is
    /// transparent.
    fn view(&self) -> &str;

    /// Style for every glyph of the block.
    fn style(&self) -> Style;

    /// Wake the producer waiting on this frame. Consumes the object, so a
    /// producer is woken at most once per published frame. A no-op when
    /// nobody waits.
    fn release(self: Box<Self>);
}

/// Create a one-shot frame rendezvous.
pub fn rendezvous() -> (Release, FrameWait) {
    let (tx, rx) = bounded(1);
    (Release { tx }, FrameWait { rx })
}

/// Orchestrator half of a rendezvous.
#[derive(Debug)]
pub struct Release {
    tx: Sender<()>,
}

impl Release {
    /// Unblock the waiting producer.
    ///
    /// The signal is buffered, so it is not lost if the producer has not
    /// reached [`FrameWait::wait`] yet. If the producer is gone this does
    /// nothing.
    pub fn release(self) {
        let _ = self.tx.try_send(());
    }
}

/// Producer half of a rendezvous.
#[derive(Debug)]
pub struct FrameWait {
    rx: Receiver<()>,
}

impl FrameWait {
    /// Block until the object has been drawn and released.
    ///
    /// Returns `false` if the object was dropped without a release, which
    /// happens when the frame loop has shut down. Producers should stop.
    #[must_use]
    pub fn wait(self) -> bool {
        self.rx.recv().is_ok()
    }
}

/// A plain moving object: a positioned, styled glyph block.
#[derive(Debug)]
pub struct Sprite {
    x: f64,
    y: f64,
    view: &'static str,
    style: Style,
    release: Release,
}

impl Sprite {
    /// Create a sprite for one frame, returning the handle its producer
    /// waits on.
    pub fn new(x: f64, y: f64, view: &'static str, style: Style) -> (Self, FrameWait) {
        let (release, wait) = rendezvous();
        (
            Self {
                x,
                y,
                view,
                style,
                release,
            },
            wait,
        )
    }

    /// Publish a sprite and wait for the frame loop to release it.
    ///
    /// Returns `false` once the frame loop is gone.
    pub fn publish(
        objects: &ObjectSender,
        x: f64,
        y: f64,
        view: &'static str,
        style: Style,
    ) -> bool {
        let (sprite, wait) = Self::new(x, y, view, style);
        if objects.send(Box::new(sprite)).is_err() {
            return false;
        }
        wait.wait()
    }
}

impl MovingObject for Sprite {
    fn corner(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn view(&self) -> &str {
        self.view
    }

    fn style(&self) -> Style {
        self.style
    }

    fn release(self: Box<Self>) {
        self.release.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_release_before_wait_is_not_lost() {
        let (release, wait) = rendezvous();
        release.release();
        assert!(wait.wait());
    }

    #[test]
    fn test_release_without_waiter_is_noop() {
        let (release, wait) = rendezvous();
        drop(wait);
        release.release();
    }

    #[test]
    fn test_dropped_release_ends_wait() {
        let (release, wait) = rendezvous();
        drop(release);
        assert!(!wait.wait());
    }

    #[test]
    fn test_sprite_publish_blocks_until_release() {
        let (tx, rx): (ObjectSender, ObjectReceiver) = unbounded();
        let producer = thread::spawn(move || Sprite::publish(&tx, 1.5, 2.0, "<>", Style::RESET));

        let object = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(object.corner(), (1.5, 2.0));
        assert_eq!(object.view(), "<>");
        thread::sleep(Duration::from_millis(20));
        assert!(!producer.is_finished());

        object.release();
        assert!(producer.join().unwrap());
    }

    #[test]
    fn test_sprite_publish_after_shutdown() {
        let (tx, rx): (ObjectSender, ObjectReceiver) = unbounded();
        drop(rx);
        assert!(!Sprite::publish(&tx, 0.0, 0.0, "*", Style::RESET));
    }
}
