//! Frame loop: the single owner of draw, flush, sleep and clear.
//!
//! One frame:
//!
//! ```text
//! exit? ──yes──▶ Terminated
//!   │no
//!   ▼
//! Draining: try_recv ─ok─▶ draw, keep for release ─┐
//!   │empty                   ▲──────────────────────┘
//!   ▼
//! release all kept objects ─▶ show ─▶ sleep ─▶ clear ─▶ Running
//! ```
//!
//! Releases are batched at the end of the drain. Releasing right after each
//! draw would let a fast producer publish a second position for the same
//! frame; batching caps every producer at one step per displayed frame.

use crate::config::GameConfig;
use crate::object::{MovingObject, ObjectReceiver};
use std::io;
use std::thread;
use std::time::Duration;

/// What the frame loop draws on.
pub trait FrameCanvas {
    /// Non-blocking exit check.
    fn is_exited(&self) -> bool;

    /// Paint one object into the pending frame.
    fn draw(&mut self, object: &dyn MovingObject);

    /// Flush the pending frame.
    fn show(&mut self) -> io::Result<()>;

    /// Discard the pending frame.
    fn clear(&mut self);
}

/// Frame loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Between frames, or pacing the current one.
    Running,
    /// Pulling render requests off the channel.
    Draining,
    /// Exit observed (or output failed); no more frames.
    Terminated,
}

/// Counters collected while the loop runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Completed frames (flush + sleep + clear).
    pub frames: u64,
    /// Objects drawn over all frames.
    pub objects_drawn: u64,
    /// Most objects drawn in a single frame.
    pub largest_batch: usize,
}

/// The frame orchestrator.
pub struct FrameOrchestrator {
    objects: ObjectReceiver,
    frame_interval: Duration,
    state: FrameState,
    stats: FrameStats,
}

impl FrameOrchestrator {
    /// Create an orchestrator draining `objects` every `frame_interval`.
    pub const fn new(objects: ObjectReceiver, frame_interval: Duration) -> Self {
        Self {
            objects,
            frame_interval,
            state: FrameState::Running,
            stats: FrameStats {
                frames: 0,
                objects_drawn: 0,
                largest_batch: 0,
            },
        }
    }

    /// Create an orchestrator using the configured frame interval.
    pub const fn with_config(objects: ObjectReceiver, config: &GameConfig) -> Self {
        Self::new(objects, config.frame_interval)
    }

    /// Current state.
    pub const fn state(&self) -> FrameState {
        self.state
    }

    /// Counters so far.
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Run frames until the canvas reports exit.
    ///
    /// # Errors
    ///
    /// Returns the error of a failed flush. The loop stops at that point.
    pub fn run<C: FrameCanvas + ?Sized>(&mut self, canvas: &mut C) -> io::Result<FrameStats> {
        log::debug!("start an event loop");
        while self.run_frame(canvas)? {}
        log::info!(
            "event loop stopped after {} frames, {} objects drawn, largest batch {}",
            self.stats.frames,
            self.stats.objects_drawn,
            self.stats.largest_batch
        );
        Ok(self.stats)
    }

    /// Run one outer iteration. Returns `false` once terminated.
    pub fn run_frame<C: FrameCanvas + ?Sized>(&mut self, canvas: &mut C) -> io::Result<bool> {
        if self.state == FrameState::Terminated {
            return Ok(false);
        }
        if canvas.is_exited() {
            self.state = FrameState::Terminated;
            return Ok(false);
        }

        self.drain(canvas);

        if let Err(e) = canvas.show() {
            self.state = FrameState::Terminated;
            return Err(e);
        }
        thread::sleep(self.frame_interval);
        canvas.clear();

        self.stats.frames += 1;
        Ok(true)
    }

    /// Draw everything available right now, then release it all.
    ///
    /// Returns the number of objects drawn.
    fn drain<C: FrameCanvas + ?Sized>(&mut self, canvas: &mut C) -> usize {
        self.state = FrameState::Draining;

        // Owned by this frame only.
        let mut to_release: Vec<Box<dyn MovingObject>> = Vec::new();
        // Empty and disconnected both end the drain; with no producers left
        // the loop keeps pacing until exit.
        while let Ok(object) = self.objects.try_recv() {
            canvas.draw(object.as_ref());
            to_release.push(object);
        }

        let drawn = to_release.len();
        log::trace!("frame {}: drew {drawn} objects", self.stats.frames);
        for object in to_release {
            object.release();
        }

        self.stats.objects_drawn += drawn as u64;
        self.stats.largest_batch = self.stats.largest_batch.max(drawn);
        self.state = FrameState::Running;
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Style;
    use crate::object::{ObjectSender, Sprite};
    use crossbeam_channel::{unbounded, TryRecvError};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Draw(String),
        Release(String),
        Show,
        Clear,
    }

    type Log = Arc<Mutex<Vec<Call>>>;

    struct Probe {
        id: &'static str,
        log: Log,
    }

    impl MovingObject for Probe {
        fn corner(&self) -> (f64, f64) {
            (0.0, 0.0)
        }

        fn view(&self) -> &str {
            self.id
        }

        fn style(&self) -> Style {
            Style::RESET
        }

        fn release(self: Box<Self>) {
            self.log.lock().unwrap().push(Call::Release(self.id.to_string()));
        }
    }

    /// Records every call; reports exit after `frames_before_exit` exit
    /// checks returned `false`.
    struct RecordingCanvas {
        log: Log,
        frames_before_exit: Option<usize>,
        exit_checks: std::cell::Cell<usize>,
        fail_show: bool,
    }

    impl RecordingCanvas {
        fn new(log: &Log) -> Self {
            Self {
                log: Arc::clone(log),
                frames_before_exit: None,
                exit_checks: std::cell::Cell::new(0),
                fail_show: false,
            }
        }

        fn exit_after(mut self, frames: usize) -> Self {
            self.frames_before_exit = Some(frames);
            self
        }
    }

    impl FrameCanvas for RecordingCanvas {
        fn is_exited(&self) -> bool {
            let checks = self.exit_checks.get();
            self.exit_checks.set(checks + 1);
            self.frames_before_exit.is_some_and(|frames| checks >= frames)
        }

        fn draw(&mut self, object: &dyn MovingObject) {
            self.log.lock().unwrap().push(Call::Draw(object.view().to_string()));
        }

        fn show(&mut self) -> io::Result<()> {
            self.log.lock().unwrap().push(Call::Show);
            if self.fail_show {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"));
            }
            Ok(())
        }

        fn clear(&mut self) {
            self.log.lock().unwrap().push(Call::Clear);
        }
    }

    fn probe(id: &'static str, log: &Log) -> Box<dyn MovingObject> {
        Box::new(Probe {
            id,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn test_frame_draws_all_then_releases_all() {
        let log = Log::default();
        let (tx, rx) = unbounded();
        for id in ["a", "b", "c"] {
            tx.send(probe(id, &log)).unwrap();
        }

        let mut orchestrator = FrameOrchestrator::new(rx, Duration::from_millis(1));
        let mut canvas = RecordingCanvas::new(&log);
        assert!(orchestrator.run_frame(&mut canvas).unwrap());

        let draw = |id: &str| Call::Draw(id.to_string());
        let release = |id: &str| Call::Release(id.to_string());
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                draw("a"),
                draw("b"),
                draw("c"),
                release("a"),
                release("b"),
                release("c"),
                Call::Show,
                Call::Clear,
            ]
        );
        assert_eq!(orchestrator.state(), FrameState::Running);
        assert_eq!(orchestrator.stats().objects_drawn, 3);
    }

    #[test]
    fn test_frame_drain_empties_channel() {
        let log = Log::default();
        let (tx, rx) = unbounded();
        for id in ["a", "b"] {
            tx.send(probe(id, &log)).unwrap();
        }
        let probe_rx = rx.clone();

        let mut orchestrator = FrameOrchestrator::new(rx, Duration::ZERO);
        orchestrator.run_frame(&mut RecordingCanvas::new(&log)).unwrap();

        assert!(matches!(probe_rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_idle_frame_still_paces() {
        let log = Log::default();
        let (_tx, rx) = unbounded();
        let interval = Duration::from_millis(15);
        let mut orchestrator = FrameOrchestrator::new(rx, interval);

        let start = Instant::now();
        assert!(orchestrator.run_frame(&mut RecordingCanvas::new(&log)).unwrap());

        assert!(start.elapsed() >= interval);
        assert_eq!(*log.lock().unwrap(), vec![Call::Show, Call::Clear]);
        assert_eq!(orchestrator.stats().frames, 1);
    }

    #[test]
    fn test_disconnected_channel_keeps_pacing() {
        let log = Log::default();
        let (tx, rx) = unbounded::<Box<dyn MovingObject>>();
        drop(tx);

        let mut orchestrator = FrameOrchestrator::new(rx, Duration::ZERO);
        let mut canvas = RecordingCanvas::new(&log).exit_after(3);
        let stats = orchestrator.run(&mut canvas).unwrap();

        assert_eq!(stats.frames, 3);
        assert_eq!(stats.objects_drawn, 0);
    }

    #[test]
    fn test_exit_is_terminal() {
        let log = Log::default();
        let (tx, rx) = unbounded();
        let mut orchestrator = FrameOrchestrator::new(rx, Duration::ZERO);
        let mut canvas = RecordingCanvas::new(&log).exit_after(2);

        let stats = orchestrator.run(&mut canvas).unwrap();
        assert_eq!(stats.frames, 2);
        assert_eq!(orchestrator.state(), FrameState::Terminated);

        // Requests published after exit are never drawn.
        tx.send(probe("late", &log)).unwrap();
        assert!(!orchestrator.run_frame(&mut canvas).unwrap());
        let calls = log.lock().unwrap();
        assert_eq!(calls.iter().filter(|c| **c == Call::Show).count(), 2);
        assert!(!calls.contains(&Call::Draw("late".to_string())));
    }

    #[test]
    fn test_show_failure_stops_loop() {
        let log = Log::default();
        let (_tx, rx) = unbounded();
        let mut orchestrator = FrameOrchestrator::new(rx, Duration::ZERO);
        let mut canvas = RecordingCanvas::new(&log);
        canvas.fail_show = true;

        let err = orchestrator.run(&mut canvas).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(orchestrator.state(), FrameState::Terminated);
        // No clear after a failed flush.
        assert_eq!(*log.lock().unwrap(), vec![Call::Show]);
    }

    /// A producer that publishes `steps` positions, one per release.
    fn spawn_producer(id: &'static str, steps: usize, objects: ObjectSender) -> thread::JoinHandle<usize> {
        thread::spawn(move || {
            let mut published = 0;
            for step in 0..steps {
                if !Sprite::publish(&objects, step as f64, 0.0, id, Style::RESET) {
                    break;
                }
                published += 1;
            }
            published
        })
    }

    /// Groups draws by frame: a frame ends at its `Show`.
    fn draws_per_frame(calls: &[Call]) -> Vec<Vec<String>> {
        let mut frames = vec![Vec::new()];
        for call in calls {
            match call {
                Call::Draw(id) => frames.last_mut().unwrap().push(id.clone()),
                Call::Show => frames.push(Vec::new()),
                _ => {}
            }
        }
        frames
    }

    #[test]
    fn test_at_most_one_step_per_frame() {
        const IDS: [&str; 4] = ["p0", "p1", "p2", "p3"];
        const STEPS: usize = 25;

        let log = Log::default();
        let (tx, rx) = unbounded();
        let producers: Vec<_> = IDS
            .iter()
            .map(|&id| spawn_producer(id, STEPS, tx.clone()))
            .collect();
        drop(tx);

        let mut orchestrator = FrameOrchestrator::new(rx, Duration::from_millis(1));
        let mut canvas = RecordingCanvas::new(&log);
        while orchestrator.stats().objects_drawn < (IDS.len() * STEPS) as u64 {
            orchestrator.run_frame(&mut canvas).unwrap();
            assert!(orchestrator.stats().frames < 10_000, "producers stalled");
        }

        for producer in producers {
            assert_eq!(producer.join().unwrap(), STEPS);
        }

        for frame in draws_per_frame(&log.lock().unwrap()) {
            let unique: HashSet<_> = frame.iter().collect();
            assert_eq!(unique.len(), frame.len(), "object drawn twice in one frame: {frame:?}");
        }
    }

    #[test]
    fn test_rendezvous_channel_one_step_per_frame() {
        const IDS: [&str; 3] = ["a", "b", "c"];
        const STEPS: usize = 20;

        let log = Log::default();
        let (tx, rx) = crossbeam_channel::bounded(0);
        let producers: Vec<_> = IDS
            .iter()
            .map(|&id| spawn_producer(id, STEPS, tx.clone()))
            .collect();
        drop(tx);
        // Let every producer park in `send`.
        thread::sleep(Duration::from_millis(50));

        let mut orchestrator = FrameOrchestrator::new(rx, Duration::from_millis(1));
        let mut canvas = RecordingCanvas::new(&log);
        while orchestrator.stats().objects_drawn < (IDS.len() * STEPS) as u64 {
            orchestrator.run_frame(&mut canvas).unwrap();
            assert!(orchestrator.stats().frames < 10_000, "producers stalled");
        }

        for producer in producers {
            assert_eq!(producer.join().unwrap(), STEPS);
        }

        let frames = draws_per_frame(&log.lock().unwrap());
        let mut first: Vec<_> = frames[0].clone();
        first.sort();
        assert_eq!(first, IDS);
        for frame in &frames {
            let unique: HashSet<_> = frame.iter().collect();
            assert_eq!(unique.len(), frame.len(), "object drawn twice in one frame: {frame:?}");
        }
        assert!(orchestrator.stats().largest_batch <= IDS.len());
    }

    #[test]
    fn test_dropping_orchestrator_stops_producers() {
        let (tx, rx) = unbounded();
        let producer = spawn_producer("p", usize::MAX, tx);

        let log = Log::default();
        let mut orchestrator = FrameOrchestrator::new(rx, Duration::ZERO);
        let mut canvas = RecordingCanvas::new(&log);
        while orchestrator.stats().objects_drawn < 3 {
            orchestrator.run_frame(&mut canvas).unwrap();
        }
        drop(orchestrator);

        let published = producer.join().unwrap();
        assert!(published >= 3);
    }

    #[test]
    fn test_surface_loop_ends_on_interrupt_key() {
        use crate::screen::Surface;
        use crate::terminal::{channel_events, MemoryBackend};
        use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

        let config = GameConfig {
            frame_interval: Duration::from_millis(2),
            ..GameConfig::default()
        };
        let mut surface = Surface::initialize(MemoryBackend::new(40, 20), &config).unwrap();
        let (events, source) = channel_events();
        surface.poll_events(source);

        let (tx, rx) = unbounded();
        let producer = spawn_producer("<^>", usize::MAX, tx);

        let mut orchestrator = FrameOrchestrator::with_config(rx, &config);
        while orchestrator.stats().objects_drawn < 3 {
            assert!(orchestrator.run_frame(&mut surface).unwrap());
            assert!(orchestrator.stats().frames < 5_000, "producer stalled");
        }
        events
            .send(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)))
            .unwrap();

        let stats = orchestrator.run(&mut surface).unwrap();
        assert!(stats.objects_drawn >= 3);
        assert!(surface.is_exited());
        assert_eq!(surface.backend().presents() as u64, stats.frames);

        drop(orchestrator);
        assert!(producer.join().unwrap() >= 3);
        surface.finish().unwrap();
        assert_eq!(surface.backend().restores(), 1);
    }
}
