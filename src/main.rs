//! Spaceship runner.
//!
//! Sets up logging, takes over the terminal, starts the generators and
//! runs the frame loop until Escape or Ctrl+C.

use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use spaceship::game::{generate_meteorites, generate_ship};
use spaceship::terminal::{install_panic_hook, CrosstermBackend, CrosstermEvents};
use spaceship::{FrameOrchestrator, GameConfig, Surface};

#[derive(Parser)]
#[command(name = "spaceship", about = "Dodge and shoot meteorites in your terminal")]
struct Args {
    /// Sleep between two frames, in milliseconds
    #[arg(long, default_value_t = 10)]
    frame_interval_ms: u64,

    /// Delay between two meteorite spawns, in milliseconds
    #[arg(long, default_value_t = 800)]
    meteorite_interval_ms: u64,

    /// Seed for meteorite placement (defaults to the current time)
    #[arg(long)]
    seed: Option<u32>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn config(&self) -> GameConfig {
        let seed = self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(1, |elapsed| elapsed.subsec_nanos())
        });
        GameConfig {
            frame_interval: Duration::from_millis(self.frame_interval_ms),
            meteorite_interval: Duration::from_millis(self.meteorite_interval_ms),
            seed,
            ..GameConfig::default()
        }
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let log_file =
        File::create(path).with_context(|| format!("cannot create log file {}", path.display()))?;
    WriteLogger::init(level, log_config, log_file).context("logger already initialized")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    // A panic on any thread restores the terminal and exits; the
    // surface's Drop is not run on that path.
    install_panic_hook();

    let config = args.config();
    log::info!("spaceship starting with {config:?}");

    let backend = CrosstermBackend::acquire().context("cannot acquire the terminal")?;
    let mut surface = Surface::initialize(backend, &config).context("cannot set up the screen")?;

    let result = run(&mut surface, &config);

    // Always try to restore terminal state.
    let finished = surface.finish().context("cannot restore the terminal");
    result.and(finished)
}

fn run(surface: &mut Surface<CrosstermBackend>, config: &GameConfig) -> Result<()> {
    let (objects_tx, objects_rx) = crossbeam_channel::bounded(0);
    let mut orchestrator = FrameOrchestrator::with_config(objects_rx, config);

    generate_meteorites(objects_tx.clone(), surface.bounds(), config);
    generate_ship(surface.bounds(), surface.controls(), objects_tx);
    surface.poll_events(CrosstermEvents);

    let stats = orchestrator.run(surface).context("frame loop failed")?;
    log::info!("exiting after {} frames", stats.frames);
    Ok(())
}
