//! Pixel Invaders entry point
//!
//! Native headless host: runs an attract-mode game with a simple autopilot,
//! driving the scheduler the way a browser frame loop would.
//!
//! Usage: `pixel-invaders [--realtime] [--seed N] [TUNING.json]`

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use pixel_invaders::events::LogSink;
use pixel_invaders::scheduler::{FrameOutcome, ManualFrames, Scheduler};
use pixel_invaders::sim::{GameState, seeded};
use pixel_invaders::{HostKey, Scoreboard, Tuning};

/// Host frame period when polling (browsers deliver ~4-16 ms)
const FRAME_PERIOD_MS: f64 = 4.0;
/// Safety stop for the attract loop
const MAX_TICKS: u64 = 100_000;

#[derive(Parser)]
#[command(name = "pixel-invaders", about = "Headless attract-mode Pixel Invaders")]
struct Args {
    /// Pace frames with the wall clock instead of a simulated one
    #[arg(long)]
    realtime: bool,

    /// Seed for the enemy fire picks
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Tuning JSON file; defaults are used when absent or invalid
    tuning: Option<PathBuf>,
}

fn load_tuning(path: Option<&Path>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match Tuning::load(path) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("{e}; using default tuning");
            Tuning::default()
        }
    }
}

/// Steer under the nearest live enemy and keep the trigger pulled
fn autopilot(state: &GameState) -> Option<HostKey> {
    let ship_center = state.player.pos.x + state.player.size.x / 2.0;
    let target = state
        .alive_enemies()
        .map(|e| e.pos.x + e.size.x / 2.0)
        .min_by(|a, b| {
            (a - ship_center)
                .abs()
                .partial_cmp(&(b - ship_center).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
    let dx = target - ship_center;
    if dx.abs() <= state.player.speed {
        None
    } else if dx < 0.0 {
        Some(HostKey::Left)
    } else {
        Some(HostKey::Right)
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let tuning = load_tuning(args.tuning.as_deref());
    log::info!("Pixel Invaders (native, attract mode) seed={}", args.seed);

    let mut scheduler = Scheduler::new(tuning, ManualFrames::new(), seeded(args.seed), LogSink);
    scheduler.key_down(HostKey::Start);

    let started = Instant::now();
    let mut sim_clock = 0.0;
    let mut held: Option<HostKey> = None;

    while scheduler.frames_mut().take().is_some() {
        let now = if args.realtime {
            std::thread::sleep(Duration::from_millis(FRAME_PERIOD_MS as u64));
            started.elapsed().as_secs_f64() * 1000.0
        } else {
            sim_clock += FRAME_PERIOD_MS;
            sim_clock
        };

        let wanted = autopilot(scheduler.state());
        if wanted != held {
            if let Some(key) = held {
                scheduler.key_up(key);
            }
            if let Some(key) = wanted {
                scheduler.key_down(key);
            }
            held = wanted;
        }
        scheduler.key_down(HostKey::Fire);

        if let FrameOutcome::GameOver(_) = scheduler.on_frame(now) {
            break;
        }
        if scheduler.ticks() >= MAX_TICKS {
            log::warn!("Stopping after {} ticks", MAX_TICKS);
            scheduler.stop();
            break;
        }
    }

    let board = scheduler.scoreboard();
    println!(
        "SCORE {}  HI-SCORE {}  LEVEL {}  TICKS {}",
        Scoreboard::format(board.score),
        Scoreboard::format(board.high_score),
        scheduler.state().level(),
        scheduler.ticks()
    );
}
