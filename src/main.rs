use anyhow::Result;
use clap::Parser;
use log::info;
use std::sync::Arc;
use std::time::{Duration, Instant};

use traffic_game::{
    config::SimulationConfig,
    runtime::{LogRenderer, Session, SessionEvent, SystemClock},
};

#[derive(Parser)]
#[command(name = "traffic-game")]
#[command(about = "Real-time intersection traffic game driven from the console")]
struct Args {
    /// Game configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "game.toml")]
    config: String,

    /// Random seed for reproducible traffic
    #[arg(short, long)]
    seed: Option<u64>,

    /// How long to run, in seconds
    #[arg(short, long, default_value_t = 60)]
    duration: u64,

    /// Stop after this many crashes
    #[arg(short, long)]
    rounds: Option<u64>,

    /// Enable verbose logging for per-car and per-frame detail
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();
    info!("Starting Traffic Game");

    let mut config = SimulationConfig::load_or_default(&args.config)?;
    if args.seed.is_some() {
        config.random.seed = args.seed;
    }

    info!("=== Game Configuration ===");
    info!("Playfield: {}x{}", config.playfield.width, config.playfield.height);
    info!("Frame rate: {} Hz (min sleep {}ms)", config.frame_loop.fps, config.frame_loop.min_sleep_ms);
    info!("Reset delay: {}ms", config.session.reset_delay_ms);
    if let Some(seed) = config.random.seed {
        info!("Random Seed: {}", seed);
    }

    let status_every = u64::from(config.frame_loop.fps);
    let mut session = Session::new(config, Arc::new(SystemClock::new()), Box::new(LogRenderer::new(status_every)));
    session.start()?;

    let run_for = Duration::from_secs(args.duration);
    let start_time = Instant::now();
    let mut crashes = 0u64;

    while start_time.elapsed() < run_for {
        match session.pump(Duration::from_millis(100))? {
            SessionEvent::ResetScheduled { due_ms, score } => {
                crashes += 1;
                info!("Crash #{} with score {}, new round at {}ms", crashes, score, due_ms);
            }
            SessionEvent::Reset { generation } => {
                info!("Round {} started", generation + 1);
                if args.rounds.is_some_and(|rounds| crashes >= rounds) {
                    break;
                }
            }
            SessionEvent::Idle => {}
        }
    }

    session.stop()?;

    info!("Game finished!");
    info!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    info!("Crashes: {}", crashes);
    info!("Final round score: {}", session.with_world(|world| world.score()));

    Ok(())
}
