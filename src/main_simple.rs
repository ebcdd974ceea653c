use anyhow::Result;
use log::info;
use std::time::Instant;

use traffic_game::{
    config::SimulationConfig,
    runtime::{frame_loop, lock_world, share_world, Clock, FrameTimer, ManualClock, NullRenderer},
    simulation::World,
};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();
    info!("Starting Traffic Game (Headless Mode)");

    // Load configuration
    let config = SimulationConfig::load_or_default("game.toml")?;
    let fps = u64::from(config.frame_loop.fps);
    info!("Loaded configuration: {}x{} field, {} Hz", config.playfield.width, config.playfield.height, fps);

    // Simulated time only moves when we step it, so this runs as fast as the CPU allows
    let clock = ManualClock::new(0);
    let mut world = share_world(World::for_round(&config, 0, clock.now_ms()));
    let mut renderer = NullRenderer;
    let mut timer = FrameTimer::new(config.frame_loop.stats_samples as usize);

    let simulated_secs = 120;
    let total_frames = simulated_secs * fps;
    let start_time = Instant::now();
    let mut generation = 0u64;
    let mut frame_in_world = 0u64;
    let mut reset_due: Option<u64> = None;
    let mut scores = Vec::new();

    info!("Simulating {} seconds of play...", simulated_secs);

    for frame in 0..total_frames {
        clock.set(frame * 1000 / fps);
        let now_ms = clock.now_ms();

        if reset_due.is_some_and(|due| now_ms >= due) {
            generation += 1;
            frame_in_world = 0;
            reset_due = None;
            world = share_world(World::for_round(&config, generation, now_ms));
        }

        timer.start_frame();
        let report = frame_loop::tick(&world, &mut renderer, now_ms, frame_in_world, generation);
        timer.record_update(report.update_time);
        timer.end_frame();
        frame_in_world += 1;

        if report.game_over && reset_due.is_none() {
            info!("World #{} crashed at {:.1}s with score {}", generation, now_ms as f64 / 1000.0, report.score);
            scores.push(report.score);
            reset_due = Some(now_ms + config.session.reset_delay_ms);
        }

        if frame % fps == 0 {
            let cars = lock_world(&world).cars().len();
            info!(
                "t={:>3}s world #{}: {} cars, score {}, avg update {:.3}ms",
                frame / fps,
                generation,
                cars,
                report.score,
                timer.average_update_time().as_secs_f64() * 1000.0
            );
        }
    }

    // Final statistics
    info!("Simulation completed!");
    info!("Wall time: {:.2}s", start_time.elapsed().as_secs_f64());
    info!("Worlds played: {}", generation + 1);
    info!("Crash scores: {:?}", scores);

    Ok(())
}
