use super::{lock_world, Clock, Renderer, SessionError, SharedWorld};
use crate::config::FrameLoopConfig;
use crate::simulation::UpdateOutcome;
use instant::Instant;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Notifications from a running loop to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    /// Sent once per world, on the first tick that observes the crash.
    GameOver { generation: u64, at_ms: u64, score: u32 },
}

/// What one tick did to the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub outcome: Option<UpdateOutcome>,
    pub spawned: usize,
    pub pruned: usize,
    pub game_over: bool,
    pub score: u32,
    pub update_time: Duration,
}

/// Runs one frame: spawn, update and snapshot under the world lock, then draw outside it.
pub fn tick(
    world: &SharedWorld,
    renderer: &mut dyn Renderer,
    now_ms: u64,
    frame: u64,
    generation: u64,
) -> TickReport {
    let update_start = Instant::now();

    let (report, mut snapshot) = {
        let mut world = lock_world(world);
        let mut report = TickReport {
            outcome: None,
            spawned: 0,
            pruned: 0,
            game_over: false,
            score: 0,
            update_time: Duration::ZERO,
        };

        if !world.is_game_over() {
            // Paused spawners re-arm without emitting
            report.spawned = world.poll_spawners(now_ms);
        }

        if !world.is_paused() {
            if world.is_game_over() {
                world.set_spawning(false, now_ms);
            } else {
                report.outcome = Some(world.update(now_ms));
                report.pruned = world.prune_exited();
            }
        }

        report.game_over = world.is_game_over();
        report.score = world.score();
        report.update_time = update_start.elapsed();
        (report, world.snapshot(frame))
    };

    snapshot.generation = generation;
    renderer.render(&snapshot);

    report
}

/// Sleep that keeps a fixed cadence: the rest of the interval, but never less than `min_sleep`.
pub fn sleep_duration(elapsed: Duration, target: Duration, min_sleep: Duration) -> Duration {
    target.saturating_sub(elapsed).max(min_sleep)
}

#[derive(Debug, Clone, Copy, Default)]
struct FrameSample {
    frame_time: Duration,
    update_time: Duration,
}

/// Rolling frame timing, reported once a second at debug level.
#[derive(Debug)]
pub struct FrameTimer {
    samples: VecDeque<FrameSample>,
    max_samples: usize,
    frame_start: Option<Instant>,
    update_time: Duration,
}

impl FrameTimer {
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples,
            frame_start: None,
            update_time: Duration::ZERO,
        }
    }

    pub fn start_frame(&mut self) {
        self.frame_start = Some(Instant::now());
        self.update_time = Duration::ZERO;
    }

    pub fn record_update(&mut self, update_time: Duration) {
        self.update_time = update_time;
    }

    /// Closes the frame and returns its processing time.
    pub fn end_frame(&mut self) -> Duration {
        let Some(start) = self.frame_start.take() else {
            return Duration::ZERO;
        };

        let frame_time = start.elapsed();
        if self.samples.len() >= self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(FrameSample {
            frame_time,
            update_time: self.update_time,
        });
        frame_time
    }

    pub fn average_frame_time(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }

        let total: Duration = self.samples.iter().map(|s| s.frame_time).sum();
        total / self.samples.len() as u32
    }

    pub fn average_update_time(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }

        let total: Duration = self.samples.iter().map(|s| s.update_time).sum();
        total / self.samples.len() as u32
    }

    /// Processing-bound rate; the loop itself is capped by its sleep.
    pub fn fps(&self) -> f32 {
        let avg_frame_time = self.average_frame_time();
        if avg_frame_time.is_zero() {
            return 0.0;
        }
        1.0 / avg_frame_time.as_secs_f32()
    }
}

/// Fixed-rate update/render driver running on its own thread.
pub struct FrameLoop {
    generation: u64,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<Box<dyn Renderer>>>,
}

impl FrameLoop {
    pub fn start(
        world: SharedWorld,
        generation: u64,
        clock: Arc<dyn Clock>,
        mut renderer: Box<dyn Renderer>,
        settings: &FrameLoopConfig,
        events: Sender<LoopEvent>,
    ) -> Result<Self, SessionError> {
        let running = Arc::new(AtomicBool::new(true));
        let target = settings.target_interval();
        let min_sleep = settings.min_sleep();
        let stats_samples = settings.stats_samples as usize;

        let flag = running.clone();
        let handle = thread::Builder::new()
            .name(format!("frame-loop-{generation}"))
            .spawn(move || {
                log::info!("Frame loop #{} started at {:.1} Hz", generation, 1.0 / target.as_secs_f64());

                let mut timer = FrameTimer::new(stats_samples);
                let mut frame = 0u64;
                let mut notified = false;
                let mut last_report = Instant::now();

                while flag.load(Ordering::Acquire) {
                    timer.start_frame();
                    let now_ms = clock.now_ms();

                    let report = tick(&world, renderer.as_mut(), now_ms, frame, generation);
                    timer.record_update(report.update_time);

                    if report.game_over && !notified {
                        notified = true;
                        let event = LoopEvent::GameOver { generation, at_ms: now_ms, score: report.score };
                        if events.send(event).is_err() {
                            log::warn!("Frame loop #{} has no listener for game over", generation);
                        }
                    }

                    let elapsed = timer.end_frame();
                    frame += 1;

                    if last_report.elapsed() >= Duration::from_secs(1) {
                        log::debug!(
                            "Frame {}: {:.1} FPS capacity, frame {:.3}ms, update {:.3}ms",
                            frame,
                            timer.fps(),
                            timer.average_frame_time().as_secs_f64() * 1000.0,
                            timer.average_update_time().as_secs_f64() * 1000.0
                        );
                        last_report = Instant::now();
                    }

                    thread::sleep(sleep_duration(elapsed, target, min_sleep));
                }

                log::info!("Frame loop #{} stopped after {} frames", generation, frame);
                renderer
            })?;

        Ok(Self {
            generation,
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stops the thread, waits for it and hands the renderer back.
    pub fn stop(mut self) -> Result<Box<dyn Renderer>, SessionError> {
        self.running.store(false, Ordering::Release);
        let handle = self.handle.take().ok_or(SessionError::LoopStopped(self.generation))?;
        handle.join().map_err(|_| SessionError::LoopPanicked(self.generation))
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Frame loop #{} panicked", self.generation);
            }
        }
    }
}
