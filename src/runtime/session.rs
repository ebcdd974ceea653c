use super::{lock_world, share_world, Clock, FrameLoop, LoopEvent, Renderer, SessionError, SharedWorld};
use crate::config::SimulationConfig;
use crate::simulation::{InputEvent, World};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Idle,
    /// The current world crashed; a fresh one replaces it at `due_ms`.
    ResetScheduled { due_ms: u64, score: u32 },
    Reset { generation: u64 },
}

/// Owns the current world and the loop driving it, and replaces both after a crash.
pub struct Session {
    config: SimulationConfig,
    clock: Arc<dyn Clock>,
    world: SharedWorld,
    generation: u64,
    frame_loop: Option<FrameLoop>,
    /// Parked here whenever no loop is running.
    renderer: Option<Box<dyn Renderer>>,
    events_tx: Sender<LoopEvent>,
    events_rx: Receiver<LoopEvent>,
    pending_reset: Option<u64>,
}

impl Session {
    pub fn new(config: SimulationConfig, clock: Arc<dyn Clock>, renderer: Box<dyn Renderer>) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let world = share_world(World::for_round(&config, 0, clock.now_ms()));

        Self {
            config,
            clock,
            world,
            generation: 0,
            frame_loop: None,
            renderer: Some(renderer),
            events_tx,
            events_rx,
            pending_reset: None,
        }
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.frame_loop.is_some() {
            return Ok(());
        }

        let renderer = self.renderer.take().ok_or(SessionError::RendererLost)?;
        let frame_loop = FrameLoop::start(
            self.world.clone(),
            self.generation,
            self.clock.clone(),
            renderer,
            &self.config.frame_loop,
            self.events_tx.clone(),
        )?;
        self.frame_loop = Some(frame_loop);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), SessionError> {
        if let Some(frame_loop) = self.frame_loop.take() {
            self.renderer = Some(frame_loop.stop()?);
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.as_ref().is_some_and(FrameLoop::is_running)
    }

    /// Waits up to `timeout` for loop events and performs a reset once it is due.
    pub fn pump(&mut self, timeout: Duration) -> Result<SessionEvent, SessionError> {
        let wait = match self.pending_reset {
            Some(due) => timeout.min(Duration::from_millis(due.saturating_sub(self.clock.now_ms()))),
            None => timeout,
        };

        match self.events_rx.recv_timeout(wait) {
            Ok(event) => {
                if let Some(scheduled) = self.handle_event(event) {
                    return Ok(scheduled);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Err(SessionError::ChannelClosed),
        }

        if let Some(due) = self.pending_reset {
            if self.clock.now_ms() >= due {
                self.reset()?;
                return Ok(SessionEvent::Reset { generation: self.generation });
            }
        }

        Ok(SessionEvent::Idle)
    }

    fn handle_event(&mut self, event: LoopEvent) -> Option<SessionEvent> {
        match event {
            LoopEvent::GameOver { generation, at_ms, score } => {
                if generation != self.generation {
                    log::debug!("Ignoring game over from retired world #{}", generation);
                    return None;
                }
                if self.pending_reset.is_some() {
                    return None;
                }

                let due_ms = at_ms + self.config.session.reset_delay_ms;
                log::info!("Resetting in {}ms (world #{} scored {})", self.config.session.reset_delay_ms, generation, score);
                self.pending_reset = Some(due_ms);
                Some(SessionEvent::ResetScheduled { due_ms, score })
            }
        }
    }

    /// Retires the current world and its loop, then starts a fresh pair.
    /// The old loop is joined first, so none of its spawners can act on the new world.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let was_running = self.frame_loop.is_some();
        self.stop()?;

        // Anything still queued belongs to the world being discarded
        while self.events_rx.try_recv().is_ok() {}

        self.generation += 1;
        self.pending_reset = None;
        self.world = share_world(World::for_round(&self.config, self.generation, self.clock.now_ms()));
        log::info!("Started world #{}", self.generation);

        if was_running {
            self.start()?;
        }
        Ok(())
    }

    pub fn pause(&self) {
        lock_world(&self.world).pause();
    }

    pub fn resume(&self) {
        lock_world(&self.world).resume();
    }

    pub fn toggle_pause(&self) {
        lock_world(&self.world).toggle_pause();
    }

    pub fn route_input(&self, input: InputEvent) -> usize {
        lock_world(&self.world).route_input(input.point, input.button)
    }

    pub fn with_world<R>(&self, f: impl FnOnce(&World) -> R) -> R {
        f(&lock_world(&self.world))
    }

    pub fn with_world_mut<R>(&self, f: impl FnOnce(&mut World) -> R) -> R {
        f(&mut lock_world(&self.world))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_reset(&self) -> Option<u64> {
        self.pending_reset
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("Failed to stop session cleanly: {}", e);
        }
    }
}
