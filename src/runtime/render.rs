use crate::simulation::FrameSnapshot;

/// Draw callback invoked once per frame with a consistent copy of the world.
pub trait Renderer: Send {
    fn render(&mut self, frame: &FrameSnapshot);
}

impl<F> Renderer for F
where
    F: FnMut(&FrameSnapshot) + Send,
{
    fn render(&mut self, frame: &FrameSnapshot) {
        self(frame)
    }
}

/// Discards every frame.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &FrameSnapshot) {}
}

/// Console stand-in for a real canvas: reports state changes and a periodic status line.
#[derive(Debug)]
pub struct LogRenderer {
    status_every: u64,
    last_generation: Option<u64>,
    last_paused: bool,
    last_game_over: bool,
}

impl LogRenderer {
    pub fn new(status_every: u64) -> Self {
        Self {
            status_every: status_every.max(1),
            last_generation: None,
            last_paused: false,
            last_game_over: false,
        }
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &FrameSnapshot) {
        if self.last_generation != Some(frame.generation) {
            log::info!("Rendering world #{}", frame.generation);
            self.last_generation = Some(frame.generation);
            self.last_paused = false;
            self.last_game_over = false;
        }

        if frame.paused != self.last_paused {
            log::info!("{}", if frame.paused { "PAUSED" } else { "Unpaused" });
            self.last_paused = frame.paused;
        }

        if frame.game_over && !self.last_game_over {
            if let Some(area) = frame.collision {
                log::info!(
                    "GAME OVER - crash inside ({:.0}, {:.0}) {:.0}x{:.0}, {}",
                    area.x,
                    area.y,
                    area.width,
                    area.height,
                    if frame.score_text.is_empty() { "no score" } else { frame.score_text.as_str() }
                );
            }
            self.last_game_over = true;
        }

        if frame.frame % self.status_every == 0 {
            let stopped = frame.cars.iter().filter(|car| car.stopped).count();
            log::info!(
                "Frame {}: {} cars ({} stopped), score {}",
                frame.frame,
                frame.cars.len(),
                stopped,
                frame.score
            );
        }
    }
}
