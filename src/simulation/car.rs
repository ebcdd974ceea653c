use rand::Rng;
use rand_distr::Distribution;
use super::{Direction, Point, Rect, Rgb};
use crate::config::{PlayfieldConfig, Span};

/// Long side of a car; it runs along the direction of travel.
pub const CAR_LENGTH: f32 = 60.0;
pub const CAR_WIDTH: f32 = 20.0;
/// Margin outside the visible field where cars spawn and are counted as gone.
pub const SPAWN_OFFSET: f32 = 60.0;

/// A car can only be stopped this many times; the next stop lets it through.
pub const MAX_STOP_COUNT: u32 = 3;
/// Longest a car waits before moving on by itself.
pub const MAX_STOP_TIME_MS: u64 = 3000;

pub const MIN_SPEED: f32 = 1.0;
pub const MAX_SPEED: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarState {
    Stopped,
    Cruising,
    Accelerating,
}

/// What a single `Car::update` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarEvent {
    Moved,
    /// Left the field for the first time; worth one point.
    Exited,
    Waiting,
    /// Waited too long and started moving again.
    Resumed,
}

#[derive(Debug, Clone)]
pub struct Car {
    bounds: Rect,
    direction: Direction,
    color: Rgb,
    speed: f32,
    acceleration: f32,
    stopped: bool,
    accelerating: bool,
    scored: bool,
    stop_count: u32,
    stop_started_at: Option<u64>,
    stop_elapsed_ms: u64,
}

impl Car {
    pub fn new(
        speed: f32,
        direction: Direction,
        color: Rgb,
        acceleration: f32,
        playfield: &PlayfieldConfig,
    ) -> Self {
        let origin = direction.spawn_origin(playfield);
        let (width, height) = if direction.is_vertical() {
            (CAR_WIDTH, CAR_LENGTH)
        } else {
            (CAR_LENGTH, CAR_WIDTH)
        };

        Self {
            bounds: Rect::new(origin.x, origin.y, width, height),
            direction,
            color,
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
            acceleration,
            stopped: false,
            accelerating: false,
            scored: false,
            stop_count: 0,
            stop_started_at: None,
            stop_elapsed_ms: 0,
        }
    }

    /// Like `new`, drawing the acceleration factor from `acceleration`.
    pub fn spawn<R: Rng + ?Sized>(
        speed: f32,
        direction: Direction,
        color: Rgb,
        acceleration: &Span<f32>,
        playfield: &PlayfieldConfig,
        rng: &mut R,
    ) -> Self {
        let acceleration = acceleration.uniform().sample(rng);
        Self::new(speed, direction, color, acceleration, playfield)
    }

    pub fn stop(&mut self) {
        self.stop_count += 1;

        if self.accelerating {
            // Drop the boost from the last accelerate()
            self.speed -= self.acceleration;
            if self.speed <= MIN_SPEED {
                self.speed = MIN_SPEED;
            }
            self.accelerating = false;
        }

        if self.stop_count > MAX_STOP_COUNT {
            log::debug!("{} car used up its {} stops, letting it through", self.direction, MAX_STOP_COUNT);
            self.go();
        } else {
            self.stopped = true;
            log::debug!("{} car stopped ({}/{})", self.direction, self.stop_count, MAX_STOP_COUNT);
        }
    }

    /// Leaves the stop timer running; only a timeout clears it.
    pub fn go(&mut self) {
        self.stopped = false;
    }

    /// A stopped car only resumes; boosts compound on every press after that.
    pub fn accelerate(&mut self) {
        if self.stopped {
            self.go();
            return;
        }

        self.acceleration += self.speed * self.acceleration;
        self.speed = (self.speed + self.acceleration).min(MAX_SPEED);
        self.accelerating = true;
        log::debug!("{} car accelerated to {:.2}", self.direction, self.speed);
    }

    pub fn toggle(&mut self) {
        if self.stopped {
            self.go();
        } else {
            self.stop();
        }
    }

    pub fn update(&mut self, now_ms: u64, playfield: &PlayfieldConfig) -> CarEvent {
        if self.stopped {
            if self.update_stop_time(now_ms) {
                CarEvent::Resumed
            } else {
                CarEvent::Waiting
            }
        } else if self.update_position(playfield) {
            CarEvent::Exited
        } else {
            CarEvent::Moved
        }
    }

    /// Returns true when the wait ran out and the car was released.
    pub fn update_stop_time(&mut self, now_ms: u64) -> bool {
        let started = *self.stop_started_at.get_or_insert(now_ms);
        self.stop_elapsed_ms = now_ms.saturating_sub(started);

        if self.stop_elapsed_ms > MAX_STOP_TIME_MS {
            log::debug!("{} car waited {}ms, moving on", self.direction, self.stop_elapsed_ms);
            self.go();
            self.reset_stop_time();
            return true;
        }
        false
    }

    /// Returns true the first time the car is seen outside the field.
    pub fn update_position(&mut self, playfield: &PlayfieldConfig) -> bool {
        if self.stopped {
            return false;
        }

        self.bounds.translate(self.direction.unit() * self.speed);

        if !self.scored && self.is_gone(playfield) {
            self.scored = true;
            return true;
        }
        false
    }

    /// Beyond the spawn margin on any side.
    pub fn is_gone(&self, playfield: &PlayfieldConfig) -> bool {
        let Rect { x, y, .. } = self.bounds;
        x < -SPAWN_OFFSET
            || x > playfield.width + SPAWN_OFFSET
            || y < -SPAWN_OFFSET
            || y > playfield.height + SPAWN_OFFSET
    }

    fn reset_stop_time(&mut self) {
        self.stop_started_at = None;
        self.stop_elapsed_ms = 0;
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_position(&mut self, origin: Point) {
        self.bounds.x = origin.x;
        self.bounds.y = origin.y;
    }

    pub fn position(&self) -> Point {
        self.bounds.origin()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_accelerating(&self) -> bool {
        self.accelerating
    }

    pub fn has_scored(&self) -> bool {
        self.scored
    }

    pub fn stop_count(&self) -> u32 {
        self.stop_count
    }

    pub fn stop_elapsed_ms(&self) -> u64 {
        self.stop_elapsed_ms
    }

    pub fn state(&self) -> CarState {
        if self.stopped {
            CarState::Stopped
        } else if self.accelerating {
            CarState::Accelerating
        } else {
            CarState::Cruising
        }
    }
}
