use super::{Car, Direction, Rgb};
use crate::config::{PlayfieldConfig, SpawnerConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::Distribution;

/// Emits cars on one approach at randomized intervals.
///
/// Spawners are polled from the world's tick rather than firing on their own,
/// so an emission can never race with iteration over the live cars.
pub struct LaneSpawner {
    direction: Direction,
    config: SpawnerConfig,
    rng: StdRng,
    delay_ms: u64,
    next_due_ms: u64,
    suspended: bool,
    spawned: u32,
}

impl LaneSpawner {
    pub fn new(direction: Direction, config: SpawnerConfig, now_ms: u64, seed: Option<u64>) -> Self {
        let mut rng = if let Some(seed) = seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        let first_delay = config.first_delay_ms.uniform().sample(&mut rng);

        Self {
            direction,
            config,
            rng,
            delay_ms: first_delay,
            next_due_ms: now_ms + first_delay,
            suspended: false,
            spawned: 0,
        }
    }

    /// Emits a car if the timer is due. A due timer while paused re-arms with the
    /// same delay and emits nothing.
    pub fn poll(&mut self, now_ms: u64, paused: bool, playfield: &PlayfieldConfig) -> Option<Car> {
        if self.suspended || now_ms < self.next_due_ms {
            return None;
        }

        if paused {
            self.next_due_ms = now_ms + self.delay_ms;
            return None;
        }

        let speed = self.config.speed.uniform().sample(&mut self.rng);
        let color = self.random_color();
        let car = Car::spawn(
            speed,
            self.direction,
            color,
            &self.config.acceleration,
            playfield,
            &mut self.rng,
        );

        self.delay_ms = self.config.delay_ms.uniform().sample(&mut self.rng);
        self.next_due_ms = now_ms + self.delay_ms;
        self.spawned += 1;

        log::info!(
            "Spawned {} car at speed {:.2}, next in {}ms",
            self.direction,
            car.speed(),
            self.delay_ms
        );

        Some(car)
    }

    /// Muted colors: every channel stays clear of black and white.
    pub fn random_color(&mut self) -> Rgb {
        let channel = self.config.color_channel.uniform();
        Rgb::new(
            channel.sample(&mut self.rng),
            channel.sample(&mut self.rng),
            channel.sample(&mut self.rng),
        )
    }

    pub fn suspend(&mut self) {
        if !self.suspended {
            log::debug!("{} spawner suspended", self.direction);
        }
        self.suspended = true;
    }

    pub fn resume(&mut self, now_ms: u64) {
        if self.suspended {
            self.suspended = false;
            self.next_due_ms = now_ms + self.delay_ms;
            log::debug!("{} spawner resumed, next in {}ms", self.direction, self.delay_ms);
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }
}
