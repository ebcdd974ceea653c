use super::{Car, CarEvent, CarView, Direction, FrameSnapshot, LaneSpawner, MouseButton, Point, Rect};
use crate::config::{CollisionMargin, PlayfieldConfig, SimulationConfig};

/// Result of one `World::update`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateOutcome {
    Paused,
    /// Game already over; nothing moves until the session resets.
    Frozen,
    Advanced { exited: u32 },
    /// Indices of the first colliding pair and the highlight area around them.
    Collision { first: usize, second: usize, highlight: Rect },
}

/// Owns the live cars and everything that mutates them.
pub struct World {
    cars: Vec<Car>,
    spawners: Vec<LaneSpawner>,
    playfield: PlayfieldConfig,
    margin: CollisionMargin,
    score: u32,
    paused: bool,
    game_over: bool,
    collision: Option<Rect>,
}

impl World {
    pub fn new(config: &SimulationConfig, now_ms: u64) -> Self {
        let spawners = Direction::ALL
            .iter()
            .enumerate()
            .map(|(i, &direction)| {
                // Lanes get distinct streams even when seeded
                let seed = config.random.seed.map(|seed| seed.wrapping_add(i as u64));
                LaneSpawner::new(direction, config.spawner.clone(), now_ms, seed)
            })
            .collect();

        Self {
            cars: Vec::new(),
            spawners,
            playfield: config.playfield,
            margin: config.display.collision_margin,
            score: 0,
            paused: false,
            game_over: false,
            collision: None,
        }
    }

    /// World for round `generation` of a session. A seeded config gives every
    /// round its own reproducible traffic.
    pub fn for_round(config: &SimulationConfig, generation: u64, now_ms: u64) -> Self {
        let mut config = config.clone();
        config.random.seed = config
            .random
            .seed
            .map(|seed| seed.wrapping_add(generation.wrapping_mul(Direction::ALL.len() as u64)));
        Self::new(&config, now_ms)
    }

    pub fn update(&mut self, now_ms: u64) -> UpdateOutcome {
        if self.paused {
            return UpdateOutcome::Paused;
        }
        if self.game_over {
            return UpdateOutcome::Frozen;
        }

        let mut exited = 0;
        for i in 0..self.cars.len() {
            if let Some(j) = self.find_collision(i) {
                let highlight = self.cars[i].bounds().union(&self.cars[j].bounds()).expand(&self.margin);
                self.game_over = true;
                self.collision = Some(highlight);
                log::info!(
                    "Collision between {} and {} cars at ({:.0}, {:.0}), final score {}",
                    self.cars[i].direction(),
                    self.cars[j].direction(),
                    self.cars[i].position().x,
                    self.cars[i].position().y,
                    self.score
                );
                return UpdateOutcome::Collision { first: i, second: j, highlight };
            }

            if self.cars[i].update(now_ms, &self.playfield) == CarEvent::Exited {
                self.increment_score();
                exited += 1;
            }
        }

        UpdateOutcome::Advanced { exited }
    }

    /// First other car that overlaps car `index` while both are fully on the field.
    /// Cars outside the field are already gone and never collide.
    fn find_collision(&self, index: usize) -> Option<usize> {
        let field = self.field();
        let bounds = self.cars[index].bounds();
        if !field.contains_rect(&bounds) {
            return None;
        }

        self.cars.iter().enumerate().find_map(|(j, other)| {
            let other = other.bounds();
            (j != index && bounds.intersects(&other) && field.contains_rect(&other)).then_some(j)
        })
    }

    /// Lets every due spawner emit into the world. Returns how many cars arrived.
    pub fn poll_spawners(&mut self, now_ms: u64) -> usize {
        if self.game_over {
            return 0;
        }

        let mut spawned = 0;
        for spawner in &mut self.spawners {
            if let Some(car) = spawner.poll(now_ms, self.paused, &self.playfield) {
                self.cars.push(car);
                spawned += 1;
            }
        }
        spawned
    }

    pub fn set_spawning(&mut self, enabled: bool, now_ms: u64) {
        for spawner in &mut self.spawners {
            if enabled {
                spawner.resume(now_ms);
            } else {
                spawner.suspend();
            }
        }
    }

    pub fn is_spawning(&self) -> bool {
        self.spawners.iter().any(|spawner| !spawner.is_suspended())
    }

    /// Drops cars that have already been scored; they can never come back.
    pub fn prune_exited(&mut self) -> usize {
        let before = self.cars.len();
        self.cars.retain(|car| !car.has_scored());
        before - self.cars.len()
    }

    pub fn increment_score(&mut self) {
        self.score += 1;
        log::debug!("Car cleared the intersection, score {}", self.score);
    }

    /// Every car under the point reacts, overlapping ones included.
    pub fn route_input(&mut self, point: Point, button: MouseButton) -> usize {
        let mut hits = 0;
        for car in self.cars.iter_mut().filter(|car| car.bounds().contains_point(&point)) {
            match button {
                MouseButton::Primary => car.accelerate(),
                MouseButton::Secondary => car.toggle(),
            }
            hits += 1;
        }
        hits
    }

    pub fn push_car(&mut self, car: Car) {
        self.cars.push(car);
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            log::info!("Game resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Blank until the first car gets through.
    pub fn score_display(&self) -> String {
        if self.score == 0 {
            String::new()
        } else {
            format!("Score: {}", self.score)
        }
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn spawners(&self) -> &[LaneSpawner] {
        &self.spawners
    }

    pub fn collision_rect(&self) -> Option<Rect> {
        self.collision
    }

    pub fn playfield(&self) -> &PlayfieldConfig {
        &self.playfield
    }

    /// The visible field; only cars fully inside it can collide.
    pub fn field(&self) -> Rect {
        Rect::new(0.0, 0.0, self.playfield.width, self.playfield.height)
    }

    pub fn snapshot(&self, frame: u64) -> FrameSnapshot {
        FrameSnapshot {
            frame,
            generation: 0,
            cars: self.cars.iter().map(CarView::from).collect(),
            score: self.score,
            score_text: self.score_display(),
            paused: self.paused,
            game_over: self.game_over,
            collision: self.collision,
        }
    }
}
