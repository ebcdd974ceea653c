use nalgebra::{Vector2, Point2};
use serde::{Deserialize, Serialize};

pub mod geometry;
pub mod direction;
pub mod car;
pub mod spawner;
pub mod world;

pub use geometry::*;
pub use direction::*;
pub use car::*;
pub use spawner::*;
pub use world::*;

pub type Vec2 = Vector2<f32>;
pub type Point = Point2<f32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Boosts the car.
    Primary,
    /// Flips the car between stopped and moving.
    Secondary,
}

/// A press in playfield coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub point: Point,
    pub button: MouseButton,
}

impl InputEvent {
    pub fn new(x: f32, y: f32, button: MouseButton) -> Self {
        Self {
            point: Point::new(x, y),
            button,
        }
    }
}

/// Everything a renderer needs to draw one car.
#[derive(Debug, Clone, PartialEq)]
pub struct CarView {
    pub bounds: Rect,
    pub color: Rgb,
    pub direction: Direction,
    pub stopped: bool,
    pub accelerating: bool,
}

impl From<&Car> for CarView {
    fn from(car: &Car) -> Self {
        Self {
            bounds: car.bounds(),
            color: car.color(),
            direction: car.direction(),
            stopped: car.is_stopped(),
            accelerating: car.is_accelerating(),
        }
    }
}

/// Copy of the world taken under its lock, so drawing never sees a half-updated frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub generation: u64,
    pub cars: Vec<CarView>,
    pub score: u32,
    pub score_text: String,
    pub paused: bool,
    pub game_over: bool,
    pub collision: Option<Rect>,
}
