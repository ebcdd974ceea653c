use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use rand_distr::uniform::{SampleUniform, Uniform};
use std::cmp::Ordering;
use std::fmt::Display;
use super::Validate;

/// Half-open sampling interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T> Span<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: SampleUniform + Copy> Span<T> {
    /// Panics if `min >= max`; `validate_span` guards loaded configs.
    pub fn uniform(&self) -> Uniform<T> {
        Uniform::new(self.min, self.max)
    }
}

fn validate_span<T: PartialOrd + Display>(name: &str, span: &Span<T>) -> Result<()> {
    // NaN bounds compare as unordered and land here too
    if span.min.partial_cmp(&span.max) != Some(Ordering::Less) {
        return Err(anyhow!("{} range is empty: min {} must be below max {}", name, span.min, span.max));
    }
    Ok(())
}

fn validate_finite(name: &str, span: &Span<f32>) -> Result<()> {
    if !span.min.is_finite() || !span.max.is_finite() {
        return Err(anyhow!("{} bounds must be finite, got [{}, {})", name, span.min, span.max));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Delay before a lane emits its first car.
    pub first_delay_ms: Span<u64>,
    /// Delay between later emissions.
    pub delay_ms: Span<u64>,
    pub speed: Span<f32>,
    pub acceleration: Span<f32>,
    pub color_channel: Span<u8>,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            first_delay_ms: Span::new(2800, 3800),
            delay_ms: Span::new(3100, 5300),
            speed: Span::new(1.2, 2.2),
            acceleration: Span::new(0.5, 1.5),
            color_channel: Span::new(40, 240),
        }
    }
}

impl Validate for SpawnerConfig {
    fn validate(&self) -> Result<()> {
        validate_span("spawner.first_delay_ms", &self.first_delay_ms)?;
        validate_span("spawner.delay_ms", &self.delay_ms)?;
        validate_span("spawner.speed", &self.speed)?;
        validate_span("spawner.acceleration", &self.acceleration)?;
        validate_finite("spawner.speed", &self.speed)?;
        validate_finite("spawner.acceleration", &self.acceleration)?;
        validate_span("spawner.color_channel", &self.color_channel)?;

        if self.delay_ms.min == 0 {
            return Err(anyhow!("Spawn delay must be greater than zero"));
        }

        if self.speed.min < crate::simulation::MIN_SPEED || self.speed.max > crate::simulation::MAX_SPEED {
            return Err(anyhow!(
                "Spawn speed range [{}, {}) must lie within [{}, {}]",
                self.speed.min,
                self.speed.max,
                crate::simulation::MIN_SPEED,
                crate::simulation::MAX_SPEED
            ));
        }

        if self.acceleration.min <= 0.0 {
            return Err(anyhow!("Acceleration factor must be positive"));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RandomConfig {
    pub seed: Option<u64>,
}
