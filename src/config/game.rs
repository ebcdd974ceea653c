use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use std::time::Duration;
use super::Validate;

/// Visible field size. Cars spawn just outside it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 800.0,
        }
    }
}

impl Validate for PlayfieldConfig {
    fn validate(&self) -> Result<()> {
        let positive = |side: f32| side.is_finite() && side > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(anyhow!("Playfield dimensions must be positive, got {}x{}", self.width, self.height));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrameLoopConfig {
    pub fps: u32,
    pub min_sleep_ms: u64,
    /// Rolling window for frame timing averages.
    pub stats_samples: u32,
}

impl FrameLoopConfig {
    pub fn target_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }

    pub fn min_sleep(&self) -> Duration {
        Duration::from_millis(self.min_sleep_ms)
    }
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            min_sleep_ms: 5,
            stats_samples: 120,
        }
    }
}

impl Validate for FrameLoopConfig {
    fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(anyhow!("Frame rate must be greater than zero"));
        }

        if self.stats_samples == 0 {
            return Err(anyhow!("Timing samples must be greater than zero"));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Freeze time between a collision and the fresh world.
    pub reset_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { reset_delay_ms: 2500 }
    }
}

impl Validate for SessionConfig {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Padding added around the collided pair when highlighting the crash.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CollisionMargin {
    pub left: f32,
    pub top: f32,
    pub extra_width: f32,
    pub extra_height: f32,
}

impl Default for CollisionMargin {
    fn default() -> Self {
        Self {
            left: 75.0,
            top: 50.0,
            extra_width: 100.0,
            extra_height: 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub collision_margin: CollisionMargin,
}

impl Validate for DisplayConfig {
    fn validate(&self) -> Result<()> {
        let margin = &self.collision_margin;
        let sides = [margin.left, margin.top, margin.extra_width, margin.extra_height];
        if sides.iter().any(|side| !side.is_finite() || *side < 0.0) {
            return Err(anyhow!("Collision margin values must be finite and non-negative"));
        }

        Ok(())
    }
}
