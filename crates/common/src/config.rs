//! Run tuning. All distances are world units, all rates are per simulation tick.
//!
//! `RunConfig::default()` reproduces the stock game. A YAML file may override
//! any subset of fields; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Player integrator constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub start_y: f32,
    pub gravity: f32,
    pub flap_velocity: f32,
    /// A flap is ignored at or above this altitude.
    pub flap_ceiling: f32,
    pub floor_y: f32,
    pub ceiling_y: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            start_y: 1.0,
            gravity: 0.012,
            flap_velocity: 0.25,
            flap_ceiling: 5.0,
            floor_y: 0.5,
            ceiling_y: 6.0,
        }
    }
}

/// Corridor scroll speed ramp: `min(max, initial + distance * ramp)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub initial: f32,
    pub max: f32,
    pub ramp: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            initial: 0.15,
            max: 0.35,
            ramp: 0.0001,
        }
    }
}

/// Spawn cursors, spacing and the trailing window caps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub obstacle_start_z: f32,
    /// Obstacles keep spawning while the cursor is nearer than this.
    pub obstacle_horizon_z: f32,
    pub obstacle_gap_min: f32,
    pub obstacle_gap_jitter: f32,
    pub obstacle_spread_x: f32,
    pub high_obstacle_y: f32,
    pub max_obstacles: usize,
    pub fruit_start_z: f32,
    pub fruit_horizon_z: f32,
    pub fruit_gap_min: f32,
    pub fruit_gap_jitter: f32,
    pub fruit_spread_x: f32,
    pub fruit_min_y: f32,
    pub fruit_spread_y: f32,
    pub max_fruits: usize,
    /// Entities at or past this z are behind the camera and get culled.
    pub cull_z: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            obstacle_start_z: -30.0,
            obstacle_horizon_z: -50.0,
            obstacle_gap_min: 15.0,
            obstacle_gap_jitter: 10.0,
            obstacle_spread_x: 4.0,
            high_obstacle_y: 3.0,
            max_obstacles: 8,
            fruit_start_z: -15.0,
            fruit_horizon_z: -40.0,
            fruit_gap_min: 8.0,
            fruit_gap_jitter: 8.0,
            fruit_spread_x: 6.0,
            fruit_min_y: 1.0,
            fruit_spread_y: 3.0,
            max_fruits: 12,
            cull_z: 15.0,
        }
    }
}

/// Collision zone around the player and the altitude bands each shape blocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub player_x: f32,
    pub player_z: f32,
    pub zone_near_z: f32,
    pub zone_far_z: f32,
    pub half_width: f32,
    pub pillar_top: f32,
    pub low_top: f32,
    pub high_bottom: f32,
    pub high_top: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            player_x: 0.0,
            player_z: 6.0,
            zone_near_z: 4.0,
            zone_far_z: 8.0,
            half_width: 1.2,
            pillar_top: 3.0,
            low_top: 2.0,
            high_bottom: 1.5,
            high_top: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Distance points are paid while `floor(distance)` is a multiple of this.
    pub distance_interval: u64,
    pub distance_points: u64,
    pub slice_points: u64,
    /// Radius around a fruit centre that a slice ray must pass through.
    pub slice_radius: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            distance_interval: 5,
            distance_points: 1,
            slice_points: 100,
            slice_radius: 0.6,
        }
    }
}

/// Complete tuning for a run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub physics: PhysicsConfig,
    pub speed: SpeedConfig,
    pub spawn: SpawnConfig,
    pub collision: CollisionConfig,
    pub scoring: ScoringConfig,
}

impl RunConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject tunings the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        if p.floor_y >= p.ceiling_y {
            return Err(ConfigError::Invalid(format!(
                "floor_y ({}) must be below ceiling_y ({})",
                p.floor_y, p.ceiling_y
            )));
        }
        if p.gravity < 0.0 {
            return Err(ConfigError::Invalid("gravity must not be negative".into()));
        }
        if self.speed.initial <= 0.0 || self.speed.initial > self.speed.max {
            return Err(ConfigError::Invalid(format!(
                "speed.initial ({}) must be positive and at most speed.max ({})",
                self.speed.initial, self.speed.max
            )));
        }
        let s = &self.spawn;
        if s.max_obstacles == 0 || s.max_fruits == 0 {
            return Err(ConfigError::Invalid("spawn window caps must be non-zero".into()));
        }
        if s.obstacle_gap_min <= 0.0 || s.fruit_gap_min <= 0.0 {
            return Err(ConfigError::Invalid("spawn gaps must be positive".into()));
        }
        let c = &self.collision;
        if c.zone_near_z >= c.zone_far_z {
            return Err(ConfigError::Invalid(
                "collision zone_near_z must be below zone_far_z".into(),
            ));
        }
        if self.scoring.distance_interval == 0 {
            return Err(ConfigError::Invalid(
                "scoring.distance_interval must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
