//! Shared types for the fruit runner: identifiers, entity kinds, the run
//! phase machine, tuning configuration and the gameplay camera.

pub mod camera;
pub mod config;
pub mod types;

pub use camera::{Camera, Ray};
pub use config::{
    CollisionConfig, ConfigError, PhysicsConfig, RunConfig, ScoringConfig, SpawnConfig,
    SpeedConfig,
};
pub use types::{EntityId, FruitKind, GamePhase, ObstacleKind};
