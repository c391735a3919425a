//! Run kernel: authoritative game state, fixed-tick simulation, deterministic replay.
//!
//! # Invariants
//! - A run is fully determined by its config, seed and input timeline.
//! - All state mutations flow through explicit operations and are logged.
//! - Obstacle and fruit lists stay in spawn order and never exceed their window.

pub mod collision;
pub mod entity;
pub mod event;
pub mod run;
pub mod spawn;

pub use entity::{Fruit, Obstacle, Player};
pub use event::{RunEvent, RunInput, TimedInput};
pub use run::{ReplayError, Run};
pub use spawn::{SpawnRng, Spawner};
