use fruitrun_common::{EntityId, FruitKind, ObstacleKind};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An event record produced by every mutation of the run.
///
/// Front-ends consume these for effects and HUD updates; they are not needed
/// for replay, which only requires the input timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEvent {
    /// A fresh run began. `attempt` counts runs since the kernel was created.
    Started { attempt: u32 },
    /// The player flapped.
    Jumped { y: f32 },
    ObstacleSpawned {
        id: EntityId,
        kind: ObstacleKind,
        position: Vec3,
    },
    FruitSpawned {
        id: EntityId,
        kind: FruitKind,
        position: Vec3,
    },
    FruitSliced { id: EntityId, points: u64 },
    /// Points were awarded; `total` is the score afterwards.
    Scored { points: u64, total: u64 },
    /// The player hit an obstacle and the run ended.
    Collided {
        obstacle: EntityId,
        kind: ObstacleKind,
        final_score: u64,
    },
    /// Simulation advanced one playing tick.
    Stepped { tick: u64 },
}

/// A player command accepted by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunInput {
    Start,
    Jump,
    Slice(EntityId),
}

/// An accepted input stamped with the tick it was applied before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedInput {
    pub tick: u64,
    pub input: RunInput,
}
