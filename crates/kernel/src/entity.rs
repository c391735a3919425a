use fruitrun_common::{EntityId, FruitKind, ObstacleKind, PhysicsConfig};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The flying runner. Only altitude is simulated; x and z are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub y: f32,
    pub velocity: f32,
    pub airborne: bool,
}

impl Player {
    pub fn new(physics: &PhysicsConfig) -> Self {
        Self {
            y: physics.start_y,
            velocity: 0.0,
            airborne: false,
        }
    }

    /// Flap upward. Ignored at or above the flap ceiling.
    pub fn flap(&mut self, physics: &PhysicsConfig) -> bool {
        if self.y >= physics.flap_ceiling {
            return false;
        }
        self.velocity = physics.flap_velocity;
        self.airborne = true;
        true
    }

    /// One gravity step, clamped to the corridor. Landing kills velocity.
    pub fn integrate(&mut self, physics: &PhysicsConfig) {
        self.velocity -= physics.gravity;
        self.y = (self.y + self.velocity).clamp(physics.floor_y, physics.ceiling_y);
        if self.y <= physics.floor_y {
            self.velocity = 0.0;
            self.airborne = false;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub position: Vec3,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn advanced(mut self, dz: f32) -> Self {
        self.position.z += dz;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub id: EntityId,
    pub position: Vec3,
    pub kind: FruitKind,
    pub sliced: bool,
}
