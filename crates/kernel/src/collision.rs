use fruitrun_common::{CollisionConfig, ObstacleKind};

use crate::entity::Obstacle;

/// Whether `obstacle` blocks a player flying at altitude `player_y`.
///
/// Only obstacles inside the z band around the player and within the lateral
/// half-width can hit; each shape then blocks its own altitude band.
pub fn blocks(obstacle: &Obstacle, player_y: f32, config: &CollisionConfig) -> bool {
    let p = obstacle.position;
    if p.z <= config.zone_near_z || p.z >= config.zone_far_z {
        return false;
    }
    if (p.x - config.player_x).abs() >= config.half_width {
        return false;
    }
    match obstacle.kind {
        ObstacleKind::Pillar => player_y < config.pillar_top,
        ObstacleKind::Low => player_y < config.low_top,
        ObstacleKind::High => player_y > config.high_bottom && player_y < config.high_top,
        ObstacleKind::Gap => false,
    }
}

/// First obstacle in spawn order that blocks the player.
pub fn first_hit<'a>(
    obstacles: &'a [Obstacle],
    player_y: f32,
    config: &CollisionConfig,
) -> Option<&'a Obstacle> {
    obstacles.iter().find(|o| blocks(o, player_y, config))
}

/// Lowest altitude that clears `kind`, or `None` if the shape can be passed
/// at any altitude below some ceiling (`High`) or never blocks (`Gap`).
pub fn clearance(kind: ObstacleKind, config: &CollisionConfig) -> Option<f32> {
    match kind {
        ObstacleKind::Pillar => Some(config.pillar_top),
        ObstacleKind::Low => Some(config.low_top),
        ObstacleKind::High | ObstacleKind::Gap => None,
    }
}
