use fruitrun_common::{EntityId, ObstacleKind, RunConfig};
use fruitrun_kernel::collision::clearance;
use fruitrun_kernel::{Fruit, Obstacle, Player, Run, RunInput};

/// Scripted player for headless runs.
///
/// Flaps over the nearest in-lane obstacle that has a clearance height, holds
/// low under `High` shapes and slices any fruit that drifts into reach.
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// How far before the collision zone an obstacle becomes a threat.
    pub lookahead: f32,
    /// Height kept above an obstacle's top.
    pub margin: f32,
    pub reach_near_z: f32,
    pub reach_far_z: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            lookahead: 6.0,
            margin: 0.4,
            reach_near_z: 3.0,
            reach_far_z: 9.0,
        }
    }
}

impl Autopilot {
    /// Inputs to apply before the next step. Empty unless the run is playing.
    pub fn decide(&self, run: &Run) -> Vec<RunInput> {
        if !run.is_playing() {
            return Vec::new();
        }
        let mut inputs: Vec<RunInput> = self
            .fruits_in_reach(run.fruits())
            .into_iter()
            .map(RunInput::Slice)
            .collect();
        if self.should_flap(run.player(), run.obstacles(), run.config()) {
            tracing::trace!(tick = run.tick(), y = run.player().y, "autopilot flap");
            inputs.push(RunInput::Jump);
        }
        inputs
    }

    pub fn should_flap(&self, player: &Player, obstacles: &[Obstacle], config: &RunConfig) -> bool {
        let c = &config.collision;
        let mut threats: Vec<&Obstacle> = obstacles
            .iter()
            .filter(|o| (o.position.x - c.player_x).abs() < c.half_width)
            .filter(|o| o.position.z > c.zone_near_z - self.lookahead && o.position.z < c.zone_far_z)
            .collect();
        threats.sort_by(|a, b| b.position.z.total_cmp(&a.position.z));

        for threat in threats {
            match (threat.kind, clearance(threat.kind, c)) {
                (_, Some(top)) => return player.y < top + self.margin && player.velocity <= 0.0,
                (ObstacleKind::High, None) => return false,
                _ => continue,
            }
        }
        false
    }

    pub fn fruits_in_reach(&self, fruits: &[Fruit]) -> Vec<EntityId> {
        fruits
            .iter()
            .filter(|f| !f.sliced)
            .filter(|f| f.position.z >= self.reach_near_z && f.position.z <= self.reach_far_z)
            .map(|f| f.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fruitrun_common::{FruitKind, PhysicsConfig};
    use fruitrun_kernel::TimedInput;
    use glam::Vec3;

    fn obstacle(kind: ObstacleKind, x: f32, z: f32) -> Obstacle {
        Obstacle {
            id: EntityId(0),
            position: Vec3::new(x, 0.0, z),
            kind,
        }
    }

    fn grounded() -> Player {
        Player::new(&PhysicsConfig::default())
    }

    #[test]
    fn flaps_over_approaching_pillar() {
        let pilot = Autopilot::default();
        let config = RunConfig::default();
        let obstacles = [obstacle(ObstacleKind::Pillar, 0.0, 2.0)];
        assert!(pilot.should_flap(&grounded(), &obstacles, &config));
    }

    #[test]
    fn holds_when_high_enough_or_rising() {
        let pilot = Autopilot::default();
        let config = RunConfig::default();
        let obstacles = [obstacle(ObstacleKind::Low, 0.0, 5.0)];

        let mut high = grounded();
        high.y = 3.0;
        high.velocity = -0.05;
        assert!(!pilot.should_flap(&high, &obstacles, &config));

        let mut rising = grounded();
        rising.y = 1.0;
        rising.velocity = 0.1;
        assert!(!pilot.should_flap(&rising, &obstacles, &config));
    }

    #[test]
    fn stays_low_under_high_obstacle() {
        let pilot = Autopilot::default();
        let config = RunConfig::default();
        let obstacles = [
            obstacle(ObstacleKind::Pillar, 0.0, -10.0),
            obstacle(ObstacleKind::High, 0.0, 4.5),
        ];
        assert!(!pilot.should_flap(&grounded(), &obstacles, &config));
    }

    #[test]
    fn ignores_gaps_and_off_lane_shapes() {
        let pilot = Autopilot::default();
        let config = RunConfig::default();
        let obstacles = [
            obstacle(ObstacleKind::Gap, 0.0, 5.0),
            obstacle(ObstacleKind::Pillar, 1.5, 5.0),
            obstacle(ObstacleKind::Pillar, 0.0, -20.0),
        ];
        assert!(!pilot.should_flap(&grounded(), &obstacles, &config));
    }

    #[test]
    fn slices_only_fruit_in_reach() {
        let pilot = Autopilot::default();
        let fruit = |id, z, sliced| Fruit {
            id: EntityId(id),
            position: Vec3::new(0.0, 2.0, z),
            kind: FruitKind::Apple,
            sliced,
        };
        let fruits = [
            fruit(1, -5.0, false),
            fruit(2, 4.0, false),
            fruit(3, 6.0, true),
            fruit(4, 8.5, false),
            fruit(5, 12.0, false),
        ];
        assert_eq!(pilot.fruits_in_reach(&fruits), vec![EntityId(2), EntityId(4)]);
    }

    #[test]
    fn idle_outside_play() {
        let run = Run::with_seed(1);
        assert!(Autopilot::default().decide(&run).is_empty());
    }

    #[test]
    fn piloted_run_replays() {
        let pilot = Autopilot::default();
        let mut run = Run::with_seed(11);
        run.start();
        for _ in 0..900 {
            for input in pilot.decide(&run) {
                run.apply(input);
            }
            run.step();
        }
        let inputs: Vec<TimedInput> = run.inputs().to_vec();
        let replayed = Run::replay(*run.config(), 11, &inputs, run.tick()).unwrap();
        assert_eq!(replayed.state_hash(), run.state_hash());
        assert_eq!(replayed.score(), run.score());
    }
}
