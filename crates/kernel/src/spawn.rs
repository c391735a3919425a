use fruitrun_common::{EntityId, FruitKind, ObstacleKind, SpawnConfig};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::entity::{Fruit, Obstacle};

/// Splitmix64 stream. Every random draw in a run comes from here so that a
/// seed reproduces the same corridor on every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRng {
    state: u64,
}

impl SpawnRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform sample in `[0, 1)` with 24 bits of precision.
    pub fn next_unit(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}

/// Receding spawn cursors and id counters for both entity lists.
///
/// The cursors mark where the next obstacle/fruit will appear. They drift
/// toward the player with the corridor and jump back by a random gap after
/// each spawn, so spawning keeps pace with the scroll speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    rng: SpawnRng,
    next_obstacle_z: f32,
    next_fruit_z: f32,
    next_obstacle_id: u64,
    next_fruit_id: u64,
}

impl Spawner {
    pub fn new(seed: u64, config: &SpawnConfig) -> Self {
        Self {
            rng: SpawnRng::new(seed),
            next_obstacle_z: config.obstacle_start_z,
            next_fruit_z: config.fruit_start_z,
            next_obstacle_id: 0,
            next_fruit_id: 0,
        }
    }

    /// Rewind cursors and ids for a new run. The random stream continues.
    pub fn reset(&mut self, config: &SpawnConfig) {
        self.next_obstacle_z = config.obstacle_start_z;
        self.next_fruit_z = config.fruit_start_z;
        self.next_obstacle_id = 0;
        self.next_fruit_id = 0;
    }

    pub fn rng(&self) -> &SpawnRng {
        &self.rng
    }

    pub fn next_obstacle_z(&self) -> f32 {
        self.next_obstacle_z
    }

    pub fn next_fruit_z(&self) -> f32 {
        self.next_fruit_z
    }

    /// Obstacles spawned since the last reset.
    pub fn obstacles_issued(&self) -> u64 {
        self.next_obstacle_id
    }

    /// Fruits spawned since the last reset.
    pub fn fruits_issued(&self) -> u64 {
        self.next_fruit_id
    }

    pub fn obstacle_due(&self, config: &SpawnConfig) -> bool {
        self.next_obstacle_z > config.obstacle_horizon_z
    }

    pub fn fruit_due(&self, config: &SpawnConfig) -> bool {
        self.next_fruit_z > config.fruit_horizon_z
    }

    pub fn spawn_obstacle(&mut self, config: &SpawnConfig) -> Obstacle {
        let kind = ObstacleKind::from_unit(self.rng.next_unit());
        let x = (self.rng.next_unit() - 0.5) * config.obstacle_spread_x;
        let y = if kind == ObstacleKind::High {
            config.high_obstacle_y
        } else {
            0.0
        };
        let obstacle = Obstacle {
            id: EntityId(self.next_obstacle_id),
            position: Vec3::new(x, y, self.next_obstacle_z),
            kind,
        };
        self.next_obstacle_id += 1;
        self.next_obstacle_z -=
            config.obstacle_gap_min + self.rng.next_unit() * config.obstacle_gap_jitter;
        obstacle
    }

    pub fn spawn_fruit(&mut self, config: &SpawnConfig) -> Fruit {
        let kind = FruitKind::from_unit(self.rng.next_unit());
        let x = (self.rng.next_unit() - 0.5) * config.fruit_spread_x;
        let y = config.fruit_min_y + self.rng.next_unit() * config.fruit_spread_y;
        let fruit = Fruit {
            id: EntityId(self.next_fruit_id),
            position: Vec3::new(x, y, self.next_fruit_z),
            kind,
            sliced: false,
        };
        self.next_fruit_id += 1;
        self.next_fruit_z -=
            config.fruit_gap_min + self.rng.next_unit() * config.fruit_gap_jitter;
        fruit
    }

    /// Drift both cursors toward the player with the corridor.
    pub fn advance(&mut self, dz: f32) {
        self.next_obstacle_z += dz;
        self.next_fruit_z += dz;
    }
}

/// Append to a spawn-ordered list, dropping the oldest entries beyond `cap`.
pub fn push_windowed<T>(list: &mut Vec<T>, item: T, cap: usize) {
    if list.len() >= cap {
        let excess = list.len() + 1 - cap;
        list.drain(..excess);
    }
    list.push(item);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_is_deterministic() {
        let mut a = SpawnRng::new(42);
        let mut b = SpawnRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        assert_ne!(SpawnRng::new(1).next_u64(), SpawnRng::new(2).next_u64());
    }

    #[test]
    fn unit_samples_stay_in_range() {
        let mut rng = SpawnRng::new(7);
        for _ in 0..10_000 {
            let r = rng.next_unit();
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn obstacle_spawn_respects_ranges() {
        let config = SpawnConfig::default();
        let mut spawner = Spawner::new(3, &config);
        for i in 0..200 {
            let z_before = spawner.next_obstacle_z();
            let o = spawner.spawn_obstacle(&config);
            assert_eq!(o.id, EntityId(i));
            assert_eq!(o.position.z, z_before);
            assert!(o.position.x >= -2.0 && o.position.x < 2.0);
            let expected_y = if o.kind == ObstacleKind::High { 3.0 } else { 0.0 };
            assert_eq!(o.position.y, expected_y);
            let gap = z_before - spawner.next_obstacle_z();
            assert!((15.0 - 1e-3..25.0 + 1e-3).contains(&gap));
        }
    }

    #[test]
    fn fruit_spawn_respects_ranges() {
        let config = SpawnConfig::default();
        let mut spawner = Spawner::new(11, &config);
        for _ in 0..200 {
            let z_before = spawner.next_fruit_z();
            let f = spawner.spawn_fruit(&config);
            assert!(!f.sliced);
            assert!(f.position.x >= -3.0 && f.position.x < 3.0);
            assert!(f.position.y >= 1.0 && f.position.y < 4.0);
            let gap = z_before - spawner.next_fruit_z();
            assert!((8.0 - 1e-3..16.0 + 1e-3).contains(&gap));
        }
    }

    #[test]
    fn reset_rewinds_cursors_and_ids() {
        let config = SpawnConfig::default();
        let mut spawner = Spawner::new(5, &config);
        spawner.spawn_obstacle(&config);
        spawner.spawn_fruit(&config);
        spawner.advance(3.0);
        let rng_before = *spawner.rng();
        spawner.reset(&config);
        assert_eq!(spawner.next_obstacle_z(), -30.0);
        assert_eq!(spawner.next_fruit_z(), -15.0);
        assert_eq!(spawner.spawn_obstacle(&config).id, EntityId(0));
        assert_ne!(spawner.rng().state(), rng_before.state());
    }

    #[test]
    fn due_checks_follow_horizon() {
        let config = SpawnConfig::default();
        let mut spawner = Spawner::new(0, &config);
        assert!(spawner.obstacle_due(&config));
        assert!(spawner.fruit_due(&config));
        spawner.advance(-30.0);
        assert!(!spawner.obstacle_due(&config));
        assert!(!spawner.fruit_due(&config));
    }

    #[test]
    fn window_drops_oldest() {
        let mut list = Vec::new();
        for i in 0..20 {
            push_windowed(&mut list, i, 8);
            assert!(list.len() <= 8);
        }
        assert_eq!(list, (12..20).collect::<Vec<_>>());
    }
}
