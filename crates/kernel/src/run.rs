use fruitrun_common::{Camera, EntityId, GamePhase, ObstacleKind, RunConfig};
use glam::Vec2;

use crate::collision;
use crate::entity::{Fruit, Obstacle, Player};
use crate::event::{RunEvent, RunInput, TimedInput};
use crate::spawn::{Spawner, push_windowed};

/// Errors from re-simulating a recorded input timeline.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("input at tick {tick} precedes previous input at tick {previous}")]
    OutOfOrder { tick: u64, previous: u64 },
    #[error("input at tick {tick} lies beyond the replay end at tick {end}")]
    BeyondEnd { tick: u64, end: u64 },
    #[error("recorded input {input:?} was rejected at tick {tick}")]
    Rejected { tick: u64, input: RunInput },
}

/// The authoritative state of a fruit runner session.
///
/// A `Run` outlives individual attempts: `start()` resets the corridor and
/// begins a new attempt while the tick clock and random stream keep going.
/// Given the same config, seed and input timeline, two runs produce identical
/// states (see [`Run::replay`] and [`Run::state_hash`]).
#[derive(Debug, Clone)]
pub struct Run {
    config: RunConfig,
    seed: u64,
    phase: GamePhase,
    tick: u64,
    attempts: u32,
    score: u64,
    distance: f32,
    speed: f32,
    player: Player,
    obstacles: Vec<Obstacle>,
    fruits: Vec<Fruit>,
    spawner: Spawner,
    /// Append-only log of mutations, drained by front-ends.
    event_log: Vec<RunEvent>,
    /// Every accepted input, in application order.
    input_log: Vec<TimedInput>,
}

impl Run {
    /// A run in the menu with stock tuning.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(RunConfig::default(), seed)
    }

    pub fn with_config(config: RunConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            phase: GamePhase::Menu,
            tick: 0,
            attempts: 0,
            score: 0,
            distance: 0.0,
            speed: config.speed.initial,
            player: Player::new(&config.physics),
            obstacles: Vec::new(),
            fruits: Vec::new(),
            spawner: Spawner::new(seed, &config.spawn),
            event_log: Vec::new(),
            input_log: Vec::new(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Seed the run was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Ticks elapsed since creation, in any phase.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Live obstacles, oldest (nearest the camera) first.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Live fruits, oldest first. Sliced fruits stay until culled.
    pub fn fruits(&self) -> &[Fruit] {
        &self.fruits
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[RunEvent] {
        &self.event_log
    }

    /// Every input the kernel accepted, stamped with its tick.
    pub fn inputs(&self) -> &[TimedInput] {
        &self.input_log
    }

    /// Begin a fresh attempt from any phase.
    pub fn start(&mut self) {
        let physics = self.config.physics;
        self.phase = GamePhase::Playing;
        self.attempts += 1;
        self.score = 0;
        self.distance = 0.0;
        self.speed = self.config.speed.initial;
        self.player = Player::new(&physics);
        self.obstacles.clear();
        self.fruits.clear();
        self.spawner.reset(&self.config.spawn);
        self.record(RunInput::Start);
        self.event_log.push(RunEvent::Started {
            attempt: self.attempts,
        });
        tracing::info!(attempt = self.attempts, tick = self.tick, "run started");
    }

    /// Flap. Returns whether the flap was accepted.
    pub fn jump(&mut self) -> bool {
        if !self.is_playing() || !self.player.flap(&self.config.physics) {
            return false;
        }
        self.record(RunInput::Jump);
        self.event_log.push(RunEvent::Jumped { y: self.player.y });
        true
    }

    /// Slice a live, unsliced fruit. Returns whether anything was sliced.
    pub fn slice(&mut self, id: EntityId) -> bool {
        if !self.is_playing() {
            return false;
        }
        let Some(fruit) = self.fruits.iter_mut().find(|f| f.id == id && !f.sliced) else {
            return false;
        };
        fruit.sliced = true;
        let points = self.config.scoring.slice_points;
        self.record(RunInput::Slice(id));
        self.event_log.push(RunEvent::FruitSliced { id, points });
        tracing::debug!(fruit = %id, "fruit sliced");
        self.award(points);
        true
    }

    /// Slice every unsliced fruit under a pointer at `ndc` as seen from `camera`.
    pub fn slice_at(&mut self, ndc: Vec2, camera: &Camera) -> Vec<EntityId> {
        if !self.is_playing() {
            return Vec::new();
        }
        let ray = camera.ray_through(ndc);
        let radius = self.config.scoring.slice_radius;
        let hits: Vec<EntityId> = self
            .fruits
            .iter()
            .filter(|f| !f.sliced && ray.distance_to(f.position) < radius)
            .map(|f| f.id)
            .collect();
        hits.into_iter().filter(|id| self.slice(*id)).collect()
    }

    /// Apply a recorded input. Returns whether the kernel accepted it.
    pub fn apply(&mut self, input: RunInput) -> bool {
        match input {
            RunInput::Start => {
                self.start();
                true
            }
            RunInput::Jump => self.jump(),
            RunInput::Slice(id) => self.slice(id),
        }
    }

    /// Advance the simulation by one tick. Outside `Playing` only the clock moves.
    pub fn step(&mut self) {
        self.tick += 1;
        if !self.is_playing() {
            return;
        }
        let _span = tracing::trace_span!("run_step", tick = self.tick).entered();
        let config = self.config;

        self.distance += self.speed;
        self.speed =
            (config.speed.initial + self.distance * config.speed.ramp).min(config.speed.max);

        let whole = self.distance.floor() as u64;
        if whole > 0 && whole % config.scoring.distance_interval == 0 {
            self.award(config.scoring.distance_points);
        }

        self.player.integrate(&config.physics);

        let speed = self.speed;
        let cull_z = config.spawn.cull_z;
        let advanced: Vec<Obstacle> = self
            .obstacles
            .iter()
            .map(|o| o.advanced(speed))
            .filter(|o| o.position.z < cull_z)
            .collect();
        if let Some(hit) = collision::first_hit(&advanced, self.player.y, &config.collision) {
            let (obstacle, kind) = (hit.id, hit.kind);
            self.game_over(obstacle, kind);
            return;
        }
        self.obstacles = advanced;

        for fruit in &mut self.fruits {
            fruit.position.z += speed;
        }
        self.fruits.retain(|f| f.position.z < cull_z);

        if self.spawner.obstacle_due(&config.spawn) {
            let obstacle = self.spawner.spawn_obstacle(&config.spawn);
            tracing::debug!(
                id = %obstacle.id,
                kind = obstacle.kind.name(),
                z = obstacle.position.z,
                "obstacle spawned"
            );
            self.event_log.push(RunEvent::ObstacleSpawned {
                id: obstacle.id,
                kind: obstacle.kind,
                position: obstacle.position,
            });
            push_windowed(&mut self.obstacles, obstacle, config.spawn.max_obstacles);
        }
        if self.spawner.fruit_due(&config.spawn) {
            let fruit = self.spawner.spawn_fruit(&config.spawn);
            tracing::debug!(
                id = %fruit.id,
                kind = fruit.kind.name(),
                z = fruit.position.z,
                "fruit spawned"
            );
            self.event_log.push(RunEvent::FruitSpawned {
                id: fruit.id,
                kind: fruit.kind,
                position: fruit.position,
            });
            push_windowed(&mut self.fruits, fruit, config.spawn.max_fruits);
        }

        self.spawner.advance(speed);
        self.event_log.push(RunEvent::Stepped { tick: self.tick });
    }

    /// Re-simulate `ticks` ticks from a fresh run, applying each input right
    /// before the step that leaves its tick.
    pub fn replay(
        config: RunConfig,
        seed: u64,
        inputs: &[TimedInput],
        ticks: u64,
    ) -> Result<Self, ReplayError> {
        let mut previous = 0;
        for timed in inputs {
            if timed.tick < previous {
                return Err(ReplayError::OutOfOrder {
                    tick: timed.tick,
                    previous,
                });
            }
            if timed.tick > ticks {
                return Err(ReplayError::BeyondEnd {
                    tick: timed.tick,
                    end: ticks,
                });
            }
            previous = timed.tick;
        }

        let mut run = Self::with_config(config, seed);
        let mut pending = inputs.iter().peekable();
        loop {
            while let Some(timed) = pending.next_if(|t| t.tick == run.tick) {
                if !run.apply(timed.input) {
                    return Err(ReplayError::Rejected {
                        tick: timed.tick,
                        input: timed.input,
                    });
                }
            }
            if run.tick == ticks {
                break;
            }
            run.step();
        }
        Ok(run)
    }

    /// Deterministic hash of the simulation state (logs excluded).
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.seed.to_le_bytes());
        mix(&mut h, &self.spawner.rng().state().to_le_bytes());
        mix(&mut h, &[self.phase as u8]);
        mix(&mut h, &self.attempts.to_le_bytes());
        mix(&mut h, &self.score.to_le_bytes());
        mix(&mut h, &self.distance.to_le_bytes());
        mix(&mut h, &self.speed.to_le_bytes());
        mix(&mut h, &self.player.y.to_le_bytes());
        mix(&mut h, &self.player.velocity.to_le_bytes());
        mix(&mut h, &[self.player.airborne as u8]);
        mix(&mut h, &self.spawner.next_obstacle_z().to_le_bytes());
        mix(&mut h, &self.spawner.next_fruit_z().to_le_bytes());
        mix(&mut h, &self.spawner.obstacles_issued().to_le_bytes());
        mix(&mut h, &self.spawner.fruits_issued().to_le_bytes());
        for o in &self.obstacles {
            mix(&mut h, &o.id.0.to_le_bytes());
            mix(&mut h, &[o.kind as u8]);
            for c in o.position.to_array() {
                mix(&mut h, &c.to_le_bytes());
            }
        }
        for f in &self.fruits {
            mix(&mut h, &f.id.0.to_le_bytes());
            mix(&mut h, &[f.kind as u8, f.sliced as u8]);
            for c in f.position.to_array() {
                mix(&mut h, &c.to_le_bytes());
            }
        }
        h
    }

    fn award(&mut self, points: u64) {
        self.score += points;
        self.event_log.push(RunEvent::Scored {
            points,
            total: self.score,
        });
    }

    fn game_over(&mut self, obstacle: EntityId, kind: ObstacleKind) {
        self.phase = GamePhase::GameOver;
        self.event_log.push(RunEvent::Collided {
            obstacle,
            kind,
            final_score: self.score,
        });
        tracing::info!(
            score = self.score,
            distance = self.distance,
            obstacle = %obstacle,
            kind = kind.name(),
            "run over"
        );
    }

    fn record(&mut self, input: RunInput) {
        self.input_log.push(TimedInput {
            tick: self.tick,
            input,
        });
    }
}
