use fruitrun_common::{EntityId, GamePhase};
use fruitrun_kernel::Run;

/// Read-only queries against a run for debugging and CLI output.
pub struct RunInspector;

impl RunInspector {
    pub fn summary(run: &Run) -> RunSummary {
        RunSummary {
            phase: run.phase(),
            tick: run.tick(),
            seed: run.seed(),
            attempts: run.attempts(),
            score: run.score(),
            distance: run.distance(),
            speed: run.speed(),
            obstacles: run.obstacles().len(),
            fruits: run.fruits().len(),
            pending_events: run.events().len(),
        }
    }

    pub fn inspect_obstacle(run: &Run, id: EntityId) -> Option<EntityInfo> {
        run.obstacles()
            .iter()
            .find(|o| o.id == id)
            .map(|o| EntityInfo {
                id,
                label: o.kind.name(),
                position: o.position.to_array(),
                sliced: false,
            })
    }

    pub fn inspect_fruit(run: &Run, id: EntityId) -> Option<EntityInfo> {
        run.fruits().iter().find(|f| f.id == id).map(|f| EntityInfo {
            id,
            label: f.kind.name(),
            position: f.position.to_array(),
            sliced: f.sliced,
        })
    }

    /// Every live obstacle then every live fruit, in spawn order.
    pub fn list_entities(run: &Run) -> Vec<EntityInfo> {
        let obstacles = run.obstacles().iter().map(|o| EntityInfo {
            id: o.id,
            label: o.kind.name(),
            position: o.position.to_array(),
            sliced: false,
        });
        let fruits = run.fruits().iter().map(|f| EntityInfo {
            id: f.id,
            label: f.kind.name(),
            position: f.position.to_array(),
            sliced: f.sliced,
        });
        obstacles.chain(fruits).collect()
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub phase: GamePhase,
    pub tick: u64,
    pub seed: u64,
    pub attempts: u32,
    pub score: u64,
    pub distance: f32,
    pub speed: f32,
    pub obstacles: usize,
    pub fruits: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Run: {} tick={} seed={} attempt={} score={} distance={:.1} speed={:.3} obstacles={} fruits={} pending_events={}",
            self.phase,
            self.tick,
            self.seed,
            self.attempts,
            self.score,
            self.distance,
            self.speed,
            self.obstacles,
            self.fruits,
            self.pending_events
        )
    }
}

#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub label: &'static str,
    pub position: [f32; 3],
    pub sliced: bool,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} pos=({:.2}, {:.2}, {:.2}){}",
            self.id,
            self.label,
            self.position[0],
            self.position[1],
            self.position[2],
            if self.sliced { " sliced" } else { "" }
        )
    }
}
