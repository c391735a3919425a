use serde::{Deserialize, Serialize};

/// Identifier of an obstacle or fruit within a run.
///
/// Ids are handed out from a per-kind counter that restarts at zero whenever a
/// run starts, so they increase monotonically in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Obstacle shapes. Each shape blocks a different band of altitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Tall column; must be cleared from above.
    Pillar,
    /// Opening in the corridor; never blocks.
    Gap,
    /// Low barrier; must be cleared from above.
    Low,
    /// Overhead beam; pass under it or over it.
    High,
}

impl ObstacleKind {
    pub const ALL: [Self; 4] = [Self::Pillar, Self::Gap, Self::Low, Self::High];

    /// Pick a kind from a uniform sample in `[0, 1)`.
    pub fn from_unit(r: f32) -> Self {
        Self::ALL[unit_index(r, Self::ALL.len())]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pillar => "pillar",
            Self::Gap => "gap",
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

/// Fruit varieties. Purely cosmetic apart from identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FruitKind {
    Apple,
    Orange,
    Watermelon,
    Banana,
}

impl FruitKind {
    pub const ALL: [Self; 4] = [Self::Apple, Self::Orange, Self::Watermelon, Self::Banana];

    /// Pick a kind from a uniform sample in `[0, 1)`.
    pub fn from_unit(r: f32) -> Self {
        Self::ALL[unit_index(r, Self::ALL.len())]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Apple => "apple",
            Self::Orange => "orange",
            Self::Watermelon => "watermelon",
            Self::Banana => "banana",
        }
    }
}

/// Top-level run state machine: `Menu -> Playing -> GameOver -> Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    GameOver,
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Menu => "menu",
            Self::Playing => "playing",
            Self::GameOver => "game-over",
        };
        f.write_str(s)
    }
}

fn unit_index(r: f32, len: usize) -> usize {
    ((r * len as f32).floor().max(0.0) as usize).min(len - 1)
}
