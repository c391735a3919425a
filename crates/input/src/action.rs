use fruitrun_common::Camera;
use fruitrun_kernel::Run;
use glam::Vec2;

/// Keys the runner reacts to. Front-ends translate their native key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    ArrowUp,
    Enter,
    Other,
}

/// A high-level action that any front-end can produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Start a new attempt (from the menu or after game over).
    Start,
    /// Flap upward.
    Jump,
    /// Slice whatever fruit lies under the pointer, in normalized device coordinates.
    SliceAt(Vec2),
    /// No-op (input that isn't bound).
    Noop,
}

impl Action {
    pub fn from_key(key: Key) -> Self {
        match key {
            Key::Space | Key::ArrowUp => Self::Jump,
            Key::Enter => Self::Start,
            Key::Other => Self::Noop,
        }
    }

    /// Feed the action to the run. Returns whether it changed anything.
    pub fn apply(self, run: &mut Run, camera: &Camera) -> bool {
        match self {
            Self::Start => {
                run.start();
                true
            }
            Self::Jump => run.jump(),
            Self::SliceAt(ndc) => {
                let sliced = run.slice_at(ndc, camera);
                if !sliced.is_empty() {
                    tracing::debug!(count = sliced.len(), "pointer slice");
                }
                !sliced.is_empty()
            }
            Self::Noop => false,
        }
    }
}
