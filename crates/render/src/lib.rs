//! Rendering Adapter: text views of a run plus HUD animation state.
//!
//! # Invariants
//! - Renderers cannot mutate the run; render state derives from run state.
//! - HUD animation is wall-clock driven and never feeds back into simulation.

mod corridor;
mod hud;
mod renderer;

pub use corridor::{CorridorFrame, CorridorRenderer};
pub use hud::ScoreTicker;
pub use renderer::{DebugTextRenderer, Renderer};
