//! Developer tooling: run inspector and a scripted autopilot.
//!
//! # Invariants
//! - Tools only read run state; anything they want changed goes back
//!   through the kernel as a `RunInput`.

mod autopilot;
mod inspector;

pub use autopilot::Autopilot;
pub use inspector::{EntityInfo, RunInspector, RunSummary};
