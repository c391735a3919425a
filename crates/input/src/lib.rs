//! Input mapping: keyboard and pointer events become runner actions.
//!
//! # Invariants
//! - Front-ends never mutate the run directly; they go through `Action::apply`.
//! - A pointer swipe never doubles as a flap.

pub mod action;
pub mod gesture;

pub use action::{Action, Key};
pub use gesture::PointerGesture;
