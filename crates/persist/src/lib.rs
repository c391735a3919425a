//! Persistence: the best score and recorded runs.
//!
//! # Invariants
//! - The stored best score only ever increases (until an explicit reset).
//! - Recordings are content-addressed and verifiable by replay.
//! - Corrupt or schema-mismatched files fail closed.

pub mod highscore;
pub mod recording;
pub mod store;

pub use highscore::{HIGH_SCORE_KEY, HighScoreError, HighScoreStore};
pub use recording::Recording;
pub use store::{IndexEntry, RecordingStore, STORE_SCHEMA_VERSION, StoreError, StoreIndex};
