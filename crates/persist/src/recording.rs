use fruitrun_common::RunConfig;
use fruitrun_kernel::{ReplayError, Run, RunInput, TimedInput};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A run captured as config + seed + input timeline.
///
/// The final tick, score and state hash are stored alongside so that a
/// recording can be checked by re-simulating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub id: Uuid,
    pub seed: u64,
    pub config: RunConfig,
    pub inputs: Vec<TimedInput>,
    /// Tick the capture was taken at.
    pub ticks: u64,
    pub final_score: u64,
    pub final_hash: u64,
}

impl Recording {
    /// Capture the current run.
    pub fn capture(run: &Run) -> Self {
        Self {
            id: Uuid::new_v4(),
            seed: run.seed(),
            config: *run.config(),
            inputs: run.inputs().to_vec(),
            ticks: run.tick(),
            final_score: run.score(),
            final_hash: run.state_hash(),
        }
    }

    /// Re-simulate the recording.
    pub fn replay(&self) -> Result<Run, ReplayError> {
        Run::replay(self.config, self.seed, &self.inputs, self.ticks)
    }

    /// Whether replaying reproduces the captured state exactly.
    pub fn verify(&self) -> bool {
        match self.replay() {
            Ok(run) => run.state_hash() == self.final_hash && run.score() == self.final_score,
            Err(e) => {
                tracing::warn!(recording = %self.id, error = %e, "recording failed to replay");
                false
            }
        }
    }

    /// Number of flaps in the timeline.
    pub fn jumps(&self) -> usize {
        self.inputs
            .iter()
            .filter(|t| t.input == RunInput::Jump)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played_run(seed: u64) -> Run {
        let mut run = Run::with_seed(seed);
        run.start();
        for i in 0..120 {
            if i % 20 == 0 {
                run.jump();
            }
            run.step();
        }
        run
    }

    #[test]
    fn capture_and_verify() {
        let run = played_run(42);
        let rec = Recording::capture(&run);
        assert_eq!(rec.ticks, run.tick());
        assert_eq!(rec.final_score, run.score());
        assert!(rec.jumps() > 0);
        assert!(rec.verify());
    }

    #[test]
    fn tampered_score_fails_verification() {
        let mut rec = Recording::capture(&played_run(7));
        rec.final_score += 1;
        assert!(!rec.verify());
    }

    #[test]
    fn tampered_seed_fails_verification() {
        let mut rec = Recording::capture(&played_run(7));
        rec.seed ^= 1;
        assert!(!rec.verify());
    }

    #[test]
    fn tampered_timeline_fails_verification() {
        let mut rec = Recording::capture(&played_run(9));
        rec.inputs.insert(
            0,
            TimedInput {
                tick: 0,
                input: RunInput::Slice(fruitrun_common::EntityId(500)),
            },
        );
        assert!(!rec.verify());
    }

    #[test]
    fn replay_restores_equal_state() {
        let run = played_run(3);
        let rec = Recording::capture(&run);
        let replayed = rec.replay().unwrap();
        assert_eq!(replayed.state_hash(), run.state_hash());
        assert_eq!(replayed.phase(), run.phase());
    }
}
