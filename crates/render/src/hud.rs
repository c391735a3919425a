use std::time::Duration;

/// Interval between counter steps.
pub const TICKER_STEP: Duration = Duration::from_millis(30);
/// How long the score stays highlighted after a change.
pub const FLASH_DURATION: Duration = Duration::from_millis(150);

/// Animated score counter for the HUD.
///
/// The shown value climbs toward the real score by a fifth of the remaining
/// difference (rounded up) every [`TICKER_STEP`]. A drop in score (a fresh
/// run) snaps the counter down immediately.
#[derive(Debug, Clone, Default)]
pub struct ScoreTicker {
    shown: u64,
    flash_left: Duration,
    accum: Duration,
}

impl ScoreTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> u64 {
        self.shown
    }

    pub fn flashing(&self) -> bool {
        !self.flash_left.is_zero()
    }

    /// Advance the animation by `dt` toward `score`.
    pub fn advance(&mut self, score: u64, dt: Duration) {
        self.flash_left = self.flash_left.saturating_sub(dt);

        if score < self.shown {
            self.shown = score;
            self.accum = Duration::ZERO;
            return;
        }
        if score == self.shown {
            self.accum = Duration::ZERO;
            return;
        }

        self.accum += dt;
        while self.accum >= TICKER_STEP && self.shown < score {
            self.accum -= TICKER_STEP;
            self.shown += (score - self.shown).div_ceil(5);
            self.flash_left = FLASH_DURATION;
        }
    }
}
