use std::time::Duration;

use fruitrun_common::{Camera, GamePhase, RunConfig};
use fruitrun_input::{Action, Key, PointerGesture};
use fruitrun_kernel::{Run, RunEvent};
use fruitrun_persist::HighScoreStore;
use fruitrun_render::{CorridorFrame, CorridorRenderer, Renderer, ScoreTicker};
use glam::Vec2;

/// Fixed simulation step (60 Hz).
pub const TICK: Duration = Duration::from_nanos(16_666_667);
/// Longest frame the accumulator will catch up on.
const MAX_FRAME: Duration = Duration::from_millis(250);
/// Screen row where the corridor starts, below the HUD.
pub const CORRIDOR_TOP: u16 = 2;
/// Pointer travel, in cells, below which a click counts as a tap.
pub const TAP_MAX_TRAVEL_CELLS: f32 = 1.5;

/// One line of screen output.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub highlight: bool,
}

impl Line {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: false,
        }
    }
}

/// Terminal front-end state around a single run.
pub struct App {
    run: Run,
    camera: Camera,
    corridor: CorridorRenderer,
    gesture: PointerGesture,
    ticker: ScoreTicker,
    scores: HighScoreStore,
    frame: Option<CorridorFrame>,
    tick_accumulator: Duration,
    new_best: bool,
}

impl App {
    pub fn new(config: RunConfig, seed: u64, scores: HighScoreStore) -> Self {
        let corridor = CorridorRenderer::default();
        let gesture = PointerGesture::new(
            (corridor.width - 1) as f32,
            (corridor.height - 1) as f32,
        )
        .with_tap_max_travel(TAP_MAX_TRAVEL_CELLS);
        Self {
            run: Run::with_config(config, seed),
            camera: Camera::default(),
            corridor,
            gesture,
            ticker: ScoreTicker::new(),
            scores,
            frame: None,
            tick_accumulator: Duration::ZERO,
            new_best: false,
        }
    }

    pub fn run(&self) -> &Run {
        &self.run
    }

    pub fn best(&self) -> u64 {
        self.scores.best()
    }

    /// Fit the corridor to a terminal of `cols` x `rows`.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.corridor.width = (cols as usize).clamp(24, 160);
        self.corridor.height = (rows.saturating_sub(CORRIDOR_TOP + 2) as usize).clamp(8, 24);
        self.gesture.resize(
            (self.corridor.width - 1) as f32,
            (self.corridor.height - 1) as f32,
        );
        self.frame = None;
    }

    pub fn handle_key(&mut self, key: Key) {
        self.dispatch(Action::from_key(key));
    }

    /// Pointer positions are terminal cells relative to the corridor's top-left.
    pub fn pointer_down(&mut self, px: Vec2) {
        self.gesture.pointer_down(px);
    }

    pub fn pointer_up(&mut self, px: Vec2) {
        let action = self.gesture.pointer_up(px);
        self.dispatch(action);
    }

    pub fn pointer_move(&mut self, px: Vec2) {
        let action = self.gesture.pointer_move(px);
        self.dispatch(action);
    }

    fn dispatch(&mut self, action: Action) {
        if !self.run.is_playing() {
            if action == Action::Start {
                self.run.start();
                self.new_best = false;
                self.frame = None;
            }
            return;
        }
        match action {
            // The corridor is a side view, so slices resolve against drawn
            // cells rather than the camera ray.
            Action::SliceAt(ndc) => {
                let Some(frame) = &self.frame else {
                    return;
                };
                for id in frame.fruits_at(ndc, 1) {
                    self.run.slice(id);
                }
            }
            other => {
                other.apply(&mut self.run, &self.camera);
            }
        }
    }

    /// Advance wall-clock time: run due ticks, then settle game-over bookkeeping.
    pub fn update(&mut self, dt: Duration) -> anyhow::Result<()> {
        self.tick_accumulator += dt.min(MAX_FRAME);
        while self.tick_accumulator >= TICK {
            self.tick_accumulator -= TICK;
            self.run.step();
        }

        for event in self.run.drain_events() {
            if let RunEvent::Collided { final_score, .. } = event {
                self.new_best = self.scores.record(final_score)?;
            }
        }
        self.ticker.advance(self.run.score(), dt);
        Ok(())
    }

    /// Compose the screen for the current phase.
    pub fn lines(&mut self) -> Vec<Line> {
        match self.run.phase() {
            GamePhase::Menu => vec![
                Line::plain(""),
                Line::plain("  F R U I T   R U N N E R"),
                Line::plain(""),
                Line::plain(format!("  Best: {}", self.scores.best())),
                Line::plain(""),
                Line::plain("  Space / click to flap, drag across fruit to slice"),
                Line::plain("  Press Enter to start, q to quit"),
            ],
            GamePhase::Playing => {
                let mut lines = vec![
                    Line {
                        text: format!(
                            "SCORE {:>6}   BEST {:>6}   SPEED {:.2}",
                            self.ticker.shown(),
                            self.scores.best(),
                            self.run.speed()
                        ),
                        highlight: self.ticker.flashing(),
                    },
                    Line::plain(""),
                ];
                lines.extend(self.corridor_lines());
                lines.push(Line::plain("Space/click: flap   drag: slice   q: quit"));
                lines
            }
            GamePhase::GameOver => {
                let mut lines = vec![
                    Line {
                        text: format!("GAME OVER   score {}", self.run.score()),
                        highlight: self.new_best,
                    },
                    Line::plain(if self.new_best {
                        "New best!".to_string()
                    } else {
                        format!("Best: {}", self.scores.best())
                    }),
                ];
                lines.extend(self.corridor_lines());
                lines.push(Line::plain("Enter to play again, q to quit"));
                lines
            }
        }
    }

    fn corridor_lines(&mut self) -> Vec<Line> {
        let frame = self.corridor.render(&self.run, &self.camera);
        let lines = frame.rows.iter().map(|r| Line::plain(r.clone())).collect();
        self.frame = Some(frame);
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_in(dir: &tempfile::TempDir, config: RunConfig) -> App {
        let scores = HighScoreStore::open(dir.path().join("scores.json")).unwrap();
        App::new(config, 7, scores)
    }

    #[test]
    fn enter_starts_from_menu() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_in(&tmp, RunConfig::default());
        assert_eq!(app.run().phase(), GamePhase::Menu);
        assert!(app.lines()[1].text.contains("F R U I T"));

        app.handle_key(Key::Enter);
        assert_eq!(app.run().phase(), GamePhase::Playing);
        app.handle_key(Key::Space);
        assert!(app.run().player().airborne);
    }

    #[test]
    fn one_second_is_sixty_ticks() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_in(&tmp, RunConfig::default());
        app.handle_key(Key::Enter);
        for _ in 0..10 {
            app.update(Duration::from_millis(100)).unwrap();
        }
        assert!((59..=60).contains(&app.run().tick()));
    }

    #[test]
    fn long_stall_is_capped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_in(&tmp, RunConfig::default());
        app.update(Duration::from_secs(5)).unwrap();
        assert!(app.run().tick() <= 15);
    }

    #[test]
    fn game_over_saves_best() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = RunConfig::default();
        config.collision.half_width = 100.0;
        let mut app = app_in(&tmp, config);
        app.handle_key(Key::Enter);
        for _ in 0..600 {
            app.update(Duration::from_millis(100)).unwrap();
            if app.run().phase() == GamePhase::GameOver {
                break;
            }
        }
        assert_eq!(app.run().phase(), GamePhase::GameOver);
        assert!(app.run().score() > 0);
        assert_eq!(app.best(), app.run().score());
        assert!(app.lines()[1].text.contains("New best"));

        let reopened = HighScoreStore::open(tmp.path().join("scores.json")).unwrap();
        assert_eq!(reopened.best(), app.run().score());

        app.handle_key(Key::Enter);
        assert_eq!(app.run().phase(), GamePhase::Playing);
        assert_eq!(app.run().attempts(), 2);
    }

    #[test]
    fn flap_after_crash_keeps_game_over_screen() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = RunConfig::default();
        config.collision.half_width = 100.0;
        let mut app = app_in(&tmp, config);
        app.handle_key(Key::Enter);
        for _ in 0..600 {
            if app.run().phase() != GamePhase::Playing {
                break;
            }
            app.update(Duration::from_millis(100)).unwrap();
        }
        assert_eq!(app.run().phase(), GamePhase::GameOver);
        let score = app.run().score();

        app.handle_key(Key::Space);
        app.handle_key(Key::ArrowUp);
        app.pointer_down(Vec2::new(3.0, 3.0));
        app.pointer_up(Vec2::new(3.0, 3.0));
        assert_eq!(app.run().phase(), GamePhase::GameOver);
        assert_eq!(app.run().attempts(), 1);
        assert_eq!(app.run().score(), score);
        assert!(app.lines()[0].text.starts_with("GAME OVER"));
    }

    #[test]
    fn space_does_not_leave_menu() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_in(&tmp, RunConfig::default());
        app.handle_key(Key::Space);
        assert_eq!(app.run().phase(), GamePhase::Menu);
    }

    #[test]
    fn drag_across_cells_does_not_flap() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_in(&tmp, RunConfig::default());
        app.handle_key(Key::Enter);
        app.update(TICK).unwrap();
        app.lines();

        app.pointer_down(Vec2::new(5.0, 5.0));
        for x in 6..=30 {
            app.pointer_move(Vec2::new(x as f32, 5.0));
        }
        app.pointer_up(Vec2::new(30.0, 5.0));
        assert!(!app.run().player().airborne);
        assert!(app.run().player().velocity <= 0.0);

        app.pointer_down(Vec2::new(5.0, 5.0));
        app.pointer_up(Vec2::new(5.0, 5.0));
        assert!(app.run().player().airborne);
    }

    #[test]
    fn playing_screen_has_hud_and_corridor() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_in(&tmp, RunConfig::default());
        app.resize(80, 24);
        app.handle_key(Key::Enter);
        app.update(TICK).unwrap();
        let lines = app.lines();
        assert!(lines[0].text.starts_with("SCORE"));
        assert_eq!(lines.len(), 2 + 20 + 1);
        assert!(lines[2..22].iter().any(|l| l.text.contains('>')));
    }
}
