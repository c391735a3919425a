use fruitrun_common::{Camera, EntityId, FruitKind, ObstacleKind};
use fruitrun_kernel::Run;
use glam::Vec2;

use crate::renderer::Renderer;

/// Side view of the corridor: z runs left (behind the player) to right (the
/// horizon), altitude runs bottom to top.
///
/// Obstacles are drawn over the altitude band they block; `#` marks shapes
/// in the player's lane and `:` shapes that will pass beside the player.
#[derive(Debug, Clone, Copy)]
pub struct CorridorRenderer {
    pub width: usize,
    pub height: usize,
    /// z shown at the left edge.
    pub near_z: f32,
    /// z shown at the right edge.
    pub far_z: f32,
    /// Altitude shown at the top row.
    pub ceiling_y: f32,
}

impl Default for CorridorRenderer {
    fn default() -> Self {
        Self {
            width: 72,
            height: 14,
            near_z: 12.0,
            far_z: -50.0,
            ceiling_y: 6.0,
        }
    }
}

/// One rendered frame plus where each fruit landed, for pointer lookups.
#[derive(Debug, Clone)]
pub struct CorridorFrame {
    pub rows: Vec<String>,
    fruit_cells: Vec<(EntityId, usize, usize)>,
}

impl CorridorFrame {
    pub fn width(&self) -> usize {
        self.rows.first().map(|r| r.chars().count()).unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell (col, row) under a pointer given in normalized device coordinates
    /// of the frame.
    pub fn cell_at_ndc(&self, ndc: Vec2) -> (usize, usize) {
        let w = self.width().saturating_sub(1) as f32;
        let h = self.height().saturating_sub(1) as f32;
        let col = ((ndc.x + 1.0) * 0.5 * w).round().clamp(0.0, w);
        let row = ((1.0 - ndc.y) * 0.5 * h).round().clamp(0.0, h);
        (col as usize, row as usize)
    }

    /// Fruits drawn within `reach` cells (Chebyshev) of the pointer.
    pub fn fruits_at(&self, ndc: Vec2, reach: usize) -> Vec<EntityId> {
        let (col, row) = self.cell_at_ndc(ndc);
        self.fruit_cells
            .iter()
            .filter(|(_, c, r)| c.abs_diff(col) <= reach && r.abs_diff(row) <= reach)
            .map(|(id, _, _)| *id)
            .collect()
    }
}

impl CorridorRenderer {
    fn col(&self, z: f32) -> Option<usize> {
        if z > self.near_z || z < self.far_z {
            return None;
        }
        let t = (self.near_z - z) / (self.near_z - self.far_z);
        Some((t * (self.width - 1) as f32).round() as usize)
    }

    fn row(&self, y: f32) -> usize {
        let t = (self.ceiling_y - y.clamp(0.0, self.ceiling_y)) / self.ceiling_y;
        (t * (self.height - 1) as f32).round() as usize
    }
}

fn fruit_glyph(kind: FruitKind) -> char {
    match kind {
        FruitKind::Apple => 'a',
        FruitKind::Orange => 'o',
        FruitKind::Watermelon => 'w',
        FruitKind::Banana => 'b',
    }
}

impl Renderer for CorridorRenderer {
    type Output = CorridorFrame;

    fn render(&self, run: &Run, _camera: &Camera) -> CorridorFrame {
        let mut grid = vec![vec![' '; self.width]; self.height];
        let ground = self.height - 1;
        grid[ground].fill('_');

        let collision = run.config().collision;
        for o in run.obstacles() {
            let Some(col) = self.col(o.position.z) else {
                continue;
            };
            let in_lane = (o.position.x - collision.player_x).abs() < collision.half_width;
            let glyph = if in_lane { '#' } else { ':' };
            let (bottom, top) = match o.kind {
                ObstacleKind::Pillar => (0.0, collision.pillar_top),
                ObstacleKind::Low => (0.0, collision.low_top),
                ObstacleKind::High => (collision.high_bottom, collision.high_top),
                ObstacleKind::Gap => {
                    grid[ground][col] = ' ';
                    continue;
                }
            };
            for row in grid.iter_mut().take(self.row(bottom) + 1).skip(self.row(top)) {
                row[col] = glyph;
            }
        }

        let mut fruit_cells = Vec::new();
        for f in run.fruits() {
            let Some(col) = self.col(f.position.z) else {
                continue;
            };
            let row = self.row(f.position.y);
            grid[row][col] = if f.sliced { '*' } else { fruit_glyph(f.kind) };
            if !f.sliced {
                fruit_cells.push((f.id, col, row));
            }
        }

        if let Some(col) = self.col(collision.player_z) {
            grid[self.row(run.player().y)][col] = '>';
        }

        CorridorFrame {
            rows: grid.into_iter().map(String::from_iter).collect(),
            fruit_cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_run(seed: u64, ticks: usize) -> Run {
        let mut run = Run::with_seed(seed);
        run.start();
        for _ in 0..ticks {
            run.step();
        }
        run
    }

    #[test]
    fn frame_has_requested_size() {
        let renderer = CorridorRenderer::default();
        let frame = renderer.render(&playing_run(1, 5), &Camera::default());
        assert_eq!(frame.height(), 14);
        assert_eq!(frame.width(), 72);
        assert!(frame.rows.iter().all(|r| r.chars().count() == 72));
    }

    #[test]
    fn player_drawn_at_fixed_column() {
        let renderer = CorridorRenderer::default();
        let run = playing_run(2, 1);
        let frame = renderer.render(&run, &Camera::default());
        let col = renderer.col(6.0).unwrap();
        let row = renderer.row(run.player().y);
        assert_eq!(frame.rows[row].chars().nth(col), Some('>'));
    }

    #[test]
    fn spawned_entities_drawn() {
        let renderer = CorridorRenderer::default();
        let run = playing_run(3, 1);
        let frame = renderer.render(&run, &Camera::default());
        let fruit = run.fruits()[0];
        let col = renderer.col(fruit.position.z).unwrap();
        let row = renderer.row(fruit.position.y);
        assert_eq!(
            frame.rows[row].chars().nth(col),
            Some(fruit_glyph(fruit.kind))
        );

        let o = run.obstacles()[0];
        let col = renderer.col(o.position.z).unwrap();
        let column: String = frame
            .rows
            .iter()
            .map(|r| r.chars().nth(col).unwrap())
            .collect();
        if o.kind == ObstacleKind::Gap {
            assert!(column.ends_with(' '));
        } else {
            assert!(column.contains('#') || column.contains(':'));
        }
    }

    #[test]
    fn far_entities_are_clipped() {
        let renderer = CorridorRenderer::default();
        assert!(renderer.col(-60.0).is_none());
        assert!(renderer.col(13.0).is_none());
        assert_eq!(renderer.col(12.0), Some(0));
        assert_eq!(renderer.col(-50.0), Some(71));
    }

    #[test]
    fn altitude_maps_top_to_bottom() {
        let renderer = CorridorRenderer::default();
        assert_eq!(renderer.row(6.0), 0);
        assert_eq!(renderer.row(0.0), 13);
        assert_eq!(renderer.row(-1.0), 13);
        assert_eq!(renderer.row(9.0), 0);
    }

    #[test]
    fn pointer_finds_drawn_fruit() {
        let renderer = CorridorRenderer::default();
        let run = playing_run(4, 1);
        let frame = renderer.render(&run, &Camera::default());
        let fruit = run.fruits()[0];
        let col = renderer.col(fruit.position.z).unwrap() as f32;
        let row = renderer.row(fruit.position.y) as f32;
        let ndc = Vec2::new(col / 71.0 * 2.0 - 1.0, 1.0 - row / 13.0 * 2.0);
        assert_eq!(frame.cell_at_ndc(ndc), (col as usize, row as usize));
        assert_eq!(frame.fruits_at(ndc, 0), vec![fruit.id]);
        assert!(frame.fruits_at(Vec2::new(-1.0, -1.0), 1).is_empty());
    }
}
