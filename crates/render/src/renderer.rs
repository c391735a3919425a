use fruitrun_common::Camera;
use fruitrun_kernel::Run;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads run state and a camera, then produces output. It never
/// mutates the run.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given run state and camera.
    fn render(&self, run: &Run, camera: &Camera) -> Self::Output;
}

/// Human-readable dump of the run, for CLI output, logging and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, run: &Run, camera: &Camera) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Run ({}, tick={}, seed={}) ===\n",
            run.phase(),
            run.tick(),
            run.seed()
        ));
        out.push_str(&format!(
            "Score: {}  distance={:.2} speed={:.3}\n",
            run.score(),
            run.distance(),
            run.speed()
        ));
        let p = run.player();
        out.push_str(&format!(
            "Player: y={:.2} vy={:.3}{}\n",
            p.y,
            p.velocity,
            if p.airborne { " airborne" } else { "" }
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            camera.eye.x,
            camera.eye.y,
            camera.eye.z,
            camera.fov.to_degrees()
        ));

        out.push_str(&format!("Obstacles: {}\n", run.obstacles().len()));
        for o in run.obstacles() {
            out.push_str(&format!(
                "  {} {:<6} pos=({:.2}, {:.2}, {:.2})\n",
                o.id,
                o.kind.name(),
                o.position.x,
                o.position.y,
                o.position.z
            ));
        }

        out.push_str(&format!("Fruits: {}\n", run.fruits().len()));
        for f in run.fruits() {
            let screen = camera
                .project(f.position)
                .map(|ndc| format!(" ndc=({:.2}, {:.2})", ndc.x, ndc.y))
                .unwrap_or_default();
            out.push_str(&format!(
                "  {} {:<10} pos=({:.2}, {:.2}, {:.2}){}{}\n",
                f.id,
                f.kind.name(),
                f.position.x,
                f.position.y,
                f.position.z,
                screen,
                if f.sliced { " sliced" } else { "" }
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_renderer_menu() {
        let run = Run::with_seed(1);
        let output = DebugTextRenderer::new().render(&run, &Camera::default());
        assert!(output.contains("menu"));
        assert!(output.contains("tick=0"));
        assert!(output.contains("Obstacles: 0"));
        assert!(output.contains("fov=75"));
    }

    #[test]
    fn debug_renderer_lists_entities() {
        let mut run = Run::with_seed(2);
        run.start();
        run.step();
        let output = DebugTextRenderer::new().render(&run, &Camera::default());
        assert!(output.contains("playing"));
        assert!(output.contains("Obstacles: 1"));
        assert!(output.contains("Fruits: 1"));
        assert!(output.contains("#0"));
        assert!(output.contains("ndc=("));
    }

    #[test]
    fn sliced_fruit_marked() {
        let mut run = Run::with_seed(3);
        run.start();
        run.step();
        let id = run.fruits()[0].id;
        run.slice(id);
        let output = DebugTextRenderer::new().render(&run, &Camera::default());
        assert!(output.contains(" sliced"));
    }
}
