use glam::Vec2;

use crate::action::Action;

/// Pointer travel (pixels) below which a press/release counts as a tap.
pub const TAP_MAX_TRAVEL_PX: f32 = 30.0;

/// Per-move travel (NDC units) above which pointer motion counts as a slice.
pub const SLICE_MIN_TRAVEL_NDC: f32 = 0.02;

/// Tracks one pointer and classifies its motion.
///
/// A press followed by a short release is a tap and flaps. Fast motion while
/// moving slices whatever lies under the pointer, independent of button state.
#[derive(Debug, Clone)]
pub struct PointerGesture {
    viewport: Vec2,
    tap_max_travel: f32,
    press_origin: Option<Vec2>,
    last_ndc: Option<Vec2>,
}

impl PointerGesture {
    /// `width`/`height` are the viewport size in the same units as pointer positions.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Vec2::new(width.max(1.0), height.max(1.0)),
            tap_max_travel: TAP_MAX_TRAVEL_PX,
            press_origin: None,
            last_ndc: None,
        }
    }

    /// Tap threshold in pointer units, for front-ends whose pointer is not
    /// measured in pixels (terminal cells, for instance).
    pub fn with_tap_max_travel(mut self, travel: f32) -> Self {
        self.tap_max_travel = travel;
        self
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
        self.last_ndc = None;
    }

    /// Pixel position (origin top-left, y down) to NDC (origin centre, y up).
    pub fn to_ndc(&self, px: Vec2) -> Vec2 {
        Vec2::new(
            px.x / self.viewport.x * 2.0 - 1.0,
            -(px.y / self.viewport.y) * 2.0 + 1.0,
        )
    }

    pub fn pointer_down(&mut self, px: Vec2) {
        self.press_origin = Some(px);
    }

    /// Release. A short press is a tap and produces a flap.
    pub fn pointer_up(&mut self, px: Vec2) -> Action {
        match self.press_origin.take() {
            Some(origin) if origin.distance(px) < self.tap_max_travel => Action::Jump,
            _ => Action::Noop,
        }
    }

    /// Motion. Fast moves slice at the new pointer position.
    pub fn pointer_move(&mut self, px: Vec2) -> Action {
        let ndc = self.to_ndc(px);
        let action = match self.last_ndc {
            Some(last) if last.distance(ndc) > SLICE_MIN_TRAVEL_NDC => Action::SliceAt(ndc),
            _ => Action::Noop,
        };
        self.last_ndc = Some(ndc);
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners() {
        let g = PointerGesture::new(800.0, 600.0);
        assert_eq!(g.to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(g.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_eq!(g.to_ndc(Vec2::new(400.0, 300.0)), Vec2::ZERO);
    }

    #[test]
    fn short_press_is_a_tap() {
        let mut g = PointerGesture::new(800.0, 600.0);
        g.pointer_down(Vec2::new(100.0, 100.0));
        assert_eq!(g.pointer_up(Vec2::new(110.0, 110.0)), Action::Jump);
    }

    #[test]
    fn long_drag_is_not_a_tap() {
        let mut g = PointerGesture::new(800.0, 600.0);
        g.pointer_down(Vec2::new(100.0, 100.0));
        assert_eq!(g.pointer_up(Vec2::new(100.0, 130.0)), Action::Noop);
    }

    #[test]
    fn tap_threshold_follows_pointer_units() {
        let mut g = PointerGesture::new(71.0, 13.0).with_tap_max_travel(1.5);
        g.pointer_down(Vec2::new(5.0, 5.0));
        assert_eq!(g.pointer_up(Vec2::new(6.0, 5.0)), Action::Jump);

        g.pointer_down(Vec2::new(5.0, 5.0));
        for x in 6..=30 {
            g.pointer_move(Vec2::new(x as f32, 5.0));
        }
        assert_eq!(g.pointer_up(Vec2::new(30.0, 5.0)), Action::Noop);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut g = PointerGesture::new(800.0, 600.0);
        assert_eq!(g.pointer_up(Vec2::new(5.0, 5.0)), Action::Noop);
        g.pointer_down(Vec2::new(5.0, 5.0));
        g.pointer_up(Vec2::new(5.0, 5.0));
        assert_eq!(g.pointer_up(Vec2::new(5.0, 5.0)), Action::Noop);
    }

    #[test]
    fn fast_motion_slices() {
        let mut g = PointerGesture::new(800.0, 600.0);
        assert_eq!(g.pointer_move(Vec2::new(400.0, 300.0)), Action::Noop);
        match g.pointer_move(Vec2::new(440.0, 300.0)) {
            Action::SliceAt(ndc) => assert!((ndc.x - 0.1).abs() < 1e-6),
            other => panic!("expected slice, got {other:?}"),
        }
    }

    #[test]
    fn slow_motion_does_not_slice() {
        let mut g = PointerGesture::new(800.0, 600.0);
        g.pointer_move(Vec2::new(400.0, 300.0));
        assert_eq!(g.pointer_move(Vec2::new(404.0, 300.0)), Action::Noop);
    }

    #[test]
    fn resize_forgets_last_position() {
        let mut g = PointerGesture::new(800.0, 600.0);
        g.pointer_move(Vec2::new(0.0, 0.0));
        g.resize(100.0, 100.0);
        assert_eq!(g.pointer_move(Vec2::new(100.0, 100.0)), Action::Noop);
    }
}
