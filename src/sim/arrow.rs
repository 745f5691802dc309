//! Arrow indicator for the impulse tool
//!
//! The arrow points from the tail (under the pointer) to the anchor (where
//! the drag started), which is the direction the impulse will push. Outline
//! points are recomputed whenever either end moves.

use glam::Vec2;

use crate::consts::{ARROW_TIP_ANGLE, ARROW_TIP_SIZE};

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowIndicator {
    anchor: Vec2,
    tail: Vec2,
    tip_size: f32,
    tip_angle: f32,
    /// Cached tip polyline: left barb end, anchor, right barb end
    tip: [Vec2; 3],
}

impl ArrowIndicator {
    /// Arrow with both ends at `anchor` and default tip dimensions
    pub fn new(anchor: Vec2) -> Self {
        Self::with_tip(anchor, ARROW_TIP_SIZE, ARROW_TIP_ANGLE)
    }

    pub fn with_tip(anchor: Vec2, tip_size: f32, tip_angle: f32) -> Self {
        let mut arrow = Self {
            anchor,
            tail: anchor,
            tip_size,
            tip_angle,
            tip: [anchor; 3],
        };
        arrow.recompute();
        arrow
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn tail(&self) -> Vec2 {
        self.tail
    }

    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.anchor = anchor;
        self.recompute();
    }

    pub fn set_tail(&mut self, tail: Vec2) {
        self.tail = tail;
        self.recompute();
    }

    /// Body line, anchor to tail
    pub fn body(&self) -> [Vec2; 2] {
        [self.anchor, self.tail]
    }

    /// Two barbs meeting at the anchor, as one three-point polyline
    pub fn tip(&self) -> [Vec2; 3] {
        self.tip
    }

    /// Drag vector turned into an impulse: `(anchor - tail) * scale`
    pub fn impulse(&self, scale: f32) -> Vec2 {
        (self.anchor - self.tail) * scale
    }

    fn recompute(&mut self) {
        let dir = self.tail - self.anchor;
        let angle = dir.y.atan2(dir.x);
        let barb = |a: f32| self.anchor + Vec2::from_angle(a) * self.tip_size;
        self.tip = [
            barb(angle - self.tip_angle),
            self.anchor,
            barb(angle + self.tip_angle),
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn assert_near(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_tip_geometry_horizontal() {
        let mut arrow = ArrowIndicator::new(Vec2::ZERO);
        arrow.set_tail(Vec2::new(10.0, 0.0));
        let [left, mid, right] = arrow.tip();

        assert_eq!(mid, Vec2::ZERO);
        let a = PI / 5.0;
        assert_near(left, Vec2::new(15.0 * (-a).cos(), 15.0 * (-a).sin()));
        assert_near(right, Vec2::new(15.0 * a.cos(), 15.0 * a.sin()));
        assert!((left.length() - 15.0).abs() < 1e-4);
        assert!((right.length() - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_tip_follows_anchor() {
        let mut arrow = ArrowIndicator::new(Vec2::ZERO);
        arrow.set_tail(Vec2::new(0.0, -10.0));
        arrow.set_anchor(Vec2::new(5.0, 5.0));
        let [left, mid, right] = arrow.tip();
        assert_eq!(mid, Vec2::new(5.0, 5.0));
        assert!(((left - mid).length() - 15.0).abs() < 1e-4);
        assert!(((right - mid).length() - 15.0).abs() < 1e-4);
        // Barbs trail back toward the tail side
        assert!(left.y < 5.0 && right.y < 5.0);
    }

    #[test]
    fn test_body_line() {
        let mut arrow = ArrowIndicator::new(Vec2::new(1.0, 2.0));
        assert_eq!(arrow.body(), [Vec2::new(1.0, 2.0), Vec2::new(1.0, 2.0)]);
        arrow.set_tail(Vec2::new(4.0, 6.0));
        assert_eq!(arrow.body(), [Vec2::new(1.0, 2.0), Vec2::new(4.0, 6.0)]);
    }

    #[test]
    fn test_impulse_math() {
        let mut arrow = ArrowIndicator::new(Vec2::ZERO);
        arrow.set_tail(Vec2::new(-1.0, 0.0));
        assert_eq!(arrow.impulse(1000.0), Vec2::new(1000.0, 0.0));
    }

    #[test]
    fn test_zero_length_arrow_is_finite() {
        let arrow = ArrowIndicator::new(Vec2::new(3.0, 3.0));
        for p in arrow.tip() {
            assert!(p.is_finite());
        }
        assert_eq!(arrow.impulse(1000.0), Vec2::ZERO);
    }
}
