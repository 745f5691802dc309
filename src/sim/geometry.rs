//! Point/segment geometry helpers

use glam::Vec2;

/// Closest point to `p` on the segment `a`-`b`
///
/// Projects `p` onto the segment's line and clamps the parameter to [0, 1],
/// so points beyond either end snap to that endpoint. A degenerate segment
/// (`a == b`) returns `a`.
pub fn segment_nearest_point(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Euclidean distance from `p` to the segment `a`-`b`
#[inline]
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    p.distance(segment_nearest_point(p, a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_nearest_point_interior() {
        let np = segment_nearest_point(
            Vec2::new(5.0, 3.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
        );
        assert!((np - Vec2::new(5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_nearest_point_clamps_to_ends() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(segment_nearest_point(Vec2::new(-4.0, 2.0), a, b), a);
        assert_eq!(segment_nearest_point(Vec2::new(14.0, -2.0), a, b), b);
    }

    #[test]
    fn test_degenerate_segment() {
        let a = Vec2::new(3.0, 4.0);
        assert_eq!(segment_nearest_point(Vec2::ZERO, a, a), a);
        assert!((distance_to_segment(Vec2::ZERO, a, a) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_distance_uses_both_axes() {
        // Diagonal segment: nearest point differs from p in x and y
        let d = distance_to_segment(
            Vec2::new(0.0, 10.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
        );
        assert!((d - 50.0_f32.sqrt()).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_distance_not_more_than_endpoints(
            px in -500.0f32..500.0, py in -500.0f32..500.0,
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
        ) {
            let p = Vec2::new(px, py);
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            let d = distance_to_segment(p, a, b);
            prop_assert!(d <= p.distance(a) + 1e-2);
            prop_assert!(d <= p.distance(b) + 1e-2);
        }
    }
}
