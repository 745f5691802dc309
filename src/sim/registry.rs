//! Scene registry
//!
//! Pairs every simulated object with the record a renderer needs to draw it.
//! Entries are kept in registration order, which makes hit testing
//! deterministic: when shapes overlap, the oldest one wins.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::distance_to_segment;
use super::world::{BodyHandle, PhysicsWorld, SegmentHandle};
use crate::{Rect, Rgba};

/// Drawing record for a dynamic circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleVisual {
    pub radius: f32,
    pub color: Rgba,
    /// Square of side `2 * radius` centered on the body
    pub rect: Rect,
}

/// Drawing record for a static segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineVisual {
    pub points: [Vec2; 2],
    pub color: Rgba,
}

#[derive(Debug, Default)]
pub struct SceneRegistry {
    circles: Vec<(BodyHandle, CircleVisual)>,
    segments: Vec<(SegmentHandle, LineVisual)>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a visual to a freshly added body
    pub fn register_circle(
        &mut self,
        world: &PhysicsWorld,
        handle: BodyHandle,
        radius: f32,
        color: Rgba,
    ) -> &CircleVisual {
        assert!(self.circle(handle).is_none(), "{handle:?} registered twice");
        let rect = Rect::around(world.position_of(handle), radius);
        self.circles.push((handle, CircleVisual { radius, color, rect }));
        &self.circles[self.circles.len() - 1].1
    }

    /// Attach a line to a freshly added static segment
    pub fn register_segment(
        &mut self,
        world: &PhysicsWorld,
        handle: SegmentHandle,
        color: Rgba,
    ) -> &LineVisual {
        assert!(self.segment(handle).is_none(), "{handle:?} registered twice");
        let (a, b) = world.segment_endpoints(handle);
        self.segments.push((handle, LineVisual { points: [a, b], color }));
        &self.segments[self.segments.len() - 1].1
    }

    /// Drop a circle's visual (the body must already be out of the world)
    pub fn unregister_circle(&mut self, handle: BodyHandle) -> CircleVisual {
        let Some(i) = self.circles.iter().position(|(h, _)| *h == handle) else {
            panic!("unknown body handle {handle:?}");
        };
        self.circles.remove(i).1
    }

    pub fn unregister_segment(&mut self, handle: SegmentHandle) -> LineVisual {
        let Some(i) = self.segments.iter().position(|(h, _)| *h == handle) else {
            panic!("unknown segment handle {handle:?}");
        };
        self.segments.remove(i).1
    }

    /// Remove a circle from the world, then drop its visual
    pub fn remove_circle(&mut self, world: &mut PhysicsWorld, handle: BodyHandle) -> CircleVisual {
        world.remove_dynamic_body(handle);
        self.unregister_circle(handle)
    }

    /// Remove a segment from the world, then drop its line
    pub fn remove_segment(&mut self, world: &mut PhysicsWorld, handle: SegmentHandle) -> LineVisual {
        world.remove_static_segment(handle);
        self.unregister_segment(handle)
    }

    /// Move every circle's rectangle onto its body's current position
    pub fn sync_all(&mut self, world: &PhysicsWorld) {
        for (handle, visual) in &mut self.circles {
            visual.rect = Rect::around(world.position_of(*handle), visual.radius);
        }
    }

    /// Remove every circle and segment from the world and the registry
    pub fn clear_all(&mut self, world: &mut PhysicsWorld) {
        let (circles, segments) = (self.circles.len(), self.segments.len());
        // Bodies leave the world before their visuals are dropped
        for (handle, _) in &self.circles {
            world.remove_dynamic_body(*handle);
        }
        self.circles.clear();
        for (handle, _) in &self.segments {
            world.remove_static_segment(*handle);
        }
        self.segments.clear();
        log::info!("Cleared scene: {circles} circles, {segments} segments");
    }

    /// First circle (in registration order) whose disc contains `p`
    ///
    /// Uses the body's live physics position, not the last synced rectangle.
    pub fn circle_at(&self, world: &PhysicsWorld, p: Vec2) -> Option<BodyHandle> {
        self.circles
            .iter()
            .find(|(handle, visual)| p.distance(world.position_of(*handle)) < visual.radius)
            .map(|(handle, _)| *handle)
    }

    /// First segment (in registration order) closer than `threshold` to `p`
    pub fn segment_near(&self, p: Vec2, threshold: f32) -> Option<SegmentHandle> {
        self.segments
            .iter()
            .find(|(_, line)| distance_to_segment(p, line.points[0], line.points[1]) < threshold)
            .map(|(handle, _)| *handle)
    }

    pub fn circle(&self, handle: BodyHandle) -> Option<&CircleVisual> {
        self.circles.iter().find(|(h, _)| *h == handle).map(|(_, v)| v)
    }

    pub fn segment(&self, handle: SegmentHandle) -> Option<&LineVisual> {
        self.segments.iter().find(|(h, _)| *h == handle).map(|(_, v)| v)
    }

    /// Circles in registration order
    pub fn circles(&self) -> impl Iterator<Item = (BodyHandle, &CircleVisual)> {
        self.circles.iter().map(|(h, v)| (*h, v))
    }

    /// Segments in registration order
    pub fn segments(&self) -> impl Iterator<Item = (SegmentHandle, &LineVisual)> {
        self.segments.iter().map(|(h, v)| (*h, v))
    }

    pub fn circle_count(&self) -> usize {
        self.circles.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::{CircleDesc, WorldParams};
    use proptest::prelude::*;
    use std::collections::HashSet;

    const RED: Rgba = [1.0, 0.0, 0.0, 1.0];
    const WHITE: Rgba = [1.0; 4];

    fn zero_g_world() -> PhysicsWorld {
        PhysicsWorld::new(WorldParams {
            gravity: Vec2::ZERO,
            ..WorldParams::default()
        })
    }

    fn spawn(world: &mut PhysicsWorld, reg: &mut SceneRegistry, x: f32, y: f32, r: f32) -> BodyHandle {
        let handle = world.add_dynamic_body(&CircleDesc {
            position: Vec2::new(x, y),
            radius: r,
            mass: 100.0,
            moment: 1e9,
            elasticity: 0.5,
        });
        reg.register_circle(world, handle, r, RED);
        handle
    }

    #[test]
    fn test_register_circle_rect() {
        let mut world = zero_g_world();
        let mut reg = SceneRegistry::new();
        let h = spawn(&mut world, &mut reg, 50.0, 60.0, 20.0);
        let v = reg.circle(h).unwrap();
        assert_eq!(v.rect, Rect::new(Vec2::new(30.0, 40.0), Vec2::new(40.0, 40.0)));
        assert_eq!(v.color, RED);
    }

    #[test]
    fn test_hit_test() {
        let mut world = zero_g_world();
        let mut reg = SceneRegistry::new();
        let a = spawn(&mut world, &mut reg, 0.0, 0.0, 20.0);
        let _b = spawn(&mut world, &mut reg, 100.0, 0.0, 20.0);

        assert_eq!(reg.circle_at(&world, Vec2::new(10.0, 0.0)), Some(a));
        assert_eq!(reg.circle_at(&world, Vec2::new(500.0, 0.0)), None);
        // Exactly on the rim is outside
        assert_eq!(reg.circle_at(&world, Vec2::new(20.0, 0.0)), None);
    }

    #[test]
    fn test_hit_test_overlap_prefers_oldest() {
        let mut world = zero_g_world();
        let mut reg = SceneRegistry::new();
        let a = spawn(&mut world, &mut reg, 0.0, 0.0, 30.0);
        let _b = spawn(&mut world, &mut reg, 10.0, 0.0, 30.0);
        assert_eq!(reg.circle_at(&world, Vec2::new(5.0, 0.0)), Some(a));
    }

    #[test]
    fn test_sync_follows_body() {
        let mut world = PhysicsWorld::new(WorldParams::default());
        let mut reg = SceneRegistry::new();
        let h = spawn(&mut world, &mut reg, 0.0, 1000.0, 20.0);
        let seg = world.add_static_segment(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.5);
        reg.register_segment(&world, seg, WHITE);

        for _ in 0..5 {
            world.step(1.0 / 30.0);
        }
        reg.sync_all(&world);
        let rect = reg.circle(h).unwrap().rect;
        assert!((rect.center() - world.position_of(h)).length() < 1e-4);
        assert!(rect.center().y < 1000.0);
        assert_eq!(rect.size, Vec2::splat(40.0));
        // Segments never move
        assert_eq!(reg.segment(seg).unwrap().points, [Vec2::ZERO, Vec2::new(10.0, 0.0)]);

        // Idempotent without a step in between
        reg.sync_all(&world);
        assert_eq!(reg.circle(h).unwrap().rect, rect);
    }

    #[test]
    fn test_remove_circle_updates_both() {
        let mut world = zero_g_world();
        let mut reg = SceneRegistry::new();
        let h = spawn(&mut world, &mut reg, 0.0, 0.0, 20.0);
        let visual = reg.remove_circle(&mut world, h);
        assert_eq!(visual.radius, 20.0);
        assert_eq!(reg.circle_count(), 0);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    #[should_panic(expected = "unknown body handle")]
    fn test_unregister_unknown_panics() {
        let mut world = zero_g_world();
        let mut reg = SceneRegistry::new();
        let h = spawn(&mut world, &mut reg, 0.0, 0.0, 20.0);
        reg.unregister_circle(h);
        reg.unregister_circle(h);
    }

    #[test]
    fn test_segment_near_first_only() {
        let mut world = zero_g_world();
        let mut reg = SceneRegistry::new();
        let s1 = world.add_static_segment(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 0.5);
        reg.register_segment(&world, s1, WHITE);
        let s2 = world.add_static_segment(Vec2::new(0.0, 2.0), Vec2::new(100.0, 2.0), 0.5);
        reg.register_segment(&world, s2, WHITE);

        assert_eq!(reg.segment_near(Vec2::new(50.0, 1.0), 5.0), Some(s1));
        assert_eq!(reg.segment_near(Vec2::new(50.0, 20.0), 5.0), None);
        // Past the end: distance is to the endpoint, not the infinite line
        assert_eq!(reg.segment_near(Vec2::new(110.0, 0.0), 5.0), None);
    }

    #[test]
    fn test_clear_all() {
        let mut world = zero_g_world();
        let mut reg = SceneRegistry::new();
        spawn(&mut world, &mut reg, 0.0, 0.0, 20.0);
        spawn(&mut world, &mut reg, 100.0, 0.0, 20.0);
        let seg = world.add_static_segment(Vec2::ZERO, Vec2::new(10.0, 10.0), 0.5);
        reg.register_segment(&world, seg, WHITE);

        reg.clear_all(&mut world);
        assert_eq!(reg.circle_count(), 0);
        assert_eq!(reg.segment_count(), 0);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.segment_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_registry_matches_world(
            ops in prop::collection::vec((0u8..4, 0usize..8), 1..40),
        ) {
            let mut world = zero_g_world();
            let mut reg = SceneRegistry::new();
            let mut bodies: Vec<BodyHandle> = Vec::new();
            let mut lines: Vec<SegmentHandle> = Vec::new();

            for (i, (op, pick)) in ops.into_iter().enumerate() {
                let x = i as f32 * 50.0;
                match op {
                    1 if !bodies.is_empty() => {
                        let h = bodies.remove(pick % bodies.len());
                        reg.remove_circle(&mut world, h);
                    }
                    2 => {
                        let s = world.add_static_segment(
                            Vec2::new(x, 100.0),
                            Vec2::new(x + 40.0, 120.0),
                            0.5,
                        );
                        reg.register_segment(&world, s, WHITE);
                        lines.push(s);
                    }
                    3 if !lines.is_empty() => {
                        let s = lines.remove(pick % lines.len());
                        reg.remove_segment(&mut world, s);
                    }
                    _ => bodies.push(spawn(&mut world, &mut reg, x, 0.0, 20.0)),
                }

                let in_world: HashSet<BodyHandle> = world.body_handles().into_iter().collect();
                let in_reg: HashSet<BodyHandle> = reg.circles().map(|(h, _)| h).collect();
                prop_assert_eq!(in_world, in_reg);

                let in_world: HashSet<SegmentHandle> =
                    world.segment_handles().into_iter().collect();
                let in_reg: HashSet<SegmentHandle> = reg.segments().map(|(h, _)| h).collect();
                prop_assert_eq!(world.segment_count(), in_reg.len());
                prop_assert_eq!(in_world, in_reg);
            }
        }
    }
}
