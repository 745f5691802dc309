//! Physics world adapter
//!
//! Wraps the Rapier2D pipeline into a single world object: gravity, solver
//! settings, the four boundary walls around the canvas, dynamic circles and
//! static line segments. Handles returned here are the only way to refer to
//! simulated objects; using a handle after its object was removed is a bug
//! and panics.

use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::Rect;
use crate::settings::Settings;

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn vec2_to_point(v: Vec2) -> nalgebra::Point2<f32> {
    nalgebra::Point2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn point_to_vec2(p: &nalgebra::Point2<f32>) -> Vec2 {
    Vec2::new(p.x, p.y)
}

/// Handle to a dynamic circle (body plus its disc collider)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

/// Handle to a static line segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentHandle(ColliderHandle);

/// World construction parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldParams {
    pub gravity: Vec2,
    pub iterations: usize,
    pub sleep_threshold: f32,
    pub collision_slop: f32,
    pub wall_thickness: f32,
    pub wall_elasticity: f32,
    pub wall_friction: f32,
}

impl WorldParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            gravity: settings.gravity,
            iterations: settings.solver_iterations,
            sleep_threshold: settings.sleep_threshold,
            collision_slop: settings.collision_slop,
            wall_thickness: settings.wall_thickness,
            wall_elasticity: settings.wall_elasticity,
            wall_friction: settings.wall_friction,
        }
    }
}

impl Default for WorldParams {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Disc body description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleDesc {
    pub position: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// Moment of inertia; very large values make the circle a non-rotating puck
    pub moment: f32,
    pub elasticity: f32,
}

/// The simulation space
pub struct PhysicsWorld {
    params: WorldParams,
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Bottom, right, top, left walls (always exactly four)
    walls: [ColliderHandle; 4],
    segment_count: usize,
}

impl PhysicsWorld {
    /// Create the world with four zero-length walls
    ///
    /// Walls stay degenerate until the first [`PhysicsWorld::update_bounds`].
    pub fn new(params: WorldParams) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(params.iterations).unwrap_or(NonZeroUsize::MIN);
        integration_parameters.normalized_allowed_linear_error =
            params.collision_slop / integration_parameters.length_unit;

        let mut colliders = ColliderSet::new();
        let walls = [(); 4].map(|_| colliders.insert(wall_collider(&params, Vec2::ZERO, Vec2::ZERO)));

        log::info!(
            "Physics world created: gravity={:?}, iterations={}",
            params.gravity,
            params.iterations
        );

        Self {
            params,
            gravity: vec2_to_na(params.gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            walls,
            segment_count: 0,
        }
    }

    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    /// Rebuild the four walls around `rect`
    ///
    /// The rectangle is grown outward by the wall thickness so the walls'
    /// inner faces line up with the canvas edges. All four old walls are
    /// removed before any new one is inserted.
    pub fn update_bounds(&mut self, rect: Rect) {
        let m = self.params.wall_thickness;
        let (x0, y0) = (rect.left() - m, rect.bottom() - m);
        let (x1, y1) = (rect.right() + m, rect.top() + m);

        for handle in self.walls {
            let removed = self.colliders.remove(handle, &mut self.island_manager, &mut self.bodies, true);
            assert!(removed.is_some(), "boundary wall {handle:?} missing from world");
        }

        let corners = [
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
            Vec2::new(x0, y1),
        ];
        for (i, slot) in self.walls.iter_mut().enumerate() {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            *slot = self.colliders.insert(wall_collider(&self.params, a, b));
        }

        log::debug!("Bounds updated: ({x0}, {y0}) - ({x1}, {y1})");
    }

    /// Endpoints of the four walls in loop order: bottom, right, top, left
    pub fn boundary_segments(&self) -> [(Vec2, Vec2); 4] {
        self.walls.map(|h| self.collider_endpoints(h))
    }

    /// Advance the simulation by exactly `dt` seconds
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Insert a dynamic disc and return its handle
    pub fn add_dynamic_body(&mut self, desc: &CircleDesc) -> BodyHandle {
        let mut rb = RigidBodyBuilder::dynamic()
            .translation(vec2_to_na(desc.position))
            .additional_mass_properties(MassProperties::new(
                nalgebra::Point2::origin(),
                desc.mass,
                desc.moment,
            ))
            .build();
        rb.activation_mut().time_until_sleep = self.params.sleep_threshold;
        let body = self.bodies.insert(rb);

        // Mass comes entirely from the body, not from shape density
        let collider = ColliderBuilder::ball(desc.radius)
            .density(0.0)
            .restitution(desc.elasticity)
            .build();
        let collider = self.colliders.insert_with_parent(collider, body, &mut self.bodies);
        // Impulses before the first step need the effective mass in place
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }

        BodyHandle { body, collider }
    }

    /// Insert a zero-thickness static segment
    pub fn add_static_segment(&mut self, a: Vec2, b: Vec2, elasticity: f32) -> SegmentHandle {
        let collider = ColliderBuilder::segment(vec2_to_point(a), vec2_to_point(b))
            .restitution(elasticity)
            .build();
        self.segment_count += 1;
        SegmentHandle(self.colliders.insert(collider))
    }

    /// Remove a disc body and its collider
    pub fn remove_dynamic_body(&mut self, handle: BodyHandle) {
        let removed = self.bodies.remove(
            handle.body,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        assert!(removed.is_some(), "unknown body handle {handle:?}");
    }

    pub fn remove_static_segment(&mut self, handle: SegmentHandle) {
        assert!(!self.walls.contains(&handle.0), "{handle:?} is a boundary wall");
        let removed = self
            .colliders
            .remove(handle.0, &mut self.island_manager, &mut self.bodies, true);
        assert!(removed.is_some(), "unknown segment handle {handle:?}");
        self.segment_count -= 1;
    }

    /// Apply an impulse at an offset from the body's center (body frame)
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec2, local_offset: Vec2) {
        let rb = self.body_mut(handle);
        let point = rb.position() * vec2_to_point(local_offset);
        rb.apply_impulse_at_point(vec2_to_na(impulse), point, true);
    }

    /// Clear accumulated forces and torques
    pub fn reset_forces(&mut self, handle: BodyHandle) {
        let rb = self.body_mut(handle);
        rb.reset_forces(true);
        rb.reset_torques(true);
    }

    pub fn position_of(&self, handle: BodyHandle) -> Vec2 {
        na_to_vec2(self.body(handle).translation())
    }

    pub fn velocity_of(&self, handle: BodyHandle) -> Vec2 {
        na_to_vec2(self.body(handle).linvel())
    }

    pub fn contains_body(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.body)
    }

    pub fn contains_segment(&self, handle: SegmentHandle) -> bool {
        self.colliders.contains(handle.0) && !self.walls.contains(&handle.0)
    }

    /// Endpoints of a placed static segment
    pub fn segment_endpoints(&self, handle: SegmentHandle) -> (Vec2, Vec2) {
        assert!(self.contains_segment(handle), "unknown segment handle {handle:?}");
        self.collider_endpoints(handle.0)
    }

    /// Number of dynamic bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of placed static segments (walls excluded)
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Handles of every placed static segment (walls excluded)
    pub fn segment_handles(&self) -> Vec<SegmentHandle> {
        self.colliders
            .iter()
            .filter(|(h, c)| c.parent().is_none() && !self.walls.contains(h))
            .map(|(h, _)| SegmentHandle(h))
            .collect()
    }

    /// Handles of every dynamic body currently simulated
    pub fn body_handles(&self) -> Vec<BodyHandle> {
        self.bodies
            .iter()
            .filter_map(|(body, rb)| {
                rb.colliders()
                    .first()
                    .map(|&collider| BodyHandle { body, collider })
            })
            .collect()
    }

    fn body(&self, handle: BodyHandle) -> &RigidBody {
        match self.bodies.get(handle.body) {
            Some(rb) => rb,
            None => panic!("unknown body handle {handle:?}"),
        }
    }

    fn body_mut(&mut self, handle: BodyHandle) -> &mut RigidBody {
        match self.bodies.get_mut(handle.body) {
            Some(rb) => rb,
            None => panic!("unknown body handle {handle:?}"),
        }
    }

    fn collider_endpoints(&self, handle: ColliderHandle) -> (Vec2, Vec2) {
        let Some(collider) = self.colliders.get(handle) else {
            panic!("unknown collider {handle:?}");
        };
        let shape = collider.shape();
        let segment = if let Some(capsule) = shape.as_capsule() {
            capsule.segment
        } else if let Some(segment) = shape.as_segment() {
            *segment
        } else {
            panic!("collider {handle:?} is not a segment");
        };
        let iso = collider.position();
        (point_to_vec2(&(iso * segment.a)), point_to_vec2(&(iso * segment.b)))
    }
}

/// Thick wall between `a` and `b` (thickness acts as the capsule radius)
fn wall_collider(params: &WorldParams, a: Vec2, b: Vec2) -> Collider {
    ColliderBuilder::capsule_from_endpoints(vec2_to_point(a), vec2_to_point(b), params.wall_thickness)
        .restitution(params.wall_elasticity)
        .friction(params.wall_friction)
        .build()
}
