//! Vertie Lab - an interactive 2D physics sandbox
//!
//! Core modules:
//! - `sim`: Physics world, scene registry and pointer gesture handling
//! - `render`: Rendering sink abstraction (drawing is done by the host)
//! - `settings`: Data-driven sandbox configuration

pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{CirclePalette, Settings};
pub use sim::{Sandbox, Tool};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sandbox configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Fixed simulation rate (30 Hz)
    pub const TICK_HZ: f32 = 30.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// World defaults
    pub const GRAVITY: [f32; 2] = [0.0, -500.0];
    pub const SOLVER_ITERATIONS: usize = 50;
    pub const SLEEP_THRESHOLD: f32 = 0.5;
    pub const COLLISION_SLOP: f32 = 0.5;

    /// Boundary walls (thickness is also the outward margin)
    pub const WALL_THICKNESS: f32 = 10.0;
    pub const WALL_ELASTICITY: f32 = 0.5;
    pub const WALL_FRICTION: f32 = 0.5;

    /// Circles never rotate: the moment is large enough to ignore torque
    pub const CIRCLE_MIN_RADIUS: f32 = 20.0;
    pub const CIRCLE_MASS: f32 = 100.0;
    pub const CIRCLE_MOMENT: f32 = 1e9;
    pub const CIRCLE_ELASTICITY: f32 = 0.5;

    pub const SEGMENT_ELASTICITY: f32 = 0.5;
    /// Max distance from a static segment for the remove tool to pick it
    pub const REMOVE_THRESHOLD: f32 = 5.0;

    /// Impulse = (anchor - tail) * IMPULSE_SCALE
    pub const IMPULSE_SCALE: f32 = 1000.0;
    pub const ARROW_TIP_SIZE: f32 = 15.0;
    pub const ARROW_TIP_ANGLE: f32 = std::f32::consts::PI / 5.0;
}

/// RGBA color, components in [0, 1]
pub type Rgba = [f32; 4];

/// Axis-aligned rectangle in canvas units (y up, `pos` is the bottom-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Build from edges
    pub fn from_edges(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            pos: Vec2::new(left, bottom),
            size: Vec2::new(right - left, top - bottom),
        }
    }

    /// Square of side `2 * radius` centered on `center`
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self {
            pos: center - Vec2::splat(radius),
            size: Vec2::splat(radius * 2.0),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.bottom() && p.y <= self.top()
    }
}
