//! Sandbox simulation module
//!
//! Physics and interaction live here, with no rendering or platform code:
//! - Fixed timestep only
//! - Stable iteration order (registration order)
//! - One owner per physics object; removal is always explicit

pub mod arrow;
pub mod geometry;
pub mod gesture;
pub mod palette;
pub mod registry;
pub mod sandbox;
pub mod world;

pub use arrow::ArrowIndicator;
pub use geometry::{distance_to_segment, segment_nearest_point};
pub use gesture::{
    GestureOutcome, GestureState, InteractionController, PointerId, Removed, Tool, ToolParams,
};
pub use palette::Palette;
pub use registry::{CircleVisual, LineVisual, SceneRegistry};
pub use sandbox::{Sandbox, SandboxStats};
pub use world::{BodyHandle, CircleDesc, PhysicsWorld, SegmentHandle, WorldParams};
