//! Pointer gesture handling
//!
//! Each pointer runs its own press/drag/release gesture. The tool active at
//! press time decides what the gesture does, and switching tools while a
//! gesture is open does not affect it.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arrow::ArrowIndicator;
use super::palette::Palette;
use super::registry::SceneRegistry;
use super::world::{BodyHandle, CircleDesc, PhysicsWorld, SegmentHandle};
use crate::settings::Settings;
use crate::{Rect, Rgba};

/// Identity of a mouse button or touch contact
pub type PointerId = u64;

/// Active sandbox tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    /// Press and drag to size a falling circle
    #[default]
    Circle,
    /// Press and drag to draw a static line segment
    Polygon,
    /// Tap to delete the object under the pointer
    Remove,
    /// Grab a circle and drag back to fling it
    Impulse,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Circle => "circle",
            Tool::Polygon => "polygon",
            Tool::Remove => "remove",
            Tool::Impulse => "impulse",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "circle" => Some(Tool::Circle),
            "polygon" | "segment" | "line" => Some(Tool::Polygon),
            "remove" | "delete" => Some(Tool::Remove),
            "impulse" => Some(Tool::Impulse),
            _ => None,
        }
    }
}

/// In-progress data for one pointer
#[derive(Debug, Clone, PartialEq)]
pub enum GestureState {
    /// Circle preview; radius never drops below the minimum
    SizingCircle { center: Vec2, radius: f32, color: Rgba },
    /// Segment preview; `end` is replaced on every move
    DrawingSegment { start: Vec2, end: Option<Vec2> },
    /// Impulse aim at a grabbed body
    Aiming { body: BodyHandle, arrow: ArrowIndicator },
}

/// What the remove tool deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removed {
    Circle(BodyHandle),
    Segment(SegmentHandle),
}

/// Result of feeding one pointer event to the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Event had no effect (outside canvas, unknown pointer, nothing hit)
    Ignored,
    /// A gesture began
    Started,
    /// An open gesture's preview changed
    Updated,
    CircleSpawned(BodyHandle),
    SegmentSpawned(SegmentHandle),
    Removed(Removed),
    ImpulseApplied { body: BodyHandle, impulse: Vec2 },
    /// Gesture ended without changing the scene
    Discarded,
}

/// Tool tuning taken from [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolParams {
    pub circle_min_radius: f32,
    pub circle_mass: f32,
    pub circle_moment: f32,
    pub circle_elasticity: f32,
    pub segment_elasticity: f32,
    pub segment_color: Rgba,
    pub remove_threshold: f32,
    pub impulse_scale: f32,
    pub arrow_tip_size: f32,
    pub arrow_tip_angle: f32,
}

impl ToolParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            circle_min_radius: settings.circle_min_radius,
            circle_mass: settings.circle_mass,
            circle_moment: settings.circle_moment,
            circle_elasticity: settings.circle_elasticity,
            segment_elasticity: settings.segment_elasticity,
            segment_color: settings.segment_color,
            remove_threshold: settings.remove_threshold,
            impulse_scale: settings.impulse_scale,
            arrow_tip_size: settings.arrow_tip_size,
            arrow_tip_angle: settings.arrow_tip_angle,
        }
    }
}

/// Turns pointer events into scene mutations
#[derive(Debug)]
pub struct InteractionController {
    tool: Tool,
    canvas: Rect,
    params: ToolParams,
    palette: Palette,
    gestures: BTreeMap<PointerId, GestureState>,
}

impl InteractionController {
    pub fn new(settings: &Settings, canvas: Rect) -> Self {
        Self {
            tool: Tool::default(),
            canvas,
            params: ToolParams::from_settings(settings),
            palette: Palette::new(settings.circle_palette),
            gestures: BTreeMap::new(),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Applies to gestures started after this call
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: Rect) {
        self.canvas = canvas;
    }

    pub fn params(&self) -> &ToolParams {
        &self.params
    }

    /// Open gestures by pointer id
    pub fn gestures(&self) -> impl Iterator<Item = (PointerId, &GestureState)> {
        self.gestures.iter().map(|(id, g)| (*id, g))
    }

    pub fn gesture(&self, pointer: PointerId) -> Option<&GestureState> {
        self.gestures.get(&pointer)
    }

    pub fn active_gestures(&self) -> usize {
        self.gestures.len()
    }

    pub fn pointer_down(
        &mut self,
        world: &mut PhysicsWorld,
        registry: &mut SceneRegistry,
        pointer: PointerId,
        pos: Vec2,
    ) -> GestureOutcome {
        if !self.canvas.contains(pos) {
            log::trace!("Pointer {pointer} down outside canvas at {pos:?}");
            return GestureOutcome::Ignored;
        }
        if self.gestures.remove(&pointer).is_some() {
            log::warn!("Pointer {pointer} pressed again before release, dropping open gesture");
        }

        let state = match self.tool {
            Tool::Circle => GestureState::SizingCircle {
                center: pos,
                radius: self.params.circle_min_radius,
                color: self.palette.next_color(),
            },
            Tool::Polygon => GestureState::DrawingSegment {
                start: pos,
                end: None,
            },
            Tool::Remove => {
                return match self.remove_at(world, registry, pos) {
                    Some(removed) => GestureOutcome::Removed(removed),
                    None => GestureOutcome::Ignored,
                };
            }
            Tool::Impulse => {
                let Some(body) = registry.circle_at(world, pos) else {
                    return GestureOutcome::Ignored;
                };
                world.reset_forces(body);
                GestureState::Aiming {
                    body,
                    arrow: ArrowIndicator::with_tip(
                        pos,
                        self.params.arrow_tip_size,
                        self.params.arrow_tip_angle,
                    ),
                }
            }
        };

        self.gestures.insert(pointer, state);
        GestureOutcome::Started
    }

    pub fn pointer_move(&mut self, pointer: PointerId, pos: Vec2) -> GestureOutcome {
        let Some(state) = self.gestures.get_mut(&pointer) else {
            return GestureOutcome::Ignored;
        };

        match state {
            GestureState::SizingCircle { center, radius, .. } => {
                *radius = center.distance(pos).max(self.params.circle_min_radius);
            }
            GestureState::DrawingSegment { end, .. } => {
                *end = Some(pos);
            }
            GestureState::Aiming { arrow, .. } => {
                arrow.set_tail(pos);
            }
        }
        GestureOutcome::Updated
    }

    /// Finish a gesture with whatever the last move left in its state
    ///
    /// The release position itself is not applied.
    pub fn pointer_up(
        &mut self,
        world: &mut PhysicsWorld,
        registry: &mut SceneRegistry,
        pointer: PointerId,
        pos: Vec2,
    ) -> GestureOutcome {
        let Some(state) = self.gestures.remove(&pointer) else {
            return GestureOutcome::Ignored;
        };
        log::trace!("Pointer {pointer} up at {pos:?}");

        match state {
            GestureState::SizingCircle { center, radius, color } => {
                let body = world.add_dynamic_body(&CircleDesc {
                    position: center,
                    radius,
                    mass: self.params.circle_mass,
                    moment: self.params.circle_moment,
                    elasticity: self.params.circle_elasticity,
                });
                registry.register_circle(world, body, radius, color);
                log::debug!("Circle r={radius} spawned at {center:?}");
                GestureOutcome::CircleSpawned(body)
            }
            GestureState::DrawingSegment { start, end } => match end {
                Some(end) if end != start => {
                    let segment =
                        world.add_static_segment(start, end, self.params.segment_elasticity);
                    registry.register_segment(world, segment, self.params.segment_color);
                    log::debug!("Segment {start:?} -> {end:?} placed");
                    GestureOutcome::SegmentSpawned(segment)
                }
                _ => GestureOutcome::Discarded,
            },
            GestureState::Aiming { body, arrow } => {
                // Another pointer may have removed the body mid-drag
                if !world.contains_body(body) {
                    return GestureOutcome::Discarded;
                }
                let impulse = arrow.impulse(self.params.impulse_scale);
                world.apply_impulse(body, impulse, Vec2::ZERO);
                log::debug!("Impulse {impulse:?} applied to {body:?}");
                GestureOutcome::ImpulseApplied { body, impulse }
            }
        }
    }

    /// Delete the circle under `pos`, or failing that one nearby segment
    pub fn remove_at(
        &mut self,
        world: &mut PhysicsWorld,
        registry: &mut SceneRegistry,
        pos: Vec2,
    ) -> Option<Removed> {
        if let Some(body) = registry.circle_at(world, pos) {
            registry.remove_circle(world, body);
            self.drop_aims_at(body);
            return Some(Removed::Circle(body));
        }

        let segment = registry.segment_near(pos, self.params.remove_threshold)?;
        registry.remove_segment(world, segment);
        Some(Removed::Segment(segment))
    }

    /// Close impulse gestures; their bodies are about to disappear
    pub fn cancel_aims(&mut self) {
        self.gestures
            .retain(|_, g| !matches!(g, GestureState::Aiming { .. }));
    }

    fn drop_aims_at(&mut self, body: BodyHandle) {
        self.gestures
            .retain(|_, g| !matches!(g, GestureState::Aiming { body: b, .. } if *b == body));
    }
}
