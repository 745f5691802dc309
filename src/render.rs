//! Rendering sink
//!
//! The host owns the actual drawing technology. This module walks the scene
//! and hands it primitives: committed circles and segments first, then the
//! previews of gestures still in progress.

use glam::Vec2;

use crate::sim::{GestureState, Sandbox};
use crate::{Rect, Rgba};

/// Receives drawable primitives
pub trait RenderSink {
    /// Disc (or circle sprite) filling `rect`
    fn circle(&mut self, rect: Rect, color: Rgba);
    /// Open polyline of two or three points
    fn polyline(&mut self, points: &[Vec2], color: Rgba);
}

/// Emit the whole scene, back to front
pub fn draw_scene(sandbox: &Sandbox, sink: &mut impl RenderSink) {
    let registry = sandbox.registry();
    for (_, circle) in registry.circles() {
        sink.circle(circle.rect, circle.color);
    }
    for (_, line) in registry.segments() {
        sink.polyline(&line.points, line.color);
    }

    let settings = sandbox.settings();
    for (_, gesture) in sandbox.controller().gestures() {
        match gesture {
            GestureState::SizingCircle { center, radius, color } => {
                sink.circle(Rect::around(*center, *radius), *color);
            }
            GestureState::DrawingSegment { start, end } => {
                if let Some(end) = end {
                    sink.polyline(&[*start, *end], settings.segment_color);
                }
            }
            GestureState::Aiming { arrow, .. } => {
                sink.polyline(&arrow.body(), settings.arrow_color);
                sink.polyline(&arrow.tip(), settings.arrow_color);
            }
        }
    }
}
