//! Sandbox facade
//!
//! Owns the physics world, the scene registry and the gesture controller,
//! and is the single entry point a host drives: pointer events, canvas
//! resizes and the fixed-rate timer. Everything runs on the caller's thread;
//! `&mut self` on every mutating call keeps stepping and gesture handling
//! strictly sequential.

use glam::Vec2;

use super::gesture::{GestureOutcome, InteractionController, PointerId, Removed, Tool};
use super::registry::SceneRegistry;
use super::world::{PhysicsWorld, WorldParams};
use crate::Rect;
use crate::settings::Settings;

/// Frame times above this are clamped (tab switch, debugger pause)
const MAX_FRAME_DT: f32 = 0.1;

/// Object counts for HUDs and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SandboxStats {
    pub circles: usize,
    pub segments: usize,
    pub gestures: usize,
    pub ticks: u64,
}

pub struct Sandbox {
    settings: Settings,
    world: PhysicsWorld,
    registry: SceneRegistry,
    controller: InteractionController,
    canvas: Rect,
    accumulator: f32,
    ticks: u64,
}

impl Sandbox {
    /// Build the world and fit its walls to `canvas`
    pub fn new(settings: Settings, canvas: Rect) -> Self {
        let mut world = PhysicsWorld::new(WorldParams::from_settings(&settings));
        world.update_bounds(canvas);
        let controller = InteractionController::new(&settings, canvas);
        log::info!(
            "Sandbox ready: canvas {}x{}, {} Hz, palette {}",
            canvas.size.x,
            canvas.size.y,
            settings.tick_hz,
            settings.circle_palette.as_str()
        );

        Self {
            settings,
            world,
            registry: SceneRegistry::new(),
            controller,
            canvas,
            accumulator: 0.0,
            ticks: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    /// Canvas moved or resized
    pub fn resize(&mut self, canvas: Rect) {
        self.canvas = canvas;
        self.world.update_bounds(canvas);
        self.controller.set_canvas(canvas);
    }

    pub fn tool(&self) -> Tool {
        self.controller.tool()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        log::debug!("Tool: {}", tool.as_str());
        self.controller.set_tool(tool);
    }

    pub fn pointer_down(&mut self, pointer: PointerId, pos: Vec2) -> GestureOutcome {
        self.controller
            .pointer_down(&mut self.world, &mut self.registry, pointer, pos)
    }

    pub fn pointer_move(&mut self, pointer: PointerId, pos: Vec2) -> GestureOutcome {
        self.controller.pointer_move(pointer, pos)
    }

    pub fn pointer_up(&mut self, pointer: PointerId, pos: Vec2) -> GestureOutcome {
        self.controller
            .pointer_up(&mut self.world, &mut self.registry, pointer, pos)
    }

    /// Delete whatever is under `pos`, regardless of the active tool
    pub fn remove_at(&mut self, pos: Vec2) -> Option<Removed> {
        self.controller
            .remove_at(&mut self.world, &mut self.registry, pos)
    }

    /// One fixed step followed by a visual sync
    pub fn tick(&mut self) {
        self.world.step(self.settings.tick_dt());
        self.registry.sync_all(&self.world);
        self.ticks += 1;
        log::trace!("Tick {}", self.ticks);
    }

    /// Run as many fixed ticks as `frame_dt` of wall time covers
    ///
    /// Leftover time carries over to the next call. Returns the number of
    /// ticks run, at most `max_substeps`.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = self.settings.tick_dt();
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= dt && substeps < self.settings.max_substeps {
            self.tick();
            self.accumulator -= dt;
            substeps += 1;
        }
        // Drop the backlog rather than spiral
        if substeps == self.settings.max_substeps && self.accumulator >= dt {
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Remove every circle and segment; walls stay
    pub fn clear_all(&mut self) {
        self.controller.cancel_aims();
        self.registry.clear_all(&mut self.world);
    }

    /// Release every scene object, then the world itself
    pub fn teardown(mut self) {
        self.clear_all();
        log::info!("Sandbox torn down after {} ticks", self.ticks);
    }

    pub fn stats(&self) -> SandboxStats {
        SandboxStats {
            circles: self.registry.circle_count(),
            segments: self.registry.segment_count(),
            gestures: self.controller.active_gestures(),
            ticks: self.ticks,
        }
    }
}
