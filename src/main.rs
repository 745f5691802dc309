//! Vertie Lab headless driver
//!
//! Plays a short scripted session against the sandbox and logs what a
//! renderer would draw. Pass a settings JSON path as the first argument to
//! override the defaults.

#[cfg(not(target_arch = "wasm32"))]
use glam::Vec2;

#[cfg(not(target_arch = "wasm32"))]
use vertielab::render::{RenderSink, draw_scene};
#[cfg(not(target_arch = "wasm32"))]
use vertielab::sim::{GestureOutcome, Sandbox, Tool};
#[cfg(not(target_arch = "wasm32"))]
use vertielab::{Rect, Rgba, Settings};

/// Counts primitives instead of drawing them
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
struct LogSink {
    circles: usize,
    lines: usize,
}

#[cfg(not(target_arch = "wasm32"))]
impl RenderSink for LogSink {
    fn circle(&mut self, rect: Rect, _color: Rgba) {
        log::trace!("circle at {:?} d={}", rect.center(), rect.size.x);
        self.circles += 1;
    }

    fn polyline(&mut self, points: &[Vec2], _color: Rgba) {
        log::trace!("line {:?}", points);
        self.lines += 1;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn gesture(sb: &mut Sandbox, tool: Tool, from: Vec2, to: Vec2) -> GestureOutcome {
    sb.set_tool(tool);
    sb.pointer_down(0, from);
    sb.pointer_move(0, to);
    sb.pointer_up(0, to)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Vertie Lab (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let dt = settings.tick_dt();
    let mut sb = Sandbox::new(settings, Rect::from_edges(0.0, 0.0, 800.0, 600.0));

    // A ramp and three circles dropped onto it
    gesture(&mut sb, Tool::Polygon, Vec2::new(100.0, 300.0), Vec2::new(600.0, 150.0));
    for (i, x) in [150.0, 250.0, 350.0].into_iter().enumerate() {
        let radius = 20.0 + i as f32 * 10.0;
        let out = gesture(&mut sb, Tool::Circle, Vec2::new(x, 500.0), Vec2::new(x + radius, 500.0));
        log::info!("{:?}", out);
    }

    for _ in 0..60 {
        sb.advance(dt);
    }

    // Fling the first circle back up the ramp
    let first = sb.registry().circles().next().map(|(body, _)| body);
    if let Some(body) = first {
        let pos = sb.world().position_of(body);
        let out = gesture(&mut sb, Tool::Impulse, pos, pos + Vec2::new(20.0, -10.0));
        log::info!("{:?}", out);
    }

    for _ in 0..60 {
        sb.advance(dt);
    }

    for (body, visual) in sb.registry().circles() {
        log::info!("{:?} r={} at {:?}", body, visual.radius, visual.rect.center());
    }

    let mut sink = LogSink::default();
    draw_scene(&sb, &mut sink);
    let stats = sb.stats();
    log::info!(
        "{} ticks, {} circles / {} lines drawn",
        stats.ticks,
        sink.circles,
        sink.lines
    );

    sb.teardown();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host page drives the sandbox through the library API
}
