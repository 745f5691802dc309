//! Sandbox settings
//!
//! Every tunable number of the world, tools and visuals lives here. Settings
//! are plain JSON so a host can ship or edit them without recompiling.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rgba;
use crate::consts::*;

/// How newly spawned circles are colored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CirclePalette {
    /// Every circle gets the same color
    Solid { color: Rgba },
    /// Hue advances by `step` (fraction of the color wheel) per circle
    HueCycle { step: f32 },
    /// Random hue from a seeded generator (reproducible per seed)
    Random { seed: u64 },
}

impl Default for CirclePalette {
    fn default() -> Self {
        CirclePalette::Solid {
            color: [1.0, 0.0, 0.0, 1.0],
        }
    }
}

impl CirclePalette {
    pub fn as_str(&self) -> &'static str {
        match self {
            CirclePalette::Solid { .. } => "solid",
            CirclePalette::HueCycle { .. } => "hue_cycle",
            CirclePalette::Random { .. } => "random",
        }
    }
}

/// Sandbox settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// Gravity acceleration (canvas units/s², y up)
    pub gravity: Vec2,
    /// Constraint solver iterations per step
    pub solver_iterations: usize,
    /// Seconds a body must stay idle before it falls asleep
    pub sleep_threshold: f32,
    /// Allowed penetration between shapes
    pub collision_slop: f32,

    // === Timing ===
    /// Simulation ticks per second
    pub tick_hz: f32,
    /// Cap on ticks run by one `Sandbox::advance` call
    pub max_substeps: u32,

    // === Boundary walls ===
    pub wall_thickness: f32,
    pub wall_elasticity: f32,
    pub wall_friction: f32,

    // === Circles ===
    pub circle_min_radius: f32,
    pub circle_mass: f32,
    pub circle_moment: f32,
    pub circle_elasticity: f32,
    pub circle_palette: CirclePalette,

    // === Segments ===
    pub segment_elasticity: f32,
    pub segment_color: Rgba,
    /// Pick distance for the remove tool
    pub remove_threshold: f32,

    // === Impulse tool ===
    pub impulse_scale: f32,
    pub arrow_tip_size: f32,
    /// Half-angle between arrow tip strokes (radians)
    pub arrow_tip_angle: f32,
    pub arrow_color: Rgba,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: Vec2::from_array(GRAVITY),
            solver_iterations: SOLVER_ITERATIONS,
            sleep_threshold: SLEEP_THRESHOLD,
            collision_slop: COLLISION_SLOP,

            tick_hz: TICK_HZ,
            max_substeps: MAX_SUBSTEPS,

            wall_thickness: WALL_THICKNESS,
            wall_elasticity: WALL_ELASTICITY,
            wall_friction: WALL_FRICTION,

            circle_min_radius: CIRCLE_MIN_RADIUS,
            circle_mass: CIRCLE_MASS,
            circle_moment: CIRCLE_MOMENT,
            circle_elasticity: CIRCLE_ELASTICITY,
            circle_palette: CirclePalette::default(),

            segment_elasticity: SEGMENT_ELASTICITY,
            segment_color: [1.0, 1.0, 1.0, 1.0],
            remove_threshold: REMOVE_THRESHOLD,

            impulse_scale: IMPULSE_SCALE,
            arrow_tip_size: ARROW_TIP_SIZE,
            arrow_tip_angle: ARROW_TIP_ANGLE,
            arrow_color: [0.78, 0.78, 0.78, 1.0],
        }
    }
}

impl Settings {
    /// Fixed timestep derived from the tick rate
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_hz
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Malformed settings in {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Cannot read settings {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let s = Settings::default();
        assert_eq!(s.gravity, Vec2::new(0.0, -500.0));
        assert_eq!(s.solver_iterations, 50);
        assert_eq!(s.wall_thickness, 10.0);
        assert_eq!(s.circle_min_radius, 20.0);
        assert_eq!(s.impulse_scale, 1000.0);
        assert!((s.tick_dt() - 1.0 / 30.0).abs() < 1e-7);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{ "tick_hz": 60.0, "gravity": [0.0, -100.0] }"#).unwrap();
        assert_eq!(s.tick_hz, 60.0);
        assert_eq!(s.gravity, Vec2::new(0.0, -100.0));
        assert_eq!(s.remove_threshold, 5.0);
        assert_eq!(s.circle_palette, CirclePalette::default());
    }

    #[test]
    fn test_palette_json() {
        let s = Settings::from_json(r#"{ "circle_palette": { "mode": "random", "seed": 7 } }"#)
            .unwrap();
        assert_eq!(s.circle_palette, CirclePalette::Random { seed: 7 });
        assert_eq!(s.circle_palette.as_str(), "random");
    }

    #[test]
    fn test_json_roundtrip() {
        let mut s = Settings::default();
        s.circle_palette = CirclePalette::HueCycle { step: 0.01 };
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let s = Settings::load("/nonexistent/vertielab-settings.json");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("vertielab-settings-{}.json", std::process::id()));
        let mut s = Settings::default();
        s.max_substeps = 2;
        s.save(&path).unwrap();
        let loaded = Settings::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.max_substeps, 2);
    }
}
