//! Circle color selection

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::Rgba;
use crate::settings::CirclePalette;

/// Hands out one color per spawned circle
#[derive(Debug, Clone)]
pub struct Palette {
    kind: CirclePalette,
    hue: f32,
    rng: Pcg32,
}

impl Palette {
    pub fn new(kind: CirclePalette) -> Self {
        let seed = match kind {
            CirclePalette::Random { seed } => seed,
            _ => 0,
        };
        Self {
            kind,
            hue: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn kind(&self) -> CirclePalette {
        self.kind
    }

    pub fn next_color(&mut self) -> Rgba {
        match self.kind {
            CirclePalette::Solid { color } => color,
            CirclePalette::HueCycle { step } => {
                self.hue = (self.hue + step).rem_euclid(1.0);
                hsv_to_rgba(self.hue, 1.0, 1.0)
            }
            CirclePalette::Random { .. } => hsv_to_rgba(self.rng.random::<f32>(), 1.0, 1.0),
        }
    }
}

/// HSV (all components in [0, 1]) to opaque RGBA
pub fn hsv_to_rgba(h: f32, s: f32, v: f32) -> Rgba {
    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [r, g, b, 1.0]
}
