use rand::Rng;
use serde::{Deserialize, Serialize};

use partyhop_core::viewport::Viewport;

/// Confetti colours, 0xRRGGBB.
pub const PALETTE: [u32; 5] = [0xf472b6, 0xec4899, 0xdb2777, 0xbe185d, 0x9d174d];

/// One decorative confetti particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfettiParticle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: u32,
}

/// Scatter `count` particles across the viewport.
pub fn spawn_confetti(
    rng: &mut impl Rng,
    count: usize,
    viewport: Viewport,
) -> Vec<ConfettiParticle> {
    (0..count)
        .map(|_| ConfettiParticle {
            x: rng.random::<f32>() * viewport.width,
            y: rng.random::<f32>() * viewport.height,
            size: 2.0 + rng.random::<f32>() * 8.0,
            vx: (rng.random::<f32>() - 0.5) * 2.0,
            vy: 0.5 + rng.random::<f32>(),
            color: PALETTE[rng.random_range(0..PALETTE.len())],
        })
        .collect()
}

/// Drift particles and wrap them around the viewport edges.
pub fn update_confetti(particles: &mut [ConfettiParticle], viewport: Viewport, dt: f32) {
    for p in particles.iter_mut() {
        let x = p.x + p.vx * dt;
        let y = p.y + p.vy * dt;

        p.x = if x < 0.0 {
            viewport.width
        } else if x > viewport.width {
            0.0
        } else {
            x
        };
        p.y = if y > viewport.height { 0.0 } else { y };
    }
}

/// Pull particles back inside a (possibly smaller) viewport.
pub fn clamp_confetti(particles: &mut [ConfettiParticle], viewport: Viewport) {
    for p in particles.iter_mut() {
        p.x = p.x.clamp(0.0, viewport.width);
        p.y = p.y.clamp(0.0, viewport.height);
    }
}
