//! Randomised construction of every particle kind.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::particle::{ConfettiShape, Particle, ParticleKind};
use crate::surface::Viewport;

/// Chance that a confetti piece is a star rather than a rectangle.
pub const CONFETTI_STAR_CHANCE: f64 = 0.2;
pub const FALLING_GRAVITY: f32 = 0.01;
/// Horizontal inset kept clear when placing falling particles.
pub const FALLING_INSET: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallingKind {
    Tree,
    Star,
}

/// Uniform value in `[a, b)`, or `a` when the range is empty.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    if b <= a {
        return a;
    }
    rng.gen_range(a..b)
}

/// `count` confetti pieces launched upwards from `origin`.
pub fn burst<R: Rng + ?Sized>(rng: &mut R, origin: Vec2, count: usize) -> Vec<Particle> {
    (0..count).map(|_| confetti(rng, origin)).collect()
}

fn confetti<R: Rng + ?Sized>(rng: &mut R, origin: Vec2) -> Particle {
    let vel = Vec2::new(random_range(rng, -8.0, 8.0), random_range(rng, -14.0, -5.0));
    let gravity = random_range(rng, 0.14, 0.26);
    let size = random_range(rng, 3.0, 8.0);
    let rotation = random_range(rng, 0.0, TAU);
    let spin = random_range(rng, -0.3, 0.3);
    let life = rng.gen_range(180..=320);
    let hue = random_range(rng, 0.0, 360.0);
    let shape = if rng.gen_bool(CONFETTI_STAR_CHANCE) {
        ConfettiShape::Star
    } else {
        ConfettiShape::Rectangle
    };
    Particle::new(
        ParticleKind::Confetti { shape },
        origin,
        vel,
        gravity,
        size,
        rotation,
        spin,
        life,
        hue,
    )
}

/// A tree or star entering just above the top edge of `viewport`.
pub fn falling<R: Rng + ?Sized>(rng: &mut R, kind: FallingKind, viewport: Viewport) -> Particle {
    let x = if viewport.width > 2.0 * FALLING_INSET {
        random_range(rng, FALLING_INSET, viewport.width - FALLING_INSET)
    } else {
        viewport.width / 2.0
    };
    let y = random_range(rng, -40.0, -10.0);
    let vx = random_range(rng, -0.8, 0.8);
    let (particle_kind, vy, size, life, hue) = match kind {
        FallingKind::Tree => (
            ParticleKind::FallingTree,
            random_range(rng, 0.8, 1.7),
            random_range(rng, 12.0, 20.0),
            rng.gen_range(450..=700),
            random_range(rng, 110.0, 150.0),
        ),
        FallingKind::Star => (
            ParticleKind::FallingStar,
            random_range(rng, 1.2, 2.4),
            random_range(rng, 10.0, 18.0),
            rng.gen_range(320..=540),
            random_range(rng, 40.0, 70.0),
        ),
    };
    let rotation = random_range(rng, 0.0, TAU);
    let spin = random_range(rng, -0.05, 0.05);
    Particle::new(
        particle_kind,
        Vec2::new(x, y),
        Vec2::new(vx, vy),
        FALLING_GRAVITY,
        size,
        rotation,
        spin,
        life,
        hue,
    )
}
