use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Outline of a confetti piece, picked once when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfettiShape {
    Rectangle,
    Star,
}

/// What a particle is and how it is drawn. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Confetti { shape: ConfettiShape },
    FallingStar,
    FallingTree,
}

impl ParticleKind {
    pub fn is_falling(self) -> bool {
        matches!(self, ParticleKind::FallingStar | ParticleKind::FallingTree)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    pub size: f32,
    pub rotation: f32,
    pub spin: f32,
    /// Remaining frame budget.
    pub life: u32,
    /// Degrees. Trees carry one but are drawn with a fixed palette.
    pub hue: f32,
}

impl Particle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ParticleKind,
        pos: Vec2,
        vel: Vec2,
        gravity: f32,
        size: f32,
        rotation: f32,
        spin: f32,
        life: u32,
        hue: f32,
    ) -> Self {
        Self {
            kind,
            pos,
            vel,
            gravity,
            size,
            rotation,
            spin,
            life,
            hue,
        }
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn is_expired(&self) -> bool {
        self.life == 0
    }

    /// Advances one frame: gravity into velocity, velocity into position, spin into rotation,
    /// and one unit of life spent.
    pub fn integrate(&mut self) {
        self.vel.y += self.gravity;
        self.pos += self.vel;
        self.rotation += self.spin;
        self.life = self.life.saturating_sub(1);
    }

    /// Opacity from remaining life; full until the last `fade_frames` frames.
    pub fn fade_alpha(&self, fade_frames: u32) -> f32 {
        fade_alpha(self.life, fade_frames)
    }
}

pub fn fade_alpha(life: u32, fade_frames: u32) -> f32 {
    if fade_frames == 0 {
        return if life > 0 { 1.0 } else { 0.0 };
    }
    (life as f32 / fade_frames as f32).clamp(0.0, 1.0)
}
