//! The engine context: particle store, loop state, active falling run and RNG.

use std::time::Duration;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Hsl;
use crate::config::EngineConfig;
use crate::factory::{self, FallingKind};
use crate::particle::{ConfettiShape, Particle, ParticleKind};
use crate::scheduler::{FallingRun, Tick};
use crate::shapes;
use crate::store::ParticleStore;
use crate::surface::{Surface, Viewport};

/// Whether the host should keep scheduling animation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    Running,
    Idle,
}

/// What one animation step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub pruned: usize,
    pub rendered: usize,
    pub remaining: usize,
    pub state: LoopState,
}

pub struct Engine {
    pub(crate) config: EngineConfig,
    store: ParticleStore,
    running: bool,
    falling: Option<FallingRun>,
    next_run_id: u64,
    pub(crate) opened: bool,
    rng: ChaCha8Rng,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: EngineConfig, rng: ChaCha8Rng) -> Self {
        Self {
            config,
            store: ParticleStore::new(),
            running: false,
            falling: None,
            next_run_id: 1,
            opened: false,
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.store
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn falling_run(&self) -> Option<&FallingRun> {
        self.falling.as_ref()
    }

    /// True while the host should keep delivering frames.
    pub fn needs_frames(&self) -> bool {
        self.running || self.falling.is_some()
    }

    /// Marks the loop running. Returns `false` when it already was.
    pub fn wake(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        debug!("animation loop running ({} particles)", self.store.len());
        true
    }

    pub fn add_burst(&mut self, origin: Vec2, count: usize) {
        let particles = factory::burst(&mut self.rng, origin, count);
        self.store.extend(particles);
        self.wake();
    }

    pub fn add_falling(&mut self, kind: FallingKind, viewport: Viewport) {
        let particle = factory::falling(&mut self.rng, kind, viewport);
        self.store.push(particle);
        self.wake();
    }

    /// Starts a falling run at `now`, replacing any run still active. Returns the new run id.
    pub fn start_falling(&mut self, now: Duration, duration: Duration) -> u64 {
        let id = self.next_run_id;
        self.next_run_id += 1;
        if let Some(previous) = self.falling.take() {
            debug!("falling run {} cancelled by run {id}", previous.id());
        }
        self.falling = Some(FallingRun::new(id, now, duration, &self.config.spawn));
        debug!("falling run {id} started for {duration:?}");
        id
    }

    /// Fires the falling run's tick if one is due.
    pub fn advance(&mut self, now: Duration, viewport: Viewport) {
        let Some(run) = self.falling.as_mut() else {
            return;
        };
        match run.poll(now) {
            None => {}
            Some(Tick::Finished) => {
                debug!("falling run {} finished", run.id());
                self.falling = None;
            }
            Some(Tick::Spawn(batch)) => {
                for _ in 0..batch.trees {
                    self.add_falling(FallingKind::Tree, viewport);
                }
                for _ in 0..batch.stars {
                    self.add_falling(FallingKind::Star, viewport);
                }
            }
        }
    }

    /// One animation step: clear, prune, integrate, fade and draw every particle.
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) -> StepReport {
        surface.clear();
        let pruned = self.store.prune_expired();
        let fade_frames = self.config.fade_frames;

        let mut rendered = 0;
        for particle in self.store.iter_mut() {
            particle.integrate();
            if particle.is_expired() {
                continue;
            }
            draw_particle(surface, particle, particle.fade_alpha(fade_frames));
            rendered += 1;
        }

        let state = if self.store.is_empty() {
            if self.running {
                debug!("animation loop idle");
            }
            self.running = false;
            LoopState::Idle
        } else {
            self.running = true;
            LoopState::Running
        };
        StepReport {
            pruned,
            rendered,
            remaining: self.store.len(),
            state,
        }
    }

    /// Host entry point for one frame: scheduler first, then a step if the loop is running.
    pub fn frame<S: Surface + ?Sized>(&mut self, now: Duration, surface: &mut S) -> Option<StepReport> {
        self.advance(now, surface.viewport());
        if self.running {
            Some(self.step(surface))
        } else {
            None
        }
    }
}

fn draw_particle<S: Surface + ?Sized>(surface: &mut S, particle: &Particle, alpha: f32) {
    surface.save();
    surface.set_alpha(alpha);
    surface.translate(particle.pos);
    surface.rotate(particle.rotation);
    match particle.kind() {
        ParticleKind::Confetti { shape } => {
            surface.set_fill(Hsl::confetti(particle.hue).to_rgba());
            match shape {
                ConfettiShape::Rectangle => shapes::draw_confetti_rect(surface, particle.size),
                ConfettiShape::Star => shapes::draw_star(surface, particle.size, 0.0),
            }
        }
        ParticleKind::FallingStar => {
            surface.set_fill(Hsl::falling_star(particle.hue).to_rgba());
            shapes::draw_star(surface, particle.size, 0.0);
        }
        ParticleKind::FallingTree => shapes::draw_pixel_tree(surface, particle.size),
    }
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, Recorder};

    fn engine() -> Engine {
        Engine::with_rng(EngineConfig::default(), ChaCha8Rng::seed_from_u64(9))
    }

    fn recorder() -> Recorder {
        Recorder::new(Viewport::new(800.0, 600.0))
    }

    #[test]
    fn burst_grows_store_and_wakes_loop() {
        let mut engine = engine();
        assert!(!engine.is_running());
        engine.add_burst(Vec2::new(100.0, 200.0), 5);
        assert_eq!(engine.particles().len(), 5);
        assert!(engine.is_running());
        for p in engine.particles().iter() {
            assert!(matches!(p.kind(), ParticleKind::Confetti { .. }));
            assert_eq!(p.pos, Vec2::new(100.0, 200.0));
        }
    }

    #[test]
    fn wake_is_idempotent() {
        let mut engine = engine();
        assert!(engine.wake());
        assert!(!engine.wake());
        engine.add_burst(Vec2::ZERO, 1);
        assert!(engine.is_running());
    }

    #[test]
    fn life_decreases_every_step_until_removal() {
        let mut engine = engine();
        let mut surface = recorder();
        engine.add_burst(Vec2::new(400.0, 300.0), 20);
        let mut previous: Vec<u32> = engine.particles().iter().map(|p| p.life).collect();
        loop {
            let report = engine.step(&mut surface);
            if report.pruned > 0 {
                previous.retain(|life| *life > 0);
            }
            let current: Vec<u32> = engine.particles().iter().map(|p| p.life).collect();
            assert_eq!(current.len(), previous.len());
            for (before, after) in previous.iter().zip(&current) {
                assert_eq!(*after, before - 1);
            }
            previous = current;
            if report.state == LoopState::Idle {
                break;
            }
        }
        assert!(engine.particles().is_empty());
    }

    #[test]
    fn nothing_is_rendered_with_spent_life() {
        let mut engine = engine();
        let mut surface = recorder();
        engine.add_burst(Vec2::ZERO, 50);
        while engine.is_running() {
            let report = engine.step(&mut surface);
            let alive = engine.particles().iter().filter(|p| p.life > 0).count();
            assert_eq!(report.rendered, alive);
            for op in surface.fills() {
                if let DrawOp::Polygon { alpha, .. } = op {
                    assert!(*alpha > 0.0);
                }
            }
        }
    }

    #[test]
    fn loop_idles_one_step_after_store_empties_and_restarts_on_creation() {
        let mut engine = engine();
        let mut surface = recorder();
        engine.add_burst(Vec2::ZERO, 1);
        let life = engine.particles().iter().next().unwrap().life;
        for _ in 0..life {
            assert_eq!(engine.step(&mut surface).state, LoopState::Running);
        }
        // Life is spent but the particle is only pruned at the start of the next step.
        assert_eq!(engine.particles().len(), 1);
        let report = engine.step(&mut surface);
        assert_eq!(report.state, LoopState::Idle);
        assert_eq!(report.pruned, 1);
        assert_eq!(report.rendered, 0);
        assert_eq!(surface.fills().count(), 0);
        assert!(!engine.is_running());

        engine.add_falling(FallingKind::Star, surface.viewport());
        assert!(engine.is_running());
    }

    #[test]
    fn frame_skips_step_when_idle() {
        let mut engine = engine();
        let mut surface = recorder();
        assert_eq!(engine.frame(Duration::ZERO, &mut surface), None);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn restarting_falling_cancels_previous_run() {
        let mut engine = engine();
        let viewport = Viewport::new(800.0, 600.0);
        let first = engine.start_falling(Duration::ZERO, Duration::from_millis(5_000));
        let second = engine.start_falling(Duration::from_millis(60), Duration::from_millis(300));
        assert_ne!(first, second);
        assert_eq!(engine.falling_run().map(FallingRun::id), Some(second));

        // The first run would have ticked at 120 ms; only the second one's schedule counts.
        engine.advance(Duration::from_millis(120), viewport);
        assert!(engine.particles().is_empty());
        engine.advance(Duration::from_millis(180), viewport);
        assert_eq!(engine.particles().len(), 7);
        engine.advance(Duration::from_millis(300), viewport);
        assert_eq!(engine.particles().len(), 14);
        engine.advance(Duration::from_millis(420), viewport);
        assert!(engine.falling_run().is_none());
        assert_eq!(engine.particles().len(), 14);
        engine.advance(Duration::from_millis(540), viewport);
        assert_eq!(engine.particles().len(), 14);
    }

    #[test]
    fn falling_spawns_use_current_viewport() {
        let mut engine = engine();
        engine.start_falling(Duration::ZERO, Duration::from_millis(1_000));
        engine.advance(Duration::from_millis(120), Viewport::new(100.0, 100.0));
        assert!(engine.particles().iter().all(|p| p.pos.x < 80.0));
        assert!(engine.particles().iter().all(|p| p.kind().is_falling()));
        engine.advance(Duration::from_millis(240), Viewport::new(2_000.0, 100.0));
        assert_eq!(engine.particles().len(), 14);
    }

    #[test]
    fn fade_alpha_reaches_the_surface() {
        let mut engine = engine();
        let mut surface = recorder();
        engine.add_falling(FallingKind::Star, surface.viewport());
        engine.step(&mut surface);
        let life = engine.particles().iter().next().unwrap().life;
        assert!(life >= 170);
        let first = surface.fills().next().cloned();
        match first {
            Some(DrawOp::Polygon { points, alpha, .. }) => {
                assert_eq!(points.len(), 10);
                assert_eq!(alpha, 1.0);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }
}
