//! Card triggers: what opening and replaying the card set in motion.

use std::time::Duration;

use glam::Vec2;
use tracing::info;

use crate::config::TriggerConfig;
use crate::engine::Engine;

impl Engine {
    /// First activation of the card. Later calls do nothing and return `false`.
    pub fn open(&mut self, anchor: Vec2, now: Duration) -> bool {
        if self.opened {
            return false;
        }
        self.opened = true;
        let trigger = self.config.open.clone();
        info!("card opened at ({:.0}, {:.0})", anchor.x, anchor.y);
        self.fire(&trigger, anchor, now);
        true
    }

    pub fn replay(&mut self, anchor: Vec2, now: Duration) {
        let trigger = self.config.replay.clone();
        info!("card replay at ({:.0}, {:.0})", anchor.x, anchor.y);
        self.fire(&trigger, anchor, now);
    }

    pub fn is_opened(&self) -> bool {
        self.opened
    }

    fn fire(&mut self, trigger: &TriggerConfig, anchor: Vec2, now: Duration) {
        self.add_burst(anchor, trigger.burst as usize);
        self.start_falling(now, trigger.fall_duration());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::particle::ParticleKind;

    fn engine() -> Engine {
        Engine::new(EngineConfig {
            seed: Some(3),
            ..EngineConfig::default()
        })
    }

    #[test]
    fn open_bursts_once() {
        let mut engine = engine();
        assert!(engine.open(Vec2::new(640.0, 360.0), Duration::ZERO));
        assert!(engine.is_opened());
        assert_eq!(engine.particles().len(), 900);
        assert_eq!(
            engine.falling_run().map(|run| run.duration()),
            Some(Duration::from_millis(11_000))
        );

        assert!(!engine.open(Vec2::new(640.0, 360.0), Duration::from_millis(10)));
        assert_eq!(engine.particles().len(), 900);
    }

    #[test]
    fn replay_is_repeatable_and_restarts_the_run() {
        let mut engine = engine();
        engine.replay(Vec2::new(10.0, 20.0), Duration::ZERO);
        let first = engine.falling_run().map(|run| run.id());
        engine.replay(Vec2::new(10.0, 20.0), Duration::from_millis(50));
        assert_eq!(engine.particles().len(), 1_300);
        assert!(engine
            .particles()
            .iter()
            .all(|p| matches!(p.kind(), ParticleKind::Confetti { .. })));
        let run = engine.falling_run().unwrap();
        assert_ne!(Some(run.id()), first);
        assert_eq!(run.duration(), Duration::from_millis(8_000));
        assert!(!engine.is_opened());
    }
}
