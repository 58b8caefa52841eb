//! Festoon core engine: platform-agnostic particle simulation, spawn scheduling and shape drawing
//! for the greeting-card animation.

pub mod card;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod particle;
pub mod scheduler;
pub mod shapes;
pub mod store;
pub mod surface;

pub use config::{EngineConfig, SpawnBatch, SpawnConfig, TriggerConfig};
pub use engine::{Engine, LoopState, StepReport};
pub use error::ConfigError;
pub use factory::FallingKind;
pub use particle::{ConfettiShape, Particle, ParticleKind};
pub use store::ParticleStore;
pub use surface::{Recorder, Surface, Viewport};
