//! Host abstraction traits so `festoon-core` stays free of windowing, audio and output concerns.

use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Output size a host renders at, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// Background music for the card. Playback failures are reported, never fatal.
pub trait AudioOutput {
    /// Rewinds to the start and begins playing.
    fn restart(&mut self) -> Result<()>;
    fn set_muted(&mut self, muted: bool);
    fn is_muted(&self) -> bool;
    fn set_volume(&mut self, _volume: f32) {}
}

/// Destination for rendered frames when no window is involved.
pub trait FrameSink {
    fn resize(&mut self, _size: FrameSize) -> Result<()> {
        Ok(())
    }
    fn present(&mut self, frame: u64) -> Result<()>;
}

/// Plays the card music if it can and logs when it can't.
pub fn restart_quietly(audio: &mut dyn AudioOutput) {
    if let Err(err) = audio.restart() {
        tracing::warn!("audio playback failed to start: {err}");
    }
}
