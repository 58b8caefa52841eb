use festoon_platform::{AudioOutput, Result};
use tracing::info;

pub const DEFAULT_VOLUME: f32 = 0.6;

/// Volume actually handed to the backend; muting wins over the chosen level.
pub fn effective_volume(muted: bool, volume: f32) -> f32 {
    if muted {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Stand-in player for hosts without an audio backend. Tracks state and logs.
#[derive(Debug)]
pub struct SilentAudio {
    muted: bool,
    volume: f32,
}

impl SilentAudio {
    pub fn new(volume: f32) -> Self {
        Self {
            muted: false,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl AudioOutput for SilentAudio {
    fn restart(&mut self) -> Result<()> {
        info!(
            "audio: restart (muted={}, volume={:.2}); no backend, staying silent",
            self.muted,
            effective_volume(self.muted, self.volume)
        );
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(feature = "audio")]
pub use self::rodio_backend::RodioAudio;

#[cfg(feature = "audio")]
mod rodio_backend {
    use std::io::Cursor;
    use std::path::Path;

    use festoon_platform::{AudioOutput, Result};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use tracing::{debug, info};

    use super::effective_volume;

    /// Owns one decoded-on-demand track; every restart plays it from the top on a fresh sink.
    pub struct RodioAudio {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sink: Option<Sink>,
        track: Vec<u8>,
        muted: bool,
        volume: f32,
    }

    fn decode(track: &[u8]) -> Result<Decoder<Cursor<Vec<u8>>>> {
        Ok(Decoder::new(Cursor::new(track.to_vec()))?)
    }

    impl RodioAudio {
        pub fn open(path: &Path, volume: f32) -> Result<Self> {
            let track = std::fs::read(path)?;
            decode(&track)?;
            let (stream, handle) = OutputStream::try_default()?;
            info!("audio: loaded {} ({} bytes)", path.display(), track.len());
            Ok(Self {
                _stream: stream,
                handle,
                sink: None,
                track,
                muted: false,
                volume: volume.clamp(0.0, 1.0),
            })
        }

        fn apply_volume(&self) {
            if let Some(sink) = &self.sink {
                sink.set_volume(effective_volume(self.muted, self.volume));
            }
        }
    }

    impl AudioOutput for RodioAudio {
        fn restart(&mut self) -> Result<()> {
            if let Some(old) = self.sink.take() {
                old.stop();
            }
            let sink = Sink::try_new(&self.handle)?;
            sink.append(decode(&self.track)?);
            sink.set_volume(effective_volume(self.muted, self.volume));
            sink.play();
            debug!("audio: restarted, muted={}", self.muted);
            self.sink = Some(sink);
            Ok(())
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            self.apply_volume();
        }

        fn is_muted(&self) -> bool {
            self.muted
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
            self.apply_volume();
        }
    }

}
