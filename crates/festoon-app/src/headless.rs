//! Offscreen playback of the card animation into a PNG sequence.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use festoon_core::{Engine, Surface};
use festoon_platform::{FrameSink, FrameSize, Result};
use image::Rgba;
use serde::Serialize;
use tracing::{debug, info};

use crate::raster::RasterSurface;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub frames: u64,
    pub fps: f64,
    pub size: FrameSize,
    pub out_dir: PathBuf,
    /// Write every n-th frame; 0 writes none.
    pub every: u64,
    pub replay_at: Option<u64>,
    pub until_idle: bool,
    pub background: Rgba<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub time_ms: u64,
    pub particles: usize,
    pub rendered: usize,
    pub pruned: usize,
    pub falling_run: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderSummary {
    pub frames: Vec<FrameRecord>,
    pub written: Vec<PathBuf>,
}

/// Writes the raster surface as numbered PNG files.
pub struct PngSequence {
    surface: RasterSurface,
    out_dir: PathBuf,
    written: Vec<PathBuf>,
}

fn raster_dims(size: FrameSize) -> Result<(u16, u16)> {
    let width = u16::try_from(size.width).map_err(|_| format!("width {} exceeds u16", size.width))?;
    let height =
        u16::try_from(size.height).map_err(|_| format!("height {} exceeds u16", size.height))?;
    Ok((width, height))
}

impl PngSequence {
    pub fn new(out_dir: PathBuf, size: FrameSize, background: Rgba<u8>) -> Result<Self> {
        let (width, height) = raster_dims(size)?;
        Ok(Self {
            surface: RasterSurface::new(width, height, background),
            out_dir,
            written: Vec::new(),
        })
    }

    pub fn surface_mut(&mut self) -> &mut RasterSurface {
        &mut self.surface
    }
}

impl FrameSink for PngSequence {
    fn resize(&mut self, size: FrameSize) -> Result<()> {
        let (width, height) = raster_dims(size)?;
        self.surface.resize(width, height);
        Ok(())
    }

    fn present(&mut self, frame: u64) -> Result<()> {
        let path = self.out_dir.join(format!("frame_{frame:05}.png"));
        self.surface.snapshot().save(&path)?;
        debug!("wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

pub fn render(engine: &mut Engine, options: &RenderOptions) -> Result<RenderSummary> {
    if !(options.fps.is_finite() && options.fps > 0.0) {
        return Err(format!("fps must be positive, got {}", options.fps).into());
    }
    std::fs::create_dir_all(&options.out_dir)?;
    let mut sink = PngSequence::new(options.out_dir.clone(), options.size, options.background)?;

    let anchor = sink.surface_mut().viewport().center();
    engine.open(anchor, Duration::ZERO);

    let mut frames = Vec::new();
    for frame in 0..options.frames {
        let now = Duration::from_secs_f64(frame as f64 / options.fps);
        if options.replay_at == Some(frame) {
            engine.replay(anchor, now);
        }
        let report = engine.frame(now, sink.surface_mut());
        frames.push(FrameRecord {
            frame,
            time_ms: now.as_millis() as u64,
            particles: engine.particles().len(),
            rendered: report.map_or(0, |r| r.rendered),
            pruned: report.map_or(0, |r| r.pruned),
            falling_run: engine.falling_run().map(|run| run.id()),
        });
        if options.every > 0 && frame % options.every == 0 {
            sink.present(frame)?;
        }
        let replay_pending = options.replay_at.is_some_and(|at| at > frame);
        if options.until_idle && !engine.needs_frames() && !replay_pending {
            info!("engine idle after {} frames", frame + 1);
            break;
        }
    }

    let summary = RenderSummary {
        frames,
        written: sink.written,
    };
    let summary_path = options.out_dir.join("summary.json");
    serde_json::to_writer_pretty(BufWriter::new(File::create(&summary_path)?), &summary)?;
    info!(
        "rendered {} frames, wrote {} images and {}",
        summary.frames.len(),
        summary.written.len(),
        summary_path.display()
    );
    Ok(summary)
}
