use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use festoon_core::{Engine, EngineConfig};
use festoon_platform::{AudioOutput, FrameSize, Result};
use festoon_ui::{run_card_window, CardText};
use image::Rgba;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod audio;
mod headless;
mod raster;

use crate::audio::SilentAudio;
use crate::headless::RenderOptions;

#[derive(Parser, Debug)]
#[command(name = "festoon", version, about = "Greeting card with confetti and falling sprites")]
struct Cli {
    /// Engine configuration (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fixed RNG seed, overriding the config.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive card window (default).
    Window(WindowArgs),
    /// Play the card offscreen and write PNG frames.
    Render(RenderArgs),
}

#[derive(Parser, Debug, Default)]
struct WindowArgs {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    message: Option<String>,

    /// Music volume in [0, 1].
    #[arg(long, default_value_t = audio::DEFAULT_VOLUME)]
    volume: f32,

    /// Music played each time the card opens (needs the `audio` feature).
    #[arg(long)]
    music: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[arg(long, default_value_t = 900)]
    frames: u64,

    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    #[arg(long, default_value_t = 960)]
    width: u32,

    #[arg(long, default_value_t = 640)]
    height: u32,

    /// Output directory for PNG frames and summary.json.
    #[arg(long, default_value = "festoon-frames")]
    out: PathBuf,

    /// Write every n-th frame (0 writes only the summary).
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// Frame at which to press replay.
    #[arg(long)]
    replay_at: Option<u64>,

    /// Stop once nothing is left to animate.
    #[arg(long, default_value_t = false)]
    until_idle: bool,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let cli = Cli::parse();
    info!("Festoon starting");
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Festoon error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let mut engine = Engine::new(config);

    match cli.cmd.unwrap_or(Command::Window(WindowArgs::default_args())) {
        Command::Window(args) => {
            let defaults = CardText::default();
            let text = CardText {
                title: args.title.unwrap_or(defaults.title),
                message: args.message.unwrap_or(defaults.message),
                prompt: defaults.prompt,
            };
            let audio = open_audio(args.music.as_deref(), args.volume);
            run_card_window(engine, audio, text)
        }
        Command::Render(args) => {
            let options = RenderOptions {
                frames: args.frames,
                fps: args.fps,
                size: FrameSize {
                    width: args.width,
                    height: args.height,
                },
                out_dir: args.out,
                every: args.every,
                replay_at: args.replay_at,
                until_idle: args.until_idle,
                background: Rgba([18, 22, 38, 255]),
            };
            headless::render(&mut engine, &options).map(|_| ())
        }
    }
}

#[cfg(feature = "audio")]
fn open_audio(music: Option<&Path>, volume: f32) -> Box<dyn AudioOutput> {
    if let Some(path) = music {
        match audio::RodioAudio::open(path, volume) {
            Ok(player) => return Box::new(player),
            Err(e) => warn!("music {} unavailable, continuing silently: {e}", path.display()),
        }
    }
    Box::new(SilentAudio::new(volume))
}

#[cfg(not(feature = "audio"))]
fn open_audio(music: Option<&Path>, volume: f32) -> Box<dyn AudioOutput> {
    if let Some(path) = music {
        warn!(
            "built without the `audio` feature; ignoring music {}",
            path.display()
        );
    }
    Box::new(SilentAudio::new(volume))
}

impl WindowArgs {
    fn default_args() -> Self {
        Self {
            volume: audio::DEFAULT_VOLUME,
            ..Self::default()
        }
    }
}
