// gesture-cam: webcam hand-gesture demos.
// • paint   draw in the air with the index finger, pick colors with two
// • count   count raised fingers, any hand orientation
// • volume  pinch thumb and index to set the system volume
// • track   show hand / pose / face-mesh / face landmarks
// • menu    write the painter's menu bar picture
// q or Esc quits every window.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use gesture_cam::camera::CameraCapture;
use gesture_cam::config::{self, AppConfig, DetectorConfig};
use gesture_cam::demo::{self, CountDemo, Demo, PaintDemo, TrackDemo, VolumeDemo};
use gesture_cam::landmark::DetectionKind;
use gesture_cam::menu::{BAR_HEIGHT, Menu, MenuBar};
use gesture_cam::provider::{LandmarkProvider, PointerProvider, ReplayProvider, SubprocessProvider};
use gesture_cam::volume::{VolumeControl, select_sink};

#[derive(Parser, Debug)]
#[command(name = "gesture-cam", version, about = "Webcam hand-gesture demos")]
struct Cli {
    /// JSON settings file; created with defaults when missing
    #[arg(long, default_value = config::DEFAULT_PATH)]
    config: PathBuf,

    #[command(flatten)]
    camera: CameraArgs,

    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Args, Debug)]
struct CameraArgs {
    /// Camera device index
    #[arg(long, global = true)]
    camera: Option<u32>,
    #[arg(long, global = true)]
    width: Option<u32>,
    #[arg(long, global = true)]
    height: Option<u32>,
    /// Show the camera image as-is instead of mirrored
    #[arg(long, global = true)]
    no_mirror: bool,
    /// Frames averaged for the FPS readout
    #[arg(long, global = true)]
    fps_window: Option<usize>,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Detector program and its arguments, e.g. `--detector python3 detect.py`.
    /// Takes the rest of the line, so pass it after the subcommand.
    #[arg(long, global = true, num_args = 1.., allow_hyphen_values = true, value_name = "CMD")]
    detector: Option<Vec<String>>,
    /// Read recorded detections (JSON lines) instead of running a detector
    #[arg(long, global = true, conflicts_with = "mouse")]
    replay: Option<PathBuf>,
    /// Fake a hand with the mouse (left button draws, right selects)
    #[arg(long, global = true)]
    mouse: bool,
    #[arg(long, global = true)]
    detect_confidence: Option<f32>,
    #[arg(long, global = true)]
    track_confidence: Option<f32>,
    #[arg(long, global = true)]
    max_hands: Option<u32>,
    #[arg(long, global = true)]
    model_complexity: Option<u32>,
    /// Run detection on every frame independently
    #[arg(long, global = true)]
    static_mode: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Air painter
    Paint {
        /// Menu bar picture (PNG); a default bar is drawn when missing
        #[arg(long)]
        menu: Option<PathBuf>,
        #[arg(long)]
        thickness: Option<i32>,
        #[arg(long)]
        eraser_thickness: Option<i32>,
    },
    /// Finger counter
    Count,
    /// Pinch-to-volume controller
    Volume {
        /// Only display the level, never touch the system mixer
        #[arg(long)]
        display_only: bool,
        #[arg(long)]
        min_distance: Option<f32>,
        #[arg(long)]
        max_distance: Option<f32>,
    },
    /// Landmark viewer
    Track {
        #[arg(value_enum, default_value_t = DetectionKind::Hand)]
        kind: DetectionKind,
    },
    /// Write the painter's menu bar picture
    Menu {
        #[arg(long, default_value = "menu.png")]
        output: PathBuf,
        #[arg(long, default_value_t = 640)]
        width: usize,
        #[arg(long, default_value_t = BAR_HEIGHT)]
        height: usize,
    },
}

impl Cli {
    /// Command-line flags win over the settings file.
    fn apply(&self, config: &mut AppConfig) {
        let cam = &self.camera;
        if let Some(index) = cam.camera {
            config.camera.index = index;
        }
        if let Some(width) = cam.width {
            config.camera.width = width;
        }
        if let Some(height) = cam.height {
            config.camera.height = height;
        }
        if cam.no_mirror {
            config.camera.mirror = false;
        }
        if let Some(window) = cam.fps_window {
            config.fps.window = window;
        }

        let src = &self.source;
        let det = &mut config.detector;
        if let Some(command) = &src.detector {
            det.command = command.clone();
        }
        if let Some(v) = src.detect_confidence {
            det.detect_confidence = v;
        }
        if let Some(v) = src.track_confidence {
            det.track_confidence = v;
        }
        if let Some(v) = src.max_hands {
            det.max_hands = v;
        }
        if let Some(v) = src.model_complexity {
            det.model_complexity = v;
        }
        if src.static_mode {
            det.static_mode = true;
        }

        match &self.command {
            Cmd::Paint { menu, thickness, eraser_thickness } => {
                if let Some(path) = menu {
                    config.painter.menu_image = Some(path.clone());
                }
                if let Some(t) = thickness {
                    config.painter.thickness = *t;
                }
                if let Some(t) = eraser_thickness {
                    config.painter.eraser_thickness = *t;
                }
            }
            Cmd::Volume { display_only, min_distance, max_distance } => {
                if *display_only {
                    config.volume.enabled = false;
                }
                if let Some(d) = min_distance {
                    config.volume.min_distance = *d;
                }
                if let Some(d) = max_distance {
                    config.volume.max_distance = *d;
                }
            }
            Cmd::Count | Cmd::Track { .. } | Cmd::Menu { .. } => {}
        }
    }

    fn kind(&self) -> DetectionKind {
        match self.command {
            Cmd::Track { kind } => kind,
            _ => DetectionKind::Hand,
        }
    }
}

/// Replay file, mouse, detector command, or (for hands) the mouse as fallback.
fn open_provider(
    source: &SourceArgs,
    kind: DetectionKind,
    detector: &DetectorConfig,
) -> Result<Box<dyn LandmarkProvider>> {
    if let Some(path) = &source.replay {
        return Ok(Box::new(ReplayProvider::open(path, kind, detector.detect_confidence)?));
    }
    if source.mouse {
        if kind != DetectionKind::Hand {
            bail!("--mouse can only stand in for a hand, not {}", kind.as_str());
        }
        return Ok(Box::new(PointerProvider::new()));
    }
    if !detector.command.is_empty() {
        let provider = SubprocessProvider::spawn(&detector.command, kind, detector)
            .context("starting the landmark detector")?;
        return Ok(Box::new(provider));
    }
    if kind == DetectionKind::Hand {
        log::warn!("No detector command configured; using the mouse as hand");
        return Ok(Box::new(PointerProvider::new()));
    }
    bail!("No detector configured for {}: set detector.command in the config or pass --detector / --replay", kind.as_str())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config);
    cli.apply(&mut config);

    if let Cmd::Menu { output, width, height } = &cli.command {
        let menu = Menu::standard(*width);
        MenuBar::generate(&menu, *width, *height)
            .save(output)
            .with_context(|| format!("writing {}", output.display()))?;
        log::info!("Menu bar ({}x{}) written to {}", width, height, output.display());
        return Ok(());
    }

    let mut camera = CameraCapture::open(&config.camera).context("opening the camera")?;
    let (w, h) = camera.resolution();
    let (w, h) = (w as usize, h as usize);

    let kind = cli.kind();
    let mut provider = open_provider(&cli.source, kind, &config.detector)?;

    let mut demo: Box<dyn Demo> = match &cli.command {
        Cmd::Paint { .. } => Box::new(PaintDemo::new(w, h, &config.painter)),
        Cmd::Count => Box::new(CountDemo::new()),
        Cmd::Volume { .. } => {
            let control = VolumeControl::new(select_sink(&config.volume));
            Box::new(VolumeDemo::new(config.volume.mapping(), control))
        }
        Cmd::Track { kind } => Box::new(TrackDemo::new(*kind)),
        Cmd::Menu { .. } => unreachable!("handled above"),
    };

    demo::run(&mut camera, provider.as_mut(), demo.as_mut(), config.fps.window)
        .with_context(|| format!("{} stopped", demo.title()))?;
    log::info!("Bye");
    Ok(())
}
