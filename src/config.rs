// Settings file (JSON). Every field has a default, so a partial file works.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fps;
use crate::volume::VolumeMapping;

pub const DEFAULT_PATH: &str = "gesture-cam.json";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub detector: DetectorConfig,
    pub painter: PainterConfig,
    pub volume: VolumeConfig,
    pub fps: FpsConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub index: u32,
    pub width: u32,
    pub height: u32,
    /// Flip the image left-to-right so it behaves like a mirror.
    pub mirror: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { index: 0, width: 640, height: 480, mirror: true }
    }
}

/// Settings handed to the external landmark detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Helper program and its arguments; empty means "no helper".
    pub command: Vec<String>,
    /// Treat every frame as an unrelated still image.
    pub static_mode: bool,
    pub max_hands: u32,
    /// 0 (fast) to 2 (accurate).
    pub model_complexity: u32,
    pub detect_confidence: f32,
    pub track_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            static_mode: false,
            max_hands: 2,
            model_complexity: 1,
            detect_confidence: 0.5,
            track_confidence: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    pub thickness: i32,
    pub eraser_thickness: i32,
    /// Picture for the menu bar; the bar is drawn when missing.
    pub menu_image: Option<PathBuf>,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self { thickness: 4, eraser_thickness: 20, menu_image: None }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// When false the demo never touches the OS mixer.
    pub enabled: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    /// `amixer -D` device.
    pub device: String,
    /// `amixer` simple control.
    pub control: String,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        let mapping = VolumeMapping::default();
        Self {
            enabled: true,
            min_distance: mapping.min_distance,
            max_distance: mapping.max_distance,
            device: "pulse".into(),
            control: "Master".into(),
        }
    }
}

impl VolumeConfig {
    pub fn mapping(&self) -> VolumeMapping {
        VolumeMapping { min_distance: self.min_distance, max_distance: self.max_distance }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FpsConfig {
    /// Number of frames averaged for the displayed rate.
    pub window: usize,
}

impl Default for FpsConfig {
    fn default() -> Self {
        Self { window: fps::DEFAULT_WINDOW }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Read `path`; write the defaults there if it does not exist; fall back
    /// to defaults if it cannot be parsed.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            match config.save(path) {
                Ok(()) => log::info!("Wrote default config to {}", path.display()),
                Err(e) => log::warn!("{e}"),
            }
            return config;
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Config loaded from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, json).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }
}
