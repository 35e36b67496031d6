// One error type for the library. Every variant states *where* things went wrong.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed
    #[error("Window init error: {0}")]
    WindowInit(String),
    /// Updating the window buffer failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),
    /// Opening/starting the camera failed
    #[error("Camera init error: {0}")]
    CameraInit(String),
    /// Grabbing/decoding a frame failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String),
    /// The external landmark helper could not be started or died
    #[error("Landmark provider error: {0}")]
    Provider(String),
    /// The landmark helper sent something we could not understand
    #[error("Landmark protocol error: {0}")]
    Protocol(String),
    /// Reading a recorded landmark file failed
    #[error("Replay file {path:?}: {source}")]
    Replay {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The OS volume backend refused a command
    #[error("Volume backend `{backend}`: {message}")]
    Volume {
        backend: &'static str,
        message: String,
    },
    /// Loading/saving the menu bar picture failed
    #[error("Menu image error: {0}")]
    Image(#[from] image::ImageError),
    /// The JSON config could not be read or written
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
