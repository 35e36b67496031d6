// Hand-gesture webcam demos.
//
// Landmarks come from an external detector (`provider`); this crate turns
// them into finger states (`gesture`), an interaction `mode`, painter
// actions (`painter`), a volume level (`volume`) and on-screen overlays
// (`draw`, `demo`).

pub mod camera;
pub mod canvas;
pub mod config;
pub mod demo;
pub mod draw;
pub mod error;
pub mod fps;
pub mod gesture;
pub mod landmark;
pub mod menu;
pub mod mode;
pub mod painter;
pub mod provider;
pub mod types;
pub mod volume;

pub use error::Error;
