// The interactive demos and the frame loop they share.
//
// Every demo runs the same pipeline per frame: capture, detect, update its
// own state, draw overlays, show the frame rate, present. A demo only
// implements `Demo::render`.

pub mod count;
pub mod paint;
pub mod track;
pub mod volume;

use std::time::Instant;

use crate::camera::CameraCapture;
use crate::draw::{Command, Drawer, GLYPH_HEIGHT, draw_text};
use crate::error::Error;
use crate::fps::FrameRate;
use crate::landmark::Detections;
use crate::provider::LandmarkProvider;
use crate::types::{FrameBuffer, rgb};

pub use count::CountDemo;
pub use paint::PaintDemo;
pub use track::TrackDemo;
pub use volume::VolumeDemo;

pub const FPS_COLOR: u32 = rgb(255, 89, 155);

/// What a demo gets to see each frame besides the image.
pub struct FrameInput<'a> {
    pub detections: &'a Detections,
    /// Keys pressed since the last frame, `Quit` already handled.
    pub commands: &'a [Command],
    /// Averaged frame rate as HUD text.
    pub fps: &'a str,
}

pub trait Demo {
    fn title(&self) -> &str;

    /// Update state from `input` and draw onto `frame`.
    fn render(&mut self, frame: &mut FrameBuffer, input: &FrameInput<'_>);
}

/// Frame rate text in the bottom-left corner.
pub fn draw_fps(frame: &mut FrameBuffer, label: &str) {
    let y = frame.height as i32 - 2 * GLYPH_HEIGHT - 10;
    draw_text(frame, 10, y, label, FPS_COLOR, 2);
}

/// Lines of text stacked downward from `(x, y)`.
pub fn draw_lines(frame: &mut FrameBuffer, x: i32, y: i32, spacing: i32, lines: &[&str], color: u32, scale: i32) {
    for (i, line) in lines.iter().enumerate() {
        draw_text(frame, x, y + i as i32 * spacing, line, color, scale);
    }
}

/// Run `demo` until the window closes, `q`/Esc is pressed, or the camera
/// stops delivering frames.
pub fn run(
    camera: &mut CameraCapture,
    provider: &mut dyn LandmarkProvider,
    demo: &mut dyn Demo,
    fps_window: usize,
) -> Result<(), Error> {
    let (w, h) = camera.resolution();
    let mut drawer = Drawer::new(demo.title(), w as usize, h as usize)?;
    let mut rate = FrameRate::new(fps_window);
    log::info!("{} running on {}x{}", demo.title(), w, h);

    while drawer.is_open() {
        let mut commands = drawer.commands();
        if commands.contains(&Command::Quit) {
            log::info!("Quit requested");
            break;
        }
        commands.retain(|c| *c != Command::Quit);

        let mut frame = match camera.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("{e}; stopping");
                break;
            }
        };

        provider.observe_pointer(drawer.pointer());
        let detections = match provider.detect(&frame) {
            Ok(d) => d,
            Err(Error::Protocol(msg)) => {
                log::warn!("Skipping frame: {msg}");
                Detections::empty((frame.width, frame.height))
            }
            Err(e) => return Err(e),
        };

        rate.tick(Instant::now());
        let fps = rate.label();
        let input = FrameInput { detections: &detections, commands: &commands, fps: &fps };
        demo.render(&mut frame, &input);
        drawer.present(&frame)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_label_sits_bottom_left() {
        let mut frame = FrameBuffer::filled(200, 100, 0);
        draw_fps(&mut frame, "FPS: 30");
        let top_half_clean = frame.pixels[..200 * 50].iter().all(|&p| p == 0);
        assert!(top_half_clean);
        assert!(frame.pixels.contains(&FPS_COLOR));
    }
}
