// Webcam capture.
// `next_frame()` hands back a FrameBuffer of 0x00RRGGBB pixels, already
// mirrored when the config asks for it, so every demo sees the same image
// the user sees in the window.

use crate::config::CameraConfig;
use crate::error::Error;
use crate::types::{FrameBuffer, rgb};

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution},
};

use image::RgbImage;

pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
    mirror: bool,
}

impl CameraCapture {
    /// Open the configured device at (or near) the configured resolution.
    pub fn open(config: &CameraConfig) -> Result<Self, Error> {
        let fmt = CameraFormat::new(
            Resolution::new(config.width, config.height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(config.index), req)
            .map_err(|e| Error::CameraInit(format!("camera {}: {e}", config.index)))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("open stream: {e}")))?;

        // the driver may pick a different resolution than requested
        let actual = cam.resolution();
        log::info!(
            "Camera {} streaming at {}x{} (asked for {}x{})",
            config.index,
            actual.width(),
            actual.height(),
            config.width,
            config.height
        );

        Ok(Self { cam, width: actual.width(), height: actual.height(), mirror: config.mirror })
    }

    /// Block until the next frame arrives and convert it.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("fetch frame: {e}")))?;
        let img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("decode RGB: {e}")))?;

        let mut fb = frame_from_image(&img);
        if self.mirror {
            fb.flip_horizontal();
        }
        Ok(fb)
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        if let Err(e) = self.cam.stop_stream() {
            log::debug!("stop stream: {e}");
        }
    }
}

/// Pack an RGB image into window pixels.
pub fn frame_from_image(img: &RgbImage) -> FrameBuffer {
    let (w, h) = img.dimensions();
    let pixels = img.pixels().map(|p| rgb(p[0], p[1], p[2])).collect();
    FrameBuffer { width: w as usize, height: h as usize, pixels }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_packs_row_major() {
        let img = RgbImage::from_fn(2, 2, |x, y| image::Rgb([x as u8 * 200, y as u8 * 100, 7]));
        let fb = frame_from_image(&img);
        assert_eq!(fb.width, 2);
        assert_eq!(fb.pixels, vec![rgb(0, 0, 7), rgb(200, 0, 7), rgb(0, 100, 7), rgb(200, 100, 7)]);
    }
}
