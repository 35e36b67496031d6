// Core pixel types shared by the camera, the painter and the window.

/// Packs 8-bit channels into 0x00RRGGBB.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Splits 0x00RRGGBB into its channels.
#[inline]
pub const fn channels(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

pub const BLACK: u32 = 0x00_00_00_00;
pub const WHITE: u32 = 0x00_FF_FF_FF;

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A frame filled with a single color.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width + x as usize])
    }

    /// Mirror the frame left-to-right (selfie view).
    pub fn flip_horizontal(&mut self) {
        for row in self.pixels.chunks_exact_mut(self.width.max(1)) {
            row.reverse();
        }
    }

    /// Packed RGB bytes, row-major, 3 bytes per pixel.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &px in &self.pixels {
            let (r, g, b) = channels(px);
            out.extend_from_slice(&[r, g, b]);
        }
        out
    }

    /// Copy `src` into this frame with its top-left corner at row `y`.
    pub fn blit_rows(&mut self, src: &FrameBuffer, y: usize) {
        let cols = src.width.min(self.width);
        for sy in 0..src.height {
            let dy = y + sy;
            if dy >= self.height {
                break;
            }
            let s = sy * src.width;
            let d = dy * self.width;
            self.pixels[d..d + cols].copy_from_slice(&src.pixels[s..s + cols]);
        }
    }
}

/// Integer pixel position inside a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in whole pixels (truncated).
    pub fn distance_to(self, other: PixelPoint) -> f32 {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        dx.hypot(dy).trunc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_reverses_each_row() {
        let mut fb = FrameBuffer { width: 3, height: 2, pixels: vec![1, 2, 3, 4, 5, 6] };
        fb.flip_horizontal();
        assert_eq!(fb.pixels, vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn rgb_bytes_follow_channel_order() {
        let fb = FrameBuffer { width: 1, height: 1, pixels: vec![rgb(1, 2, 3)] };
        assert_eq!(fb.to_rgb_bytes(), vec![1, 2, 3]);
    }

    #[test]
    fn blit_clips_to_destination() {
        let mut dst = FrameBuffer::filled(2, 2, 0);
        let src = FrameBuffer::filled(3, 3, 7);
        dst.blit_rows(&src, 1);
        assert_eq!(dst.pixels, vec![0, 0, 7, 7]);
    }

    #[test]
    fn distance_is_whole_pixels() {
        let a = PixelPoint::new(0, 0);
        assert_eq!(a.distance_to(PixelPoint::new(3, 4)), 5.0);
        assert_eq!(a.distance_to(PixelPoint::new(1, 1)), 1.0);
    }
}
