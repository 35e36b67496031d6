// Stroke canvas for the painter.
// Strokes accumulate across frames on a black buffer the size of the camera
// frame, and get merged onto every live frame before it is shown.
use crate::draw::for_each_line_point;
use crate::types::{BLACK, FrameBuffer, PixelPoint, channels, rgb};

/// Round brush tip, precomputed once per thickness.
#[derive(Clone, Debug)]
pub struct Stamp {
    pub radius: i32,       // pixels from center to edge
    pub cover: Vec<bool>,  // (2r+1)*(2r+1), true inside the disc
}

/// Make a hard-edged circular stamp for a brush of the given thickness.
pub fn make_round_stamp(thickness: i32) -> Stamp {
    let radius = (thickness.max(1) - 1) / 2;
    let d = 2 * radius + 1;
    let mut cover = Vec::with_capacity((d * d) as usize);
    let r2 = radius * radius + radius; // slightly fuller than r^2 so small tips stay round
    for y in -radius..=radius {
        for x in -radius..=radius {
            cover.push(x * x + y * y <= r2);
        }
    }
    Stamp { radius, cover }
}

/// Persistent drawing surface.
pub struct Canvas {
    buffer: FrameBuffer,
    stamp: Stamp,
    thickness: i32,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self { buffer: FrameBuffer::filled(width, height, BLACK), stamp: make_round_stamp(1), thickness: 1 }
    }

    pub fn pixels(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Wipe every stroke.
    pub fn clear(&mut self) {
        self.buffer.pixels.fill(BLACK);
    }

    /// Press the stamp once, centered at `c`.
    fn dab(&mut self, c: PixelPoint, color: u32) {
        let w = self.buffer.width as i32;
        let h = self.buffer.height as i32;
        let r = self.stamp.radius;
        let d = 2 * r + 1;

        for ky in 0..d {
            for kx in 0..d {
                if !self.stamp.cover[(ky * d + kx) as usize] { continue; }
                let sx = c.x + kx - r;
                let sy = c.y + ky - r;
                if sx < 0 || sy < 0 || sx >= w || sy >= h { continue; }
                self.buffer.pixels[sy as usize * self.buffer.width + sx as usize] = color;
            }
        }
    }

    /// Draw a segment from `from` to `to`. Erasing is drawing in black.
    pub fn stroke(&mut self, from: PixelPoint, to: PixelPoint, color: u32, thickness: i32) {
        if thickness != self.thickness {
            self.stamp = make_round_stamp(thickness);
            self.thickness = thickness;
        }
        let mut points = Vec::new();
        for_each_line_point(from, to, |x, y| points.push(PixelPoint::new(x, y)));
        for p in points {
            self.dab(p, color);
        }
    }

    /// Merge the strokes onto `frame`, channel by channel: bright stroke
    /// channels (> 128) replace the frame's, the rest are OR-ed in. Black
    /// canvas pixels leave the frame untouched. A frame of another size is
    /// left alone.
    pub fn composite_onto(&self, frame: &mut FrameBuffer) {
        if (frame.width, frame.height) != (self.buffer.width, self.buffer.height) {
            log::warn!(
                "Canvas is {}x{}, frame is {}x{}; strokes not shown",
                self.buffer.width, self.buffer.height, frame.width, frame.height
            );
            return;
        }
        for (dst, &ink) in frame.pixels.iter_mut().zip(&self.buffer.pixels) {
            if ink == BLACK {
                continue;
            }
            let (fr, fg, fb) = channels(*dst);
            let (cr, cg, cb) = channels(ink);
            let mix = |f: u8, c: u8| if c > 128 { c } else { f | c };
            *dst = rgb(mix(fr, cr), mix(fg, cg), mix(fb, cb));
        }
    }
}
