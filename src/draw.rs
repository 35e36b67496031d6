// Window + software drawing utilities.
// 1) A window that shows the live camera image with overlays.
// 2) Keyboard commands and the mouse pointer.
// 3) Lines, circles, rectangles and a tiny 5x7 bitmap font for HUD text.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::types::{BLACK, FrameBuffer, PixelPoint};

/// Single-key commands shared by the demos.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    BrushUp,
    BrushDown,
    Clear,
}

/// Key → command. Unbound keys are ignored.
pub fn command_for(key: Key) -> Option<Command> {
    match key {
        Key::Q | Key::Escape => Some(Command::Quit),
        Key::Equal | Key::NumPadPlus => Some(Command::BrushUp),
        Key::Minus | Key::NumPadMinus => Some(Command::BrushDown),
        Key::C => Some(Command::Clear),
        _ => None,
    }
}

/// Mouse state sampled once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerSample {
    pub pos: PixelPoint,
    pub left: bool,
    pub right: bool,
}

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // the camera paces the loop; this only caps a replay-driven one
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Commands for keys that went down since the last frame.
    pub fn commands(&self) -> Vec<Command> {
        self.window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(command_for)
            .collect()
    }

    /// Current mouse state in window pixel coordinates (clamped to the window).
    pub fn pointer(&self) -> Option<PointerSample> {
        self.window.get_mouse_pos(MouseMode::Clamp).map(|(x, y)| PointerSample {
            pos: PixelPoint::new(x.max(0.0) as i32, y.max(0.0) as i32),
            left: self.window.get_mouse_down(MouseButton::Left),
            right: self.window.get_mouse_down(MouseButton::Right),
        })
    }
}

/* ---------- Software drawing: pixels, lines, shapes, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Visit every pixel of the Bresenham line from `a` to `b`.
pub fn for_each_line_point(a: PixelPoint, b: PixelPoint, mut visit: impl FnMut(i32, i32)) {
    let (mut x0, mut y0, x1, y1) = (a.x, a.y, b.x, b.y);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        visit(x0, y0);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Draw a line of the given thickness with round ends.
pub fn draw_line(fb: &mut FrameBuffer, a: PixelPoint, b: PixelPoint, color: u32, thickness: i32) {
    if thickness <= 1 {
        for_each_line_point(a, b, |x, y| put_pixel(fb, x, y, color));
        return;
    }
    let r = thickness / 2;
    for_each_line_point(a, b, |x, y| fill_circle(fb, PixelPoint::new(x, y), r, color));
}

/// Filled disc of radius `r` around `c`.
pub fn fill_circle(fb: &mut FrameBuffer, c: PixelPoint, r: i32, color: u32) {
    let r2 = r * r;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r2 {
                put_pixel(fb, c.x + dx, c.y + dy, color);
            }
        }
    }
}

/// Ring of radius `r` and the given stroke thickness around `c`.
pub fn draw_circle(fb: &mut FrameBuffer, c: PixelPoint, r: i32, color: u32, thickness: i32) {
    let outer = r + thickness / 2;
    let inner = (r - (thickness - 1) / 2 - 1).max(-1);
    let (o2, i2) = (outer * outer, inner * inner);
    for dy in -outer..=outer {
        for dx in -outer..=outer {
            let d2 = dx * dx + dy * dy;
            if d2 <= o2 && (inner < 0 || d2 > i2) {
                put_pixel(fb, c.x + dx, c.y + dy, color);
            }
        }
    }
}

/// Filled rectangle between two corners (inclusive).
pub fn fill_rect(fb: &mut FrameBuffer, a: PixelPoint, b: PixelPoint, color: u32) {
    // clipped to the frame, so far-off corners cost nothing
    let (x0, x1) = (a.x.min(b.x).max(0), a.x.max(b.x).min(fb.width as i32 - 1));
    let (y0, y1) = (a.y.min(b.y).max(0), a.y.max(b.y).min(fb.height as i32 - 1));
    for y in y0..=y1 {
        for x in x0..=x1 {
            put_pixel(fb, x, y, color);
        }
    }
}

/// Rectangle outline between two corners (inclusive).
pub fn draw_rect(fb: &mut FrameBuffer, a: PixelPoint, b: PixelPoint, color: u32, thickness: i32) {
    let t = thickness.max(1) - 1;
    let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
    let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
    fill_rect(fb, PixelPoint::new(x0, y0), PixelPoint::new(x1, y0 + t), color);
    fill_rect(fb, PixelPoint::new(x0, y1 - t), PixelPoint::new(x1, y1), color);
    fill_rect(fb, PixelPoint::new(x0, y0), PixelPoint::new(x0 + t, y1), color);
    fill_rect(fb, PixelPoint::new(x1 - t, y0), PixelPoint::new(x1, y1), color);
}

/// Draw a small crosshair centered at `c`, with a tiny gap at the center.
pub fn draw_crosshair(fb: &mut FrameBuffer, c: PixelPoint, size: i32, color: u32) {
    let (cx, cy) = (c.x, c.y);
    draw_line(fb, PixelPoint::new(cx - size, cy), PixelPoint::new(cx - 2, cy), color, 1);
    draw_line(fb, PixelPoint::new(cx + 2, cy), PixelPoint::new(cx + size, cy), color, 1);
    draw_line(fb, PixelPoint::new(cx, cy - size), PixelPoint::new(cx, cy - 2), color, 1);
    draw_line(fb, PixelPoint::new(cx, cy + 2), PixelPoint::new(cx, cy + size), color, 1);
    put_pixel(fb, cx, cy, color);
}

/* ---------- 5x7 bitmap font (uppercase ASCII, digits, a little punctuation) ---------- */

/// Glyph cell width including 1 pixel spacing, before scaling.
pub const GLYPH_ADVANCE: i32 = 6;
pub const GLYPH_HEIGHT: i32 = 7;

/// Return a 5x7 glyph bitmap. Lowercase letters use the uppercase glyph.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '%' => g!(0b11000,0b11001,0b00010,0b00100,0b01000,0b10011,0b00011),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '/' => g!(0b00000,0b00001,0b00010,0b00100,0b01000,0b10000,0b00000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Fill one scaled font cell.
fn put_cell(fb: &mut FrameBuffer, x: i32, y: i32, scale: i32, color: u32) {
    for sy in 0..scale {
        for sx in 0..scale {
            put_pixel(fb, x + sx, y + sy, color);
        }
    }
}

/// Draw a single character at (x,y) with a 1-cell black shadow for contrast.
fn draw_char(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    let Some(rows) = glyph5x7(ch) else { return };
    for (pass_color, offset) in [(BLACK, scale), (color, 0)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    let px = x + rx * scale + offset;
                    let py = y + ry as i32 * scale + offset;
                    put_cell(fb, px, py, scale, pass_color);
                }
            }
        }
    }
}

/// Draw a text string; (x,y) is the top-left of the first glyph.
pub fn draw_text(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_char(fb, x, y, ch, color, scale);
        x += GLYPH_ADVANCE * scale;
    }
}

/// Width in pixels `draw_text` will use for `text`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * GLYPH_ADVANCE * scale.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WHITE;

    fn count(fb: &FrameBuffer, color: u32) -> usize {
        fb.pixels.iter().filter(|&&p| p == color).count()
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(command_for(Key::Q), Some(Command::Quit));
        assert_eq!(command_for(Key::Escape), Some(Command::Quit));
        assert_eq!(command_for(Key::Equal), Some(Command::BrushUp));
        assert_eq!(command_for(Key::Minus), Some(Command::BrushDown));
        assert_eq!(command_for(Key::C), Some(Command::Clear));
        assert_eq!(command_for(Key::Z), None);
    }

    #[test]
    fn thin_line_hits_both_ends() {
        let mut fb = FrameBuffer::filled(10, 10, BLACK);
        draw_line(&mut fb, PixelPoint::new(1, 1), PixelPoint::new(8, 5), WHITE, 1);
        assert_eq!(fb.get(1, 1), Some(WHITE));
        assert_eq!(fb.get(8, 5), Some(WHITE));
    }

    #[test]
    fn thick_line_is_wider_than_thin() {
        let mut thin = FrameBuffer::filled(20, 20, BLACK);
        let mut thick = thin.clone();
        let (a, b) = (PixelPoint::new(2, 10), PixelPoint::new(17, 10));
        draw_line(&mut thin, a, b, WHITE, 1);
        draw_line(&mut thick, a, b, WHITE, 4);
        assert_eq!(count(&thin, WHITE), 16);
        assert!(count(&thick, WHITE) > 4 * 16);
    }

    #[test]
    fn shapes_clip_at_edges() {
        let mut fb = FrameBuffer::filled(4, 4, BLACK);
        fill_circle(&mut fb, PixelPoint::new(0, 0), 10, WHITE);
        assert_eq!(count(&fb, WHITE), 16);
        fill_rect(&mut fb, PixelPoint::new(-5, -5), PixelPoint::new(1, 1), BLACK);
        assert_eq!(count(&fb, WHITE), 12);
    }

    #[test]
    fn text_width_scales() {
        assert_eq!(text_width("VOL", 1), 18);
        assert_eq!(text_width("VOL", 2), 36);
    }

    #[test]
    fn lowercase_uses_uppercase_glyphs() {
        let mut a = FrameBuffer::filled(12, 12, 1);
        let mut b = a.clone();
        draw_text(&mut a, 0, 0, "a", WHITE, 1);
        draw_text(&mut b, 0, 0, "A", WHITE, 1);
        assert_eq!(a, b);
        assert!(count(&a, WHITE) > 0);
    }
}
