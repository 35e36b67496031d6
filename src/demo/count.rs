// Finger counter: works with the hand held upright or sideways.

use crate::demo::track::draw_skeleton;
use crate::demo::{Demo, FrameInput, draw_fps, draw_lines};
use crate::draw::{GLYPH_ADVANCE, GLYPH_HEIGHT, draw_circle, draw_rect, draw_text, fill_circle, fill_rect, text_width};
use crate::gesture::{FingersUp, Orientation, fingers_up};
use crate::landmark::hand;
use crate::types::{FrameBuffer, PixelPoint, WHITE, rgb};

/// Fingertip marker colors, thumb to pinky.
const TIP_COLORS: [u32; 5] = [
    rgb(0, 255, 0),
    rgb(255, 255, 0),
    rgb(0, 255, 255),
    rgb(255, 0, 255),
    rgb(0, 0, 255),
];

const INSTRUCTIONS: [&str; 3] = ["Show your hand to the camera", "Works in any orientation!", "Press 'q' to quit"];

const BOX_FILL: u32 = rgb(50, 50, 50);
const COUNT_COLOR: u32 = rgb(0, 255, 0);
const COUNT_SCALE: i32 = 6;

#[derive(Default)]
pub struct CountDemo {
    last: Option<usize>,
}

impl CountDemo {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Box in the bottom-right 15% of the frame with the count centered in it.
pub fn draw_count_box(frame: &mut FrameBuffer, count: usize) {
    let (w, h) = (frame.width as i32, frame.height as i32);
    let a = PixelPoint::new(w * 85 / 100, h * 85 / 100);
    let b = PixelPoint::new(w - 1, h - 1);
    fill_rect(frame, a, b, BOX_FILL);
    draw_rect(frame, a, b, WHITE, 2);

    let text = count.to_string();
    let tw = text_width(&text, COUNT_SCALE) - (GLYPH_ADVANCE - 5) * COUNT_SCALE;
    let x = a.x + (b.x - a.x - tw) / 2;
    let y = a.y + (b.y - a.y - GLYPH_HEIGHT * COUNT_SCALE) / 2;
    draw_text(frame, x, y, &text, COUNT_COLOR, COUNT_SCALE);
}

fn draw_tips(frame: &mut FrameBuffer, tips: [PixelPoint; 5], up: FingersUp) {
    for ((tip, color), is_up) in tips.into_iter().zip(TIP_COLORS).zip(up.0) {
        if is_up {
            fill_circle(frame, tip, 10, color);
        }
        draw_circle(frame, tip, 12, WHITE, 2);
    }
}

impl Demo for CountDemo {
    fn title(&self) -> &str {
        "Finger Counter"
    }

    fn render(&mut self, frame: &mut FrameBuffer, input: &FrameInput<'_>) {
        match input.detections.entities.iter().find_map(|d| d.as_hand().map(|h| (d, h))) {
            Some((det, hand)) => {
                let up = fingers_up(&hand);
                let count = up.count();
                if self.last != Some(count) {
                    log::debug!("{count} finger(s) up ({:?})", Orientation::classify(&hand));
                    self.last = Some(count);
                }
                draw_skeleton(frame, det, WHITE);
                draw_tips(frame, hand::TIPS.map(|i| hand.pixel(i)), up);
                draw_count_box(frame, count);
            }
            None => {
                self.last = None;
                draw_lines(frame, 10, 30, 25, &INSTRUCTIONS, WHITE, 2);
            }
        }
        draw_fps(frame, input.fps);
    }
}
