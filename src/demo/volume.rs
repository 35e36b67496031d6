// Pinch-to-volume: the gap between thumb and index sets the system volume.

use crate::demo::{Demo, FrameInput, draw_fps};
use crate::draw::{GLYPH_HEIGHT, draw_crosshair, draw_line, draw_rect, draw_text, fill_circle, fill_rect};
use crate::landmark::hand;
use crate::types::{FrameBuffer, PixelPoint, rgb};
use crate::volume::{VolumeControl, VolumeMapping, pinch_distance};

const PINCH_LINE: u32 = rgb(0, 255, 255);
const TIP_COLOR: u32 = rgb(255, 0, 255);
const LABEL_COLOR: u32 = rgb(255, 155, 155);
const BAR_OUTLINE: u32 = rgb(255, 0, 0);
const BAR_FILL: u32 = rgb(0, 255, 0);
const INFO_COLOR: u32 = rgb(200, 200, 200);

/// Bar spans rows `BAR_TOP..=BAR_BOTTOM`, 100% at the top.
const BAR_TOP: i32 = 100;
const BAR_BOTTOM: i32 = 300;

pub struct VolumeDemo {
    mapping: VolumeMapping,
    control: VolumeControl,
    percent: f32,
}

impl VolumeDemo {
    pub fn new(mapping: VolumeMapping, mut control: VolumeControl) -> Self {
        let percent = control.current_percent().unwrap_or(0.0);
        log::info!("Volume backend: {} (now {}%)", control.backend(), percent as u32);
        Self { mapping, control, percent }
    }

    pub fn percent(&self) -> f32 {
        self.percent
    }
}

/// Top row of the filled part of the bar.
pub fn bar_level(percent: f32) -> i32 {
    BAR_BOTTOM - (percent.clamp(0.0, 100.0) / 100.0 * (BAR_BOTTOM - BAR_TOP) as f32) as i32
}

fn draw_bar(frame: &mut FrameBuffer, percent: f32) {
    let (left, right) = (10, 40);
    fill_rect(frame, PixelPoint::new(left, bar_level(percent)), PixelPoint::new(right, BAR_BOTTOM), BAR_FILL);
    draw_rect(frame, PixelPoint::new(left, BAR_TOP), PixelPoint::new(right, BAR_BOTTOM), BAR_OUTLINE, 1);
}

impl Demo for VolumeDemo {
    fn title(&self) -> &str {
        "Volume Controller"
    }

    fn render(&mut self, frame: &mut FrameBuffer, input: &FrameInput<'_>) {
        if let Some(hand) = input.detections.first_hand() {
            let thumb = hand.pixel(hand::THUMB_TIP);
            let index = hand.pixel(hand::INDEX_TIP);
            let distance = pinch_distance(&hand);
            self.percent = self.mapping.percent(distance);
            log::trace!("pinch {distance} px -> {:.1}%", self.percent);
            self.control.update(self.percent);

            draw_line(frame, thumb, index, PINCH_LINE, 3);
            fill_circle(frame, thumb, 10, TIP_COLOR);
            fill_circle(frame, index, 10, TIP_COLOR);
            let mid = PixelPoint::new((thumb.x + index.x) / 2, (thumb.y + index.y) / 2);
            draw_crosshair(frame, mid, 8, PINCH_LINE);
        }

        let label = format!("VOL: {}%", self.percent as u32);
        draw_text(frame, 10, 90 - 2 * GLYPH_HEIGHT, &label, LABEL_COLOR, 2);
        draw_bar(frame, self.percent);
        draw_text(frame, 10, 50, &format!("Backend: {}", self.control.backend()), INFO_COLOR, 1);
        draw_fps(frame, input.fps);
    }
}
