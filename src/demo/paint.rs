// Air painter: draw with the index finger, pick colors from the menu bar
// with two fingers.

use crate::canvas::Canvas;
use crate::config::PainterConfig;
use crate::demo::{Demo, FrameInput, draw_fps, draw_lines};
use crate::draw::{draw_circle, draw_rect, draw_text, fill_circle, fill_rect};
use crate::gesture::fingers_up;
use crate::landmark::hand;
use crate::menu::{Menu, MenuBar};
use crate::mode::Mode;
use crate::painter::{Action, Painter};
use crate::types::{FrameBuffer, PixelPoint, WHITE};

const HELP: [&str; 4] = [
    "PAINTER INSTRUCTIONS:",
    "Index finger up: DRAWING mode",
    "2 fingers up: SELECTION mode for painting options",
    "Other hand configurations: IDLE mode",
];

pub struct PaintDemo {
    painter: Painter,
    bar: MenuBar,
    mode: Option<Mode>,
}

impl PaintDemo {
    pub fn new(width: usize, height: usize, config: &PainterConfig) -> Self {
        let menu = Menu::standard(width);
        let bar = MenuBar::load_or_generate(config.menu_image.as_deref(), &menu, width);
        let painter = Painter::new(Canvas::new(width, height), menu, config.thickness, config.eraser_thickness);
        Self { painter, bar, mode: None }
    }

    pub fn painter(&self) -> &Painter {
        &self.painter
    }

    fn draw_hud(&self, frame: &mut FrameBuffer) {
        let (ink, thickness) = self.painter.ink();
        draw_text(frame, 0, 4, "COLOR", WHITE, 2);
        fill_rect(frame, PixelPoint::new(70, 0), PixelPoint::new(95, 20), ink);
        draw_rect(frame, PixelPoint::new(70, 0), PixelPoint::new(95, 20), WHITE, 1);

        let mode = self.mode.map_or("NO HAND", Mode::as_str);
        let tool = if self.painter.is_erasing() { "ERASER" } else { "BRUSH" };
        let status = format!("{mode} | {tool}: {thickness}");
        draw_text(frame, 10, frame.height as i32 - 60, &status, WHITE, 2);

        if self.painter.help_visible() {
            draw_lines(frame, 10, 90, 30, &HELP, WHITE, 2);
        }
    }
}

impl Demo for PaintDemo {
    fn title(&self) -> &str {
        "Air Painter"
    }

    fn render(&mut self, frame: &mut FrameBuffer, input: &FrameInput<'_>) {
        self.painter.fit(frame.width, frame.height);
        for &command in input.commands {
            self.painter.command(command);
        }

        let hand = input.detections.first_hand();
        let pointer = hand.map(|h| (Mode::from_fingers(fingers_up(&h)), h.pointer()));
        self.mode = pointer.map(|(mode, _)| mode);
        match self.painter.step(pointer) {
            Action::Selected(effect) => log::debug!("Menu: {}", effect.label()),
            Action::PenDown(p) => log::debug!("Pen down at ({}, {})", p.x, p.y),
            Action::Stroke { .. } | Action::Nothing => {}
        }

        self.painter.canvas().composite_onto(frame);
        self.bar.overlay(frame);

        if let (Some(hand), Some(mode)) = (hand, self.mode) {
            let (ink, thickness) = self.painter.ink();
            let tip = hand.pointer();
            match mode {
                Mode::Drawing => {
                    fill_circle(frame, tip, (thickness / 2).max(4), ink);
                    draw_circle(frame, tip, (thickness / 2).max(4) + 2, WHITE, 1);
                }
                Mode::Selection => draw_rect(frame, tip, hand.pixel(hand::MIDDLE_TIP), ink, 2),
                Mode::Idle => {}
            }
        }

        self.draw_hud(frame);
        draw_fps(frame, input.fps);
    }
}
