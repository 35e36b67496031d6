// Air painter state: what the fingertip does in each interaction mode.

use crate::canvas::Canvas;
use crate::draw::Command;
use crate::menu::{GREEN, Menu, MenuEffect};
use crate::mode::Mode;
use crate::types::{BLACK, PixelPoint};

pub const MIN_THICKNESS: i32 = 1;
pub const MAX_THICKNESS: i32 = 64;
/// Brush size change per key press.
pub const THICKNESS_STEP: i32 = 2;

/// What a frame's step did, for logging and the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Nothing,
    /// First drawing frame: the pen was placed without drawing.
    PenDown(PixelPoint),
    Stroke { from: PixelPoint, to: PixelPoint },
    Selected(MenuEffect),
}

pub struct Painter {
    canvas: Canvas,
    menu: Menu,
    color: u32,
    erasing: bool,
    thickness: i32,
    eraser_thickness: i32,
    /// Fingertip on the previous drawing frame.
    prev: Option<PixelPoint>,
    help_visible: bool,
}

impl Painter {
    pub fn new(canvas: Canvas, menu: Menu, thickness: i32, eraser_thickness: i32) -> Self {
        Self {
            canvas,
            menu,
            color: GREEN,
            erasing: false,
            thickness: thickness.clamp(MIN_THICKNESS, MAX_THICKNESS),
            eraser_thickness: eraser_thickness.clamp(MIN_THICKNESS, MAX_THICKNESS),
            prev: None,
            help_visible: false,
        }
    }

    /// Advance one frame. `hand` is the frame's mode and index fingertip, or
    /// `None` when no hand was found.
    pub fn step(&mut self, hand: Option<(Mode, PixelPoint)>) -> Action {
        self.help_visible = false;
        let Some((mode, tip)) = hand else {
            self.prev = None;
            return Action::Nothing;
        };

        match mode {
            Mode::Drawing => {
                let action = match self.prev {
                    None => Action::PenDown(tip),
                    Some(from) => {
                        let (color, thickness) = self.ink();
                        self.canvas.stroke(from, tip, color, thickness);
                        Action::Stroke { from, to: tip }
                    }
                };
                self.prev = Some(tip);
                action
            }
            Mode::Selection => {
                self.prev = None;
                match self.menu.hit(tip) {
                    Some(effect) => {
                        self.apply(effect);
                        Action::Selected(effect)
                    }
                    None => Action::Nothing,
                }
            }
            Mode::Idle => {
                self.prev = None;
                Action::Nothing
            }
        }
    }

    fn apply(&mut self, effect: MenuEffect) {
        match effect {
            MenuEffect::Help => self.help_visible = true,
            MenuEffect::Color(color) => {
                self.color = color;
                self.erasing = false;
            }
            MenuEffect::Eraser => self.erasing = true,
            MenuEffect::Clear => self.canvas.clear(),
        }
    }

    /// Keyboard commands; `Quit` is the caller's business.
    pub fn command(&mut self, command: Command) {
        match command {
            Command::BrushUp => self.resize_brush(THICKNESS_STEP),
            Command::BrushDown => self.resize_brush(-THICKNESS_STEP),
            Command::Clear => self.canvas.clear(),
            Command::Quit => {}
        }
    }

    fn resize_brush(&mut self, delta: i32) {
        let slot = if self.erasing { &mut self.eraser_thickness } else { &mut self.thickness };
        *slot = (*slot + delta).clamp(MIN_THICKNESS, MAX_THICKNESS);
        log::info!("Brush size {}", *slot);
    }

    /// Color and thickness the next stroke uses.
    pub fn ink(&self) -> (u32, i32) {
        if self.erasing {
            (BLACK, self.eraser_thickness)
        } else {
            (self.color, self.thickness)
        }
    }

    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn pen(&self) -> Option<PixelPoint> {
        self.prev
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Start a blank canvas if the camera frame size changed.
    pub fn fit(&mut self, width: usize, height: usize) {
        let pixels = self.canvas.pixels();
        if (pixels.width, pixels.height) == (width, height) {
            return;
        }
        log::warn!("Frame size changed to {width}x{height}; canvas cleared");
        self.canvas = Canvas::new(width, height);
        self.prev = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::RED;

    fn painter() -> Painter {
        Painter::new(Canvas::new(640, 480), Menu::standard(640), 4, 20)
    }

    const A: PixelPoint = PixelPoint::new(300, 300);
    const B: PixelPoint = PixelPoint::new(340, 310);

    #[test]
    fn first_drawing_frame_only_places_pen() {
        let mut p = painter();
        assert_eq!(p.step(Some((Mode::Drawing, A))), Action::PenDown(A));
        assert!(p.canvas().pixels().pixels.iter().all(|&px| px == BLACK));
        assert_eq!(p.step(Some((Mode::Drawing, B))), Action::Stroke { from: A, to: B });
        assert_eq!(p.canvas().pixels().get(B.x, B.y), Some(GREEN));
        assert_eq!(p.pen(), Some(B));
    }

    #[test]
    fn new_frame_size_gets_a_fresh_canvas() {
        let mut p = painter();
        p.step(Some((Mode::Drawing, A)));
        p.fit(640, 480);
        assert_eq!(p.pen(), Some(A));

        p.fit(320, 240);
        assert_eq!((p.canvas().pixels().width, p.canvas().pixels().height), (320, 240));
        assert_eq!(p.pen(), None);
    }

    #[test]
    fn leaving_drawing_forgets_pen() {
        for interrupt in [Some((Mode::Idle, B)), Some((Mode::Selection, B)), None] {
            let mut p = painter();
            p.step(Some((Mode::Drawing, A)));
            p.step(interrupt);
            assert_eq!(p.pen(), None);
            // re-entry starts a new stroke instead of jumping from A
            assert_eq!(p.step(Some((Mode::Drawing, B))), Action::PenDown(B));
        }
    }

    #[test]
    fn selecting_red_changes_ink() {
        let mut p = painter();
        let red = PixelPoint::new(300, 40);
        assert_eq!(p.step(Some((Mode::Selection, red))), Action::Selected(MenuEffect::Color(RED)));
        assert_eq!(p.ink(), (RED, 4));
    }

    #[test]
    fn eraser_draws_background_with_its_own_size() {
        let mut p = painter();
        p.step(Some((Mode::Drawing, A)));
        p.step(Some((Mode::Drawing, B)));
        p.step(Some((Mode::Selection, PixelPoint::new(520, 10))));
        assert!(p.is_erasing());
        assert_eq!(p.ink(), (BLACK, 20));
        p.step(Some((Mode::Drawing, A)));
        p.step(Some((Mode::Drawing, B)));
        assert!(p.canvas().pixels().pixels.iter().all(|&px| px == BLACK));
    }

    #[test]
    fn help_shows_only_while_selected() {
        let mut p = painter();
        p.step(Some((Mode::Selection, PixelPoint::new(20, 20))));
        assert!(p.help_visible());
        p.step(Some((Mode::Idle, PixelPoint::new(20, 20))));
        assert!(!p.help_visible());
    }

    #[test]
    fn selection_outside_menu_does_nothing() {
        let mut p = painter();
        assert_eq!(p.step(Some((Mode::Selection, PixelPoint::new(256, 81)))), Action::Nothing);
        assert_eq!(p.ink(), (GREEN, 4));
    }

    #[test]
    fn brush_keys_clamp() {
        let mut p = painter();
        p.command(Command::BrushUp);
        assert_eq!(p.ink().1, 6);
        for _ in 0..100 {
            p.command(Command::BrushDown);
        }
        assert_eq!(p.ink().1, MIN_THICKNESS);
        for _ in 0..100 {
            p.command(Command::BrushUp);
        }
        assert_eq!(p.ink().1, MAX_THICKNESS);
    }

    #[test]
    fn clear_key_wipes_canvas() {
        let mut p = painter();
        p.step(Some((Mode::Drawing, A)));
        p.step(Some((Mode::Drawing, B)));
        p.command(Command::Clear);
        assert!(p.canvas().pixels().pixels.iter().all(|&px| px == BLACK));
    }
}
