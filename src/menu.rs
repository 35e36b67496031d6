// The painter's menu bar: clickable regions along the top of the frame and
// the picture drawn there.

use std::ops::Range;
use std::path::Path;

use image::{RgbImage, imageops::FilterType};

use crate::draw::{GLYPH_HEIGHT, draw_line, draw_rect, draw_text, fill_rect, text_width};
use crate::error::Error;
use crate::types::{BLACK, FrameBuffer, PixelPoint, WHITE, channels, rgb};

pub const GREEN: u32 = rgb(0, 255, 0);
pub const RED: u32 = rgb(255, 0, 0);
pub const BLUE: u32 = rgb(0, 0, 255);

/// Width of one menu section in pixels.
pub const SECTION_WIDTH: i32 = 128;
/// Height of the generated bar.
pub const BAR_HEIGHT: usize = 80;
/// Lowest row (inclusive) the fingertip may be on to hit a region.
pub const HIT_BOTTOM: i32 = 80;

const BAR_BACKGROUND: u32 = rgb(50, 50, 50);
const SEPARATOR: u32 = rgb(100, 100, 100);

/// What selecting a region does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEffect {
    /// Show the instructions overlay.
    Help,
    /// Paint with this color from now on.
    Color(u32),
    /// Paint with the background color.
    Eraser,
    /// Wipe the canvas.
    Clear,
}

impl MenuEffect {
    pub fn label(self) -> &'static str {
        match self {
            MenuEffect::Help => "Help",
            MenuEffect::Color(GREEN) => "Green",
            MenuEffect::Color(RED) => "Red",
            MenuEffect::Color(BLUE) => "Blue",
            MenuEffect::Color(_) => "Color",
            MenuEffect::Eraser => "Eraser",
            MenuEffect::Clear => "Clear",
        }
    }

    /// Swatch color drawn in the bar.
    fn swatch(self) -> u32 {
        match self {
            MenuEffect::Help => rgb(100, 100, 100),
            MenuEffect::Color(c) => c,
            MenuEffect::Eraser => BLACK,
            MenuEffect::Clear => rgb(200, 200, 200),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuRegion {
    /// Half-open pixel range `[start, end)`.
    pub x: Range<i32>,
    pub effect: MenuEffect,
}

/// Non-overlapping regions ordered left to right, sharing one vertical band.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Menu {
    regions: Vec<MenuRegion>,
    /// Rows `0..=bottom` are inside the band.
    bottom: i32,
}

impl Menu {
    pub fn new(regions: Vec<MenuRegion>, bottom: i32) -> Self {
        Self { regions, bottom }
    }

    /// Help, Green, Red, Blue, Eraser, Clear in 128 px columns; a section is
    /// kept only if it fits inside `width`.
    pub fn standard(width: usize) -> Self {
        let order = [
            MenuEffect::Help,
            MenuEffect::Color(GREEN),
            MenuEffect::Color(RED),
            MenuEffect::Color(BLUE),
            MenuEffect::Eraser,
            MenuEffect::Clear,
        ];
        let regions = order
            .into_iter()
            .enumerate()
            .map(|(i, effect)| {
                let start = i as i32 * SECTION_WIDTH;
                MenuRegion { x: start..start + SECTION_WIDTH, effect }
            })
            .take_while(|r| r.x.end <= width as i32)
            .collect();
        Self::new(regions, HIT_BOTTOM)
    }

    pub fn regions(&self) -> &[MenuRegion] {
        &self.regions
    }

    /// First region containing `p`, if any.
    pub fn hit(&self, p: PixelPoint) -> Option<MenuEffect> {
        if p.y < 0 || p.y > self.bottom {
            return None;
        }
        self.regions.iter().find(|r| r.x.contains(&p.x)).map(|r| r.effect)
    }
}

/// Picture shown at the top of the frame.
#[derive(Clone, Debug)]
pub struct MenuBar {
    image: FrameBuffer,
}

impl MenuBar {
    /// Draw the bar for `menu`: a swatch, a label and a separator per section.
    pub fn generate(menu: &Menu, width: usize, height: usize) -> Self {
        let mut image = FrameBuffer::filled(width, height, BAR_BACKGROUND);
        let (box_top, box_bottom) = (15, 45);
        for region in menu.regions() {
            let (x0, x1) = (region.x.start, region.x.end);
            let (a, b) = (PixelPoint::new(x0 + 10, box_top), PixelPoint::new(x1 - 10, box_bottom));
            fill_rect(&mut image, a, b, region.effect.swatch());
            draw_rect(&mut image, a, b, WHITE, 1);

            let label = region.effect.label();
            let tx = x0 + (SECTION_WIDTH - text_width(label, 1)) / 2;
            draw_text(&mut image, tx, box_bottom + 20 - GLYPH_HEIGHT, label, WHITE, 1);

            if x1 < width as i32 {
                draw_line(&mut image, PixelPoint::new(x1, 0), PixelPoint::new(x1, height as i32), SEPARATOR, 1);
            }
        }
        Self { image }
    }

    /// Load a picture and stretch it to `width`, keeping its height.
    pub fn load(path: &Path, width: usize) -> Result<Self, Error> {
        let img = image::open(path)?.to_rgb8();
        let height = img.height();
        let img = if img.width() == width as u32 {
            img
        } else {
            image::imageops::resize(&img, width as u32, height, FilterType::Triangle)
        };
        let pixels = img.pixels().map(|p| rgb(p[0], p[1], p[2])).collect();
        Ok(Self { image: FrameBuffer { width, height: height as usize, pixels } })
    }

    /// Use the picture at `path` if it loads, otherwise draw the default bar.
    pub fn load_or_generate(path: Option<&Path>, menu: &Menu, width: usize) -> Self {
        if let Some(path) = path {
            match Self::load(path, width) {
                Ok(bar) => {
                    log::info!("Menu image {} loaded ({}x{})", path.display(), bar.image.width, bar.image.height);
                    return bar;
                }
                Err(e) => log::warn!("{e}; drawing the default menu bar"),
            }
        }
        Self::generate(menu, width, BAR_HEIGHT)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let img = RgbImage::from_fn(self.image.width as u32, self.image.height as u32, |x, y| {
            let (r, g, b) = channels(self.image.pixels[y as usize * self.image.width + x as usize]);
            image::Rgb([r, g, b])
        });
        img.save(path)?;
        Ok(())
    }

    pub fn image(&self) -> &FrameBuffer {
        &self.image
    }

    /// Paint the bar over the top rows of `frame`.
    pub fn overlay(&self, frame: &mut FrameBuffer) {
        frame.blit_rows(&self.image, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_menu_on_640_has_five_sections() {
        let menu = Menu::standard(640);
        let labels: Vec<_> = menu.regions().iter().map(|r| r.effect.label()).collect();
        assert_eq!(labels, ["Help", "Green", "Red", "Blue", "Eraser"]);
        assert_eq!(Menu::standard(768).regions().len(), 6);
    }

    #[test]
    fn hit_test_picks_column() {
        let menu = Menu::standard(640);
        assert_eq!(menu.hit(PixelPoint::new(200, 40)), Some(MenuEffect::Color(GREEN)));
        assert_eq!(menu.hit(PixelPoint::new(0, 0)), Some(MenuEffect::Help));
        assert_eq!(menu.hit(PixelPoint::new(127, 80)), Some(MenuEffect::Help));
        assert_eq!(menu.hit(PixelPoint::new(128, 80)), Some(MenuEffect::Color(GREEN)));
        assert_eq!(menu.hit(PixelPoint::new(600, 10)), Some(MenuEffect::Eraser));
    }

    #[test]
    fn below_band_misses() {
        let menu = Menu::standard(640);
        assert_eq!(menu.hit(PixelPoint::new(256, 81)), None);
        assert_eq!(menu.hit(PixelPoint::new(256, -1)), None);
        assert_eq!(menu.hit(PixelPoint::new(640, 10)), None);
    }

    #[test]
    fn generated_bar_has_requested_size() {
        let menu = Menu::standard(640);
        let bar = MenuBar::generate(&menu, 640, BAR_HEIGHT);
        assert_eq!(bar.image().width, 640);
        assert_eq!(bar.image().height, BAR_HEIGHT);
        // inside the green swatch
        assert_eq!(bar.image().get(128 + 64, 30), Some(GREEN));
        // background above the swatches
        assert_eq!(bar.image().get(64, 5), Some(BAR_BACKGROUND));
    }

    #[test]
    fn missing_image_falls_back() {
        let menu = Menu::standard(384);
        let bar = MenuBar::load_or_generate(Some(Path::new("/definitely/not/here.png")), &menu, 384);
        assert_eq!(bar.image().width, 384);
        assert_eq!(bar.image().height, BAR_HEIGHT);
    }

    #[test]
    fn saved_bar_loads_back() {
        let dir = std::env::temp_dir().join(format!("gesture-cam-menu-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("menu.png");
        let menu = Menu::standard(256);
        let bar = MenuBar::generate(&menu, 256, BAR_HEIGHT);
        bar.save(&path).unwrap();
        let loaded = MenuBar::load(&path, 256).unwrap();
        assert_eq!(loaded.image(), bar.image());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
