// A fake hand that follows the mouse.
//
// Left button held: index finger up (drawing). Right button held: index and
// middle up (selection). No button: fist. The index tip sits under the
// cursor.

use crate::draw::PointerSample;
use crate::error::Error;
use crate::gesture::{Digit, FingersUp};
use crate::landmark::{Detection, DetectionKind, Detections, Handedness, Landmark, hand};
use crate::provider::LandmarkProvider;
use crate::types::FrameBuffer;

/// An upright right hand, thumb on the image's left, with the chosen digits
/// extended and the index tip at `tip`. Offsets are in normalized units.
pub fn posed_hand(tip: Landmark, up: FingersUp) -> Vec<Landmark> {
    let (x0, y0) = (tip.x, tip.y);
    let mut m = vec![Landmark::default(); hand::COUNT];
    m[hand::WRIST] = Landmark::new(x0 + 0.05, y0 + 0.30);
    m[hand::THUMB_CMC] = Landmark::new(x0 - 0.02, y0 + 0.26);
    m[hand::THUMB_MCP] = Landmark::new(x0 - 0.05, y0 + 0.22);
    m[hand::THUMB_IP] = Landmark::new(x0 - 0.07, y0 + 0.19);
    m[hand::THUMB_TIP] = if up.is_up(Digit::Thumb) {
        Landmark::new(x0 - 0.09, y0 + 0.16)
    } else {
        Landmark::new(x0 - 0.03, y0 + 0.17)
    };

    for (n, digit) in Digit::ALL[1..].iter().enumerate() {
        let x = x0 + 0.04 * n as f32;
        let mcp = hand::TIPS[*digit as usize] - 3;
        m[mcp] = Landmark::new(x, y0 + 0.12);
        m[mcp + 1] = Landmark::new(x, y0 + 0.08);
        if up.is_up(*digit) {
            m[mcp + 2] = Landmark::new(x, y0 + 0.04);
            m[mcp + 3] = Landmark::new(x, y0);
        } else {
            m[mcp + 2] = Landmark::new(x, y0 + 0.11);
            m[mcp + 3] = Landmark::new(x, y0 + 0.13);
        }
    }
    m
}

/// Digits the mouse buttons stand for.
pub fn fingers_for(sample: &PointerSample) -> FingersUp {
    if sample.right {
        FingersUp([false, true, true, false, false])
    } else if sample.left {
        FingersUp([false, true, false, false, false])
    } else {
        FingersUp::NONE
    }
}

#[derive(Default)]
pub struct PointerProvider {
    sample: Option<PointerSample>,
}

impl PointerProvider {
    pub fn new() -> Self {
        log::info!("Using the mouse as hand (left: draw, right: select)");
        Self::default()
    }
}

impl LandmarkProvider for PointerProvider {
    fn kind(&self) -> DetectionKind {
        DetectionKind::Hand
    }

    fn observe_pointer(&mut self, sample: Option<PointerSample>) {
        self.sample = sample;
    }

    fn detect(&mut self, frame: &FrameBuffer) -> Result<Detections, Error> {
        let size = (frame.width, frame.height);
        let Some(sample) = self.sample else {
            return Ok(Detections::empty(size));
        };
        if frame.width == 0 || frame.height == 0 {
            return Ok(Detections::empty(size));
        }

        // aim at the pixel center so truncation lands back on the cursor pixel
        let tip = Landmark::new(
            (sample.pos.x as f32 + 0.5) / frame.width as f32,
            (sample.pos.y as f32 + 0.5) / frame.height as f32,
        );
        let landmarks = posed_hand(tip, fingers_for(&sample));
        let hand = Detection::new(DetectionKind::Hand, 1.0, Some(Handedness::Right), landmarks, None, size);
        Ok(Detections { frame_size: size, entities: vec![hand] })
    }
}
