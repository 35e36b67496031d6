// Landmark viewer.
// Draws whatever the detector found: hands, body pose, the face-mesh outline,
// or face boxes with a confidence score.
use crate::demo::{Demo, FrameInput, draw_fps};
use crate::draw::{GLYPH_HEIGHT, draw_line, draw_rect, draw_text, fill_circle};
use crate::landmark::{Detection, DetectionKind, PixelBox};
use crate::types::{FrameBuffer, PixelPoint, WHITE, rgb};

const POINT_COLOR: u32 = rgb(255, 0, 0);
const MESH_COLOR: u32 = rgb(0, 255, 0);
const BOX_COLOR: u32 = rgb(255, 0, 255);
const SCORE_COLOR: u32 = rgb(0, 255, 0);
/// Length of the thick corner marks on a face box.
const TICK: i32 = 30;

pub struct TrackDemo {
    kind: DetectionKind,
    title: String,
    seen: usize,
}

impl TrackDemo {
    pub fn new(kind: DetectionKind) -> Self {
        Self { kind, title: format!("Landmarks: {}", kind.as_str()), seen: 0 }
    }
}

/// Connection lines plus a dot per landmark. Edges pointing past the end of
/// the set are skipped.
pub fn draw_skeleton(frame: &mut FrameBuffer, det: &Detection, line_color: u32) {
    let pts = &det.positions;
    for &(a, b) in det.kind.connections() {
        if let (Some(&pa), Some(&pb)) = (pts.get(a), pts.get(b)) {
            draw_line(frame, pa, pb, line_color, 2);
        }
    }
    let radius = if det.kind == DetectionKind::FaceMesh { 1 } else { 4 };
    for &p in pts {
        fill_circle(frame, p, radius, POINT_COLOR);
    }
}

/// Box outline, heavy top-left corner marks and the score in percent above.
pub fn draw_face_box(frame: &mut FrameBuffer, bbox: PixelBox, score: f32) {
    let tl = PixelPoint::new(bbox.x, bbox.y);
    let br = PixelPoint::new(bbox.x.saturating_add(bbox.width), bbox.y.saturating_add(bbox.height));
    draw_rect(frame, tl, br, BOX_COLOR, 1);
    draw_line(frame, tl, PixelPoint::new(tl.x.saturating_add(TICK), tl.y), BOX_COLOR, 5);
    draw_line(frame, tl, PixelPoint::new(tl.x, tl.y.saturating_add(TICK)), BOX_COLOR, 5);

    let label = format!("{}%", (score * 100.0) as i32);
    draw_text(frame, tl.x, tl.y.saturating_sub(10 + 2 * GLYPH_HEIGHT), &label, SCORE_COLOR, 2);
}

impl Demo for TrackDemo {
    fn title(&self) -> &str {
        &self.title
    }

    fn render(&mut self, frame: &mut FrameBuffer, input: &FrameInput<'_>) {
        let found = input.detections.entities.len();
        if found != self.seen {
            log::debug!("{found} {} detection(s)", self.kind.as_str());
            self.seen = found;
        }

        for det in &input.detections.entities {
            match (det.kind, det.bbox) {
                (DetectionKind::Face, Some(bbox)) => draw_face_box(frame, bbox, det.score),
                (DetectionKind::Face, None) => {
                    for &p in &det.positions {
                        fill_circle(frame, p, 3, BOX_COLOR);
                    }
                }
                (DetectionKind::FaceMesh, _) => draw_skeleton(frame, det, MESH_COLOR),
                _ => draw_skeleton(frame, det, WHITE),
            }
        }
        draw_fps(frame, input.fps);
    }
}
