// Landmark data as delivered by the external detector, plus the fixed
// index-to-body-part topologies used for drawing and gesture rules.

use serde::{Deserialize, Serialize};

use crate::types::PixelPoint;

/// One landmark in normalized image coordinates.
///
/// `x` and `y` are relative to the frame width/height (0.0 to 1.0); `z` is the
/// detector's relative depth and is 0.0 when not provided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Scale to a pixel position, truncating toward zero.
    pub fn to_pixel(self, width: usize, height: usize) -> PixelPoint {
        PixelPoint::new((self.x * width as f32) as i32, (self.y * height as f32) as i32)
    }
}

/// Which detector produced a landmark set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionKind {
    Hand,
    Pose,
    FaceMesh,
    Face,
}

impl DetectionKind {
    /// Number of landmarks a complete set of this kind carries, if fixed.
    pub fn landmark_count(self) -> Option<usize> {
        match self {
            DetectionKind::Hand => Some(hand::COUNT),
            DetectionKind::Pose => Some(pose::COUNT),
            DetectionKind::FaceMesh => Some(face_mesh::COUNT),
            // face detection reports a box plus a few keypoints
            DetectionKind::Face => None,
        }
    }

    /// Index pairs to connect with lines when drawing.
    pub fn connections(self) -> &'static [(usize, usize)] {
        match self {
            DetectionKind::Hand => hand::CONNECTIONS,
            DetectionKind::Pose => pose::CONNECTIONS,
            DetectionKind::FaceMesh => face_mesh::OVAL,
            DetectionKind::Face => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DetectionKind::Hand => "hand",
            DetectionKind::Pose => "pose",
            DetectionKind::FaceMesh => "face-mesh",
            DetectionKind::Face => "face",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// Face-detector box in normalized coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelativeBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Face-detector box in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RelativeBox {
    pub fn to_pixels(self, width: usize, height: usize) -> PixelBox {
        PixelBox {
            x: (self.x * width as f32) as i32,
            y: (self.y * height as f32) as i32,
            width: (self.width * width as f32) as i32,
            height: (self.height * height as f32) as i32,
        }
    }
}

/// One detected entity in one frame.
///
/// Landmarks and their pixel positions are produced together, so callers
/// never have to ask the detector a second time for positions.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub kind: DetectionKind,
    pub score: f32,
    pub handedness: Option<Handedness>,
    pub landmarks: Vec<Landmark>,
    pub positions: Vec<PixelPoint>,
    pub bbox: Option<PixelBox>,
}

impl Detection {
    pub fn new(
        kind: DetectionKind,
        score: f32,
        handedness: Option<Handedness>,
        landmarks: Vec<Landmark>,
        bbox: Option<RelativeBox>,
        frame_size: (usize, usize),
    ) -> Self {
        let (w, h) = frame_size;
        let positions = landmarks.iter().map(|l| l.to_pixel(w, h)).collect();
        Self { kind, score, handedness, landmarks, positions, bbox: bbox.map(|b| b.to_pixels(w, h)) }
    }

    /// View this detection as a hand, if it is one with a full landmark set.
    pub fn as_hand(&self) -> Option<Hand<'_>> {
        if self.kind != DetectionKind::Hand {
            return None;
        }
        Hand::new(&self.landmarks, &self.positions)
    }
}

/// Everything the provider found in one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detections {
    pub frame_size: (usize, usize),
    pub entities: Vec<Detection>,
}

impl Detections {
    pub fn empty(frame_size: (usize, usize)) -> Self {
        Self { frame_size, entities: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The first hand with a complete landmark set.
    pub fn first_hand(&self) -> Option<Hand<'_>> {
        self.entities.iter().find_map(Detection::as_hand)
    }
}

/// A validated 21-point hand: indexing by the `hand::*` constants cannot panic.
#[derive(Clone, Copy, Debug)]
pub struct Hand<'a> {
    landmarks: &'a [Landmark],
    positions: &'a [PixelPoint],
}

impl<'a> Hand<'a> {
    pub fn new(landmarks: &'a [Landmark], positions: &'a [PixelPoint]) -> Option<Self> {
        if landmarks.len() < hand::COUNT || positions.len() < hand::COUNT {
            return None;
        }
        Some(Self { landmarks, positions })
    }

    #[inline]
    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    #[inline]
    pub fn pixel(&self, index: usize) -> PixelPoint {
        self.positions[index]
    }

    /// Index fingertip, the pointer for every hand-driven demo.
    pub fn pointer(&self) -> PixelPoint {
        self.pixel(hand::INDEX_TIP)
    }
}

/// MediaPipe hand topology.
pub mod hand {
    pub const COUNT: usize = 21;

    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    /// Tips in digit order: thumb, index, middle, ring, pinky.
    pub const TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
    /// PIP joints of index to pinky, the reference for "finger up".
    pub const FINGER_PIPS: [usize; 4] = [INDEX_PIP, MIDDLE_PIP, RING_PIP, PINKY_PIP];

    pub const CONNECTIONS: &[(usize, usize)] = &[
        (0, 1), (1, 2), (2, 3), (3, 4),
        (0, 5), (5, 6), (6, 7), (7, 8),
        (5, 9), (9, 10), (10, 11), (11, 12),
        (9, 13), (13, 14), (14, 15), (15, 16),
        (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
    ];
}

/// MediaPipe pose topology.
pub mod pose {
    pub const COUNT: usize = 33;

    pub const CONNECTIONS: &[(usize, usize)] = &[
        (0, 1), (1, 2), (2, 3), (3, 7), (0, 4), (4, 5), (5, 6), (6, 8), (9, 10),
        (11, 12), (11, 13), (13, 15), (15, 17), (15, 19), (15, 21), (17, 19),
        (12, 14), (14, 16), (16, 18), (16, 20), (16, 22), (18, 20),
        (11, 23), (12, 24), (23, 24), (23, 25), (24, 26), (25, 27), (26, 28),
        (27, 29), (28, 30), (29, 31), (30, 32), (27, 31), (28, 32),
    ];
}

/// MediaPipe face mesh; only the outline is drawn.
pub mod face_mesh {
    pub const COUNT: usize = 468;

    pub const OVAL: &[(usize, usize)] = &[
        (10, 338), (338, 297), (297, 332), (332, 284), (284, 251), (251, 389),
        (389, 356), (356, 454), (454, 323), (323, 361), (361, 288), (288, 397),
        (397, 365), (365, 379), (379, 378), (378, 400), (400, 377), (377, 152),
        (152, 148), (148, 176), (176, 149), (149, 150), (150, 136), (136, 172),
        (172, 58), (58, 132), (132, 93), (93, 234), (234, 127), (127, 162),
        (162, 21), (21, 54), (54, 103), (103, 67), (67, 109), (109, 10),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_positions_come_with_landmarks() {
        let marks = vec![Landmark::new(0.5, 0.25); hand::COUNT];
        let det = Detection::new(DetectionKind::Hand, 0.9, None, marks, None, (640, 480));
        assert_eq!(det.positions.len(), hand::COUNT);
        assert_eq!(det.positions[0], PixelPoint::new(320, 120));
        assert!(det.as_hand().is_some());
    }

    #[test]
    fn short_hand_is_not_a_hand() {
        let marks = vec![Landmark::new(0.1, 0.1); 5];
        let det = Detection::new(DetectionKind::Hand, 0.9, None, marks, None, (10, 10));
        assert!(det.as_hand().is_none());
    }

    #[test]
    fn topologies_stay_in_range() {
        for kind in [DetectionKind::Hand, DetectionKind::Pose, DetectionKind::FaceMesh] {
            let count = kind.landmark_count().unwrap();
            for &(a, b) in kind.connections() {
                assert!(a < count && b < count, "{kind:?} edge ({a}, {b})");
            }
        }
        assert_eq!(pose::CONNECTIONS.len(), 35);
    }

    #[test]
    fn face_box_scales_to_frame() {
        let b = RelativeBox { x: 0.25, y: 0.5, width: 0.5, height: 0.25 };
        assert_eq!(b.to_pixels(200, 100), PixelBox { x: 50, y: 50, width: 100, height: 25 });
    }
}
