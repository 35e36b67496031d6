// Where landmarks come from.
//
// Detection itself happens outside this crate. A `LandmarkProvider` hands
// over one frame and gets back `Detections` with pixel positions already
// attached. Three providers exist:
//
// - `SubprocessProvider`: an external detector program speaking a small
//   stdin/stdout protocol (raw RGB in, one JSON line out).
// - `ReplayProvider`: the same JSON lines read from a recording.
// - `PointerProvider`: a hand synthesized from the mouse, so the hand
//   demos run with no detector installed.

pub mod pointer;
pub mod replay;
pub mod subprocess;

use serde::{Deserialize, Serialize};

use crate::draw::PointerSample;
use crate::error::Error;
use crate::landmark::{Detection, DetectionKind, Detections, Handedness, Landmark, RelativeBox};
use crate::types::FrameBuffer;

pub use pointer::PointerProvider;
pub use replay::ReplayProvider;
pub use subprocess::SubprocessProvider;

pub trait LandmarkProvider {
    /// What this provider is expected to find.
    fn kind(&self) -> DetectionKind;

    /// Run detection on one frame.
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Detections, Error>;

    /// Latest mouse state, offered before every `detect`. Most providers
    /// ignore it.
    fn observe_pointer(&mut self, _sample: Option<PointerSample>) {}
}

/// One detection as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireDetection {
    pub kind: DetectionKind,
    #[serde(default = "full_score")]
    pub score: f32,
    #[serde(default)]
    pub handedness: Option<Handedness>,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    #[serde(default)]
    pub bbox: Option<RelativeBox>,
}

fn full_score() -> f32 {
    1.0
}

/// How far past the frame edge, in frame sizes, a coordinate may lie.
const COORD_SLACK: f32 = 1.0;

fn coord_ok(v: f32) -> bool {
    v.is_finite() && (-COORD_SLACK..=1.0 + COORD_SLACK).contains(&v)
}

fn extent_ok(v: f32) -> bool {
    v.is_finite() && (0.0..=1.0 + COORD_SLACK).contains(&v)
}

impl WireDetection {
    /// Every coordinate finite and not far outside the frame.
    fn in_frame(&self) -> bool {
        let marks = self.landmarks.iter().all(|l| coord_ok(l.x) && coord_ok(l.y) && l.z.is_finite());
        let bbox = self
            .bbox
            .is_none_or(|b| coord_ok(b.x) && coord_ok(b.y) && extent_ok(b.width) && extent_ok(b.height));
        marks && bbox
    }
}

/// One reply line as text. Bytes that are not UTF-8 are a protocol error
/// like any other malformed line.
pub(crate) fn reply_text(bytes: &[u8]) -> Result<&str, Error> {
    std::str::from_utf8(bytes).map_err(|e| Error::Protocol(format!("reply is not UTF-8: {e}")))
}

/// One frame's answer from a detector.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireFrame {
    #[serde(default)]
    pub detections: Vec<WireDetection>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Decode one JSON line into detections for a frame of `frame_size`.
///
/// Detections scoring below `min_score` are dropped, as are sets whose
/// landmark count does not match their kind's topology and sets with
/// coordinates that are not finite or lie far off the frame. A detector-reported
/// error is logged and gives an empty frame.
pub fn parse_frame(line: &str, frame_size: (usize, usize), min_score: f32) -> Result<Detections, Error> {
    let line = line.trim();
    let wire: WireFrame =
        serde_json::from_str(line).map_err(|e| Error::Protocol(format!("{e} in {line:?}")))?;

    if let Some(error) = wire.error {
        log::warn!("Detector error: {error}");
        return Ok(Detections::empty(frame_size));
    }

    let entities = wire
        .detections
        .into_iter()
        .filter(|d| d.score >= min_score)
        .filter(|d| match d.kind.landmark_count() {
            Some(n) if d.landmarks.len() != n => {
                log::warn!("Expected {n} {} landmarks, got {}", d.kind.as_str(), d.landmarks.len());
                false
            }
            _ => true,
        })
        .filter(|d| {
            let ok = d.in_frame();
            if !ok {
                log::warn!("Dropping {} detection with out-of-range coordinates", d.kind.as_str());
            }
            ok
        })
        .map(|d| Detection::new(d.kind, d.score, d.handedness, d.landmarks, d.bbox, frame_size))
        .collect::<Vec<_>>();

    log::trace!("{} detection(s)", entities.len());
    Ok(Detections { frame_size, entities })
}
