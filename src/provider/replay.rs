// Recorded detector output, one JSON line per frame.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Error;
use crate::landmark::{DetectionKind, Detections};
use crate::provider::{LandmarkProvider, parse_frame, reply_text};
use crate::types::FrameBuffer;

pub struct ReplayProvider {
    kind: DetectionKind,
    source: Box<dyn BufRead>,
    min_score: f32,
    finished: bool,
    line: Vec<u8>,
}

impl ReplayProvider {
    pub fn open(path: &Path, kind: DetectionKind, min_score: f32) -> Result<Self, Error> {
        let file = File::open(path).map_err(|source| Error::Replay { path: path.to_owned(), source })?;
        log::info!("Replaying {} landmarks from {}", kind.as_str(), path.display());
        Ok(Self::from_reader(BufReader::new(file), kind, min_score))
    }

    pub fn from_reader(reader: impl BufRead + 'static, kind: DetectionKind, min_score: f32) -> Self {
        Self { kind, source: Box::new(reader), min_score, finished: false, line: Vec::new() }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl LandmarkProvider for ReplayProvider {
    fn kind(&self) -> DetectionKind {
        self.kind
    }

    /// Frames past the end of the recording are empty.
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Detections, Error> {
        let size = (frame.width, frame.height);
        if self.finished {
            return Ok(Detections::empty(size));
        }

        self.line.clear();
        if self.source.read_until(b'\n', &mut self.line)? == 0 {
            log::info!("Replay finished");
            self.finished = true;
            return Ok(Detections::empty(size));
        }
        let text = reply_text(&self.line)?;
        if text.trim().is_empty() {
            return Ok(Detections::empty(size));
        }
        parse_frame(text, size, self.min_score)
    }
}
