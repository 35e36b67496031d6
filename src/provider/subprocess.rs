// External detector process.
// Protocol: the helper prints READY once it has loaded its model. For every
// frame we write width, height and channel count (u32 little-endian each)
// followed by packed RGB bytes; it answers with one JSON line.
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::config::DetectorConfig;
use crate::error::Error;
use crate::landmark::{DetectionKind, Detections};
use crate::provider::{LandmarkProvider, parse_frame, reply_text};
use crate::types::FrameBuffer;

const CHANNELS: u32 = 3;

pub struct SubprocessProvider {
    kind: DetectionKind,
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    min_score: f32,
    line: Vec<u8>,
}

/// Detector settings as command-line flags appended to the helper command.
pub fn detector_args(kind: DetectionKind, config: &DetectorConfig) -> Vec<String> {
    let mut args = vec![
        "--kind".to_owned(),
        kind.as_str().to_owned(),
        "--max-hands".to_owned(),
        config.max_hands.to_string(),
        "--model-complexity".to_owned(),
        config.model_complexity.to_string(),
        "--detect-confidence".to_owned(),
        config.detect_confidence.to_string(),
        "--track-confidence".to_owned(),
        config.track_confidence.to_string(),
    ];
    if config.static_mode {
        args.push("--static-mode".to_owned());
    }
    args
}

impl SubprocessProvider {
    /// Start `command` (program then arguments) and wait for it to report READY.
    pub fn spawn(command: &[String], kind: DetectionKind, config: &DetectorConfig) -> Result<Self, Error> {
        let (program, rest) =
            command.split_first().ok_or_else(|| Error::Provider("empty detector command".into()))?;

        log::info!("Starting landmark detector: {}", command.join(" "));
        let mut process = Command::new(program)
            .args(rest)
            .args(detector_args(kind, config))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Provider(format!("spawn {program}: {e}")))?;

        let (Some(stdin), Some(stdout)) = (process.stdin.take(), process.stdout.take()) else {
            let _ = process.kill();
            return Err(Error::Provider("detector pipes unavailable".into()));
        };
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        let read = stdout.read_line(&mut ready);
        if !matches!(read, Ok(n) if n > 0) || ready.trim() != "READY" {
            let _ = process.kill();
            let _ = process.wait();
            return Err(Error::Provider(format!("detector did not signal READY, got {:?}", ready.trim())));
        }
        log::info!("Landmark detector ready ({})", kind.as_str());

        Ok(Self { kind, process, stdin, stdout, min_score: config.detect_confidence, line: Vec::new() })
    }

    fn send(&mut self, frame: &FrameBuffer) -> std::io::Result<()> {
        self.stdin.write_all(&(frame.width as u32).to_le_bytes())?;
        self.stdin.write_all(&(frame.height as u32).to_le_bytes())?;
        self.stdin.write_all(&CHANNELS.to_le_bytes())?;
        self.stdin.write_all(&frame.to_rgb_bytes())?;
        self.stdin.flush()
    }
}

impl LandmarkProvider for SubprocessProvider {
    fn kind(&self) -> DetectionKind {
        self.kind
    }

    fn detect(&mut self, frame: &FrameBuffer) -> Result<Detections, Error> {
        self.send(frame).map_err(|e| Error::Provider(format!("write frame: {e}")))?;

        self.line.clear();
        let n = self
            .stdout
            .read_until(b'\n', &mut self.line)
            .map_err(|e| Error::Provider(format!("read reply: {e}")))?;
        if n == 0 {
            return Err(Error::Provider("detector exited".into()));
        }
        parse_frame(reply_text(&self.line)?, (frame.width, frame.height), self.min_score)
    }
}

impl Drop for SubprocessProvider {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    #[test]
    fn flags_follow_config() {
        let config = DetectorConfig { static_mode: true, max_hands: 1, ..DetectorConfig::default() };
        let args = detector_args(DetectionKind::Hand, &config);
        assert_eq!(&args[..4], ["--kind", "hand", "--max-hands", "1"]);
        assert!(args.contains(&"0.5".to_owned()));
        assert_eq!(args.last().map(String::as_str), Some("--static-mode"));
    }

    #[test]
    fn round_trip_through_helper() {
        // 2x1 frame: 12 header bytes + 6 pixel bytes
        let script = r#"echo READY; head -c 18 > /dev/null; echo '{"detections":[{"kind":"face","score":0.9,"bbox":{"x":0,"y":0,"width":1,"height":1}}]}'"#;
        let mut provider =
            SubprocessProvider::spawn(&sh(script), DetectionKind::Face, &DetectorConfig::default()).unwrap();
        let frame = FrameBuffer::filled(2, 1, 0x00FF_FFFF);
        let dets = provider.detect(&frame).unwrap();
        assert_eq!(dets.entities.len(), 1);
        assert_eq!(dets.entities[0].bbox.unwrap().width, 2);
    }

    #[test]
    fn garbled_reply_skips_only_that_frame() {
        let script = r#"echo READY; head -c 18 > /dev/null; printf '\377\n'; head -c 18 > /dev/null; echo '{"detections":[]}'"#;
        let mut provider =
            SubprocessProvider::spawn(&sh(script), DetectionKind::Hand, &DetectorConfig::default()).unwrap();
        let frame = FrameBuffer::filled(2, 1, 0);
        assert!(matches!(provider.detect(&frame), Err(Error::Protocol(_))));
        assert!(provider.detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn missing_ready_is_an_error() {
        let result = SubprocessProvider::spawn(&sh("echo hello"), DetectionKind::Hand, &DetectorConfig::default());
        assert!(matches!(result, Err(Error::Provider(_))));
    }

    #[test]
    fn empty_command_is_an_error() {
        let result = SubprocessProvider::spawn(&[], DetectionKind::Hand, &DetectorConfig::default());
        assert!(matches!(result, Err(Error::Provider(_))));
    }
}
