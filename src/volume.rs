// Pinch-to-volume: thumb/index distance → percentage → OS mixer.
//
// The mapping is a plain clamped linear interpolation. The OS side is one
// `VolumeSink` picked at startup; when none works the demo keeps running
// in display-only mode.

use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::VolumeConfig;
use crate::error::Error;
use crate::landmark::{Hand, hand};

/// Maps a pixel distance onto `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeMapping {
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for VolumeMapping {
    fn default() -> Self {
        Self { min_distance: 19.0, max_distance: 122.0 }
    }
}

impl VolumeMapping {
    /// Distances are measured in whole pixels; outside the range the result
    /// clamps to 0 or 100.
    pub fn percent(&self, distance: f32) -> f32 {
        let d = distance.trunc();
        if d <= self.min_distance {
            return 0.0;
        }
        if d >= self.max_distance {
            return 100.0;
        }
        (d - self.min_distance) / (self.max_distance - self.min_distance) * 100.0
    }
}

/// Thumb tip to index tip, in whole pixels.
pub fn pinch_distance(hand: &Hand<'_>) -> f32 {
    hand.pixel(hand::THUMB_TIP).distance_to(hand.pixel(hand::INDEX_TIP))
}

/// Something that can set the host's output volume.
pub trait VolumeSink {
    fn name(&self) -> &'static str;

    fn set_percent(&mut self, percent: f32) -> Result<(), Error>;

    fn current_percent(&mut self) -> Option<f32> {
        None
    }
}

/// No backend: the demo only shows the value.
pub struct DisplayOnly;

impl VolumeSink for DisplayOnly {
    fn name(&self) -> &'static str {
        "display only"
    }

    fn set_percent(&mut self, _percent: f32) -> Result<(), Error> {
        Ok(())
    }
}

/// ALSA/PulseAudio through the `amixer` command.
pub struct Amixer {
    device: String,
    control: String,
}

impl Amixer {
    pub fn new(device: impl Into<String>, control: impl Into<String>) -> Self {
        Self { device: device.into(), control: control.into() }
    }

    pub fn available() -> bool {
        probe("amixer", &["--version"])
    }

    fn run(&self, args: &[&str]) -> Result<String, Error> {
        let out = Command::new("amixer")
            .args(["-D", self.device.as_str()])
            .args(args)
            .output()
            .map_err(|e| Error::Volume { backend: "amixer", message: e.to_string() })?;
        if !out.status.success() {
            return Err(Error::Volume {
                backend: "amixer",
                message: String::from_utf8_lossy(&out.stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

impl VolumeSink for Amixer {
    fn name(&self) -> &'static str {
        "amixer"
    }

    fn set_percent(&mut self, percent: f32) -> Result<(), Error> {
        let level = format!("{}%", percent as u32);
        self.run(&["sset", &self.control, &level]).map(drop)
    }

    fn current_percent(&mut self) -> Option<f32> {
        let out = self.run(&["sget", &self.control]).ok()?;
        parse_amixer_percent(&out)
    }
}

/// First `[NN%]` in `amixer sget` output.
pub fn parse_amixer_percent(output: &str) -> Option<f32> {
    static LEVEL: OnceLock<Regex> = OnceLock::new();
    let re = LEVEL.get_or_init(|| Regex::new(r"\[(\d+)%\]").expect("static regex"));
    re.captures(output)?.get(1)?.as_str().parse().ok()
}

/// macOS through AppleScript.
pub struct Osascript;

impl Osascript {
    pub fn available() -> bool {
        probe("osascript", &["-e", "return 0"])
    }

    fn run(script: &str) -> Result<String, Error> {
        let out = Command::new("osascript")
            .args(["-e", script])
            .output()
            .map_err(|e| Error::Volume { backend: "osascript", message: e.to_string() })?;
        if !out.status.success() {
            return Err(Error::Volume {
                backend: "osascript",
                message: String::from_utf8_lossy(&out.stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

impl VolumeSink for Osascript {
    fn name(&self) -> &'static str {
        "osascript"
    }

    fn set_percent(&mut self, percent: f32) -> Result<(), Error> {
        Self::run(&format!("set volume output volume {}", percent as u32)).map(drop)
    }

    fn current_percent(&mut self) -> Option<f32> {
        Self::run("output volume of (get volume settings)").ok()?.trim().parse().ok()
    }
}

#[cfg(target_os = "windows")]
pub use endpoint::EndpointVolume;

#[cfg(target_os = "windows")]
mod endpoint {
    use windows::Win32::Media::Audio::Endpoints::IAudioEndpointVolume;
    use windows::Win32::Media::Audio::{IMMDeviceEnumerator, MMDeviceEnumerator, eConsole, eRender};
    use windows::Win32::System::Com::{CLSCTX_ALL, COINIT_MULTITHREADED, CoCreateInstance, CoInitializeEx};

    use super::VolumeSink;
    use crate::error::Error;

    /// Master volume of the default render device (Core Audio).
    pub struct EndpointVolume {
        volume: IAudioEndpointVolume,
    }

    impl EndpointVolume {
        pub fn open() -> windows::core::Result<Self> {
            // SAFETY: plain COM initialisation and activation on this thread.
            unsafe {
                CoInitializeEx(None, COINIT_MULTITHREADED).ok()?;
                let enumerator: IMMDeviceEnumerator = CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)?;
                let device = enumerator.GetDefaultAudioEndpoint(eRender, eConsole)?;
                let volume: IAudioEndpointVolume = device.Activate(CLSCTX_ALL, None)?;
                Ok(Self { volume })
            }
        }
    }

    impl VolumeSink for EndpointVolume {
        fn name(&self) -> &'static str {
            "endpoint volume"
        }

        fn set_percent(&mut self, percent: f32) -> Result<(), Error> {
            // SAFETY: `volume` is a live interface obtained in `open`.
            unsafe { self.volume.SetMasterVolumeLevelScalar(percent / 100.0, std::ptr::null()) }
                .map_err(|e| Error::Volume { backend: "endpoint volume", message: e.to_string() })
        }

        fn current_percent(&mut self) -> Option<f32> {
            // SAFETY: as above.
            unsafe { self.volume.GetMasterVolumeLevelScalar() }.ok().map(|v| v * 100.0)
        }
    }
}

fn probe(program: &str, args: &[&str]) -> bool {
    Command::new(program).args(args).output().map(|o| o.status.success()).unwrap_or(false)
}

/// Pick the backend for this platform, or display-only if it is unusable.
pub fn select_sink(config: &VolumeConfig) -> Box<dyn VolumeSink> {
    if !config.enabled {
        log::info!("Volume control disabled in config; display only");
        return Box::new(DisplayOnly);
    }

    #[cfg(target_os = "windows")]
    {
        match EndpointVolume::open() {
            Ok(sink) => return Box::new(sink),
            Err(e) => log::warn!("Core Audio endpoint unavailable: {e}"),
        }
    }

    if cfg!(target_os = "linux") && Amixer::available() {
        return Box::new(Amixer::new(config.device.clone(), config.control.clone()));
    }
    if cfg!(target_os = "macos") && Osascript::available() {
        return Box::new(Osascript);
    }

    log::warn!("No volume backend found (install alsa-utils on Linux); display only");
    Box::new(DisplayOnly)
}

/// Forwards percentages to a sink, skipping repeats and never failing.
pub struct VolumeControl {
    sink: Box<dyn VolumeSink>,
    last_sent: Option<u32>,
    failing: bool,
}

impl VolumeControl {
    pub fn new(sink: Box<dyn VolumeSink>) -> Self {
        Self { sink, last_sent: None, failing: false }
    }

    pub fn backend(&self) -> &'static str {
        self.sink.name()
    }

    pub fn current_percent(&mut self) -> Option<f32> {
        self.sink.current_percent()
    }

    /// Send `percent` unless the same whole percentage was sent last.
    pub fn update(&mut self, percent: f32) {
        let level = percent as u32;
        if self.last_sent == Some(level) {
            return;
        }
        match self.sink.set_percent(percent) {
            Ok(()) => {
                self.last_sent = Some(level);
                if self.failing {
                    log::info!("Volume backend {} recovered", self.sink.name());
                    self.failing = false;
                }
            }
            Err(e) => {
                // one warning per failure streak, retried on the next change
                if !self.failing {
                    log::warn!("{e}");
                    self.failing = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn mapping_clamps_at_calibration_range() {
        let m = VolumeMapping::default();
        assert_eq!(m.percent(0.0), 0.0);
        assert_eq!(m.percent(19.0), 0.0);
        assert_eq!(m.percent(122.0), 100.0);
        assert_eq!(m.percent(500.0), 100.0);
    }

    #[test]
    fn mapping_midpoint() {
        let m = VolumeMapping::default();
        // 70.5 px counts as 70 whole pixels
        assert_abs_diff_eq!(m.percent(70.5), 49.5, epsilon = 0.05);
        assert_abs_diff_eq!(m.percent(70.5), 49.4, epsilon = 0.15);
    }

    #[test]
    fn mapping_is_monotonic() {
        let m = VolumeMapping::default();
        let mut last = -1.0;
        for tenth in 0..1500 {
            let v = m.percent(tenth as f32 / 10.0);
            assert!(v >= last, "dropped at {}", tenth as f32 / 10.0);
            last = v;
        }
    }

    #[test]
    fn amixer_output_parses() {
        let out = "Simple mixer control 'Master',0\n  Front Left: Playback 42000 [64%] [on]\n  Front Right: Playback 42000 [64%] [on]\n";
        assert_eq!(parse_amixer_percent(out), Some(64.0));
        assert_eq!(parse_amixer_percent("no level here"), None);
    }

    struct Recorder {
        sent: Rc<RefCell<Vec<f32>>>,
        fail: bool,
    }

    impl VolumeSink for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn set_percent(&mut self, percent: f32) -> Result<(), Error> {
            if self.fail {
                return Err(Error::Volume { backend: "recorder", message: "nope".into() });
            }
            self.sent.borrow_mut().push(percent);
            Ok(())
        }
    }

    #[test]
    fn control_skips_repeats() {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let mut control = VolumeControl::new(Box::new(Recorder { sent: sent.clone(), fail: false }));
        control.update(50.2);
        control.update(50.9);
        control.update(51.0);
        assert_eq!(*sent.borrow(), vec![50.2, 51.0]);
    }

    #[test]
    fn control_survives_failing_sink() {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let mut control = VolumeControl::new(Box::new(Recorder { sent: sent.clone(), fail: true }));
        control.update(10.0);
        control.update(20.0);
        assert!(sent.borrow().is_empty());
        assert_eq!(control.backend(), "recorder");
    }

    #[test]
    fn disabled_config_is_display_only() {
        let cfg = VolumeConfig { enabled: false, ..VolumeConfig::default() };
        assert_eq!(select_sink(&cfg).name(), "display only");
    }
}
