// Displayed frame rate, smoothed over the last few frames.

use std::collections::VecDeque;
use std::time::Instant;

/// Number of instantaneous rates averaged for display.
pub const DEFAULT_WINDOW: usize = 10;

/// Moving average of instantaneous frame rates.
///
/// All values are weighted equally. The first call has nothing to compare
/// against and reports no rate.
#[derive(Clone, Debug)]
pub struct FrameRate {
    history: VecDeque<f32>,
    /// Max. number of rates to keep in the history.
    history_size: usize,
    last: Option<Instant>,
}

impl FrameRate {
    pub fn new(history_size: usize) -> Self {
        let history_size = history_size.max(1);
        Self { history: VecDeque::with_capacity(history_size), history_size, last: None }
    }

    /// Record a frame finished at `now` and return the smoothed rate.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let prev = self.last.replace(now)?;
        let dt = now.saturating_duration_since(prev).as_secs_f32();
        if dt > 0.0 {
            self.history.push_back(1.0 / dt);
            if self.history.len() > self.history_size {
                self.history.pop_front();
            }
        }
        self.average()
    }

    pub fn average(&self) -> Option<f32> {
        if self.history.is_empty() {
            return None;
        }
        let factor = 1.0 / self.history.len() as f32;
        Some(self.history.iter().fold(0.0, |acc, v| acc + v * factor))
    }

    /// HUD text; shows 0 until a rate exists.
    pub fn label(&self) -> String {
        format!("FPS: {}", self.average().unwrap_or(0.0) as u32)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
