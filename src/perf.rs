use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Frames per second, sampled over one-second windows.
#[derive(Debug, Default)]
pub struct FpsMeter {
    window_start: Option<Instant>,
    frames: u32,
    last: Option<u32>,
}

impl FpsMeter {
    pub const fn new() -> Self {
        Self {
            window_start: None,
            frames: 0,
            last: None,
        }
    }

    /// Counts one frame. Returns the rate when a window closes.
    pub fn record(&mut self, now: Instant) -> Option<u32> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        let elapsed = now.saturating_duration_since(start);
        if elapsed < WINDOW {
            return None;
        }
        let fps = (f64::from(self.frames) / elapsed.as_secs_f64()).round();
        let fps = fps.clamp(0.0, f64::from(u32::MAX)) as u32;
        self.frames = 0;
        self.window_start = Some(now);
        self.last = Some(fps);
        Some(fps)
    }

    pub fn reset(&mut self) {
        self.window_start = None;
        self.frames = 0;
    }

    pub const fn last(&self) -> Option<u32> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::FpsMeter;
    use std::time::{Duration, Instant};

    #[test]
    fn reports_once_per_window() {
        let mut meter = FpsMeter::new();
        let start = Instant::now();
        let mut reports = Vec::new();
        for frame in 0..=60u64 {
            let now = start + Duration::from_millis(frame * 1000 / 60);
            if let Some(fps) = meter.record(now) {
                reports.push(fps);
            }
        }
        assert_eq!(reports, vec![61]);
        assert_eq!(meter.last(), Some(61));
    }

    #[test]
    fn slow_frames_report_low_rate() {
        let mut meter = FpsMeter::new();
        let start = Instant::now();
        let mut last = None;
        for frame in 0..=20u64 {
            last = meter.record(start + Duration::from_millis(frame * 50)).or(last);
        }
        assert_eq!(last, Some(21));
    }
}
