/// Exponentially smoothed frame-time tracker behind the optional
/// `options.stats` readout.
#[derive(Debug, Default)]
pub(crate) struct FrameStats {
    smoothed_ms: f64,
}

/// Weight of the newest sample; the rest of the average decays.
const SMOOTH: f64 = 0.25;

impl FrameStats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Folds one frame duration (milliseconds) into the running average
    /// and returns the new value. Non-positive durations (timer
    /// granularity) count as 1 ms.
    pub(crate) fn record(&mut self, frame_ms: f64) -> f64 {
        let sample = if frame_ms > 0.0 { frame_ms } else { 1.0 };
        self.smoothed_ms = SMOOTH * sample + (1.0 - SMOOTH) * self.smoothed_ms;
        self.smoothed_ms
    }

    /// The readout string, rounded to a tenth of a millisecond.
    pub(crate) fn text(&self) -> String {
        format!("{:.1} ms", self.smoothed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_converges_towards_a_steady_input() {
        let mut stats = FrameStats::new();
        for _ in 0..64 {
            stats.record(16.0);
        }
        assert!((stats.record(16.0) - 16.0).abs() < 1e-3);
    }

    #[test]
    fn one_sample_carries_quarter_weight() {
        let mut stats = FrameStats::new();
        assert_eq!(stats.record(16.0), 4.0);
        assert_eq!(stats.record(16.0), 7.0);
    }

    #[test]
    fn zero_durations_count_as_one_millisecond() {
        let mut stats = FrameStats::new();
        assert_eq!(stats.record(0.0), 0.25);
        let mut stats = FrameStats::new();
        assert_eq!(stats.record(-5.0), 0.25);
    }

    #[test]
    fn text_rounds_to_tenths() {
        let mut stats = FrameStats::new();
        stats.record(50.0);
        assert_eq!(stats.text(), "12.5 ms");
    }
}
