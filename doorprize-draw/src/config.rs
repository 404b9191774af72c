use crate::error::{DrawError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Durations of the visual phases and the reveal cadence, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawTiming {
    pub sweep_repetitions: u32,
    pub sweep_duration_ms: u64,
    pub sweep_frame_ms: u64,
    /// Total budget of the highlight phase, independent of pool size.
    pub highlight_duration_ms: u64,
    pub highlight_jumps: u32,
    pub jump_interval_start_ms: u64,
    pub jump_interval_end_ms: u64,
    pub settle_duration_ms: u64,
    pub reveal_interval_ms: u64,
}

const MAX_REVEAL_INTERVAL_MS: u64 = 60_000;
const MAX_PHASE_DURATION_MS: u64 = 60_000;
const MAX_SWEEP_REPETITIONS: u32 = 10;
const MAX_SWEEP_FRAMES: u64 = 600;
const MAX_HIGHLIGHT_JUMPS: u32 = 1_000;

impl Default for DrawTiming {
    fn default() -> Self {
        Self {
            sweep_repetitions: 2,
            sweep_duration_ms: 600,
            sweep_frame_ms: 50,
            highlight_duration_ms: 5_000,
            highlight_jumps: 12,
            jump_interval_start_ms: 120,
            jump_interval_end_ms: 40,
            settle_duration_ms: 500,
            reveal_interval_ms: 800,
        }
    }
}

impl DrawTiming {
    /// Compressed timings for rehearsals.
    pub fn fast() -> Self {
        Self {
            sweep_repetitions: 2,
            sweep_duration_ms: 200,
            sweep_frame_ms: 40,
            highlight_duration_ms: 1_500,
            highlight_jumps: 8,
            jump_interval_start_ms: 60,
            jump_interval_end_ms: 20,
            settle_duration_ms: 300,
            reveal_interval_ms: 400,
        }
    }

    pub fn sweep_duration(&self) -> Duration {
        Duration::from_millis(self.sweep_duration_ms)
    }

    pub fn sweep_frame(&self) -> Duration {
        Duration::from_millis(self.sweep_frame_ms)
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_duration_ms)
    }

    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_duration_ms)
    }

    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }

    /// Sweep frames per repetition, excluding the initial one.
    pub fn sweep_frames(&self) -> u32 {
        let frames = self.sweep_duration_ms / self.sweep_frame_ms.max(1);
        frames.clamp(1, MAX_SWEEP_FRAMES) as u32
    }

    /// Interval before random jump `step`, shrinking linearly from start to end.
    pub fn jump_interval(&self, step: u32) -> Duration {
        let start = self.jump_interval_start_ms.saturating_mul(1_000_000);
        let end = self.jump_interval_end_ms.saturating_mul(1_000_000);
        if self.highlight_jumps <= 1 || start <= end {
            return Duration::from_nanos(start);
        }

        let steps = u64::from(self.highlight_jumps - 1);
        let step = u64::from(step).min(steps);
        Duration::from_nanos(start - (start - end) * step / steps)
    }

    /// Time spent on random jumps before the sequential pass.
    pub fn jumps_total(&self) -> Duration {
        (0..self.highlight_jumps).map(|step| self.jump_interval(step)).sum()
    }

    pub fn validate(&self) -> Result<()> {
        if self.sweep_repetitions == 0 || self.sweep_repetitions > MAX_SWEEP_REPETITIONS {
            return Err(DrawError::timing(format!(
                "sweep repetitions must be between 1 and {}",
                MAX_SWEEP_REPETITIONS
            )));
        }

        for (name, value) in [
            ("sweep duration", self.sweep_duration_ms),
            ("highlight duration", self.highlight_duration_ms),
            ("settle duration", self.settle_duration_ms),
        ] {
            if value > MAX_PHASE_DURATION_MS {
                return Err(DrawError::timing(format!(
                    "{} cannot exceed {} ms",
                    name, MAX_PHASE_DURATION_MS
                )));
            }
        }

        if self.sweep_duration_ms == 0 || self.sweep_frame_ms == 0 {
            return Err(DrawError::timing("sweep durations must be greater than 0"));
        }

        if self.sweep_frame_ms > self.sweep_duration_ms {
            return Err(DrawError::timing("sweep frame cannot exceed the sweep duration"));
        }

        if self.sweep_duration_ms / self.sweep_frame_ms > MAX_SWEEP_FRAMES {
            return Err(DrawError::timing(format!(
                "a sweep cannot have more than {} frames",
                MAX_SWEEP_FRAMES
            )));
        }

        if self.highlight_jumps > MAX_HIGHLIGHT_JUMPS {
            return Err(DrawError::timing(format!(
                "highlight jumps cannot exceed {}",
                MAX_HIGHLIGHT_JUMPS
            )));
        }

        if self.jump_interval_end_ms == 0 || self.jump_interval_start_ms < self.jump_interval_end_ms {
            return Err(DrawError::timing(
                "jump intervals must be positive and non-increasing",
            ));
        }

        if self.jumps_total() >= self.highlight_duration() {
            return Err(DrawError::timing(
                "random jumps leave no time for the sequential pass",
            ));
        }

        if self.settle_duration_ms == 0 {
            return Err(DrawError::timing("settle duration must be greater than 0"));
        }

        if self.reveal_interval_ms == 0 || self.reveal_interval_ms > MAX_REVEAL_INTERVAL_MS {
            return Err(DrawError::timing(format!(
                "reveal interval must be between 1 and {} ms",
                MAX_REVEAL_INTERVAL_MS
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        DrawTiming::default().validate().unwrap();
        DrawTiming::fast().validate().unwrap();
    }

    #[test]
    fn test_jump_intervals_shrink() {
        let timing = DrawTiming::default();
        assert_eq!(timing.jump_interval(0), Duration::from_millis(120));
        assert_eq!(timing.jump_interval(timing.highlight_jumps - 1), Duration::from_millis(40));
        assert!(timing.jump_interval(3) > timing.jump_interval(4));
    }

    #[test]
    fn test_rejects_bad_timings() {
        let mut timing = DrawTiming::default();
        timing.reveal_interval_ms = 0;
        assert!(matches!(timing.validate(), Err(DrawError::InvalidTiming(_))));

        let mut timing = DrawTiming::default();
        timing.highlight_duration_ms = 500;
        assert!(timing.validate().is_err());

        let mut timing = DrawTiming::default();
        timing.jump_interval_start_ms = 10;
        assert!(timing.validate().is_err());

        let mut timing = DrawTiming::default();
        timing.sweep_repetitions = 0;
        assert!(timing.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_schedules() {
        let mut timing = DrawTiming::default();
        timing.sweep_duration_ms = 3_600_000;
        timing.sweep_frame_ms = 1;
        assert!(matches!(timing.validate(), Err(DrawError::InvalidTiming(_))));

        let mut timing = DrawTiming::default();
        timing.sweep_duration_ms = 60_000;
        timing.sweep_frame_ms = 1;
        assert!(timing.validate().is_err());

        let mut timing = DrawTiming::default();
        timing.highlight_duration_ms = 120_000;
        assert!(timing.validate().is_err());

        let mut timing = DrawTiming::default();
        timing.settle_duration_ms = 61_000;
        assert!(timing.validate().is_err());

        let mut timing = DrawTiming::default();
        timing.sweep_repetitions = 11;
        assert!(timing.validate().is_err());

        let mut timing = DrawTiming::default();
        timing.highlight_jumps = u32::MAX;
        assert!(timing.validate().is_err());
    }

    #[test]
    fn test_sweep_frames_follow_frame_interval() {
        assert_eq!(DrawTiming::default().sweep_frames(), 12);

        let mut timing = DrawTiming::default();
        timing.sweep_frame_ms = 1_000;
        assert_eq!(timing.sweep_frames(), 1);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let timing: DrawTiming = serde_json::from_str(r#"{"reveal_interval_ms": 1500}"#).unwrap();
        assert_eq!(timing.reveal_interval(), Duration::from_millis(1500));
        assert_eq!(timing.sweep_repetitions, 2);
    }
}
