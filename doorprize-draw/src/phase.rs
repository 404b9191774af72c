//! Visual phases of a draw and the timeline that drives them.
//!
//! The highlight path is decorative. It is generated from its own random
//! stream and never consults the winner order, so watching the highlight
//! reveals nothing about who will be drawn.

use crate::config::DrawTiming;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Sweeping,
    Highlighting,
    Settling,
    Revealing,
    Done,
    Cancelled,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Cancelled)
    }

    /// A session in this phase still has timers pending.
    pub fn is_running(self) -> bool {
        !matches!(self, Phase::Idle | Phase::Done | Phase::Cancelled)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Sweeping => "sweeping",
            Phase::Highlighting => "highlighting",
            Phase::Settling => "settling",
            Phase::Revealing => "revealing",
            Phase::Done => "done",
            Phase::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Position of the attention sweep; `progress` runs from 0.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepFrame {
    pub repetition: u32,
    pub progress: f32,
}

/// Normalized sweep position `elapsed` into a sweep lasting `duration`.
pub fn sweep_position(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0) as f32
}

/// Random jumps followed by one sequential pass over every index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightPath {
    jumps: Vec<usize>,
    pool_size: usize,
}

impl HighlightPath {
    pub fn random<R: Rng + ?Sized>(pool_size: usize, jump_count: usize, rng: &mut R) -> Self {
        let jumps = if pool_size == 0 {
            Vec::new()
        } else {
            (0..jump_count).map(|_| rng.random_range(0..pool_size)).collect()
        };
        Self { jumps, pool_size }
    }

    pub fn jumps(&self) -> &[usize] {
        &self.jumps
    }

    /// Number of highlight ticks.
    pub fn len(&self) -> usize {
        self.jumps.len() + self.pool_size
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index_at(&self, tick: usize) -> Option<usize> {
        match tick.checked_sub(self.jumps.len()) {
            None => Some(self.jumps[tick]),
            Some(pass) if pass < self.pool_size => Some(pass),
            Some(_) => None,
        }
    }
}

/// Highlighted index for `tick` ticks into `phase`. Only the highlight
/// phase ever shows one.
pub fn highlighted_index(phase: Phase, tick: usize, path: &HighlightPath) -> Option<usize> {
    match phase {
        Phase::Highlighting => path.index_at(tick),
        _ => None,
    }
}

/// One step of the visual timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    Sweep(SweepFrame),
    /// Step `tick` along the session's [`HighlightPath`].
    Highlight { tick: usize },
    Settle,
    BeginReveal,
}

/// Plans the pre-reveal timeline for one session.
#[derive(Debug, Clone)]
pub struct PhaseSequencer {
    timing: DrawTiming,
    path: HighlightPath,
}

impl PhaseSequencer {
    /// Seeds the highlight path from the OS, apart from the permutation source.
    pub fn new(pool_size: usize, timing: &DrawTiming) -> Self {
        Self::with_rng(pool_size, timing, &mut StdRng::from_os_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(pool_size: usize, timing: &DrawTiming, rng: &mut R) -> Self {
        let path = HighlightPath::random(pool_size, timing.highlight_jumps as usize, rng);
        Self {
            timing: timing.clone(),
            path,
        }
    }

    pub fn highlight_path(&self) -> &HighlightPath {
        &self.path
    }

    pub fn highlight_start(&self) -> Duration {
        self.timing.sweep_duration() * self.timing.sweep_repetitions
    }

    pub fn settle_start(&self) -> Duration {
        self.highlight_start() + self.timing.highlight_duration()
    }

    pub fn reveal_start(&self) -> Duration {
        self.settle_start() + self.timing.settle_duration()
    }

    /// Every visual cue with its offset from session start, in firing order.
    pub fn timeline(&self) -> Vec<(Duration, Cue)> {
        let mut cues = Vec::with_capacity(self.path.len() + 64);
        self.push_sweeps(&mut cues);
        self.push_highlights(&mut cues);
        cues.push((self.settle_start(), Cue::Settle));
        cues.push((self.reveal_start(), Cue::BeginReveal));
        cues
    }

    fn push_sweeps(&self, cues: &mut Vec<(Duration, Cue)>) {
        let duration = self.timing.sweep_duration();
        let frames = self.timing.sweep_frames();

        for repetition in 0..self.timing.sweep_repetitions {
            let base = duration * repetition;
            for frame in 0..=frames {
                let elapsed = duration * frame / frames;
                cues.push((
                    base + elapsed,
                    Cue::Sweep(SweepFrame {
                        repetition,
                        progress: sweep_position(elapsed, duration),
                    }),
                ));
            }
        }
    }

    fn push_highlights(&self, cues: &mut Vec<(Duration, Cue)>) {
        let start = self.highlight_start();
        let mut offset = Duration::ZERO;

        for tick in 0..self.path.jumps().len() {
            cues.push((start + offset, Cue::Highlight { tick }));
            offset += self.timing.jump_interval(tick as u32);
        }

        // the pass shares whatever the jumps left, so its length does not grow with the pool
        let pass_start = start + offset;
        let budget = self.timing.highlight_duration().saturating_sub(offset).as_nanos();
        let pool_size = self.path.pool_size as u128;
        let jumps = self.path.jumps().len();

        for index in 0..self.path.pool_size {
            let at = Duration::from_nanos((budget * index as u128 / pool_size) as u64);
            cues.push((pass_start + at, Cue::Highlight { tick: jumps + index }));
        }
    }
}
