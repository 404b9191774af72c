use crate::phase::{highlighted_index, Cue, HighlightPath, Phase, SweepFrame};
use crate::reveal::RevealCoordinator;
use doorprize_core::Participant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything the presentation layer may observe about a draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub highlighted_index: Option<usize>,
    pub sweep: Option<SweepFrame>,
    pub revealed: Vec<Participant>,
    pub requested: usize,
}

impl SessionSnapshot {
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            highlighted_index: None,
            sweep: None,
            revealed: Vec::new(),
            requested: 0,
        }
    }
}

/// Receives a snapshot after every state change of the owning engine.
pub trait SessionObserver {
    fn on_session_change(&self, snapshot: &SessionSnapshot);
}

impl<F> SessionObserver for F
where
    F: Fn(&SessionSnapshot),
{
    fn on_session_change(&self, snapshot: &SessionSnapshot) {
        self(snapshot)
    }
}

/// Observer that ignores every change.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoObserver;

impl SessionObserver for NoObserver {
    fn on_session_change(&self, _snapshot: &SessionSnapshot) {}
}

/// Timer payloads of a running session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Tick {
    Visual(Cue),
    Reveal,
}

/// Result of applying one tick.
pub(crate) struct Applied {
    pub snapshot: SessionSnapshot,
    pub winner: Option<Participant>,
    pub follow_up: Option<Duration>,
}

/// State of a single draw run, from its pool snapshot to its last reveal.
#[derive(Debug)]
pub struct DrawSession {
    generation: u64,
    pool: Vec<Participant>,
    phase: Phase,
    highlighted_index: Option<usize>,
    highlight_path: HighlightPath,
    sweep: Option<SweepFrame>,
    reveal: RevealCoordinator,
}

impl DrawSession {
    pub(crate) fn new(
        generation: u64,
        pool: Vec<Participant>,
        permutation: Vec<Participant>,
        requested: usize,
        reveal_interval: Duration,
        highlight_path: HighlightPath,
    ) -> Self {
        Self {
            generation,
            pool,
            phase: Phase::Sweeping,
            highlighted_index: None,
            highlight_path,
            sweep: None,
            reveal: RevealCoordinator::new(permutation, requested, reveal_interval),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pool(&self) -> &[Participant] {
        &self.pool
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted_index
    }

    pub fn revealed(&self) -> &[Participant] {
        self.reveal.revealed()
    }

    pub fn permutation(&self) -> &[Participant] {
        self.reveal.permutation()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            highlighted_index: self.highlighted_index,
            sweep: self.sweep,
            revealed: self.reveal.revealed().to_vec(),
            requested: self.reveal.requested(),
        }
    }

    pub(crate) fn cancel(&mut self) -> bool {
        if !self.phase.is_running() {
            return false;
        }
        self.phase = Phase::Cancelled;
        self.highlighted_index = None;
        self.sweep = None;
        true
    }

    /// Applies a tick that fired at `fired_at`. Returns `None` when the
    /// session no longer accepts ticks.
    pub(crate) fn apply(&mut self, fired_at: Duration, tick: Tick) -> Option<Applied> {
        if !self.phase.is_running() {
            return None;
        }

        let previous = self.phase;
        let mut winner = None;
        let mut follow_up = None;

        match tick {
            Tick::Visual(Cue::Sweep(frame)) => {
                self.phase = Phase::Sweeping;
                self.sweep = Some(frame);
            }
            Tick::Visual(Cue::Highlight { tick }) => {
                self.phase = Phase::Highlighting;
                self.sweep = None;
                self.highlighted_index = highlighted_index(self.phase, tick, &self.highlight_path);
            }
            Tick::Visual(Cue::Settle) => {
                self.phase = Phase::Settling;
                self.highlighted_index = None;
                self.sweep = None;
            }
            Tick::Visual(Cue::BeginReveal) => {
                self.phase = Phase::Revealing;
                follow_up = self.reveal.next_tick(fired_at);
            }
            Tick::Reveal => {
                if self.phase != Phase::Revealing {
                    return None;
                }
                winner = self.reveal.reveal_next().cloned();
                follow_up = self.reveal.next_tick(fired_at);
                if self.reveal.is_complete() {
                    self.phase = Phase::Done;
                }
            }
        }

        if self.phase != previous {
            tracing::debug!("Draw session {} entered {}", self.generation, self.phase);
        }

        Some(Applied {
            snapshot: self.snapshot(),
            winner,
            follow_up,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(requested: usize) -> DrawSession {
        let pool: Vec<Participant> = ["A", "B", "C"]
            .iter()
            .map(|n| Participant::new(n, "Unit").unwrap())
            .collect();
        let permutation = vec![pool[2].clone(), pool[0].clone(), pool[1].clone()];
        let path = HighlightPath::random(pool.len(), 2, &mut StdRng::seed_from_u64(7));
        DrawSession::new(1, pool, permutation, requested, Duration::from_millis(800), path)
    }

    #[test]
    fn test_highlight_follows_path() {
        let mut s = session(1);
        let jumps = s.highlight_path.jumps().to_vec();

        for (tick, &expected) in jumps.iter().enumerate() {
            let applied = s
                .apply(Duration::ZERO, Tick::Visual(Cue::Highlight { tick }))
                .unwrap();
            assert_eq!(applied.snapshot.highlighted_index, Some(expected));
        }

        // sequential pass starts right after the jumps
        for index in 0..3 {
            let applied = s
                .apply(Duration::ZERO, Tick::Visual(Cue::Highlight { tick: 2 + index }))
                .unwrap();
            assert_eq!(applied.snapshot.highlighted_index, Some(index));
        }
    }

    #[test]
    fn test_settle_clears_highlight() {
        let mut s = session(1);
        s.apply(Duration::ZERO, Tick::Visual(Cue::Highlight { tick: 4 }));
        assert_eq!(s.highlighted_index(), Some(2));

        let applied = s.apply(Duration::from_millis(10), Tick::Visual(Cue::Settle)).unwrap();
        assert_eq!(applied.snapshot.phase, Phase::Settling);
        assert_eq!(applied.snapshot.highlighted_index, None);
    }

    #[test]
    fn test_last_reveal_lands_with_done() {
        let mut s = session(2);
        let begin = s
            .apply(Duration::from_secs(7), Tick::Visual(Cue::BeginReveal))
            .unwrap();
        assert_eq!(begin.follow_up, Some(Duration::from_millis(7800)));

        let first = s.apply(Duration::from_millis(7800), Tick::Reveal).unwrap();
        assert_eq!(first.snapshot.phase, Phase::Revealing);
        assert_eq!(first.winner.as_ref().map(|w| w.name.as_str()), Some("C"));

        let second = s.apply(Duration::from_millis(8600), Tick::Reveal).unwrap();
        assert_eq!(second.snapshot.phase, Phase::Done);
        assert_eq!(second.snapshot.revealed.len(), 2);
        assert_eq!(second.follow_up, None);

        assert!(s.apply(Duration::from_secs(10), Tick::Reveal).is_none());
    }

    #[test]
    fn test_cancelled_session_ignores_ticks() {
        let mut s = session(1);
        assert!(s.cancel());
        assert!(!s.cancel());
        assert_eq!(s.phase(), Phase::Cancelled);
        assert!(s.apply(Duration::ZERO, Tick::Visual(Cue::Settle)).is_none());
    }

    #[test]
    fn test_reveal_tick_before_reveal_phase_is_ignored() {
        let mut s = session(1);
        assert!(s.apply(Duration::ZERO, Tick::Reveal).is_none());
        assert!(s.revealed().is_empty());
    }
}
