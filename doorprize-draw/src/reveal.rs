use doorprize_core::Participant;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

/// Fire-and-forget effect run once per revealed winner (confetti, sound).
///
/// The returned error is only logged; it never alters the draw.
pub trait CelebrationHook {
    fn on_reveal(&self, winner: &Participant) -> anyhow::Result<()>;
}

impl<F> CelebrationHook for F
where
    F: Fn(&Participant) -> anyhow::Result<()>,
{
    fn on_reveal(&self, winner: &Participant) -> anyhow::Result<()> {
        self(winner)
    }
}

/// Hook that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCelebration;

impl CelebrationHook for NoCelebration {
    fn on_reveal(&self, _winner: &Participant) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Runs the hook, swallowing both errors and panics.
pub(crate) fn celebrate(hook: &dyn CelebrationHook, winner: &Participant) {
    match catch_unwind(AssertUnwindSafe(|| hook.on_reveal(winner))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("Celebration for {} failed: {:#}", winner, e),
        Err(_) => tracing::warn!("Celebration for {} panicked", winner),
    }
}

/// Hands out winners left to right from the permutation at a fixed cadence.
#[derive(Debug, Clone)]
pub struct RevealCoordinator {
    permutation: Vec<Participant>,
    requested: usize,
    revealed: Vec<Participant>,
    interval: Duration,
}

impl RevealCoordinator {
    /// `requested` must not exceed the permutation length.
    pub fn new(permutation: Vec<Participant>, requested: usize, interval: Duration) -> Self {
        debug_assert!(requested <= permutation.len());
        Self {
            requested: requested.min(permutation.len()),
            revealed: Vec::with_capacity(requested),
            permutation,
            interval,
        }
    }

    pub fn permutation(&self) -> &[Participant] {
        &self.permutation
    }

    pub fn revealed(&self) -> &[Participant] {
        &self.revealed
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_complete(&self) -> bool {
        self.revealed.len() >= self.requested
    }

    /// Offset of the tick following one fired at `fired_at`, if any remain.
    pub fn next_tick(&self, fired_at: Duration) -> Option<Duration> {
        (!self.is_complete()).then(|| fired_at + self.interval)
    }

    /// Appends the next winner in permutation order.
    pub fn reveal_next(&mut self) -> Option<&Participant> {
        if self.is_complete() {
            return None;
        }
        let winner = self.permutation[self.revealed.len()].clone();
        self.revealed.push(winner);
        self.revealed.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn pool(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .map(|name| Participant::new(name, "Unit").unwrap())
            .collect()
    }

    #[test]
    fn test_reveals_permutation_prefix_then_stops() {
        let permutation = pool(&["C", "A", "E", "B", "D"]);
        let mut reveal = RevealCoordinator::new(permutation.clone(), 3, Duration::from_millis(800));

        let mut fired_at = Duration::ZERO;
        let mut ticks = 0;
        while let Some(winner) = reveal.reveal_next() {
            assert_eq!(winner, &permutation[ticks]);
            ticks += 1;
            match reveal.next_tick(fired_at) {
                Some(next) => fired_at = next,
                None => break,
            }
        }

        assert_eq!(ticks, 3);
        assert!(reveal.is_complete());
        assert_eq!(reveal.revealed(), &permutation[..3]);
        assert_eq!(fired_at, Duration::from_millis(1600));
        assert!(reveal.reveal_next().is_none());
    }

    #[test]
    fn test_celebrate_swallows_failures() {
        let winner = Participant::new("John Doe", "IT").unwrap();
        let calls = Cell::new(0);

        let failing = |_: &Participant| -> anyhow::Result<()> {
            calls.set(calls.get() + 1);
            anyhow::bail!("speaker unplugged")
        };
        celebrate(&failing, &winner);

        let panicking = |_: &Participant| -> anyhow::Result<()> {
            calls.set(calls.get() + 1);
            panic!("confetti cannon jammed")
        };
        celebrate(&panicking, &winner);
        celebrate(&NoCelebration, &winner);

        assert_eq!(calls.get(), 2);
    }
}
