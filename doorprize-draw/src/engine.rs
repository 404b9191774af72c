//! Owner of draw sessions.
//!
//! An engine runs at most one session at a time. Everything happens on the
//! current thread: the driver is a local task that sleeps until the next
//! timer, and every effect it applies is gated on the session generation it
//! was started for. A cancelled or replaced session therefore never emits
//! again, even if one of its timers was already due.

use crate::config::DrawTiming;
use crate::error::{DrawError, Result};
use crate::permutation::permute;
use crate::phase::{Phase, PhaseSequencer};
use crate::reveal::{celebrate, CelebrationHook};
use crate::scheduler::TimerQueue;
use crate::session::{Applied, DrawSession, SessionObserver, SessionSnapshot, Tick};
use doorprize_core::{Participant, ParticipantStore};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

struct EngineState {
    generation: u64,
    session: Option<DrawSession>,
    driver: Option<JoinHandle<()>>,
}

struct Shared {
    timing: DrawTiming,
    state: RefCell<EngineState>,
    observer: Box<dyn SessionObserver>,
    hook: Box<dyn CelebrationHook>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl Shared {
    // no RefCell borrow may be held here: observers are allowed to call back into the engine
    fn publish(&self, snapshot: SessionSnapshot) {
        self.snapshots.send_replace(snapshot.clone());
        self.observer.on_session_change(&snapshot);
    }

    fn is_active(&self) -> bool {
        self.state
            .borrow()
            .session
            .as_ref()
            .is_some_and(|s| s.phase().is_running())
    }

    /// The session started as `generation` is still the current one and was not cancelled.
    fn still_owns(&self, generation: u64) -> bool {
        self.state
            .borrow()
            .session
            .as_ref()
            .is_some_and(|s| s.generation() == generation && s.phase() != Phase::Cancelled)
    }

    fn cancel(&self) {
        let snapshot = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            let Some(session) = state.session.as_mut() else {
                return;
            };
            if !session.cancel() {
                return;
            }
            if let Some(driver) = state.driver.take() {
                driver.abort();
            }

            tracing::warn!(
                "Draw session {} cancelled after {} of {} reveals",
                session.generation(),
                session.revealed().len(),
                session.snapshot().requested
            );
            session.snapshot()
        };

        self.publish(snapshot);
    }

    /// Applies one due tick. Returns false once the driver should stop.
    fn fire(
        &self,
        generation: u64,
        fired_at: Duration,
        tick: Tick,
        timers: &mut TimerQueue<Tick>,
    ) -> bool {
        let applied = {
            let mut state = self.state.borrow_mut();
            match state.session.as_mut() {
                Some(session) if session.generation() == generation => {
                    session.apply(fired_at, tick)
                }
                _ => None,
            }
        };

        let Some(Applied {
            snapshot,
            winner,
            follow_up,
        }) = applied
        else {
            return false;
        };

        if let Some(winner) = winner {
            tracing::debug!(
                "Draw session {} revealed winner {} of {}: {}",
                generation,
                snapshot.revealed.len(),
                snapshot.requested,
                winner
            );
            celebrate(&*self.hook, &winner);
            if !self.still_owns(generation) {
                return false;
            }
        }

        let done = snapshot.phase == Phase::Done;
        self.publish(snapshot);

        if done {
            tracing::info!("Draw session {} finished", generation);
            return false;
        }
        if let Some(next) = follow_up {
            timers.schedule(next, Tick::Reveal);
        }

        self.still_owns(generation)
    }
}

async fn drive(shared: Rc<Shared>, generation: u64, origin: Instant, sequencer: PhaseSequencer) {
    let mut timers = TimerQueue::new();
    for (at, cue) in sequencer.timeline() {
        timers.schedule(at, Tick::Visual(cue));
    }

    while let Some(next) = timers.next_due() {
        tokio::time::sleep_until(origin + next).await;

        let now = origin.elapsed();
        while let Some((fired_at, tick)) = timers.pop_due(now) {
            if !shared.fire(generation, fired_at, tick, &mut timers) {
                return;
            }
        }
    }
}

/// Cancels the engine's running session from anywhere on the same thread,
/// including from inside an observer or hook.
#[derive(Clone)]
pub struct CancelHandle {
    shared: Weak<Shared>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.cancel();
        }
    }
}

/// Runs animated draws for one presentation context.
///
/// The engine is deliberately `!Send`: sessions are driven by
/// [`tokio::task::spawn_local`], so [`DrawEngine::start`] must be called from
/// within a [`tokio::task::LocalSet`].
pub struct DrawEngine {
    shared: Rc<Shared>,
}

impl DrawEngine {
    pub fn new<O, H>(timing: DrawTiming, observer: O, hook: H) -> Result<Self>
    where
        O: SessionObserver + 'static,
        H: CelebrationHook + 'static,
    {
        timing.validate()?;

        let (snapshots, _) = watch::channel(SessionSnapshot::idle());
        Ok(Self {
            shared: Rc::new(Shared {
                timing,
                state: RefCell::new(EngineState {
                    generation: 0,
                    session: None,
                    driver: None,
                }),
                observer: Box::new(observer),
                hook: Box::new(hook),
                snapshots,
            }),
        })
    }

    pub fn timing(&self) -> &DrawTiming {
        &self.shared.timing
    }

    /// Starts a new session over a private copy of `pool`.
    ///
    /// Returns immediately; progress is delivered to the observer.
    ///
    /// # Panics
    ///
    /// Panics when called outside a [`tokio::task::LocalSet`].
    pub fn start(&self, pool: Vec<Participant>, requested: usize) -> Result<()> {
        if self.shared.is_active() {
            return Err(DrawError::SessionBusy);
        }

        if pool.is_empty() {
            return Err(DrawError::EmptyPool);
        }

        let pool_size = pool.len();
        if requested < 1 || requested > pool_size {
            return Err(DrawError::InvalidCount {
                requested,
                pool_size,
            });
        }

        let timing = &self.shared.timing;
        let permutation = permute(&pool);
        let sequencer = PhaseSequencer::new(pool_size, timing);
        let origin = Instant::now();

        let (generation, snapshot) = {
            let mut guard = self.shared.state.borrow_mut();
            let state = &mut *guard;
            state.generation += 1;

            let session = DrawSession::new(
                state.generation,
                pool,
                permutation,
                requested,
                timing.reveal_interval(),
                sequencer.highlight_path().clone(),
            );
            let snapshot = session.snapshot();
            state.session = Some(session);
            (state.generation, snapshot)
        };

        tracing::info!(
            "Draw session {} started: {} winners from {} participants",
            generation,
            requested,
            pool_size
        );
        self.shared.publish(snapshot);

        // the observer may already have cancelled
        if self.shared.still_owns(generation) {
            let driver = tokio::task::spawn_local(drive(
                self.shared.clone(),
                generation,
                origin,
                sequencer,
            ));
            self.shared.state.borrow_mut().driver = Some(driver);
        }

        Ok(())
    }

    /// Snapshots the store's roster with a single `list()` call, then starts.
    pub async fn start_from_store(
        &self,
        store: &dyn ParticipantStore,
        requested: usize,
    ) -> Result<()> {
        if self.shared.is_active() {
            return Err(DrawError::SessionBusy);
        }

        let pool = store.list().await?;
        self.start(pool, requested)
    }

    /// Cancels the running session. A no-op when nothing is running.
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            shared: Rc::downgrade(&self.shared),
        }
    }

    pub fn is_active(&self) -> bool {
        self.shared.is_active()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Full winner order of the latest session, for auditing once it is over.
    pub fn draw_order(&self) -> Option<Vec<Participant>> {
        self.shared
            .state
            .borrow()
            .session
            .as_ref()
            .map(|s| s.permutation().to_vec())
    }

    /// Pool snapshot of the latest session.
    pub fn pool(&self) -> Option<Vec<Participant>> {
        self.shared
            .state
            .borrow()
            .session
            .as_ref()
            .map(|s| s.pool().to_vec())
    }

    /// Resolves with the first snapshot in which no session is running.
    pub async fn wait_settled(&self) -> SessionSnapshot {
        let mut rx = self.shared.snapshots.subscribe();
        loop {
            let snapshot = rx.borrow_and_update().clone();
            if !snapshot.phase.is_running() {
                return snapshot;
            }
            if rx.changed().await.is_err() {
                return rx.borrow().clone();
            }
        }
    }
}

impl Drop for DrawEngine {
    fn drop(&mut self) {
        if let Ok(mut state) = self.shared.state.try_borrow_mut() {
            if let Some(driver) = state.driver.take() {
                driver.abort();
            }
        }
    }
}
