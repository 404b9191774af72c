//! Door-prize draw engine
//!
//! Picks `N` winners from a participant pool without replacement and walks
//! the presentation layer through a timed reveal: an attention sweep, a
//! decorative highlight cycle, a short settle and then one winner per
//! cadence tick. Winner order is fixed up front by a uniform permutation;
//! the animation never influences it.

pub mod config;
pub mod engine;
pub mod error;
pub mod permutation;
pub mod phase;
pub mod reveal;
pub mod scheduler;
pub mod session;

pub use config::DrawTiming;
pub use engine::{CancelHandle, DrawEngine};
pub use error::{DrawError, Result};
pub use permutation::{permute, permute_with};
pub use phase::{highlighted_index, HighlightPath, Phase, PhaseSequencer, SweepFrame};
pub use reveal::{CelebrationHook, NoCelebration, RevealCoordinator};
pub use scheduler::TimerQueue;
pub use session::{DrawSession, NoObserver, SessionObserver, SessionSnapshot};
