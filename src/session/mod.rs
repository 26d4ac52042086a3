//! Interaction layer: mechanics, the per-cut state machine, the game context
//! and the rotation animation.

mod game;
mod machine;
mod mechanic;
mod rotation;

pub use game::GameSession;
pub use machine::{CutOutcome, CutPhase, CutSession};
pub use mechanic::{CutMechanic, Drag};
pub use rotation::RotationAnimator;

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::area::AreaResult;
use crate::error::CutError;
use crate::shape::ShapeStore;

/// Source of animation time, in milliseconds.
pub trait Clock {
    fn now(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Wall-clock time since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1_000.0
    }
}

/// Clock advanced by hand, for hosts that drive frames themselves and for
/// tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: f64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    pub fn advance(&self, millis: f64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Receives the outcome of every finished cut attempt.
pub trait CutListener {
    /// Called once per valid cut. `kept` is the reduced shape set for
    /// halving mechanics.
    fn on_cut_resolved(&mut self, result: &AreaResult, kept: Option<&ShapeStore>);

    /// Called when an attempt is refused; no attempt is consumed.
    fn on_cut_rejected(&mut self, reason: &CutError);
}

/// Ignores every callback.
impl CutListener for () {
    fn on_cut_resolved(&mut self, _: &AreaResult, _: Option<&ShapeStore>) {}

    fn on_cut_rejected(&mut self, _: &CutError) {}
}
