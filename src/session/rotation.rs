use crate::error::{Result, SessionError};
use crate::math::transform_2d::normalize_angle;
use crate::math::Point2;
use crate::shape::RigidTransform;

/// Continuous rotation of the shape set about a pivot.
///
/// The angle is always derived from elapsed time and an anchor, never
/// accumulated per frame, and is applied to an unrotated baseline.
#[derive(Debug, Clone, Copy)]
pub struct RotationAnimator {
    center: Point2,
    speed: f64,
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Stopped,
    Running { anchor_time: f64, anchor_angle: f64 },
    Paused { angle: f64 },
}

impl RotationAnimator {
    /// Creates a stopped animator.
    ///
    /// * `speed` - Radians per millisecond.
    #[must_use]
    pub fn new(center: Point2, speed: f64) -> Self {
        Self {
            center,
            speed,
            state: State::Stopped,
        }
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        self.center
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        matches!(self.state, State::Paused { .. })
    }

    /// Starts from angle zero at `now`.
    pub fn start(&mut self, now: f64) {
        self.state = State::Running {
            anchor_time: now,
            anchor_angle: 0.0,
        };
        tracing::debug!(now, "rotation started");
    }

    /// Freezes the current angle. Returns `true` if the animator was running.
    pub fn pause(&mut self, now: f64) -> bool {
        if !self.is_running() {
            return false;
        }
        let angle = self.angle(now);
        self.state = State::Paused { angle };
        tracing::debug!(angle, "rotation paused");
        true
    }

    /// Continues from the frozen angle. Returns `true` if the animator was
    /// paused.
    pub fn resume(&mut self, now: f64) -> bool {
        let State::Paused { angle } = self.state else {
            return false;
        };
        self.state = State::Running {
            anchor_time: now,
            anchor_angle: angle,
        };
        tracing::debug!(angle, "rotation resumed");
        true
    }

    pub fn stop(&mut self) {
        self.state = State::Stopped;
        tracing::debug!("rotation stopped");
    }

    /// Resets the angle to zero without changing whether it runs, for when
    /// the baseline is replaced by geometry that is already rotated.
    pub fn rebase(&mut self, now: f64) {
        self.state = match self.state {
            State::Running { .. } => State::Running {
                anchor_time: now,
                anchor_angle: 0.0,
            },
            State::Paused { .. } => State::Paused { angle: 0.0 },
            State::Stopped => State::Stopped,
        };
    }

    /// Angle at `now`, in `[0, 2π)`. Zero when stopped.
    #[must_use]
    pub fn angle(&self, now: f64) -> f64 {
        match self.state {
            State::Stopped => 0.0,
            State::Running {
                anchor_time,
                anchor_angle,
            } => normalize_angle(anchor_angle + (now - anchor_time) * self.speed),
            State::Paused { angle } => angle,
        }
    }

    /// Transform for the frame at `now`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RotationNotRunning` unless the animator is
    /// running.
    pub fn tick(&self, now: f64) -> Result<RigidTransform> {
        if !self.is_running() {
            return Err(SessionError::RotationNotRunning.into());
        }
        Ok(self.transform(now))
    }

    /// Transform for the angle at `now`, whatever the state.
    #[must_use]
    pub fn transform(&self, now: f64) -> RigidTransform {
        RigidTransform::new(self.center, self.angle(now))
    }
}
