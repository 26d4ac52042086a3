use crate::area::AreaResult;
use crate::config::EngineConfig;
use crate::error::{Result, SessionError};
use crate::raster::Rasterize;
use crate::shape::{Shape, ShapeStore};

use super::{Clock, RotationAnimator, SystemClock};

/// Everything one puzzle needs between cuts: configuration, the shape set,
/// its unrotated baseline, rotation state and the cut history.
///
/// Passed explicitly into every [`CutSession`](super::CutSession) call.
pub struct GameSession {
    config: EngineConfig,
    original: ShapeStore,
    baseline: ShapeStore,
    current: ShapeStore,
    rotation: Option<RotationAnimator>,
    history: Vec<AreaResult>,
    clock: Box<dyn Clock>,
}

impl GameSession {
    /// Creates a session over `shapes`, timed by the system clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidConfig` if `config` fails validation.
    pub fn new(config: EngineConfig, shapes: ShapeStore) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            shapes = shapes.renderable_count(),
            markers = shapes.len() - shapes.renderable_count(),
            "game session created"
        );
        Ok(Self {
            config,
            original: shapes.clone(),
            baseline: shapes.clone(),
            current: shapes,
            rotation: None,
            history: Vec::new(),
            clock: Box::new(SystemClock::new()),
        })
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current time from the session clock, in milliseconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Shapes as they are now: rotated, clipped or both.
    #[must_use]
    pub fn shapes(&self) -> &ShapeStore {
        &self.current
    }

    /// The shapes the puzzle started with.
    #[must_use]
    pub fn original(&self) -> &ShapeStore {
        &self.original
    }

    /// Owned copy of the current shapes for rendering.
    #[must_use]
    pub fn shape_snapshot(&self) -> Vec<Shape> {
        self.current.snapshot()
    }

    /// Resolved cuts in play order.
    #[must_use]
    pub fn history(&self) -> &[AreaResult] {
        &self.history
    }

    pub fn record_cut(&mut self, result: AreaResult) {
        self.history.push(result);
    }

    #[must_use]
    pub fn rotation(&self) -> Option<&RotationAnimator> {
        self.rotation.as_ref()
    }

    /// Starts continuous rotation about the shapes' `rotation-center` marker,
    /// or the configured pivot when there is none.
    pub fn start_rotation(&mut self) {
        let center = self
            .original
            .rotation_center()
            .unwrap_or_else(|| self.config.rotation_pivot());
        let mut animator = RotationAnimator::new(center, self.config.rotation_speed);
        animator.start(self.clock.now());
        self.rotation = Some(animator);
    }

    /// Pauses rotation. Returns `true` if it was running.
    pub fn pause_rotation(&mut self) -> bool {
        let now = self.clock.now();
        self.rotation.as_mut().is_some_and(|r| r.pause(now))
    }

    /// Resumes a paused rotation. Returns `true` if it was paused.
    pub fn resume_rotation(&mut self) -> bool {
        let now = self.clock.now();
        self.rotation.as_mut().is_some_and(|r| r.resume(now))
    }

    pub fn stop_rotation(&mut self) {
        if let Some(rotation) = self.rotation.as_mut() {
            rotation.stop();
        }
    }

    /// Advances the rotation to the current time and recomputes the shapes
    /// from the baseline. Returns the new angle.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RotationNotRunning` if rotation was never
    /// started or is paused or stopped.
    pub fn tick(&mut self) -> Result<f64> {
        let rotation = self.rotation.as_ref().ok_or(SessionError::RotationNotRunning)?;
        let transform = rotation.tick(self.clock.now())?;
        self.current = transform.apply(&self.baseline);
        Ok(transform.angle())
    }

    /// Installs `shapes` as the new current set and rotation baseline, e.g.
    /// after a halving cut. The rotation angle restarts from zero so the
    /// shapes do not jump.
    pub fn replace_shapes(&mut self, shapes: ShapeStore) {
        let now = self.clock.now();
        if let Some(rotation) = self.rotation.as_mut() {
            rotation.rebase(now);
        }
        self.baseline = shapes.clone();
        self.current = shapes;
    }

    /// Restores the original shapes and clears the history. A running or
    /// paused rotation starts turning again from angle zero; a stopped one
    /// stays stopped.
    pub fn restart(&mut self) {
        self.baseline = self.original.clone();
        self.current = self.original.clone();
        self.history.clear();
        let now = self.clock.now();
        if let Some(rotation) = self.rotation.as_mut() {
            if rotation.is_running() || rotation.is_paused() {
                rotation.start(now);
            }
        }
        tracing::debug!("game session restarted");
    }

    /// Share of the original shape pixels still present, in percent.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured canvas cannot be rasterized.
    #[allow(clippy::cast_precision_loss)]
    pub fn remaining_percentage(&self) -> Result<f64> {
        let raster = Rasterize::from_config(&self.config);
        let sentinel = self.config.fill_sentinel;
        let tolerance = self.config.sentinel_tolerance;
        let original = raster
            .execute(&self.original)?
            .count_matching(sentinel, tolerance);
        if original == 0 {
            return Ok(0.0);
        }
        let current = raster
            .execute(&self.current)?
            .count_matching(sentinel, tolerance);
        Ok(current as f64 / original as f64 * 100.0)
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("config", &self.config)
            .field("shapes", &self.current.len())
            .field("rotation", &self.rotation)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}
