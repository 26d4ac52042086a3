use crate::area::{AreaResult, ComputeAreas};
use crate::clip::HalveShapes;
use crate::config::EngineConfig;
use crate::cut::CutPrimitive;
use crate::error::{CutError, Result};
use crate::math::Point2;
use crate::raster::Rasterize;
use crate::shape::ShapeStore;

use super::{CutListener, CutMechanic, Drag, GameSession};

/// Where a [`CutSession`] is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutPhase {
    /// Waiting for a press.
    Idle,
    /// Pointer is down and a primitive is being drawn.
    Drawing,
    /// The final primitive is being measured against the shapes.
    Validating,
    /// The last attempt was a valid cut.
    Resolved,
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum CutOutcome {
    /// A valid cut; the result was recorded and passed to the listener.
    Resolved(AreaResult),
    /// A refused attempt; the shapes are untouched and no attempt was
    /// consumed.
    Rejected(CutError),
}

/// Per-attempt interaction state machine for one mechanic.
///
/// `Idle -> Drawing -> Validating -> Resolved`, with rejected and cancelled
/// attempts going back to `Idle`. The shapes are snapshotted on press so a
/// running animation cannot change what is being cut.
#[derive(Debug)]
pub struct CutSession {
    mechanic: CutMechanic,
    phase: CutPhase,
    drag: Option<Drag>,
    preview: Option<CutPrimitive>,
    snapshot: Option<ShapeStore>,
    paused_rotation: bool,
    cuts_made: u32,
    max_cuts: u32,
}

impl CutSession {
    /// Creates an idle session for `mechanic`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::HalvingRequiresLine` for a halving mechanic
    /// that does not wrap a line.
    pub fn new(mechanic: CutMechanic, config: &EngineConfig) -> Result<Self> {
        mechanic.validate()?;
        let max_cuts = mechanic.max_cuts(config);
        Ok(Self {
            mechanic,
            phase: CutPhase::Idle,
            drag: None,
            preview: None,
            snapshot: None,
            paused_rotation: false,
            cuts_made: 0,
            max_cuts,
        })
    }

    #[must_use]
    pub fn mechanic(&self) -> &CutMechanic {
        &self.mechanic
    }

    #[must_use]
    pub fn phase(&self) -> CutPhase {
        self.phase
    }

    /// Valid cuts made since the last [`CutSession::reset`].
    #[must_use]
    pub fn cuts_made(&self) -> u32 {
        self.cuts_made
    }

    #[must_use]
    pub fn max_cuts(&self) -> u32 {
        self.max_cuts
    }

    /// Returns `true` once every allowed cut has been made.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cuts_made >= self.max_cuts
    }

    /// Latest preview primitive while drawing.
    #[must_use]
    pub fn preview(&self) -> Option<&CutPrimitive> {
        self.preview.as_ref()
    }

    /// Starts drawing at `point`.
    ///
    /// Captures the current shapes and pauses a running rotation. A second
    /// press while drawing is a secondary input and cancels the attempt.
    ///
    /// # Errors
    ///
    /// Returns `CutError::SessionComplete` once every allowed cut has been
    /// made.
    pub fn pointer_down(&mut self, point: Point2, game: &mut GameSession) -> Result<()> {
        if self.phase == CutPhase::Drawing {
            self.cancel_current_cut(game);
            return Ok(());
        }
        if self.is_complete() {
            return Err(CutError::SessionComplete {
                max_cuts: self.max_cuts,
            }
            .into());
        }
        self.snapshot = Some(game.shapes().clone());
        self.paused_rotation = game.pause_rotation();
        self.drag = Some(self.mechanic.on_start(point));
        self.preview = None;
        self.phase = CutPhase::Drawing;
        tracing::trace!(x = point.x, y = point.y, "cut started");
        Ok(())
    }

    /// Tracks the pointer. Returns the preview primitive when there is one;
    /// moves outside a drag are ignored.
    pub fn pointer_move(&mut self, point: Point2, game: &GameSession) -> Option<&CutPrimitive> {
        if self.phase != CutPhase::Drawing {
            return None;
        }
        let drag = self.drag.as_mut()?;
        self.preview = self.mechanic.on_move(drag, point, game.config());
        self.preview.as_ref()
    }

    /// Finishes the drag at `point`, validates the cut and reports it.
    ///
    /// Valid cuts are recorded in `game`; halving cuts also replace its
    /// shapes with the larger half. Rotation stays paused after a valid cut
    /// until the caller resumes it, and resumes by itself after a refused
    /// one.
    ///
    /// # Errors
    ///
    /// Returns `CutError::NotDrawing` if no drag is in progress, or a raster
    /// error if the configured canvas cannot be rendered.
    pub fn pointer_up(
        &mut self,
        point: Point2,
        game: &mut GameSession,
        listener: &mut dyn CutListener,
    ) -> Result<CutOutcome> {
        if self.phase != CutPhase::Drawing {
            return Err(CutError::NotDrawing.into());
        }
        let (Some(mut drag), Some(snapshot)) = (self.drag.take(), self.snapshot.take()) else {
            self.back_to_idle(game);
            return Err(CutError::NotDrawing.into());
        };
        drag.current = point;
        self.preview = None;

        let config = game.config().clone();
        let primitive = match self.mechanic.on_end(&drag, &config) {
            Ok(primitive) => primitive,
            Err(reason) => return Ok(self.reject(reason, game, listener)),
        };

        self.phase = CutPhase::Validating;
        let result = match measure(&primitive, &snapshot, &config) {
            Ok(result) => result,
            Err(e) => {
                self.back_to_idle(game);
                return Err(e);
            }
        };
        if let Err(reason) = result.validate(config.min_split_percentage) {
            return Ok(self.reject(reason, game, listener));
        }

        self.cuts_made += 1;
        self.paused_rotation = false;
        self.phase = CutPhase::Resolved;
        game.record_cut(result);
        tracing::debug!(
            side_a = result.side_a_percentage,
            side_b = result.side_b_percentage,
            cut = self.cuts_made,
            "cut resolved"
        );

        if self.mechanic.is_halving() {
            let kept = HalveShapes::from_primitive(&primitive, result.larger())?
                .with_min_area(config.min_clip_area)
                .execute(&snapshot);
            game.replace_shapes(kept.clone());
            listener.on_cut_resolved(&result, Some(&kept));
        } else {
            listener.on_cut_resolved(&result, None);
        }
        Ok(CutOutcome::Resolved(result))
    }

    /// Discards the attempt in progress and restores the pre-drawing state.
    /// Does nothing unless drawing.
    pub fn cancel_current_cut(&mut self, game: &mut GameSession) {
        if self.phase != CutPhase::Drawing {
            return;
        }
        self.back_to_idle(game);
        tracing::debug!("cut cancelled");
    }

    /// Makes the session accept a fresh set of cuts, e.g. for the next
    /// shape. An attempt in progress is discarded as if cancelled.
    pub fn reset(&mut self, game: &mut GameSession) {
        self.back_to_idle(game);
        self.cuts_made = 0;
    }

    fn reject(
        &mut self,
        reason: CutError,
        game: &mut GameSession,
        listener: &mut dyn CutListener,
    ) -> CutOutcome {
        self.back_to_idle(game);
        tracing::debug!(%reason, "cut rejected");
        listener.on_cut_rejected(&reason);
        CutOutcome::Rejected(reason)
    }

    fn back_to_idle(&mut self, game: &mut GameSession) {
        self.phase = CutPhase::Idle;
        self.drag = None;
        self.preview = None;
        self.snapshot = None;
        if std::mem::take(&mut self.paused_rotation) {
            game.resume_rotation();
        }
    }
}

fn measure(
    primitive: &CutPrimitive,
    shapes: &ShapeStore,
    config: &EngineConfig,
) -> Result<AreaResult> {
    let buffer = Rasterize::from_config(config).execute(shapes)?;
    Ok(ComputeAreas::new(primitive)
        .with_sentinel(config.fill_sentinel)
        .with_tolerance(config.sentinel_tolerance)
        .execute(&buffer))
}
