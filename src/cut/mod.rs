mod classify;
mod primitive;

pub use classify::RegionClassifier;
pub use primitive::{extend_to_bounds, CutPrimitive, LineConstraint};

/// Geometric side of a cut.
///
/// `A` is the positive half-plane of a line (see
/// [`half_plane_value`](crate::math::intersect_2d::half_plane_value)) or the
/// interior of a closed primitive. `B` is everything else, including points
/// exactly on a line, so no pixel is ever counted twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The other side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}
