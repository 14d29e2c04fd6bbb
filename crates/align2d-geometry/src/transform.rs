use glam::DVec2;

use crate::pointset::PointSet;

/// Number of free parameters of a [`Similarity2`].
pub const NUM_PARAMS: usize = 4;

/// A 2D similarity transformation (uniform scale, rotation, translation)
/// parameterized by four reals.
///
/// The linear part is stored as a deviation `(a, b)` from the identity:
///
/// ```text
/// x' = tx + (1 + a) * x - b * y
/// y' = ty + b * x + (1 + a) * y
/// ```
///
/// so the all-zero parameter vector is the identity map. The translation
/// terms `tx`/`ty` carry most of the expected magnitude; `a`/`b` encode
/// scale and rotation jointly and stay small for near-rigid alignments.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Similarity2 {
    /// Translation along x.
    pub tx: f64,
    /// Diagonal linear term, stored as a deviation from 1.
    pub a: f64,
    /// Off-diagonal linear term (rotation-like).
    pub b: f64,
    /// Translation along y.
    pub ty: f64,
}

impl Similarity2 {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        tx: 0.0,
        a: 0.0,
        b: 0.0,
        ty: 0.0,
    };

    /// Create a pure translation.
    pub fn from_translation(t: DVec2) -> Self {
        Self {
            tx: t.x,
            ty: t.y,
            ..Self::IDENTITY
        }
    }

    /// Create a transformation from its parameter vector `[tx, a, b, ty]`.
    pub fn from_params(params: [f64; NUM_PARAMS]) -> Self {
        Self {
            tx: params[0],
            a: params[1],
            b: params[2],
            ty: params[3],
        }
    }

    /// Get the parameter vector `[tx, a, b, ty]`.
    pub fn to_params(&self) -> [f64; NUM_PARAMS] {
        [self.tx, self.a, self.b, self.ty]
    }

    /// Uniform scale factor of the linear part.
    pub fn scale(&self) -> f64 {
        (1.0 + self.a).hypot(self.b)
    }

    /// Rotation angle of the linear part, in radians.
    pub fn angle(&self) -> f64 {
        self.b.atan2(1.0 + self.a)
    }

    /// Transform a single point.
    #[inline]
    pub fn transform_point(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            self.tx + (1.0 + self.a) * p.x - self.b * p.y,
            self.ty + self.b * p.x + (1.0 + self.a) * p.y,
        )
    }

    /// Apply the transformation to a point set, producing a new set of the
    /// same length.
    ///
    /// Pure function: two transforms with equal parameters produce identical
    /// output for the same input.
    pub fn apply(&self, input: &PointSet) -> PointSet {
        let points = input
            .points()
            .iter()
            .map(|p| self.transform_point(DVec2::from_array(*p)).to_array())
            .collect();
        PointSet::new(points)
    }
}
