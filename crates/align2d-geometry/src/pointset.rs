use glam::DVec2;

/// Errors produced by point set operations.
#[derive(thiserror::Error, Debug)]
pub enum PointSetError {
    /// Aggregate distance requested between sets of different lengths.
    #[error("point sets must have the same length (expected {expected}, got {actual})")]
    SizeMismatch {
        /// Length of the set the operation was called on.
        expected: usize,
        /// Length of the other set.
        actual: usize,
    },
}

/// An ordered set of 2D points.
///
/// The point order is fixed at construction. Derived sets produced during
/// registration (the transformed image of a source set, its matched-target
/// set) keep the same length and index correspondence as the source set.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    points: Vec<[f64; 2]>,
}

impl PointSet {
    /// Create a new point set from `[x, y]` coordinates.
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Self { points }
    }

    /// Get the number of points in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the set contains no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the set.
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Get point `i` as a math vector.
    #[inline]
    pub fn point(&self, i: usize) -> DVec2 {
        DVec2::from_array(self.points[i])
    }

    /// Arithmetic mean of the point coordinates.
    ///
    /// Returns [`DVec2::ZERO`] for an empty set.
    pub fn centroid(&self) -> DVec2 {
        if self.points.is_empty() {
            return DVec2::ZERO;
        }
        let sum = self
            .points
            .iter()
            .fold(DVec2::ZERO, |acc, p| acc + DVec2::from_array(*p));
        sum / self.points.len() as f64
    }

    /// Euclidean distance between point `i` of this set and point `j` of `other`.
    #[inline]
    pub fn distance_between(&self, i: usize, other: &PointSet, j: usize) -> f64 {
        self.point(i).distance(other.point(j))
    }

    /// Aggregate distance to another set of the same length.
    ///
    /// The aggregate is the sum of squared pairwise Euclidean distances
    /// `Σ ‖p_i − q_i‖²`. Robust-loss tuning constants and gradient step
    /// sizes downstream are calibrated against this scale.
    pub fn distance_to(&self, other: &PointSet) -> Result<f64, PointSetError> {
        if self.len() != other.len() {
            return Err(PointSetError::SizeMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        let dist = self
            .points
            .iter()
            .zip(other.points.iter())
            .map(|(p, q)| DVec2::from_array(*p).distance_squared(DVec2::from_array(*q)))
            .sum();
        Ok(dist)
    }
}
