use kiddo::immutable::float::kdtree::ImmutableKdTree;

use align2d_geometry::pointset::PointSet;

use crate::error::IcpError;

/// Strategy used for the nearest-neighbor search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatcherKind {
    /// Exhaustive O(N·M) scan over the target set.
    ///
    /// Deterministic: on exact distance ties the smallest target index wins.
    #[default]
    BruteForce,

    /// KD-tree accelerated search over the target set.
    ///
    /// Tie order on exactly equidistant targets follows the tree layout.
    KdTree,
}

/// Nearest-neighbor correspondences of a transformed source set into a
/// target set.
///
/// Recomputed wholesale on every outer iteration; never updated
/// incrementally.
#[derive(Debug, Clone)]
pub struct Correspondences {
    /// For each source index, the index of its nearest target point.
    ///
    /// The mapping need not be injective: several source points may share
    /// the same target.
    pub indices: Vec<usize>,
    /// The matched target points, copied out in source order.
    pub matched_targets: PointSet,
    /// Sum of the minimum Euclidean distances over all source points.
    pub total_error: f64,
}

/// Nearest-neighbor matcher against a fixed target set.
///
/// For [`MatcherKind::KdTree`] the tree over the target points is built
/// once at construction and reused across queries.
pub struct CorrespondenceFinder<'a> {
    target: &'a PointSet,
    kdtree: Option<ImmutableKdTree<f64, u32, 2, 32>>,
}

impl<'a> CorrespondenceFinder<'a> {
    /// Create a matcher for the given target set.
    ///
    /// Returns [`IcpError::NoTargetPoints`] if the target set is empty, so
    /// a query can never assign an invalid target index.
    pub fn new(target: &'a PointSet, kind: MatcherKind) -> Result<Self, IcpError> {
        if target.is_empty() {
            return Err(IcpError::NoTargetPoints);
        }
        let kdtree = match kind {
            MatcherKind::BruteForce => None,
            MatcherKind::KdTree => Some(ImmutableKdTree::new_from_slice(target.points())),
        };
        Ok(Self { target, kdtree })
    }

    /// Find the nearest target point for every point of `transformed_source`.
    pub fn find(&self, transformed_source: &PointSet) -> Correspondences {
        match &self.kdtree {
            Some(kdtree) => self.find_with_kdtree(transformed_source, kdtree),
            None => self.find_brute_force(transformed_source),
        }
    }

    fn find_brute_force(&self, transformed_source: &PointSet) -> Correspondences {
        let mut indices = Vec::with_capacity(transformed_source.len());
        let mut matched = Vec::with_capacity(transformed_source.len());
        let mut total_error = 0.0;

        for i in 0..transformed_source.len() {
            let mut best_dist = f64::INFINITY;
            let mut best_j = 0;
            for j in 0..self.target.len() {
                let dist = transformed_source.distance_between(i, self.target, j);
                if dist < best_dist {
                    best_dist = dist;
                    best_j = j;
                }
            }
            indices.push(best_j);
            matched.push(self.target.points()[best_j]);
            total_error += best_dist;
        }

        Correspondences {
            indices,
            matched_targets: PointSet::new(matched),
            total_error,
        }
    }

    fn find_with_kdtree(
        &self,
        transformed_source: &PointSet,
        kdtree: &ImmutableKdTree<f64, u32, 2, 32>,
    ) -> Correspondences {
        let mut indices = Vec::with_capacity(transformed_source.len());
        let mut matched = Vec::with_capacity(transformed_source.len());
        let mut total_error = 0.0;

        for point in transformed_source.points() {
            let nn = kdtree.nearest_one::<kiddo::SquaredEuclidean>(point);
            let j = nn.item as usize;
            indices.push(j);
            matched.push(self.target.points()[j]);
            // kiddo reports squared distances
            total_error += nn.distance.sqrt();
        }

        Correspondences {
            indices,
            matched_targets: PointSet::new(matched),
            total_error,
        }
    }
}
