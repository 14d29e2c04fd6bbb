use align2d_geometry::{pointset::PointSet, transform::Similarity2};

use crate::correspondence::{CorrespondenceFinder, Correspondences, MatcherKind};
use crate::error::IcpError;
use crate::optimizer::{fit_similarity, GradientDescentParams};
use crate::robust::BeatonTukeyLoss;

/// Parameters of the similarity ICP loop.
#[derive(Debug, Clone)]
pub struct IcpParams {
    /// Number of outer match-then-fit iterations; fixed, no convergence
    /// test.
    pub outer_iterations: usize,
    /// Nearest-neighbor strategy for correspondence search.
    pub matcher: MatcherKind,
    /// Robust loss applied to the aggregate alignment distance.
    pub loss: BeatonTukeyLoss,
    /// Inner gradient descent settings.
    pub descent: GradientDescentParams,
}

impl Default for IcpParams {
    fn default() -> Self {
        Self {
            outer_iterations: 2,
            matcher: MatcherKind::default(),
            loss: BeatonTukeyLoss::default(),
            descent: GradientDescentParams::default(),
        }
    }
}

/// Result of the similarity ICP.
///
/// The transform maps the source frame onto the target frame. The derived
/// sets are a snapshot under the final transform, replaced wholesale each
/// run; the caller never observes partially updated state.
#[derive(Debug, Clone)]
pub struct IcpResult {
    /// Estimated similarity transform.
    pub transform: Similarity2,
    /// The source set under the final transform.
    pub transformed_source: PointSet,
    /// Nearest-neighbor correspondences of the final transformed source.
    pub correspondences: Correspondences,
    /// Number of outer iterations performed.
    pub num_iterations: usize,
}

/// Align `source` onto `target` with a robust similarity ICP.
///
/// Seeds the translation from the difference of the two centroids, then
/// alternates correspondence search and robust gradient-descent
/// re-estimation for a fixed number of outer iterations.
///
/// # Arguments
///
/// * `source` - Point set to be aligned. The two input sets may differ in
///   point count.
/// * `target` - Point set to align onto.
/// * `params` - Iteration counts, matcher strategy, loss and step settings.
///
/// # Returns
///
/// * `result` - The estimated transform together with the transformed
///   source set and the final correspondences.
///
/// Example:
///
/// ```
/// use align2d_geometry::pointset::PointSet;
/// use align2d_icp::{icp_similarity, IcpParams};
///
/// let source = PointSet::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
/// let target = PointSet::new(vec![[5.0, 0.0], [6.0, 0.0], [5.0, 1.0]]);
///
/// let result = icp_similarity(&source, &target, IcpParams::default())?;
///
/// assert_eq!(result.correspondences.indices, vec![0, 1, 2]);
/// assert!(result.correspondences.total_error < 0.1);
/// # Ok::<(), align2d_icp::IcpError>(())
/// ```
pub fn icp_similarity(
    source: &PointSet,
    target: &PointSet,
    params: IcpParams,
) -> Result<IcpResult, IcpError> {
    if source.is_empty() {
        return Err(IcpError::EmptySourceSet);
    }

    // rejects an empty target before any transform work
    let finder = CorrespondenceFinder::new(target, params.matcher)?;

    // warm start: the fixed descent budget is too small to recover a large
    // translation from scratch
    let mut transform = Similarity2::from_translation(target.centroid() - source.centroid());
    log::debug!("initial transform: {transform:?}");

    for i in 0..params.outer_iterations {
        let transformed = transform.apply(source);
        let correspondences = finder.find(&transformed);
        log::debug!(
            "iteration: {}, correspondence error: {}",
            i,
            correspondences.total_error
        );

        transform = fit_similarity(
            transform,
            source,
            &correspondences.matched_targets,
            &params.loss,
            &params.descent,
        )?;
    }

    // snapshot under the final transform
    let transformed_source = transform.apply(source);
    let correspondences = finder.find(&transformed_source);
    log::debug!(
        "estimated transform: {transform:?}, residual error: {}",
        correspondences.total_error
    );

    Ok(IcpResult {
        transform,
        transformed_source,
        correspondences,
        num_iterations: params.outer_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn translation_scenario() -> (PointSet, PointSet) {
        let source = PointSet::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        let target = PointSet::new(vec![[5.0, 0.0], [6.0, 0.0], [5.0, 1.0]]);
        (source, target)
    }

    #[test]
    fn test_pure_translation_end_to_end() -> Result<(), IcpError> {
        let (source, target) = translation_scenario();

        let result = icp_similarity(&source, &target, IcpParams::default())?;

        assert_eq!(result.correspondences.indices, vec![0, 1, 2]);
        assert!(result.correspondences.total_error < 0.1);
        assert_relative_eq!(result.transform.tx, 5.0, epsilon = 0.05);
        assert_relative_eq!(result.transform.ty, 0.0, epsilon = 0.05);
        assert_relative_eq!(result.transform.scale(), 1.0, epsilon = 1e-3);
        assert_eq!(result.num_iterations, 2);
        Ok(())
    }

    #[test]
    fn test_warm_start_seeds_centroid_difference() -> Result<(), IcpError> {
        let (source, target) = translation_scenario();

        // a zero-step descent budget leaves the seed untouched
        let params = IcpParams {
            outer_iterations: 1,
            descent: GradientDescentParams {
                iterations: 0,
                ..GradientDescentParams::default()
            },
            ..IcpParams::default()
        };

        let result = icp_similarity(&source, &target, params)?;

        assert_relative_eq!(result.transform.tx, 5.0, epsilon = 1e-12);
        assert_relative_eq!(result.transform.ty, 0.0, epsilon = 1e-12);
        assert_eq!(result.transform.a, 0.0);
        assert_eq!(result.transform.b, 0.0);
        Ok(())
    }

    #[test]
    fn test_identical_sets_stay_near_identity() -> Result<(), IcpError> {
        let set = PointSet::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);

        let result = icp_similarity(&set, &set, IcpParams::default())?;

        assert!(result.transform.tx.abs() < 0.05);
        assert!(result.transform.ty.abs() < 0.05);
        assert_relative_eq!(result.transform.scale(), 1.0, epsilon = 1e-3);
        assert!(result.correspondences.total_error < 0.1);
        Ok(())
    }

    #[test]
    fn test_empty_source_is_rejected() {
        let source = PointSet::new(vec![]);
        let target = PointSet::new(vec![[1.0, 1.0]]);
        assert!(matches!(
            icp_similarity(&source, &target, IcpParams::default()),
            Err(IcpError::EmptySourceSet)
        ));
    }

    #[test]
    fn test_empty_target_is_rejected_before_optimization() {
        let source = PointSet::new(vec![[0.0, 0.0], [1.0, 0.0]]);
        let target = PointSet::new(vec![]);
        assert!(matches!(
            icp_similarity(&source, &target, IcpParams::default()),
            Err(IcpError::NoTargetPoints)
        ));
    }

    #[test]
    fn test_kdtree_matcher_matches_brute_force() -> Result<(), IcpError> {
        let (source, target) = translation_scenario();

        let brute = icp_similarity(&source, &target, IcpParams::default())?;
        let tree = icp_similarity(
            &source,
            &target,
            IcpParams {
                matcher: MatcherKind::KdTree,
                ..IcpParams::default()
            },
        )?;

        assert_eq!(brute.correspondences.indices, tree.correspondences.indices);
        assert_relative_eq!(brute.transform.tx, tree.transform.tx, epsilon = 1e-9);
        assert_relative_eq!(brute.transform.ty, tree.transform.ty, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_derived_sets_keep_source_length() -> Result<(), IcpError> {
        let source = PointSet::new(vec![[0.0, 0.0], [2.0, 0.0], [0.0, 2.0], [2.0, 2.0], [1.0, 1.0]]);
        let target = PointSet::new(vec![[3.0, 3.0], [5.0, 3.0], [3.0, 5.0]]);

        let result = icp_similarity(&source, &target, IcpParams::default())?;

        assert_eq!(result.transformed_source.len(), source.len());
        assert_eq!(result.correspondences.matched_targets.len(), source.len());
        assert_eq!(result.correspondences.indices.len(), source.len());
        Ok(())
    }
}
