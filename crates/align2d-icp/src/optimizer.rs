use align2d_geometry::{
    pointset::PointSet,
    transform::{Similarity2, NUM_PARAMS},
};

use crate::error::IcpError;
use crate::robust::{alignment_cost, BeatonTukeyLoss};

/// Finite-difference probe step and update rate for one parameter group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    /// Forward-difference probe step.
    pub step: f64,
    /// Gradient descent learning rate.
    pub learning_rate: f64,
}

/// Settings for the coordinate-wise gradient descent.
///
/// The translation parameters and the linear (scale/rotation) parameters
/// move on very different scales, so each group carries its own probe step
/// and learning rate.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientDescentParams {
    /// Number of descent iterations; no convergence test, no early exit.
    pub iterations: usize,
    /// Step settings for the translation parameters `tx`, `ty`.
    pub translation: StepParams,
    /// Step settings for the linear parameters `a`, `b`.
    pub linear: StepParams,
}

impl Default for GradientDescentParams {
    fn default() -> Self {
        Self {
            iterations: 1,
            translation: StepParams {
                step: 1.0,
                learning_rate: 1e-3,
            },
            linear: StepParams {
                step: 1e-3,
                learning_rate: 1e-10,
            },
        }
    }
}

/// Estimate the similarity transform that minimizes the robust cost of
/// mapping `source` onto `matched_targets`, starting from `initial`.
///
/// The cost of a candidate transform is the robust loss of the aggregate
/// distance between the transformed source and the fixed matched-target
/// set; correspondences are not re-searched here.
///
/// Parameters are updated one at a time in the order `[tx, a, b, ty]`,
/// sequential coordinate descent: each update is immediately visible to the
/// next finite-difference evaluation within the same iteration, which
/// shapes the descent trajectory. Runs for the fixed iteration budget and
/// returns the final transform; no early exit.
pub fn fit_similarity(
    initial: Similarity2,
    source: &PointSet,
    matched_targets: &PointSet,
    loss: &BeatonTukeyLoss,
    params: &GradientDescentParams,
) -> Result<Similarity2, IcpError> {
    let cost = |t: &Similarity2| alignment_cost(t, source, matched_targets, loss);

    let steps = [
        params.translation.step,
        params.linear.step,
        params.linear.step,
        params.translation.step,
    ];
    let rates = [
        params.translation.learning_rate,
        params.linear.learning_rate,
        params.linear.learning_rate,
        params.translation.learning_rate,
    ];

    let mut p = initial.to_params();
    for _ in 0..params.iterations {
        for k in 0..NUM_PARAMS {
            let base = cost(&Similarity2::from_params(p))?;
            let mut probe = p;
            probe[k] += steps[k];
            let gradient = (cost(&Similarity2::from_params(probe))? - base) / steps[k];
            p[k] -= rates[k] * gradient;
        }
    }

    Ok(Similarity2::from_params(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn triangle() -> PointSet {
        PointSet::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]])
    }

    #[test]
    fn test_zero_iterations_returns_initial() -> Result<(), IcpError> {
        let initial = Similarity2::from_params([3.0, 0.1, -0.2, -1.0]);
        let params = GradientDescentParams {
            iterations: 0,
            ..GradientDescentParams::default()
        };

        let fitted = fit_similarity(
            initial,
            &triangle(),
            &triangle(),
            &BeatonTukeyLoss::default(),
            &params,
        )?;

        assert_eq!(fitted, initial);
        Ok(())
    }

    #[test]
    fn test_descends_toward_translation() -> Result<(), IcpError> {
        let source = triangle();
        let matched = Similarity2::from_translation(DVec2::new(2.0, 0.0)).apply(&source);
        let loss = BeatonTukeyLoss::default();
        let params = GradientDescentParams::default();

        let cost = |t: &Similarity2| alignment_cost(t, &source, &matched, &loss);

        let initial = Similarity2::IDENTITY;
        let fitted = fit_similarity(initial, &source, &matched, &loss, &params)?;

        assert!(fitted.tx > initial.tx);
        assert!(cost(&fitted)? < cost(&initial)?);
        Ok(())
    }

    #[test]
    fn test_linear_parameters_move_on_a_finer_scale() -> Result<(), IcpError> {
        let source = triangle();
        let matched = Similarity2::from_translation(DVec2::new(2.0, 0.0)).apply(&source);

        let fitted = fit_similarity(
            Similarity2::IDENTITY,
            &source,
            &matched,
            &BeatonTukeyLoss::default(),
            &GradientDescentParams::default(),
        )?;

        assert!(fitted.a.abs() < 1e-6);
        assert!(fitted.b.abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_stationary_when_loss_is_saturated() -> Result<(), IcpError> {
        // far beyond the tuning constant every probe sees the same capped
        // cost, so the gradient vanishes
        let source = triangle();
        let matched = Similarity2::from_translation(DVec2::new(1e6, 0.0)).apply(&source);

        let initial = Similarity2::IDENTITY;
        let fitted = fit_similarity(
            initial,
            &source,
            &matched,
            &BeatonTukeyLoss::new(1.0),
            &GradientDescentParams::default(),
        )?;

        assert_eq!(fitted, initial);
        Ok(())
    }

    #[test]
    fn test_size_mismatch_propagates() {
        let source = triangle();
        let matched = PointSet::new(vec![[0.0, 0.0]]);

        let result = fit_similarity(
            Similarity2::IDENTITY,
            &source,
            &matched,
            &BeatonTukeyLoss::default(),
            &GradientDescentParams::default(),
        );

        assert!(matches!(result, Err(IcpError::Geometry(_))));
    }
}
