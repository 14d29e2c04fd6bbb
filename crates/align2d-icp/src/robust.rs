use align2d_geometry::{pointset::PointSet, transform::Similarity2};

use crate::error::IcpError;

/// Beaton-Tukey redescending loss.
///
/// Saturates at `a²/6` for residuals beyond the tuning constant `a`, so an
/// outlier contributes a bounded penalty regardless of magnitude, unlike a
/// plain squared-error loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatonTukeyLoss {
    /// Tuning constant `a`; residual magnitudes at or beyond it saturate.
    pub tuning: f64,
}

impl BeatonTukeyLoss {
    /// Default tuning constant, calibrated for aggregate squared-distance
    /// residuals over image-scale coordinates.
    pub const DEFAULT_TUNING: f64 = 1e7;

    /// Create a loss with the given tuning constant.
    pub fn new(tuning: f64) -> Self {
        Self { tuning }
    }

    /// Evaluate the loss at residual `u`.
    ///
    /// Even in `u`, zero at zero, monotone in `|u|`, and constant `a²/6`
    /// for `|u| >= a`.
    #[inline]
    pub fn evaluate(&self, u: f64) -> f64 {
        let a = self.tuning;
        let cap = a * a / 6.0;
        if u.abs() > a {
            cap
        } else {
            let ratio = u / a;
            cap * (1.0 - (1.0 - ratio * ratio).powi(3))
        }
    }
}

impl Default for BeatonTukeyLoss {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TUNING)
    }
}

/// Robust cost of a candidate transform.
///
/// Applies `transform` to `source`, takes the aggregate distance to the
/// fixed `matched_targets` set, and passes it through the loss. The
/// matched-target set stays fixed across all cost evaluations of one
/// optimizer run; correspondences are only re-searched at the outer loop
/// level.
pub fn alignment_cost(
    transform: &Similarity2,
    source: &PointSet,
    matched_targets: &PointSet,
    loss: &BeatonTukeyLoss,
) -> Result<f64, IcpError> {
    let aggregate = transform.apply(source).distance_to(matched_targets)?;
    Ok(loss.evaluate(aggregate))
}
