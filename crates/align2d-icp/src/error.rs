use align2d_geometry::pointset::PointSetError;

/// Errors produced by the registration pipeline.
///
/// All variants are caller contract violations detected before any numeric
/// work begins; none are retried.
#[derive(thiserror::Error, Debug)]
pub enum IcpError {
    /// Alignment requested with zero source points.
    #[error("cannot align an empty source point set")]
    EmptySourceSet,

    /// Nearest-neighbor search requested against an empty target set.
    #[error("cannot match against an empty target point set")]
    NoTargetPoints,

    /// A derived point set violated the equal-length invariant.
    #[error("point set geometry error")]
    Geometry(#[from] PointSetError),
}
