#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod correspondence;
pub use correspondence::{CorrespondenceFinder, Correspondences, MatcherKind};

mod error;
pub use error::IcpError;

mod icp_similarity;
pub use icp_similarity::{icp_similarity, IcpParams, IcpResult};

mod optimizer;
pub use optimizer::{fit_similarity, GradientDescentParams, StepParams};

mod robust;
pub use robust::{alignment_cost, BeatonTukeyLoss};
