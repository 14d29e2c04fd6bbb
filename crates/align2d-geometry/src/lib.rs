#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// 2D point set container and distance aggregates.
pub mod pointset;

/// 2D similarity transformations.
pub mod transform;
