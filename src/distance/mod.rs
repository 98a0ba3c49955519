//! Distance sources for the chainer.
//!
//! - [`DistanceMatrix`]: validated dense matrix (from distances,
//!   similarities, or a sparse pair list)
//! - [`InteractionGraph`]: weighted interaction network with score → cost
//!   transforms and all-pairs shortest paths
//! - [`proximity`]: absolute-correlation distances from expression data

mod graph;
mod matrix;
pub mod proximity;

pub use graph::{CostTransform, Edge, InteractionGraph};
pub use matrix::{DistanceMatrix, SYMMETRY_TOLERANCE};
