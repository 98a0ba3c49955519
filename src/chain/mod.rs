//! Distance chaining.
//!
//! Turns pairwise distances into a single linear ordering by greedy
//! nearest-unvisited-neighbour chaining, with cumulative real positions.
//!
//! - [`DistanceChainer`]: dense [`DistanceMatrix`](crate::distance::DistanceMatrix)
//! - [`SparseChainer`]: direct edges of an
//!   [`InteractionGraph`](crate::distance::InteractionGraph), pruning
//!   retired endpoints as it goes
//!
//! Both return a [`Chain`]; a disconnected input gives a partial chain
//! flagged by [`ChainStatus::PrematureStop`].
//!
//! # References
//!
//! - Rosenkrantz, Stearns & Lewis (1977), "An Analysis of Several Heuristics
//!   for the Traveling Salesman Problem"

mod runner;
mod sparse;
mod types;

pub use runner::DistanceChainer;
pub use sparse::SparseChainer;
pub use types::{Chain, ChainLink, ChainStatus};
