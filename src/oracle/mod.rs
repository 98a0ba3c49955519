//! Fitness oracle boundary.
//!
//! The oracle is the external "build signals → sonify → extract features →
//! train and score a classifier" pipeline, seen here as one blocking call
//! from an ordering to a score.
//!
//! - [`FitnessOracle`]: what the pipeline implements
//! - [`OracleAdapter`]: what the search calls; isolates each call in its own
//!   scratch directory and turns every failure into [`Evaluation::Failed`]

mod adapter;
mod types;

pub use adapter::{OracleAdapter, OracleStats};
pub use types::{Evaluation, FitnessOracle, FAILED_SCORE, PERFECT_SCORE};
