//! Permutation search.
//!
//! A generational genetic algorithm over gene orderings, scored by an
//! external [`FitnessOracle`](crate::oracle::FitnessOracle). Every
//! generation is fully replaced by its offspring (no elitism); the best
//! ordering ever observed is tracked separately.
//!
//! # Key Types
//!
//! - [`SearchConfig`]: population size, generations, mutation rate, seed
//! - [`SearchRunner`]: executes the evolutionary loop
//! - [`SearchResult`]: best ordering, termination reason, and the
//!   [`RunLedger`] of every generation evaluation
//!
//! # Submodules
//!
//! - [`operators`]: order-preserving crossover and swap mutation
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod ledger;
pub mod operators;
mod runner;
mod selection;

pub use config::SearchConfig;
pub use ledger::{LedgerRecord, RunLedger};
pub use runner::{SearchResult, SearchRunner, Termination};
pub use selection::{tournament, Contender, Tournament};
