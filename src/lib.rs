//! Gene linearization core.
//!
//! Finds a one-dimensional ordering of genes such that an external
//! evaluation pipeline, which turns the ordering into signals and scores
//! them, performs well. Two ways to get there:
//!
//! - **Distance chaining**: greedy nearest-unvisited-neighbour walk over a
//!   pairwise distance matrix or an interaction network, giving an order
//!   plus cumulative real-valued positions.
//! - **Permutation search**: a generational genetic algorithm over
//!   orderings, scored by a black-box [`FitnessOracle`] that may fail.
//!
//! # Modules
//!
//! - [`distance`]: validated distance matrices, interaction graphs with
//!   shortest-path distances, correlation-based distances
//! - [`chain`]: dense and sparse distance chainers
//! - [`oracle`]: the oracle trait and the adapter that isolates and
//!   absorbs its failures
//! - [`search`]: the genetic algorithm and its run ledger
//! - [`ordering`]: permutations and their mapping onto positions
//!
//! # Example
//!
//! ```
//! use u_geneorder::distance::CostTransform;
//! use u_geneorder::{DistanceChainer, InteractionGraph};
//!
//! let graph = InteractionGraph::from_edges(
//!     [("TP53", "MDM2", 10.0), ("MDM2", "CDKN1A", 5.0), ("CDKN1A", "CDK2", 4.0)],
//!     CostTransform::Reciprocal,
//! )
//! .unwrap();
//!
//! let chain = DistanceChainer::chain(&graph.shortest_path_matrix());
//! assert!(chain.is_complete());
//! assert_eq!(chain.order_ids(), vec!["TP53", "MDM2", "CDKN1A", "CDK2"]);
//! ```

pub mod chain;
pub mod distance;
pub mod error;
pub mod items;
pub mod oracle;
pub mod ordering;
pub mod random;
pub mod search;

pub use chain::{Chain, ChainStatus, DistanceChainer, SparseChainer};
pub use distance::{DistanceMatrix, InteractionGraph};
pub use error::{OrderError, Result};
pub use items::ItemSet;
pub use oracle::{Evaluation, FitnessOracle, OracleAdapter};
pub use ordering::{Permutation, Placement, SearchSpace};
pub use search::{SearchConfig, SearchResult, SearchRunner, Termination};
