//! Evolutionary loop execution.
//!
//! [`SearchRunner`] drives the permutation search:
//! initialization → (selection → crossover → mutation → evaluation) per
//! generation, until the generation budget runs out, a perfect score is
//! observed, or the run is cancelled.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};

use super::config::SearchConfig;
use super::ledger::{LedgerRecord, RunLedger};
use super::operators::{mutate, order_crossover};
use super::selection::tournament;
use crate::error::Result;
use crate::oracle::{Evaluation, FitnessOracle, OracleAdapter, OracleStats};
use crate::ordering::{Permutation, SearchSpace};
use crate::random::create_rng;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// All configured generations ran.
    MaxGenerations,
    /// A score of [`PERFECT_SCORE`](crate::oracle::PERFECT_SCORE) was
    /// observed, during selection or generation evaluation.
    PerfectScore,
    /// The cancel flag was raised.
    Cancelled,
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best ordering observed during the whole run.
    pub best: Permutation,

    /// `best` as item → position.
    pub best_placement: BTreeMap<String, usize>,

    /// Evaluation that made `best` the best.
    pub best_evaluation: Evaluation,

    /// Same as `best_evaluation.score()`.
    pub best_score: f64,

    /// Number of generations started.
    pub generations: usize,

    pub termination: Termination,

    /// Every generation evaluation, in order.
    pub ledger: RunLedger,

    /// Best-ever score at the end of each generation (non-decreasing).
    pub best_history: Vec<f64>,

    /// Oracle call counters, tournament evaluations included.
    pub stats: OracleStats,

    /// Seed that drove the run; replaying it with the same oracle behaviour
    /// reproduces the run.
    pub seed: u64,
}

/// Executes the permutation search.
///
/// # Usage
///
/// ```
/// use std::path::Path;
/// use u_geneorder::{ItemSet, Placement, SearchConfig, SearchRunner, SearchSpace};
///
/// let space = SearchSpace::contiguous(ItemSet::new(["TP53", "EGFR", "MTOR", "AKT1"]).unwrap());
/// let oracle = |p: &Placement<'_>, _workdir: &Path| -> anyhow::Result<f64> {
///     // Reward orderings that put TP53 first.
///     Ok(if p.position_of("TP53") == Some(0) { 0.9 } else { 0.4 })
/// };
/// let config = SearchConfig::default()
///     .with_population_size(6)
///     .with_max_generations(3)
///     .with_seed(42);
///
/// let result = SearchRunner::run(&oracle, &space, &config).unwrap();
/// assert!(result.best_score >= 0.4);
/// assert_eq!(result.ledger.len(), 18);
/// ```
pub struct SearchRunner;

impl SearchRunner {
    /// Runs the search.
    ///
    /// Fails only when the configuration is invalid; oracle failures are
    /// absorbed as zero scores.
    pub fn run<O: FitnessOracle + ?Sized>(
        oracle: &O,
        space: &SearchSpace,
        config: &SearchConfig,
    ) -> Result<SearchResult> {
        Self::run_with_cancel(oracle, space, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The flag is checked between generations: once it is set, the run
    /// returns after the current generation with the best ordering seen so
    /// far. At least one generation always runs.
    pub fn run_with_cancel<O: FitnessOracle + ?Sized>(
        oracle: &O,
        space: &SearchSpace,
        config: &SearchConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SearchResult> {
        config.validate(space.len())?;

        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random();
                info!("no seed configured, using {seed}");
                seed
            }
        };
        let mut rng = create_rng(seed);

        let mut adapter = OracleAdapter::new(oracle, space).with_cache(config.cache);
        if let Some(dir) = &config.scratch_dir {
            adapter = adapter.with_scratch_root(dir);
        }

        let n = space.len();
        let size = config.population_size;

        // 1. Initialize population
        let mut population: Vec<Permutation> =
            (0..size).map(|_| Permutation::random(n, &mut rng)).collect();

        let mut ledger = RunLedger::new();
        let mut best = BestTracker::default();
        let mut best_history = Vec::with_capacity(config.max_generations);
        let mut termination = Termination::MaxGenerations;
        let mut generations = 0;

        // 2. Evolutionary loop
        'search: for gen in 0..config.max_generations {
            if gen > 0 {
                if let Some(ref flag) = cancel {
                    if flag.load(Ordering::Relaxed) {
                        termination = Termination::Cancelled;
                        break;
                    }
                }
            }
            generations = gen + 1;

            // Offspring: two tournaments, crossover, mutation
            let mut children = Vec::with_capacity(size);
            for _ in 0..size {
                let mut parents = [0usize; 2];
                for parent in parents.iter_mut() {
                    let t = tournament(&population, &adapter, &mut rng);
                    best.observe(&population[t.first.index], &t.first.evaluation);
                    best.observe(&population[t.second.index], &t.second.evaluation);

                    let winner = t.winner();
                    if winner.evaluation.is_perfect() {
                        info!("perfect score during selection in generation {gen}");
                        best_history.push(best.score());
                        termination = Termination::PerfectScore;
                        break 'search;
                    }
                    *parent = winner.index;
                }

                let mut child = order_crossover(&population[parents[0]], &population[parents[1]], &mut rng);
                if let Some((a, b)) = mutate(&mut child, config.mutation_rate, &mut rng) {
                    debug!("mutation swapped {} and {}", space.items().id(a), space.items().id(b));
                }
                children.push(child);
            }

            // Generation replacement, no elitism
            population = children;

            // Evaluation and bookkeeping
            let evaluations = if config.parallel {
                evaluate_parallel(&adapter, &population)
            } else {
                evaluate_sequential(&adapter, &population)
            };

            let mut perfect = false;
            for (i, (perm, evaluation)) in population.iter().zip(evaluations).enumerate() {
                best.observe(perm, &evaluation);
                perfect |= evaluation.is_perfect();
                ledger.push(LedgerRecord {
                    generation: gen,
                    individual: i,
                    placement: space.placement(perm).to_map(),
                    evaluation,
                });
            }
            best_history.push(best.score());

            info!(
                "generation {gen}: best score {:.4}, {} failed evaluations so far",
                best.score(),
                adapter.stats().failures
            );

            if perfect {
                info!("perfect score in generation {gen}");
                termination = Termination::PerfectScore;
                break;
            }
        }

        let (best, best_evaluation) = best
            .into_inner()
            .expect("at least one generation runs, so at least one evaluation was made");
        let best_placement = space.placement(&best).to_map();

        Ok(SearchResult {
            best_score: best_evaluation.score(),
            best,
            best_placement,
            best_evaluation,
            generations,
            termination,
            ledger,
            best_history,
            stats: adapter.stats(),
            seed,
        })
    }
}

/// Best-ever individual across every observed evaluation.
#[derive(Default)]
struct BestTracker {
    best: Option<(Permutation, Evaluation)>,
}

impl BestTracker {
    /// Replaces the best only on strict improvement, so the first of equal
    /// scores is kept.
    fn observe(&mut self, perm: &Permutation, evaluation: &Evaluation) {
        let improved = match &self.best {
            None => true,
            Some((_, current)) => evaluation.score() > current.score(),
        };
        if improved {
            self.best = Some((perm.clone(), evaluation.clone()));
        }
    }

    fn score(&self) -> f64 {
        self.best
            .as_ref()
            .map_or(f64::NEG_INFINITY, |(_, e)| e.score())
    }

    fn into_inner(self) -> Option<(Permutation, Evaluation)> {
        self.best
    }
}

/// Evaluates in population order, stopping right after a perfect score.
fn evaluate_sequential<O: FitnessOracle + ?Sized>(
    adapter: &OracleAdapter<'_, O>,
    population: &[Permutation],
) -> Vec<Evaluation> {
    let mut out = Vec::with_capacity(population.len());
    for perm in population {
        let evaluation = adapter.evaluate(perm);
        let perfect = evaluation.is_perfect();
        out.push(evaluation);
        if perfect {
            break;
        }
    }
    out
}

/// Evaluates the whole generation concurrently. Results come back in
/// population order; each call has its own scratch directory.
#[cfg(feature = "parallel")]
fn evaluate_parallel<O: FitnessOracle + ?Sized>(
    adapter: &OracleAdapter<'_, O>,
    population: &[Permutation],
) -> Vec<Evaluation> {
    use rayon::prelude::*;

    population
        .par_iter()
        .map(|perm| adapter.evaluate(perm))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_parallel<O: FitnessOracle + ?Sized>(
    adapter: &OracleAdapter<'_, O>,
    population: &[Permutation],
) -> Vec<Evaluation> {
    debug!("parallel evaluation requested without the `parallel` feature; evaluating sequentially");
    evaluate_sequential(adapter, population)
}

// ============================================================================
// Tests
// ============================================================================
