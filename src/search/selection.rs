//! Two-candidate tournament selection.
//!
//! Tournament contestants are scored on the spot through the oracle
//! adapter: population members carry no cached fitness, so each draw costs
//! two oracle calls.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::seq::index;
use rand::Rng;

use crate::oracle::{Evaluation, FitnessOracle, OracleAdapter};
use crate::ordering::Permutation;

/// Winner of one tournament.
#[derive(Debug, Clone)]
pub struct Contender {
    /// Index of the winner in the population.
    pub index: usize,
    pub evaluation: Evaluation,
}

/// Both contestants of a tournament, in draw order.
#[derive(Debug, Clone)]
pub struct Tournament {
    pub first: Contender,
    pub second: Contender,
}

impl Tournament {
    /// The higher-scoring contestant; ties favour the first drawn.
    pub fn winner(&self) -> &Contender {
        if self.second.evaluation.score() > self.first.evaluation.score() {
            &self.second
        } else {
            &self.first
        }
    }
}

/// Draws two distinct individuals uniformly and scores both.
///
/// # Panics
/// Panics if the population has fewer than 2 members.
pub fn tournament<O, R>(population: &[Permutation], adapter: &OracleAdapter<'_, O>, rng: &mut R) -> Tournament
where
    O: FitnessOracle + ?Sized,
    R: Rng,
{
    assert!(
        population.len() >= 2,
        "tournament needs at least 2 individuals"
    );
    let picked = index::sample(rng, population.len(), 2);
    let (a, b) = (picked.index(0), picked.index(1));
    let first = Contender {
        index: a,
        evaluation: adapter.evaluate(&population[a]),
    };
    let second = Contender {
        index: b,
        evaluation: adapter.evaluate(&population[b]),
    };
    Tournament { first, second }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemSet;
    use crate::ordering::{Placement, SearchSpace};
    use crate::random::create_rng;
    use std::path::Path;

    fn contender(index: usize, score: f64) -> Contender {
        Contender {
            index,
            evaluation: Evaluation::Scored(score),
        }
    }

    #[test]
    fn test_higher_score_wins() {
        let t = Tournament {
            first: contender(0, 0.4),
            second: contender(1, 0.6),
        };
        assert_eq!(t.winner().index, 1);
    }

    #[test]
    fn test_tie_favours_first() {
        let t = Tournament {
            first: contender(3, 0.5),
            second: contender(1, 0.5),
        };
        assert_eq!(t.winner().index, 3);
    }

    #[test]
    fn test_failure_loses_to_score() {
        let t = Tournament {
            first: Contender {
                index: 0,
                evaluation: Evaluation::Failed {
                    reason: "boom".into(),
                },
            },
            second: contender(1, 0.1),
        };
        assert_eq!(t.winner().index, 1);
    }

    #[test]
    fn test_draws_distinct_and_scores_both() {
        let space = SearchSpace::contiguous(ItemSet::new(["A", "B", "C"]).unwrap());
        // Score = slot of item A, so individuals are told apart.
        let oracle = |p: &Placement<'_>, _: &Path| -> anyhow::Result<f64> {
            Ok(p.position_of("A").unwrap_or(0) as f64 / 2.0)
        };
        let adapter = OracleAdapter::new(&oracle, &space);
        let population = vec![
            Permutation::new(vec![0, 1, 2]).unwrap(),
            Permutation::new(vec![1, 0, 2]).unwrap(),
            Permutation::new(vec![2, 1, 0]).unwrap(),
        ];
        let mut rng = create_rng(5);
        for _ in 0..50 {
            let t = tournament(&population, &adapter, &mut rng);
            assert_ne!(t.first.index, t.second.index);
            let best = t.first.index.max(t.second.index);
            assert_eq!(t.winner().index, best);
        }
        assert_eq!(adapter.stats().evaluations, 100);
    }
}
