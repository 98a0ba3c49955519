//! Fitness oracle contract and evaluation outcome.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ordering::Placement;

/// Score of a perfect ordering; observing it ends a search.
pub const PERFECT_SCORE: f64 = 1.0;

/// Score assigned to a failed evaluation.
pub const FAILED_SCORE: f64 = 0.0;

/// External scoring pipeline: build signals, sonify, extract features,
/// train and evaluate a classifier, and return an AUC-like score in
/// `[0, 1]`.
///
/// Implementations may be slow, non-deterministic and may fail for reasons
/// unrelated to the ordering. Every call receives its own empty `workdir`
/// for intermediate artifacts; the directory is removed after the call
/// returns, so nothing written there survives.
///
/// Closures with the same signature implement the trait:
///
/// ```
/// use u_geneorder::{FitnessOracle, Placement};
/// use std::path::Path;
///
/// let oracle = |placement: &Placement<'_>, _workdir: &Path| -> anyhow::Result<f64> {
///     Ok(if placement.position_of("TP53") == Some(0) { 1.0 } else { 0.5 })
/// };
/// fn takes_oracle<O: FitnessOracle>(_: &O) {}
/// takes_oracle(&oracle);
/// ```
pub trait FitnessOracle: Send + Sync {
    /// Scores one candidate ordering.
    fn evaluate(&self, placement: &Placement<'_>, workdir: &Path) -> anyhow::Result<f64>;
}

impl<F> FitnessOracle for F
where
    F: Fn(&Placement<'_>, &Path) -> anyhow::Result<f64> + Send + Sync,
{
    fn evaluate(&self, placement: &Placement<'_>, workdir: &Path) -> anyhow::Result<f64> {
        self(placement, workdir)
    }
}

/// Outcome of one oracle call.
///
/// A failure is kept distinct from a genuinely low score so the run ledger
/// can tell them apart; for selection both rank by [`score`](Self::score).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Evaluation {
    Scored(f64),
    Failed { reason: String },
}

impl Evaluation {
    /// Score used by the search; failures score [`FAILED_SCORE`].
    pub fn score(&self) -> f64 {
        match self {
            Evaluation::Scored(s) => *s,
            Evaluation::Failed { .. } => FAILED_SCORE,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Evaluation::Failed { .. })
    }

    pub fn is_perfect(&self) -> bool {
        self.score() >= PERFECT_SCORE
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Evaluation::Scored(_) => None,
            Evaluation::Failed { reason } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_scores_zero() {
        let e = Evaluation::Failed {
            reason: "nan in signal".into(),
        };
        assert_eq!(e.score(), FAILED_SCORE);
        assert!(e.is_failed());
        assert!(!e.is_perfect());
        assert_eq!(e.failure_reason(), Some("nan in signal"));
    }

    #[test]
    fn test_perfect() {
        assert!(Evaluation::Scored(1.0).is_perfect());
        assert!(!Evaluation::Scored(0.999).is_perfect());
        assert_eq!(Evaluation::Scored(0.25).failure_reason(), None);
    }
}
