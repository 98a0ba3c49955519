//! Failure-tolerant boundary around a [`FitnessOracle`].

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use log::{debug, warn};
use tempfile::TempDir;

use super::types::{Evaluation, FitnessOracle, FAILED_SCORE, PERFECT_SCORE};
use crate::ordering::{Permutation, SearchSpace};

/// Counters over the lifetime of an adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OracleStats {
    /// Oracle calls actually made (cache hits excluded).
    pub evaluations: usize,
    /// Calls that ended in [`Evaluation::Failed`].
    pub failures: usize,
    /// Evaluations answered from the cache.
    pub cache_hits: usize,
}

/// Wraps an oracle so that evaluation never fails outward.
///
/// Each call:
///
/// 1. creates a fresh scratch directory (under `scratch_root` if set,
///    otherwise the system temp dir),
/// 2. calls the oracle, catching both `Err` and panics,
/// 3. maps errors, panics and non-finite scores to [`Evaluation::Failed`],
/// 4. removes the scratch directory.
///
/// Because every call owns its directory, concurrent calls never share
/// intermediate files.
///
/// The optional cache is keyed by the exact permutation and stores only
/// successful scores. It trades the oracle's run-to-run variance for fewer
/// calls and is off by default.
pub struct OracleAdapter<'a, O: FitnessOracle + ?Sized> {
    oracle: &'a O,
    space: &'a SearchSpace,
    scratch_root: Option<PathBuf>,
    cache: Option<Mutex<HashMap<Permutation, f64>>>,
    evaluations: AtomicUsize,
    failures: AtomicUsize,
    cache_hits: AtomicUsize,
}

impl<'a, O: FitnessOracle + ?Sized> OracleAdapter<'a, O> {
    pub fn new(oracle: &'a O, space: &'a SearchSpace) -> Self {
        Self {
            oracle,
            space,
            scratch_root: None,
            cache: None,
            evaluations: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
        }
    }

    /// Creates scratch directories under `root` instead of the system temp
    /// dir.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Enables or disables memoization of successful scores.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(|| Mutex::new(HashMap::new()));
        self
    }

    pub fn space(&self) -> &'a SearchSpace {
        self.space
    }

    pub fn stats(&self) -> OracleStats {
        OracleStats {
            evaluations: self.evaluations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
        }
    }

    /// Scores `perm`. Never panics and never returns an error.
    pub fn evaluate(&self, perm: &Permutation) -> Evaluation {
        if perm.len() != self.space.len() {
            return self.fail(format!(
                "ordering covers {} items, expected {}",
                perm.len(),
                self.space.len()
            ));
        }

        if let Some(cache) = &self.cache {
            let hit = cache.lock().ok().and_then(|c| c.get(perm).copied());
            if let Some(score) = hit {
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
                return Evaluation::Scored(score);
            }
        }

        let workdir = match self.scratch_dir() {
            Ok(dir) => dir,
            Err(e) => return self.fail(format!("cannot create scratch directory: {e}")),
        };

        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let placement = self.space.placement(perm);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.oracle.evaluate(&placement, workdir.path())
        }));
        cleanup(workdir);

        let evaluation = match outcome {
            Ok(Ok(score)) if (FAILED_SCORE..=PERFECT_SCORE).contains(&score) => Evaluation::Scored(score),
            Ok(Ok(score)) => return self.fail(format!("oracle returned score {score} outside [0, 1]")),
            Ok(Err(e)) => return self.fail(format!("{e:#}")),
            Err(payload) => return self.fail(format!("oracle panicked: {}", panic_message(&*payload))),
        };

        debug!("evaluated {:?} -> {:?}", perm.slots(), evaluation);
        if let (Some(cache), Evaluation::Scored(score)) = (&self.cache, &evaluation) {
            if let Ok(mut c) = cache.lock() {
                c.insert(perm.clone(), *score);
            }
        }
        evaluation
    }

    fn scratch_dir(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("geneorder-eval-");
        match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }

    fn fail(&self, reason: String) -> Evaluation {
        self.failures.fetch_add(1, Ordering::Relaxed);
        warn!("fitness evaluation failed, scoring 0: {reason}");
        Evaluation::Failed { reason }
    }
}

fn cleanup(dir: TempDir) {
    let path = dir.path().to_path_buf();
    if let Err(e) = dir.close() {
        warn!("could not remove scratch directory {}: {e}", path.display());
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
