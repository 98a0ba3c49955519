//! Search configuration.
//!
//! [`SearchConfig`] holds every parameter of the evolutionary loop. It can
//! be built in code or loaded from a TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OrderError, Result};

/// Configuration for the permutation search.
///
/// # Defaults
///
/// ```
/// use u_geneorder::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert_eq!(config.population_size, 20);
/// assert_eq!(config.max_generations, 10);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_geneorder::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_population_size(40)
///     .with_max_generations(25)
///     .with_mutation_rate(0.2)
///     .with_seed(42);
/// assert!(config.validate(12).is_ok());
/// ```
///
/// # TOML
///
/// ```
/// use u_geneorder::SearchConfig;
///
/// let config = SearchConfig::from_toml_str(
///     r#"
///     population_size = 8
///     mutation_rate = 0.3
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.population_size, 8);
/// assert_eq!(config.max_generations, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of individuals per generation. Must be at least 2 for the
    /// 2-candidate tournament.
    pub population_size: usize,

    /// Number of generations to run unless a perfect score ends the run.
    pub max_generations: usize,

    /// Probability of a swap mutation per child (0.0–1.0).
    pub mutation_rate: f64,

    /// Random seed for reproducibility. `None` draws (and logs) a random
    /// seed.
    pub seed: Option<u64>,

    /// Evaluate each generation's children in parallel. Only honoured when
    /// the crate is built with the `parallel` feature.
    pub parallel: bool,

    /// Memoize successful scores by exact ordering. Off by default, since
    /// the oracle is not assumed to be deterministic.
    pub cache: bool,

    /// Directory under which per-evaluation scratch directories are
    /// created. `None` uses the system temp dir.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            max_generations: 10,
            mutation_rate: 0.3,
            seed: None,
            parallel: false,
            cache: false,
            scratch_dir: None,
        }
    }
}

impl SearchConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the mutation rate. Out-of-range values are rejected by
    /// [`validate`](Self::validate), not clamped.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables or disables score memoization.
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Sets the scratch root directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Checks the configuration against an item universe of `item_count`
    /// items.
    pub fn validate(&self, item_count: usize) -> Result<()> {
        if self.population_size < 2 {
            return Err(OrderError::InvalidConfig(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.max_generations == 0 {
            return Err(OrderError::InvalidConfig(
                "max_generations must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(OrderError::InvalidConfig(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if item_count < 2 {
            return Err(OrderError::InvalidConfig(format!(
                "at least 2 items are required, got {item_count}"
            )));
        }
        Ok(())
    }

    /// Parses a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Reads a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Writes this configuration as TOML.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = toml::to_string_pretty(self)?;
        std::fs::write(path, s)?;
        Ok(())
    }
}
