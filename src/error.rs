//! Error types shared by every module of the crate.
//!
//! Only validation and I/O problems are errors. A partial chain is reported
//! through [`ChainStatus`](crate::chain::ChainStatus) and a failed fitness
//! evaluation through [`Evaluation::Failed`](crate::oracle::Evaluation), since
//! neither should abort a run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("at least 2 items are required, got {0}")]
    TooFewItems(usize),

    #[error("duplicate item identifier: {0}")]
    DuplicateItem(String),

    #[error("unknown item identifier: {0}")]
    UnknownItem(String),

    #[error("matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("matrix dimension {matrix} does not match item count {items}")]
    DimensionMismatch { matrix: usize, items: usize },

    #[error("distance d({a}, {b}) = {value} is negative")]
    NegativeDistance { a: String, b: String, value: f64 },

    #[error("distance d({a}, {b}) is NaN")]
    NotANumber { a: String, b: String },

    #[error("diagonal entry for {item} is {value}, expected 0")]
    NonZeroDiagonal { item: String, value: f64 },

    #[error("matrix is asymmetric at ({a}, {b}): {forward} vs {backward}")]
    Asymmetric {
        a: String,
        b: String,
        forward: f64,
        backward: f64,
    },

    #[error("invalid interaction score {score} for edge ({a}, {b}): {reason}")]
    InvalidScore {
        a: String,
        b: String,
        score: f64,
        reason: &'static str,
    },

    #[error("invalid ordering: {0}")]
    InvalidOrdering(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, OrderError>;
