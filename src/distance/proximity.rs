//! Expression-derived proximity.
//!
//! Genes whose expression moves together across samples are treated as
//! close: similarity is the absolute Pearson correlation between item
//! columns, and distance is `1 - |r|`.

use log::warn;

use super::matrix::DistanceMatrix;
use crate::error::{OrderError, Result};
use crate::items::ItemSet;

/// Absolute Pearson correlation between every pair of item columns.
///
/// `samples` holds one row per sample (datasets can simply be concatenated)
/// with one value per item in `items` order. Correlations that are undefined
/// because a column is constant are set to 0; the diagonal is 1.
pub fn abs_correlation(items: &ItemSet, samples: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let n = items.len();
    for (row, sample) in samples.iter().enumerate() {
        if sample.len() != n {
            return Err(OrderError::NotSquare {
                row,
                len: sample.len(),
                expected: n,
            });
        }
    }
    if samples.len() < 2 {
        return Err(OrderError::InvalidConfig(format!(
            "correlation needs at least 2 samples, got {}",
            samples.len()
        )));
    }

    let m = samples.len() as f64;
    let means: Vec<f64> = (0..n)
        .map(|j| samples.iter().map(|s| s[j]).sum::<f64>() / m)
        .collect();
    let norms: Vec<f64> = (0..n)
        .map(|j| {
            samples
                .iter()
                .map(|s| (s[j] - means[j]).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .collect();

    let mut out = vec![vec![0.0; n]; n];
    let mut undefined = 0usize;
    for i in 0..n {
        out[i][i] = 1.0;
        for j in (i + 1)..n {
            let cov: f64 = samples
                .iter()
                .map(|s| (s[i] - means[i]) * (s[j] - means[j]))
                .sum();
            let denom = norms[i] * norms[j];
            let r = if denom > 0.0 && cov.is_finite() {
                (cov / denom).abs().min(1.0)
            } else {
                undefined += 1;
                0.0
            };
            out[i][j] = r;
            out[j][i] = r;
        }
    }
    if undefined > 0 {
        warn!("{undefined} item pairs have undefined correlation (constant column); set to 0");
    }
    Ok(out)
}

/// Distance matrix `1 - |r|` from an expression table.
pub fn correlation_distance(items: ItemSet, samples: &[Vec<f64>]) -> Result<DistanceMatrix> {
    let similarity = abs_correlation(&items, samples)?;
    DistanceMatrix::from_similarity(items, similarity)
}
