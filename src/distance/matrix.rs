//! Dense pairwise distance matrix.

use crate::error::{OrderError, Result};
use crate::items::ItemSet;

/// Absolute tolerance for `d(a,b) == d(b,a)`.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Symmetric, non-negative distances over an [`ItemSet`].
///
/// Stored row-major. `f64::INFINITY` marks a missing pair (no edge, no
/// path); every other entry is finite, non-negative and the diagonal is 0.
///
/// # Examples
///
/// ```
/// use u_geneorder::{DistanceMatrix, ItemSet};
///
/// let items = ItemSet::new(["A", "B", "C"]).unwrap();
/// let m = DistanceMatrix::from_rows(
///     items,
///     vec![
///         vec![0.0, 1.0, 2.0],
///         vec![1.0, 0.0, 3.0],
///         vec![2.0, 3.0, 0.0],
///     ],
/// )
/// .unwrap();
/// assert_eq!(m.distance("A", "C"), Some(2.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    items: ItemSet,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds a matrix from dense rows of distances.
    pub fn from_rows(items: ItemSet, rows: Vec<Vec<f64>>) -> Result<Self> {
        let values = flatten(&items, rows)?;
        let matrix = Self { items, values };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Builds a matrix from dense rows of similarities in `[0, 1]`,
    /// converting each entry with `d = 1 - s`.
    ///
    /// The diagonal is expected to be 1 (self-similarity); similarities
    /// above 1 produce negative distances and are rejected.
    pub fn from_similarity(items: ItemSet, rows: Vec<Vec<f64>>) -> Result<Self> {
        let values = flatten(&items, rows)?
            .into_iter()
            .map(|s| 1.0 - s)
            .collect();
        let matrix = Self { items, values };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Builds a matrix from a sparse list of `(a, b, distance)` pairs.
    ///
    /// Pairs are symmetric, so `(a, b)` also sets `(b, a)`. Pairs never
    /// listed stay at `f64::INFINITY`. Listing the same pair twice with
    /// different distances is reported as an asymmetry.
    pub fn from_pairs<I, S>(items: ItemSet, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        let n = items.len();
        let mut values = vec![f64::INFINITY; n * n];
        for i in 0..n {
            values[i * n + i] = 0.0;
        }
        let mut set = vec![false; n * n];
        for (a, b, d) in pairs {
            let i = items.require(a.as_ref())?;
            let j = items.require(b.as_ref())?;
            if set[i * n + j] && (values[i * n + j] - d).abs() > SYMMETRY_TOLERANCE {
                return Err(OrderError::Asymmetric {
                    a: items.id(i).to_string(),
                    b: items.id(j).to_string(),
                    forward: values[i * n + j],
                    backward: d,
                });
            }
            values[i * n + j] = d;
            values[j * n + i] = d;
            set[i * n + j] = true;
            set[j * n + i] = true;
        }
        let matrix = Self { items, values };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Used by graph shortest paths, whose output is valid by construction.
    pub(crate) fn from_parts_unchecked(items: ItemSet, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), items.len() * items.len());
        Self { items, values }
    }

    fn validate(&self) -> Result<()> {
        let n = self.items.len();
        for i in 0..n {
            let diag = self.get(i, i);
            if diag.is_nan() || diag.abs() > SYMMETRY_TOLERANCE {
                return Err(OrderError::NonZeroDiagonal {
                    item: self.items.id(i).to_string(),
                    value: diag,
                });
            }
            for j in (i + 1)..n {
                let forward = self.get(i, j);
                let backward = self.get(j, i);
                for value in [forward, backward] {
                    if value.is_nan() {
                        return Err(OrderError::NotANumber {
                            a: self.items.id(i).to_string(),
                            b: self.items.id(j).to_string(),
                        });
                    }
                    if value < 0.0 {
                        return Err(OrderError::NegativeDistance {
                            a: self.items.id(i).to_string(),
                            b: self.items.id(j).to_string(),
                            value,
                        });
                    }
                }
                let symmetric = if forward.is_infinite() || backward.is_infinite() {
                    forward == backward
                } else {
                    (forward - backward).abs() <= SYMMETRY_TOLERANCE
                };
                if !symmetric {
                    return Err(OrderError::Asymmetric {
                        a: self.items.id(i).to_string(),
                        b: self.items.id(j).to_string(),
                        forward,
                        backward,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distance between item indices `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.items.len() + j]
    }

    /// Distance between two items by identifier.
    pub fn distance(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.items.index_of(a)?;
        let j = self.items.index_of(b)?;
        Some(self.get(i, j))
    }

    /// The globally closest pair `(a, b, d)` with `a < b`.
    ///
    /// Pairs are scanned row by row in item order and only a strictly
    /// smaller distance replaces the current best, so the first minimal pair
    /// wins ties. Returns `None` when no pair has a finite distance.
    pub fn closest_pair(&self) -> Option<(usize, usize, f64)> {
        let n = self.items.len();
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..n {
            for j in (i + 1)..n {
                let d = self.get(i, j);
                if !d.is_finite() {
                    continue;
                }
                match best {
                    Some((_, _, bd)) if d >= bd => {}
                    _ => best = Some((i, j, d)),
                }
            }
        }
        best
    }

    /// Whether every pair of distinct items has a finite distance.
    pub fn is_dense(&self) -> bool {
        self.values.iter().all(|d| d.is_finite())
    }
}

fn flatten(items: &ItemSet, rows: Vec<Vec<f64>>) -> Result<Vec<f64>> {
    let n = items.len();
    if rows.len() != n {
        return Err(OrderError::DimensionMismatch {
            matrix: rows.len(),
            items: n,
        });
    }
    let mut values = Vec::with_capacity(n * n);
    for (row, r) in rows.into_iter().enumerate() {
        if r.len() != n {
            return Err(OrderError::NotSquare {
                row,
                len: r.len(),
                expected: n,
            });
        }
        values.extend(r);
    }
    Ok(values)
}
