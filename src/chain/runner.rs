//! Greedy nearest-neighbour chaining over a dense distance matrix.
//!
//! # Algorithm
//!
//! 1. Seed on the globally closest pair `(a, b)`: `pos[a] = 0`,
//!    `pos[b] = d(a, b)`, current end = `b`
//! 2. Repeatedly append the unvisited item nearest to the current end,
//!    at `pos[current] + d(current, next)`
//! 3. Stop early if the current end has no finite distance to any unvisited
//!    item
//!
//! Ties are broken by item enumeration order (first candidate wins).
//! The result is an approximate shortest open Hamiltonian path.

use log::{debug, warn};

use super::types::{Chain, ChainLink};
use crate::distance::DistanceMatrix;

/// Dense-matrix chainer.
pub struct DistanceChainer;

impl DistanceChainer {
    /// Chains every item of `matrix`.
    ///
    /// A disconnected matrix yields a partial chain with
    /// [`ChainStatus::PrematureStop`](super::ChainStatus::PrematureStop);
    /// the matrix itself was already validated on construction.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_geneorder::{DistanceChainer, DistanceMatrix, ItemSet};
    ///
    /// let items = ItemSet::new(["A", "B", "C"]).unwrap();
    /// let m = DistanceMatrix::from_rows(
    ///     items,
    ///     vec![
    ///         vec![0.0, 1.0, 4.0],
    ///         vec![1.0, 0.0, 2.0],
    ///         vec![4.0, 2.0, 0.0],
    ///     ],
    /// )
    /// .unwrap();
    /// let chain = DistanceChainer::chain(&m);
    /// assert_eq!(chain.order_ids(), vec!["A", "B", "C"]);
    /// assert_eq!(chain.position_of("C"), Some(3.0));
    /// ```
    pub fn chain(matrix: &DistanceMatrix) -> Chain {
        let n = matrix.len();
        let items = matrix.items().clone();

        let Some((a, b, d_ab)) = matrix.closest_pair() else {
            warn!("no finite distance between any of {n} items; chain is empty");
            return Chain::new(items, Vec::new());
        };

        let mut visited = vec![false; n];
        let mut links = Vec::with_capacity(n);
        visited[a] = true;
        visited[b] = true;
        links.push(ChainLink {
            item: a,
            position: 0.0,
        });
        links.push(ChainLink {
            item: b,
            position: d_ab,
        });
        warn_on_tie(matrix, a, b, d_ab);
        debug!(
            "chain seeded on ({}, {}) at distance {d_ab}",
            items.id(a),
            items.id(b)
        );

        let mut current = b;
        let mut position = d_ab;
        while links.len() < n {
            let mut next: Option<(usize, f64)> = None;
            for x in 0..n {
                if visited[x] {
                    continue;
                }
                let d = matrix.get(current, x);
                if !d.is_finite() {
                    continue;
                }
                match next {
                    Some((_, best)) if d >= best => {}
                    _ => next = Some((x, d)),
                }
            }

            let Some((x, d)) = next else {
                warn!(
                    "chain stopped prematurely at {}: {} of {n} items unreachable",
                    items.id(current),
                    n - links.len()
                );
                break;
            };

            warn_on_tie(matrix, current, x, d);
            position += d;
            visited[x] = true;
            links.push(ChainLink { item: x, position });
            current = x;
        }

        Chain::new(items, links)
    }
}

fn warn_on_tie(matrix: &DistanceMatrix, a: usize, b: usize, d: f64) {
    if d == 0.0 {
        warn!(
            "degenerate distance 0 between {} and {}: positions tie",
            matrix.items().id(a),
            matrix.items().id(b)
        );
    }
}
