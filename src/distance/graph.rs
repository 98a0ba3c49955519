//! Weighted interaction networks (e.g. STRING combined scores).
//!
//! Interaction scores are confidences: larger means closer. They are turned
//! into non-negative edge costs with a [`CostTransform`] before any distance
//! computation.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use log::debug;

use super::matrix::DistanceMatrix;
use crate::error::{OrderError, Result};
use crate::items::ItemSet;

/// Maps an interaction score to an edge cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostTransform {
    /// `cost = 1 / score`. Scores must be strictly positive.
    Reciprocal,

    /// `cost = 1 - score / max_score`. Scores must lie in `[0, max_score]`.
    ///
    /// STRING combined scores use `max_score = 1000`.
    Complement { max_score: f64 },
}

impl CostTransform {
    /// Complement transform on the STRING 0–1000 score scale.
    pub const STRING: CostTransform = CostTransform::Complement { max_score: 1000.0 };

    fn cost(&self, a: &str, b: &str, score: f64) -> Result<f64> {
        let invalid = |reason| OrderError::InvalidScore {
            a: a.to_string(),
            b: b.to_string(),
            score,
            reason,
        };
        if !score.is_finite() {
            return Err(invalid("score must be finite"));
        }
        match *self {
            CostTransform::Reciprocal => {
                if score <= 0.0 {
                    return Err(invalid("reciprocal cost needs a positive score"));
                }
                Ok(1.0 / score)
            }
            CostTransform::Complement { max_score } => {
                if score < 0.0 || score > max_score {
                    return Err(invalid("score outside [0, max_score]"));
                }
                Ok(1.0 - score / max_score)
            }
        }
    }
}

/// One undirected edge with its transformed cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub cost: f64,
}

/// Undirected weighted graph over an [`ItemSet`].
#[derive(Debug, Clone)]
pub struct InteractionGraph {
    items: ItemSet,
    edges: Vec<Edge>,
}

impl InteractionGraph {
    /// Builds a graph from `(a, b, score)` triples.
    ///
    /// Items are registered in order of first appearance. Self loops are
    /// ignored; a pair listed more than once keeps its cheapest cost, at the
    /// position of its first listing.
    pub fn from_edges<I, S>(edges: I, transform: CostTransform) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        Self::build(ItemSet::empty(), edges, transform, true)
    }

    /// Like [`from_edges`](Self::from_edges) but over a fixed item set, so
    /// isolated items are kept and enumeration order is the caller's.
    /// An edge endpoint outside `items` is an [`OrderError::UnknownItem`].
    pub fn with_items<I, S>(items: ItemSet, edges: I, transform: CostTransform) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        Self::build(items, edges, transform, false)
    }

    /// `extend` registers unseen endpoints; otherwise they are rejected.
    fn build<I, S>(mut items: ItemSet, edges: I, transform: CostTransform, extend: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        let mut out: Vec<Edge> = Vec::new();
        let mut seen: HashMap<(usize, usize), usize> = HashMap::new();
        for (a, b, score) in edges {
            let (a, b) = (a.as_ref(), b.as_ref());
            let (ia, ib) = if extend {
                (items.intern(a), items.intern(b))
            } else {
                (items.require(a)?, items.require(b)?)
            };
            if ia == ib {
                debug!("ignoring self loop on {a}");
                continue;
            }
            let cost = transform.cost(a, b, score)?;
            let key = (ia.min(ib), ia.max(ib));
            match seen.get(&key) {
                Some(&pos) => {
                    if cost < out[pos].cost {
                        out[pos].cost = cost;
                    }
                }
                None => {
                    seen.insert(key, out.len());
                    out.push(Edge { a: ia, b: ib, cost });
                }
            }
        }
        if items.len() < 2 {
            return Err(OrderError::TooFewItems(items.len()));
        }
        Ok(Self { items, edges: out })
    }

    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    /// Edges in listing order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adj = vec![Vec::new(); self.items.len()];
        for e in &self.edges {
            adj[e.a].push((e.b, e.cost));
            adj[e.b].push((e.a, e.cost));
        }
        adj
    }

    /// Matrix of direct edge costs; unconnected pairs are infinite.
    pub fn direct_matrix(&self) -> DistanceMatrix {
        let n = self.items.len();
        let mut values = vec![f64::INFINITY; n * n];
        for i in 0..n {
            values[i * n + i] = 0.0;
        }
        for e in &self.edges {
            values[e.a * n + e.b] = e.cost;
            values[e.b * n + e.a] = e.cost;
        }
        DistanceMatrix::from_parts_unchecked(self.items.clone(), values)
    }

    /// All-pairs weighted shortest-path distances (Dijkstra from each item).
    ///
    /// Items in different connected components stay at `f64::INFINITY`.
    pub fn shortest_path_matrix(&self) -> DistanceMatrix {
        let n = self.items.len();
        let adj = self.adjacency();
        let mut values = Vec::with_capacity(n * n);
        for source in 0..n {
            values.extend(dijkstra(&adj, source));
        }
        DistanceMatrix::from_parts_unchecked(self.items.clone(), values)
    }
}

#[derive(Debug, PartialEq)]
struct Frontier {
    cost: f64,
    node: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; costs are never NaN.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(adj: &[Vec<(usize, f64)>], source: usize) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; adj.len()];
    let mut heap = BinaryHeap::new();
    dist[source] = 0.0;
    heap.push(Frontier {
        cost: 0.0,
        node: source,
    });
    while let Some(Frontier { cost, node }) = heap.pop() {
        if cost > dist[node] {
            continue;
        }
        for &(next, w) in &adj[node] {
            let candidate = cost + w;
            if candidate < dist[next] {
                dist[next] = candidate;
                heap.push(Frontier {
                    cost: candidate,
                    node: next,
                });
            }
        }
    }
    dist
}
