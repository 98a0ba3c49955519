//! Chaining directly over an interaction edge list.
//!
//! Same greedy walk as [`DistanceChainer`](super::DistanceChainer), but the
//! candidates are the graph's direct edges rather than a dense matrix. After
//! each step every edge touching the endpoint just left behind is dropped,
//! so the edges still touching the current end always lead to unvisited
//! items and the edge list shrinks as the chain grows.

use log::{debug, warn};

use super::types::{Chain, ChainLink};
use crate::distance::{Edge, InteractionGraph};

/// Edge-list chainer with eager pruning of retired endpoints.
pub struct SparseChainer;

impl SparseChainer {
    /// Chains the items of `graph` along its cheapest edges.
    ///
    /// Ties are broken by edge listing order. Items with no usable edge
    /// from the chain's end are reported as unreached.
    pub fn chain(graph: &InteractionGraph) -> Chain {
        let items = graph.items().clone();
        let n = items.len();
        let mut edges: Vec<Edge> = graph.edges().to_vec();

        let Some(seed) = cheapest(edges.iter()) else {
            warn!("interaction graph over {n} items has no edges; chain is empty");
            return Chain::new(items, Vec::new());
        };

        let (root, mut current, d) = (seed.a, seed.b, seed.cost);
        let mut links = Vec::with_capacity(n);
        links.push(ChainLink {
            item: root,
            position: 0.0,
        });
        links.push(ChainLink {
            item: current,
            position: d,
        });
        debug!(
            "sparse chain seeded on ({}, {}) at cost {d}",
            items.id(root),
            items.id(current)
        );
        retire(&mut edges, root);

        let mut position = d;
        while links.len() < n {
            let Some(step) = cheapest(edges.iter().filter(|e| e.a == current || e.b == current))
            else {
                warn!(
                    "sparse chain stopped prematurely at {}: {} of {n} items unreachable",
                    items.id(current),
                    n - links.len()
                );
                break;
            };
            let next = if step.a == current { step.b } else { step.a };
            if step.cost == 0.0 {
                warn!(
                    "degenerate cost 0 between {} and {}: positions tie",
                    items.id(current),
                    items.id(next)
                );
            }
            position += step.cost;
            links.push(ChainLink {
                item: next,
                position,
            });
            retire(&mut edges, current);
            current = next;
        }

        Chain::new(items, links)
    }
}

/// First edge with the minimal cost.
fn cheapest<'a>(edges: impl Iterator<Item = &'a Edge>) -> Option<Edge> {
    let mut best: Option<Edge> = None;
    for e in edges {
        match best {
            Some(b) if e.cost >= b.cost => {}
            _ => best = Some(*e),
        }
    }
    best
}

fn retire(edges: &mut Vec<Edge>, item: usize) {
    edges.retain(|e| e.a != item && e.b != item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::DistanceChainer;
    use crate::distance::CostTransform;
    use crate::items::ItemSet;
    use crate::random::create_rng;
    use proptest::prelude::*;
    use rand::Rng;
    use std::collections::HashSet;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("g{i}")).collect()
    }

    /// Every pair connected, so the walk can always continue.
    fn complete_graph(n: usize, seed: u64) -> InteractionGraph {
        let mut rng = create_rng(seed);
        let ids = ids(n);
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((ids[i].clone(), ids[j].clone(), rng.random_range(0.1..10.0)));
            }
        }
        InteractionGraph::with_items(ItemSet::new(ids.clone()).unwrap(), edges, CostTransform::Reciprocal).unwrap()
    }

    /// A few random edges per item; usually leaves items unreached.
    fn sparse_graph(n: usize, seed: u64) -> InteractionGraph {
        let mut rng = create_rng(seed);
        let ids = ids(n);
        let mut edges = Vec::new();
        for i in 0..n {
            for _ in 0..2 {
                let j = rng.random_range(0..n);
                edges.push((ids[i].clone(), ids[j].clone(), rng.random_range(0.1..10.0)));
            }
        }
        InteractionGraph::with_items(ItemSet::new(ids.clone()).unwrap(), edges, CostTransform::Reciprocal).unwrap()
    }

    #[test]
    fn test_string_network_chain() {
        let g = InteractionGraph::from_edges(
            [
                ("IFNA1", "IFNB1", 950.0),
                ("IFNB1", "STAT1", 700.0),
                ("STAT1", "IRF7", 900.0),
                ("IFNA1", "STAT1", 600.0),
                ("MTOR", "AKT1", 990.0),
                ("AKT1", "IRF7", 400.0),
            ],
            CostTransform::STRING,
        )
        .unwrap();
        let chain = SparseChainer::chain(&g);
        assert!(chain.is_complete());
        // Seed MTOR-AKT1 (cost 0.01), then AKT1 -> IRF7 -> STAT1 -> IFNB1 -> IFNA1.
        assert_eq!(
            chain.order_ids(),
            vec!["MTOR", "AKT1", "IRF7", "STAT1", "IFNB1", "IFNA1"]
        );
        let expected = [0.0, 0.01, 0.61, 0.71, 1.01, 1.06];
        for (link, want) in chain.links().iter().zip(expected) {
            assert!((link.position - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_retired_endpoint_is_not_revisited() {
        // B's only remaining edge leads back to the retired root A.
        let items = ItemSet::new(["A", "B", "C"]).unwrap();
        let g = InteractionGraph::with_items(
            items,
            [("A", "B", 2.0), ("A", "C", 1.0)],
            CostTransform::Reciprocal,
        )
        .unwrap();
        let chain = SparseChainer::chain(&g);
        assert_eq!(chain.order_ids(), vec!["A", "B"]);
        assert_eq!(chain.unreached_ids(), vec!["C"]);
    }

    #[test]
    fn test_matches_dense_chainer_on_complete_graph() {
        let g = InteractionGraph::from_edges(
            [
                ("A", "B", 1.0),
                ("A", "C", 1.0 / 3.0),
                ("A", "D", 0.2),
                ("B", "C", 0.5),
                ("B", "D", 0.25),
                ("C", "D", 1.0),
            ],
            CostTransform::Reciprocal,
        )
        .unwrap();
        let sparse = SparseChainer::chain(&g);
        let dense = DistanceChainer::chain(&g.direct_matrix());
        assert_eq!(sparse.order_ids(), dense.order_ids());
        assert_eq!(sparse.order_ids(), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_no_edges() {
        let items = ItemSet::new(["A", "B"]).unwrap();
        let g = InteractionGraph::with_items(items, Vec::<(&str, &str, f64)>::new(), CostTransform::Reciprocal)
            .unwrap();
        let chain = SparseChainer::chain(&g);
        assert!(chain.is_empty());
        assert!(!chain.is_complete());
    }

    proptest! {
        #[test]
        fn prop_complete_graph_chain_is_bijection(n in 2usize..20, seed in any::<u64>()) {
            let g = complete_graph(n, seed);
            let chain = SparseChainer::chain(&g);
            prop_assert!(chain.is_complete());
            let seen: HashSet<usize> = chain.links().iter().map(|l| l.item).collect();
            prop_assert_eq!(seen.len(), n);
            prop_assert_eq!(chain.links()[0].position, 0.0);
        }

        #[test]
        fn prop_steps_match_edge_costs(n in 2usize..20, seed in any::<u64>(), complete in any::<bool>()) {
            let g = if complete { complete_graph(n, seed) } else { sparse_graph(n, seed) };
            let direct = g.direct_matrix();
            let chain = SparseChainer::chain(&g);

            let seen: HashSet<usize> = chain.links().iter().map(|l| l.item).collect();
            prop_assert_eq!(seen.len(), chain.len());
            prop_assert_eq!(chain.len() + chain.unreached_ids().len(), n);
            if let Some(first) = chain.links().first() {
                prop_assert_eq!(first.position, 0.0);
            }
            for w in chain.links().windows(2) {
                let cost = direct.get(w[0].item, w[1].item);
                prop_assert!(cost.is_finite());
                prop_assert!((w[1].position - w[0].position - cost).abs() < 1e-9);
            }
        }
    }
}
