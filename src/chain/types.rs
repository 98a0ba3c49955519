//! Chain output types.

use std::collections::BTreeMap;

use crate::error::{OrderError, Result};
use crate::items::ItemSet;
use crate::ordering::Permutation;

/// One visited item and its cumulative position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainLink {
    pub item: usize,
    pub position: f64,
}

/// Whether the chain reached every item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainStatus {
    /// Every item has a position.
    Complete,

    /// Chaining stopped because no unvisited item was reachable from the
    /// current end of the chain. `unreached` lists the missing item indices
    /// in enumeration order.
    PrematureStop { unreached: Vec<usize> },
}

/// A linear ordering with cumulative real-valued positions.
///
/// Links are in visiting order. The first link sits at position 0 and
/// positions never decrease along the chain.
#[derive(Debug, Clone)]
pub struct Chain {
    items: ItemSet,
    links: Vec<ChainLink>,
    status: ChainStatus,
}

impl Chain {
    pub(crate) fn new(items: ItemSet, links: Vec<ChainLink>) -> Self {
        let mut visited = vec![false; items.len()];
        for link in &links {
            visited[link.item] = true;
        }
        let unreached: Vec<usize> = (0..items.len()).filter(|&i| !visited[i]).collect();
        let status = if unreached.is_empty() {
            ChainStatus::Complete
        } else {
            ChainStatus::PrematureStop { unreached }
        };
        Self {
            items,
            links,
            status,
        }
    }

    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn status(&self) -> &ChainStatus {
        &self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == ChainStatus::Complete
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Identifiers in visiting order.
    pub fn order_ids(&self) -> Vec<&str> {
        self.links.iter().map(|l| self.items.id(l.item)).collect()
    }

    /// Identifiers the chain never reached.
    pub fn unreached_ids(&self) -> Vec<&str> {
        match &self.status {
            ChainStatus::Complete => Vec::new(),
            ChainStatus::PrematureStop { unreached } => {
                unreached.iter().map(|&i| self.items.id(i)).collect()
            }
        }
    }

    pub fn position_of(&self, id: &str) -> Option<f64> {
        let item = self.items.index_of(id)?;
        self.links
            .iter()
            .find(|l| l.item == item)
            .map(|l| l.position)
    }

    /// Item → position for every chained item.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.links
            .iter()
            .map(|l| (self.items.id(l.item).to_string(), l.position))
            .collect()
    }

    /// Ranks the chain into integer slots `0..n` in visiting order, so it
    /// can be scored by the same oracle as search candidates.
    ///
    /// Fails on a partial chain, which does not cover the item set.
    pub fn rank_permutation(&self) -> Result<Permutation> {
        if !self.is_complete() {
            return Err(OrderError::InvalidOrdering(format!(
                "chain is partial: {} of {} items placed",
                self.links.len(),
                self.items.len()
            )));
        }
        let sequence: Vec<usize> = self.links.iter().map(|l| l.item).collect();
        Permutation::from_sequence(&sequence)
    }
}
