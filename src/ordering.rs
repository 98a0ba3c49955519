//! Integer orderings used by the permutation search.
//!
//! A [`Permutation`] assigns every item index a distinct slot index.
//! The slot is resolved to an actual position value through a
//! [`SearchSpace`], and a [`Placement`] is the read-only item → position
//! view handed to the fitness oracle.

use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{OrderError, Result};
use crate::items::ItemSet;

/// Bijection from item index to slot index, both in `0..n`.
///
/// `slots()[i]` is the slot of item `i`. Two items never share a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation {
    slots: Vec<usize>,
}

impl Permutation {
    /// Wraps `slots`, checking that it is a permutation of `0..slots.len()`.
    pub fn new(slots: Vec<usize>) -> Result<Self> {
        let n = slots.len();
        let mut seen = vec![false; n];
        for (item, &slot) in slots.iter().enumerate() {
            if slot >= n {
                return Err(OrderError::InvalidOrdering(format!(
                    "item {item} has slot {slot}, outside 0..{n}"
                )));
            }
            if seen[slot] {
                return Err(OrderError::InvalidOrdering(format!(
                    "slot {slot} is assigned more than once"
                )));
            }
            seen[slot] = true;
        }
        Ok(Self { slots })
    }

    /// Built by operators that preserve validity by construction.
    pub(crate) fn from_slots_unchecked(slots: Vec<usize>) -> Self {
        debug_assert!(Self::new(slots.clone()).is_ok());
        Self { slots }
    }

    /// Item `i` in slot `i`.
    pub fn identity(n: usize) -> Self {
        Self {
            slots: (0..n).collect(),
        }
    }

    /// A uniformly random permutation of `n` slots.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut slots: Vec<usize> = (0..n).collect();
        slots.shuffle(rng);
        Self { slots }
    }

    /// Builds the permutation that places items in the given visiting order.
    pub fn from_sequence(sequence: &[usize]) -> Result<Self> {
        let mut slots = vec![usize::MAX; sequence.len()];
        for (slot, &item) in sequence.iter().enumerate() {
            if item >= sequence.len() || slots[item] != usize::MAX {
                return Err(OrderError::InvalidOrdering(format!(
                    "sequence entry {item} is out of range or repeated"
                )));
            }
            slots[item] = slot;
        }
        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    pub fn slot_of(&self, item: usize) -> usize {
        self.slots[item]
    }

    /// Item indices sorted by slot (the visiting order).
    pub fn sequence(&self) -> Vec<usize> {
        let mut seq = vec![0; self.slots.len()];
        for (item, &slot) in self.slots.iter().enumerate() {
            seq[slot] = item;
        }
        seq
    }

    /// Exchanges the slots of items `a` and `b`.
    pub fn swap_items(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
    }
}

/// The item universe together with the allowed position values.
///
/// The search assigns each item one position from `positions`; the number
/// of positions must equal the number of items so that every candidate is a
/// permutation rather than a subset.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    items: ItemSet,
    positions: Vec<usize>,
}

impl SearchSpace {
    /// Positions `0..n` for `n` items.
    pub fn contiguous(items: ItemSet) -> Self {
        let positions = (0..items.len()).collect();
        Self { items, positions }
    }

    /// Caller-supplied distinct position values.
    pub fn new(items: ItemSet, positions: Vec<usize>) -> Result<Self> {
        if positions.len() != items.len() {
            return Err(OrderError::InvalidConfig(format!(
                "{} positions for {} items; counts must match",
                positions.len(),
                items.len()
            )));
        }
        let mut seen = HashSet::with_capacity(positions.len());
        for &p in &positions {
            if !seen.insert(p) {
                return Err(OrderError::InvalidConfig(format!(
                    "position {p} is listed more than once"
                )));
            }
        }
        Ok(Self { items, positions })
    }

    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Views `perm` as item → position.
    ///
    /// # Panics
    /// Panics if `perm` does not cover this space.
    pub fn placement<'a>(&'a self, perm: &'a Permutation) -> Placement<'a> {
        assert_eq!(
            perm.len(),
            self.items.len(),
            "permutation length must match the item count"
        );
        Placement { space: self, perm }
    }

    /// Reads an item → position map back into a permutation.
    ///
    /// The map must cover exactly this item set and use each allowed
    /// position once.
    pub fn permutation_from_map(&self, map: &BTreeMap<String, usize>) -> Result<Permutation> {
        if map.len() != self.items.len() {
            return Err(OrderError::InvalidOrdering(format!(
                "mapping covers {} items, expected {}",
                map.len(),
                self.items.len()
            )));
        }
        let mut slots = vec![usize::MAX; self.items.len()];
        for (id, &position) in map {
            let item = self.items.require(id)?;
            let slot = self
                .positions
                .iter()
                .position(|&p| p == position)
                .ok_or_else(|| {
                    OrderError::InvalidOrdering(format!(
                        "position {position} of {id} is not an allowed position"
                    ))
                })?;
            slots[item] = slot;
        }
        Permutation::new(slots)
    }
}

/// Read-only item → position view of one candidate ordering.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    space: &'a SearchSpace,
    perm: &'a Permutation,
}

impl<'a> Placement<'a> {
    pub fn items(&self) -> &'a ItemSet {
        &self.space.items
    }

    pub fn permutation(&self) -> &'a Permutation {
        self.perm
    }

    pub fn len(&self) -> usize {
        self.perm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        let item = self.space.items.index_of(id)?;
        Some(self.space.positions[self.perm.slot_of(item)])
    }

    /// `(item, position)` pairs in item enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, usize)> + 'a {
        let space = self.space;
        let perm = self.perm;
        space
            .items
            .iter()
            .enumerate()
            .map(move |(i, id)| (id, space.positions[perm.slot_of(i)]))
    }

    /// Item identifiers sorted by ascending position.
    pub fn ordered_ids(&self) -> Vec<&'a str> {
        let mut pairs: Vec<(&'a str, usize)> = self.iter().collect();
        pairs.sort_by_key(|&(_, p)| p);
        pairs.into_iter().map(|(id, _)| id).collect()
    }

    pub fn to_map(&self) -> BTreeMap<String, usize> {
        self.iter().map(|(id, p)| (id.to_string(), p)).collect()
    }
}
