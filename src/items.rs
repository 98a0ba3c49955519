//! The fixed item universe of a run.

use std::collections::HashMap;

use crate::error::{OrderError, Result};

/// An ordered, duplicate-free set of item identifiers (gene or protein IDs).
///
/// The insertion order is the enumeration order used for every tie-break in
/// the crate: the closest pair in a distance matrix, the nearest neighbour
/// during chaining, and the cheapest edge in a sparse graph are all the
/// *first* candidate found when scanning items in this order.
///
/// # Examples
///
/// ```
/// use u_geneorder::ItemSet;
///
/// let items = ItemSet::new(["TP53", "EGFR", "MTOR"]).unwrap();
/// assert_eq!(items.len(), 3);
/// assert_eq!(items.index_of("EGFR"), Some(1));
/// assert!(ItemSet::new(["TP53", "TP53"]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSet {
    ids: Vec<String>,
    index: HashMap<String, usize>,
}

impl ItemSet {
    /// Builds an item set, rejecting duplicates and sets with fewer than
    /// two items.
    pub fn new<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self {
            ids: Vec::new(),
            index: HashMap::new(),
        };
        for id in ids {
            set.push(id.into())?;
        }
        if set.ids.len() < 2 {
            return Err(OrderError::TooFewItems(set.ids.len()));
        }
        Ok(set)
    }

    /// Builds an item set without the minimum-size check.
    ///
    /// Used by graph construction, which registers items one edge at a time.
    pub(crate) fn empty() -> Self {
        Self {
            ids: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(crate) fn push(&mut self, id: String) -> Result<usize> {
        if self.index.contains_key(&id) {
            return Err(OrderError::DuplicateItem(id));
        }
        let idx = self.ids.len();
        self.index.insert(id.clone(), idx);
        self.ids.push(id);
        Ok(idx)
    }

    /// Returns the index of `id`, registering it first if needed.
    pub(crate) fn intern(&mut self, id: &str) -> usize {
        match self.index.get(id) {
            Some(&idx) => idx,
            None => {
                let idx = self.ids.len();
                self.index.insert(id.to_string(), idx);
                self.ids.push(id.to_string());
                idx
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifier at enumeration index `idx`.
    ///
    /// # Panics
    /// Panics if `idx >= len()`.
    pub fn id(&self, idx: usize) -> &str {
        &self.ids[idx]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Like [`index_of`](Self::index_of) but reports unknown items as errors.
    pub fn require(&self, id: &str) -> Result<usize> {
        self.index_of(id)
            .ok_or_else(|| OrderError::UnknownItem(id.to_string()))
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let items = ItemSet::new(["C", "A", "B"]).unwrap();
        let ids: Vec<&str> = items.iter().collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
        assert_eq!(items.index_of("A"), Some(1));
        assert_eq!(items.id(2), "B");
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = ItemSet::new(["A", "B", "A"]).unwrap_err();
        assert!(matches!(err, OrderError::DuplicateItem(ref id) if id == "A"));
    }

    #[test]
    fn test_rejects_too_few() {
        assert!(matches!(
            ItemSet::new(["only"]),
            Err(OrderError::TooFewItems(1))
        ));
        assert!(matches!(
            ItemSet::new(Vec::<String>::new()),
            Err(OrderError::TooFewItems(0))
        ));
    }

    #[test]
    fn test_require_unknown() {
        let items = ItemSet::new(["A", "B"]).unwrap();
        assert_eq!(items.require("B").unwrap(), 1);
        assert!(matches!(
            items.require("Z"),
            Err(OrderError::UnknownItem(ref id)) if id == "Z"
        ));
    }

    #[test]
    fn test_intern_reuses_index() {
        let mut items = ItemSet::empty();
        assert_eq!(items.intern("X"), 0);
        assert_eq!(items.intern("Y"), 1);
        assert_eq!(items.intern("X"), 0);
        assert_eq!(items.len(), 2);
    }
}
