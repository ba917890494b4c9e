//! Committed node correspondences

use rustc_hash::{FxHashMap, FxHashSet};

/// Append-only table from operand-1 node index to operand-2 node index.
///
/// An entry is written once, when a node pair has been accepted, and is
/// never revised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMapping {
    forward: FxHashMap<usize, usize>,
}

impl NodeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, left: usize) -> Option<usize> {
        self.forward.get(&left).copied()
    }

    pub(crate) fn commit(&mut self, left: usize, right: usize) {
        debug_assert!(
            !self.forward.contains_key(&left),
            "node #{left} committed twice"
        );
        self.forward.entry(left).or_insert(right);
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn distinct_targets(&self) -> usize {
        self.forward.values().collect::<FxHashSet<_>>().len()
    }

    /// True when the table pairs every one of `left_len` nodes with a
    /// distinct node among `right_len`, covering all of them.
    pub fn is_bijection(&self, left_len: usize, right_len: usize) -> bool {
        self.len() == left_len && self.distinct_targets() == right_len
    }

    /// Committed pairs sorted by operand-1 index
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<_> = self.forward.iter().map(|(&l, &r)| (l, r)).collect();
        pairs.sort_unstable();
        pairs
    }
}
