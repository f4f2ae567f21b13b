//! Node partitions (clusterings) over dense node ids
//!
//! A [`Partition`] maps every node to exactly one subset id. Subset ids are
//! not required to be compact; [`Partition::compact`] renumbers them to
//! `[0, k)`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// Subset identifier within a partition
pub type SubsetId = usize;

/// A partition of the node set `[0, n)` into subsets.
///
/// Every node belongs to exactly one subset; the representation makes the
/// invariant unbreakable. Freshly constructed partitions place every node in
/// subset 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    data: Vec<SubsetId>,
}

impl Partition {
    /// Create a partition of `n` nodes, all assigned to subset 0.
    pub fn new(n: usize) -> Self {
        Self { data: vec![0; n] }
    }

    /// Create a partition from an explicit node → subset assignment.
    pub fn from_vec(data: Vec<SubsetId>) -> Self {
        Self { data }
    }

    /// Number of nodes covered by this partition.
    pub fn number_of_nodes(&self) -> usize {
        self.data.len()
    }

    /// Subset id of node `u`.
    ///
    /// # Panics
    ///
    /// Panics if `u` is out of range.
    pub fn subset_of(&self, u: NodeId) -> SubsetId {
        self.data[u]
    }

    /// Move node `u` into subset `s`.
    ///
    /// # Panics
    ///
    /// Panics if `u` is out of range.
    pub fn move_to_subset(&mut self, s: SubsetId, u: NodeId) {
        self.data[u] = s;
    }

    /// All members of subset `s`, in ascending node order.
    pub fn members(&self, s: SubsetId) -> BTreeSet<NodeId> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &sub)| sub == s)
            .map(|(u, _)| u)
            .collect()
    }

    /// Map from subset id to subset size, covering every nonempty subset.
    pub fn subset_size_map(&self) -> BTreeMap<SubsetId, usize> {
        let mut sizes = BTreeMap::new();
        for &s in &self.data {
            *sizes.entry(s).or_insert(0) += 1;
        }
        sizes
    }

    /// The distinct subset ids in use.
    pub fn subset_ids(&self) -> BTreeSet<SubsetId> {
        self.data.iter().copied().collect()
    }

    /// Number of nonempty subsets.
    pub fn number_of_subsets(&self) -> usize {
        self.subset_ids().len()
    }

    /// Renumber subset ids to `[0, k)`, preserving ascending id order.
    pub fn compact(&mut self) {
        let remap: BTreeMap<SubsetId, SubsetId> = self
            .subset_ids()
            .into_iter()
            .enumerate()
            .map(|(new, old)| (old, new))
            .collect();
        for s in &mut self.data {
            *s = remap[s];
        }
    }

    /// The node → subset assignment as a slice.
    pub fn as_slice(&self) -> &[SubsetId] {
        &self.data
    }
}
