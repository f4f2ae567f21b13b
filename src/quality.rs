//! Edge-cut quality of a partition
//!
//! The edge cut of a partition is the total weight of edges whose endpoints
//! lie in different subsets. Lower is better; it is the objective the
//! contraction engine minimizes and the numerator of the quotient score.

use crate::graph::Graph;
use crate::partition::Partition;

/// Total weight of edges crossing subset boundaries of `partition` in `graph`.
///
/// Works for any number of subsets. Each undirected edge is counted once;
/// in directed graphs every crossing arc counts. Nodes outside the
/// partition's range contribute nothing.
pub fn edge_cut(partition: &Partition, graph: &Graph) -> f64 {
    let n = partition.number_of_nodes();
    graph
        .edges()
        .filter(|&(u, v, _)| u < n && v < n && partition.subset_of(u) != partition.subset_of(v))
        .map(|(_, _, w)| w)
        .sum()
}
