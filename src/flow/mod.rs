//! Flow-network construction from a seed bipartition
//!
//! Augments a directed copy of an undirected graph with a virtual source `s`
//! and sink `t`: every node of the seed's smaller side `A` gets an arc
//! `s -> a`, every other node an arc `b -> t`, unit capacity at construction.
//! The topology is fixed for the lifetime of a refinement run; only the
//! terminal-arc weights change between iterations.

pub mod solver;

use std::collections::BTreeSet;

use crate::error::{CutError, Result};
use crate::graph::{Graph, NodeId, Weight};
use crate::partition::Partition;

pub use solver::{AugmentingPathSolver, ContractionStCut, SourceSinkSolver, StCut};

/// A directed flow network derived from a graph and a two-way seed partition.
///
/// The virtual source and sink take the two ids directly above the input
/// graph's upper node id bound; they never appear in partitions reported to
/// callers.
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    graph: Graph,
    source: NodeId,
    sink: NodeId,
    /// Smaller subset of the seed partition; arc targets of the source.
    side_a: BTreeSet<NodeId>,
    /// All remaining nodes; arc sources of the sink.
    side_b: BTreeSet<NodeId>,
    /// Balance ratio `|A| / (|V| - |A|)` of the seed.
    f_a: f64,
}

impl FlowNetwork {
    /// Build the network for `graph` from the seed partition.
    ///
    /// The seed is validated before the graph is read beyond its node
    /// counts: it must cover the graph's id space and consist of exactly two
    /// nonempty subsets. The input graph is copied, never mutated.
    ///
    /// # Errors
    ///
    /// [`CutError::InvalidPartition`] if the seed is not a proper two-way
    /// clustering; [`CutError::InvalidParameter`] if the graph is directed or
    /// has removed-node holes.
    pub fn from_seed(graph: &Graph, seed: &Partition) -> Result<Self> {
        let sizes = seed.subset_size_map();
        if sizes.len() != 2 {
            return Err(CutError::InvalidPartition(format!(
                "expected exactly 2 nonempty subsets, found {}",
                sizes.len()
            )));
        }
        if seed.number_of_nodes() != graph.upper_node_id_bound() {
            return Err(CutError::InvalidPartition(format!(
                "seed covers {} nodes but the graph has id bound {}",
                seed.number_of_nodes(),
                graph.upper_node_id_bound()
            )));
        }
        if graph.is_directed() {
            return Err(CutError::InvalidParameter(
                "flow construction expects an undirected input graph".to_string(),
            ));
        }
        if graph.number_of_nodes() != graph.upper_node_id_bound() {
            return Err(CutError::InvalidParameter(
                "flow construction expects a graph without removed-node holes".to_string(),
            ));
        }

        // The reference side is the smaller subset; ties go to the smaller
        // subset id.
        let (&a_id, &a_size) = sizes
            .iter()
            .min_by_key(|(_, &size)| size)
            .expect("two subsets present");
        let n = graph.number_of_nodes();
        let f_a = a_size as f64 / (n - a_size) as f64;

        let side_a = seed.members(a_id);
        let side_b: BTreeSet<NodeId> = graph.nodes().filter(|u| !side_a.contains(u)).collect();

        let ub = graph.upper_node_id_bound();
        let mut net = Graph::directed(ub + 2);
        let source = ub;
        let sink = ub + 1;

        for (u, v, w) in graph.edges() {
            if u == v {
                continue;
            }
            net.add_edge(u, v, w);
            net.add_edge(v, u, w);
        }
        for &a in &side_a {
            net.add_edge(source, a, 1.0);
        }
        for &b in &side_b {
            net.add_edge(b, sink, 1.0);
        }

        Ok(Self {
            graph: net,
            source,
            sink,
            side_a,
            side_b,
            f_a,
        })
    }

    /// Overwrite every source-incident arc with `source_weight` and every
    /// sink-incident arc with `sink_weight`. Interior arcs are untouched.
    pub fn set_terminal_weights(&mut self, source_weight: Weight, sink_weight: Weight) {
        for &a in &self.side_a {
            self.graph.set_weight(self.source, a, source_weight);
        }
        for &b in &self.side_b {
            self.graph.set_weight(b, self.sink, sink_weight);
        }
    }

    /// The underlying directed graph including the virtual terminals.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Id of the virtual source.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Id of the virtual sink.
    pub fn sink(&self) -> NodeId {
        self.sink
    }

    /// The seed's smaller side `A`.
    pub fn side_a(&self) -> &BTreeSet<NodeId> {
        &self.side_a
    }

    /// Balance ratio `|A| / (|V| - |A|)` of the seed.
    pub fn f_a(&self) -> f64 {
        self.f_a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        let mut g = Graph::undirected(3);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 1.0);
        g.add_edge(2, 0, 1.0);
        g
    }

    #[test]
    fn test_from_seed_topology() {
        let g = triangle();
        let seed = Partition::from_vec(vec![0, 1, 1]);
        let net = FlowNetwork::from_seed(&g, &seed).unwrap();

        assert_eq!(net.source(), 3);
        assert_eq!(net.sink(), 4);
        assert_eq!(net.side_a(), &BTreeSet::from([0]));
        assert_eq!(net.f_a(), 0.5);

        // Interior edges become opposing arcs; terminals get unit arcs.
        assert_eq!(net.graph().weight(0, 1), 1.0);
        assert_eq!(net.graph().weight(1, 0), 1.0);
        assert_eq!(net.graph().weight(3, 0), 1.0);
        assert_eq!(net.graph().weight(1, 4), 1.0);
        assert_eq!(net.graph().weight(2, 4), 1.0);
        assert_eq!(net.graph().weight(3, 1), 0.0);
        assert_eq!(net.graph().weight(0, 4), 0.0);
    }

    #[test]
    fn test_minority_side_is_reference() {
        let mut g = Graph::undirected(5);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 1.0);
        g.add_edge(2, 3, 1.0);
        g.add_edge(3, 4, 1.0);
        let seed = Partition::from_vec(vec![7, 7, 7, 2, 2]);

        let net = FlowNetwork::from_seed(&g, &seed).unwrap();
        assert_eq!(net.side_a(), &BTreeSet::from([3, 4]));
        assert_eq!(net.f_a(), 2.0 / 3.0);
    }

    #[test]
    fn test_three_subsets_rejected() {
        let g = triangle();
        let seed = Partition::from_vec(vec![0, 1, 2]);
        assert!(matches!(
            FlowNetwork::from_seed(&g, &seed).unwrap_err(),
            CutError::InvalidPartition(_)
        ));
    }

    #[test]
    fn test_single_subset_rejected() {
        let g = triangle();
        let seed = Partition::new(3);
        assert!(matches!(
            FlowNetwork::from_seed(&g, &seed).unwrap_err(),
            CutError::InvalidPartition(_)
        ));
    }

    #[test]
    fn test_seed_size_mismatch_rejected() {
        let g = triangle();
        let seed = Partition::from_vec(vec![0, 1]);
        assert!(matches!(
            FlowNetwork::from_seed(&g, &seed).unwrap_err(),
            CutError::InvalidPartition(_)
        ));
    }

    #[test]
    fn test_input_graph_untouched() {
        let g = triangle();
        let before = g.clone();
        let seed = Partition::from_vec(vec![0, 1, 1]);
        let _ = FlowNetwork::from_seed(&g, &seed).unwrap();

        assert_eq!(g.number_of_nodes(), before.number_of_nodes());
        assert_eq!(g.total_edge_weight(), before.total_edge_weight());
        assert!(!g.has_node(3));
    }

    #[test]
    fn test_set_terminal_weights() {
        let g = triangle();
        let seed = Partition::from_vec(vec![0, 1, 1]);
        let mut net = FlowNetwork::from_seed(&g, &seed).unwrap();

        net.set_terminal_weights(2.5, 1.25);
        assert_eq!(net.graph().weight(3, 0), 2.5);
        assert_eq!(net.graph().weight(1, 4), 1.25);
        assert_eq!(net.graph().weight(2, 4), 1.25);
        // Interior arcs unchanged.
        assert_eq!(net.graph().weight(0, 1), 1.0);
    }
}
