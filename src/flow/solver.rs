//! Minimum s,t-cut solvers over a [`FlowNetwork`]
//!
//! [`SourceSinkSolver`] is the seam between flow-network construction and the
//! refinement loop: any implementation producing the source side of a minimum
//! s,t-cut plugs in. Two are shipped:
//!
//! - [`AugmentingPathSolver`]: shortest augmenting paths on the residual
//!   network; handles fractional capacities and is the refinement default.
//! - [`ContractionStCut`]: glue around the terminal-constrained contraction
//!   engine; integral capacities only.

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::trace;

use crate::contraction::StoerWagner;
use crate::error::Result;
use crate::flow::FlowNetwork;
use crate::graph::{Graph, NodeId};

/// Residual capacities below this threshold count as exhausted.
const RESIDUAL_EPS: f64 = 1e-9;

/// A minimum s,t-cut: its capacity and the source-side node set.
///
/// The source side excludes the virtual terminals; it contains only original
/// graph nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct StCut {
    /// Capacity of the cut (equals the maximum flow value).
    pub value: f64,
    /// Nodes on the source side, terminals excluded.
    pub source_side: BTreeSet<NodeId>,
}

/// Anything that can produce a minimum s,t-cut of a flow network.
pub trait SourceSinkSolver {
    /// Compute a minimum s,t-cut of `network`.
    fn min_cut(&self, network: &FlowNetwork) -> Result<StCut>;

    /// Diagnostic label of this solver.
    fn name(&self) -> &'static str;
}

/// Max-flow/min-cut via BFS augmenting paths on the residual network.
///
/// After the flow is maximal, the source side is the set of nodes reachable
/// from `s` through positive residual capacity.
#[derive(Debug, Clone, Copy, Default)]
pub struct AugmentingPathSolver;

impl AugmentingPathSolver {
    /// Shortest augmenting path from `s` to `t`; `None` once none remains.
    fn bfs_path(
        adjacency: &HashMap<NodeId, Vec<NodeId>>,
        residual: &HashMap<(NodeId, NodeId), f64>,
        s: NodeId,
        t: NodeId,
    ) -> Option<HashMap<NodeId, NodeId>> {
        let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
        let mut queue = VecDeque::from([s]);
        let mut seen = BTreeSet::from([s]);

        while let Some(u) = queue.pop_front() {
            for &v in adjacency.get(&u).into_iter().flatten() {
                if !seen.contains(&v) && residual[&(u, v)] > RESIDUAL_EPS {
                    seen.insert(v);
                    parent.insert(v, u);
                    if v == t {
                        return Some(parent);
                    }
                    queue.push_back(v);
                }
            }
        }
        None
    }
}

impl SourceSinkSolver for AugmentingPathSolver {
    fn min_cut(&self, network: &FlowNetwork) -> Result<StCut> {
        let s = network.source();
        let t = network.sink();

        // Residual capacities, with zero-capacity reverse arcs materialized.
        let mut residual: HashMap<(NodeId, NodeId), f64> = HashMap::new();
        for (u, v, w) in network.graph().edges() {
            *residual.entry((u, v)).or_insert(0.0) += w;
            residual.entry((v, u)).or_insert(0.0);
        }
        let mut adjacency: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for &(u, v) in residual.keys() {
            adjacency.entry(u).or_default().push(v);
        }

        let mut value = 0.0;
        while let Some(parent) = Self::bfs_path(&adjacency, &residual, s, t) {
            let mut bottleneck = f64::INFINITY;
            let mut v = t;
            while v != s {
                let u = parent[&v];
                bottleneck = bottleneck.min(residual[&(u, v)]);
                v = u;
            }

            let mut v = t;
            while v != s {
                let u = parent[&v];
                *residual.get_mut(&(u, v)).expect("forward arc") -= bottleneck;
                *residual.get_mut(&(v, u)).expect("reverse arc") += bottleneck;
                v = u;
            }
            value += bottleneck;
            trace!(bottleneck, value, "augmented");
        }

        // Source side: residual-reachable from s.
        let mut reachable = BTreeSet::from([s]);
        let mut queue = VecDeque::from([s]);
        while let Some(u) = queue.pop_front() {
            for &v in adjacency.get(&u).into_iter().flatten() {
                if !reachable.contains(&v) && residual[&(u, v)] > RESIDUAL_EPS {
                    reachable.insert(v);
                    queue.push_back(v);
                }
            }
        }
        reachable.remove(&s);
        debug_assert!(!reachable.contains(&t), "sink reachable after max flow");

        Ok(StCut {
            value,
            source_side: reachable,
        })
    }

    fn name(&self) -> &'static str {
        "augmenting-path"
    }
}

/// Minimum s,t-cut via the terminal-constrained contraction engine.
///
/// The directed network is symmetrized by taking the arc-pair maximum as the
/// undirected weight, then contracted with the virtual terminals as the
/// designated pair. Inherits the engine's integral-weight requirement, so it
/// only serves networks whose terminal weights are still integral.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractionStCut;

impl SourceSinkSolver for ContractionStCut {
    fn min_cut(&self, network: &FlowNetwork) -> Result<StCut> {
        let directed = network.graph();
        let mut undirected = Graph::undirected(directed.upper_node_id_bound());
        for (u, v, w) in directed.edges() {
            let (a, b) = if u < v { (u, v) } else { (v, u) };
            let merged = undirected.weight(a, b).max(w);
            undirected.set_weight(a, b, merged);
        }

        let s = network.source();
        let t = network.sink();
        let mut engine = StoerWagner::with_terminals(&undirected, s, t)?;
        engine.run()?;

        let partition = engine.partition()?;
        let mut source_side = partition.members(partition.subset_of(s));
        source_side.remove(&s);
        debug_assert!(!source_side.contains(&t), "terminals not separated");

        Ok(StCut {
            value: engine.cut_value()?,
            source_side,
        })
    }

    fn name(&self) -> &'static str {
        "contraction"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::Partition;

    /// Single edge 0-1 of weight 3, seed {0} | {1}; the unit terminal arcs
    /// bound the maximum flow at 1.
    fn edge_network() -> FlowNetwork {
        let mut g = Graph::undirected(2);
        g.add_edge(0, 1, 3.0);
        let seed = Partition::from_vec(vec![0, 1]);
        FlowNetwork::from_seed(&g, &seed).unwrap()
    }

    #[test]
    fn test_augmenting_path_unit_bottleneck() {
        let net = edge_network();
        let cut = AugmentingPathSolver.min_cut(&net).unwrap();

        assert!((cut.value - 1.0).abs() < 1e-9);
        assert!(!cut.source_side.contains(&net.source()));
        assert!(!cut.source_side.contains(&net.sink()));
    }

    #[test]
    fn test_contraction_solver_matches_flow_value() {
        let net = edge_network();
        let cut = ContractionStCut.min_cut(&net).unwrap();

        assert_eq!(cut.value, 1.0);
        assert!(cut.source_side.is_subset(&BTreeSet::from([0, 1])));
    }

    #[test]
    fn test_augmenting_path_interior_bottleneck() {
        // Two triangles joined by a weight-1 bridge; the seed puts one
        // triangle on each side, so with raised terminal weights the bridge
        // is the bottleneck.
        let mut g = Graph::undirected(6);
        for (u, v) in [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)] {
            g.add_edge(u, v, 4.0);
        }
        g.add_edge(2, 3, 1.0);
        let seed = Partition::from_vec(vec![0, 0, 0, 1, 1, 1]);
        let mut net = FlowNetwork::from_seed(&g, &seed).unwrap();
        net.set_terminal_weights(10.0, 10.0);

        let cut = AugmentingPathSolver.min_cut(&net).unwrap();
        assert!((cut.value - 1.0).abs() < 1e-9);
        assert_eq!(cut.source_side, BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn test_contraction_solver_rejects_fractional_capacity() {
        let mut net = edge_network();
        net.set_terminal_weights(0.5, 0.5);
        assert!(ContractionStCut.min_cut(&net).is_err());
    }

    #[test]
    fn test_solver_names() {
        assert_eq!(AugmentingPathSolver.name(), "augmenting-path");
        assert_eq!(ContractionStCut.name(), "contraction");
    }
}
