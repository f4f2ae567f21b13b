//! Contraction-based global minimum cut
//!
//! Repeatedly runs a maximum-adjacency phase over a shrinking contracted
//! graph: the phase grows a set by always absorbing the node with the
//! greatest total weight to the set, the last two nodes extracted define the
//! cut-of-the-phase, and the pair is then merged. The best cut-of-the-phase
//! over all `n - 1` phases is the global minimum cut.
//!
//! A terminal-constrained variant keeps the same machinery but seeds every
//! phase at a designated source and only accepts candidates that separate the
//! designated terminal pair.
//!
//! Each phase is driven by the bucket-keyed queue in [`crate::pq`]; keys are
//! negated connection weights, so extract-min always yields the most
//! connected outside node.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{CutError, Result};
use crate::graph::{Graph, NodeId};
use crate::partition::Partition;
use crate::pq::{BucketQueue, KeyRange};
use crate::quality;

/// Per-run statistics of the contraction engine.
///
/// Observability only; the algorithm never reads these back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractionStats {
    /// Number of completed phases.
    pub phases: usize,
    /// Number of times a phase candidate replaced the best cut.
    pub best_updates: usize,
    /// Total run wall time in microseconds.
    pub runtime_us: u64,
}

/// The shrinking contracted graph together with the representative mapping
/// from original node ids into it.
#[derive(Debug, Clone)]
struct ContractionState {
    /// Original node id → its current representative in `current_graph`.
    node_mapping: Vec<NodeId>,
    /// Live graph being merged; starts as a self-loop-free copy of the input.
    current_graph: Graph,
}

impl ContractionState {
    fn new(graph: &Graph) -> Self {
        Self {
            node_mapping: (0..graph.upper_node_id_bound()).collect(),
            current_graph: graph.without_self_loops(),
        }
    }

    /// Merge `s` into `t`: edge weights of `s` are absorbed onto `t`, `s` is
    /// removed, and every original node represented by `s` is remapped to
    /// `t`. The weight of the edge `(s, t)` itself leaves the graph.
    fn merge(&mut self, s: NodeId, t: NodeId) {
        let absorbed: Vec<(NodeId, f64)> = self
            .current_graph
            .neighbors(s)
            .filter(|&(u, _)| u != t)
            .collect();
        for (u, w) in absorbed {
            let existing = self.current_graph.weight(t, u);
            self.current_graph.set_weight(t, u, existing + w);
        }
        self.current_graph.remove_node(s);
        for m in &mut self.node_mapping {
            if *m == s {
                *m = t;
            }
        }
    }
}

/// Global minimum cut of a weighted undirected graph via iterative
/// contraction.
///
/// The engine deep-copies the input graph at construction, so the caller's
/// graph is untouched and may be reused. Call [`run`](StoerWagner::run)
/// exactly once, then read the result through
/// [`partition`](StoerWagner::partition) and
/// [`cut_value`](StoerWagner::cut_value).
///
/// Edge weights must be nonnegative integers (stored as `f64`); the
/// bucket-keyed phase queue indexes by them.
#[derive(Debug)]
pub struct StoerWagner {
    /// Untouched copy of the input, used to score every phase candidate.
    original: Graph,
    state: ContractionState,
    /// Designated terminal pair of the constrained variant.
    terminals: Option<(NodeId, NodeId)>,
    best: Option<(f64, Partition)>,
    has_run: bool,
    stats: ContractionStats,
}

impl StoerWagner {
    /// Create an engine computing the global minimum cut of `graph`.
    ///
    /// # Errors
    ///
    /// [`CutError::InvalidParameter`] if the graph is directed, has fewer
    /// than two nodes, or carries a negative or non-integral edge weight.
    pub fn new(graph: &Graph) -> Result<Self> {
        Self::build(graph, None)
    }

    /// Create the terminal-constrained variant: phases are seeded at
    /// `source`, and only candidates separating `source` from `sink` are
    /// eligible as the result.
    ///
    /// # Errors
    ///
    /// [`CutError::InvalidParameter`] under the same conditions as
    /// [`new`](StoerWagner::new), or when either terminal is not a live node
    /// or the terminals coincide.
    pub fn with_terminals(graph: &Graph, source: NodeId, sink: NodeId) -> Result<Self> {
        if !graph.has_node(source) || !graph.has_node(sink) {
            return Err(CutError::InvalidParameter(format!(
                "terminal pair ({source}, {sink}) must be live nodes"
            )));
        }
        if source == sink {
            return Err(CutError::InvalidParameter(format!(
                "terminals must be distinct, got {source} twice"
            )));
        }
        Self::build(graph, Some((source, sink)))
    }

    fn build(graph: &Graph, terminals: Option<(NodeId, NodeId)>) -> Result<Self> {
        if graph.is_directed() {
            return Err(CutError::InvalidParameter(
                "contraction requires an undirected graph".to_string(),
            ));
        }
        if graph.number_of_nodes() < 2 {
            return Err(CutError::InvalidParameter(
                "graph must contain at least two nodes".to_string(),
            ));
        }
        for (u, v, w) in graph.edges() {
            if w < 0.0 || w.fract() != 0.0 {
                return Err(CutError::InvalidParameter(format!(
                    "edge ({u}, {v}) has weight {w}; bucket keys require nonnegative integral weights"
                )));
            }
        }
        Ok(Self {
            original: graph.clone(),
            state: ContractionState::new(graph),
            terminals,
            best: None,
            has_run: false,
            stats: ContractionStats::default(),
        })
    }

    /// Run the contraction to completion. Call exactly once.
    ///
    /// # Errors
    ///
    /// [`CutError::InvalidParameter`] on a repeated call;
    /// [`CutError::NoSeparatingCut`] if the terminal-constrained variant
    /// never saw a candidate separating its pair.
    pub fn run(&mut self) -> Result<()> {
        if self.has_run {
            return Err(CutError::InvalidParameter(
                "run() may only be called once per instance".to_string(),
            ));
        }
        let started = Instant::now();
        debug!(
            nodes = self.original.number_of_nodes(),
            edges = self.original.number_of_edges(),
            terminals = ?self.terminals,
            "starting contraction run"
        );

        while self.state.current_graph.number_of_nodes() > 1 {
            let seed = self.phase_seed();
            let candidate = self.phase(seed);
            self.stats.phases += 1;

            if let Some((s0, t0)) = self.terminals {
                if candidate.subset_of(s0) == candidate.subset_of(t0) {
                    trace!(phase = self.stats.phases, "candidate keeps terminals together, discarded");
                    continue;
                }
            }

            let value = quality::edge_cut(&candidate, &self.original);
            trace!(phase = self.stats.phases, value, "cut of the phase");
            if self.best.as_ref().map_or(true, |(b, _)| value < *b) {
                debug!(phase = self.stats.phases, value, "new best cut");
                self.stats.best_updates += 1;
                self.best = Some((value, candidate));
            }
        }

        if self.best.is_none() {
            let (s0, t0) = self
                .terminals
                .expect("an unconstrained run keeps every phase candidate");
            return Err(CutError::NoSeparatingCut(s0, t0));
        }

        self.stats.runtime_us = started.elapsed().as_micros() as u64;
        self.has_run = true;
        debug!(
            phases = self.stats.phases,
            runtime_us = self.stats.runtime_us,
            "contraction run finished"
        );
        Ok(())
    }

    /// The minimum-cut bipartition over original node ids: subset 1 holds the
    /// grown side of the winning phase, subset 0 the rest.
    ///
    /// # Errors
    ///
    /// [`CutError::NotRun`] before [`run`](StoerWagner::run) completed.
    pub fn partition(&self) -> Result<Partition> {
        match (&self.best, self.has_run) {
            (Some((_, p)), true) => Ok(p.clone()),
            _ => Err(CutError::NotRun),
        }
    }

    /// Weight of the minimum cut.
    ///
    /// # Errors
    ///
    /// [`CutError::NotRun`] before [`run`](StoerWagner::run) completed.
    pub fn cut_value(&self) -> Result<f64> {
        match (&self.best, self.has_run) {
            (Some((value, _)), true) => Ok(*value),
            _ => Err(CutError::NotRun),
        }
    }

    /// Per-run statistics.
    pub fn stats(&self) -> &ContractionStats {
        &self.stats
    }

    /// Phase start node: the source terminal's current representative, or the
    /// smallest live node.
    fn phase_seed(&self) -> NodeId {
        match self.terminals {
            Some((source, _)) => self.state.node_mapping[source],
            None => self
                .state
                .current_graph
                .nodes()
                .next()
                .expect("run loop guarantees a live node"),
        }
    }

    /// One maximum-adjacency phase from `a`. Returns the cut-of-the-phase as
    /// a bipartition over original node ids and merges the last two extracted
    /// nodes, shrinking the contracted graph by exactly one node.
    fn phase(&mut self, a: NodeId) -> Partition {
        let ub = self.original.upper_node_id_bound();
        let current = &self.state.current_graph;

        if current.number_of_nodes() == 2 {
            let t = current
                .nodes()
                .find(|&u| u != a)
                .expect("two live nodes remain");
            let mut result = Partition::new(ub);
            for u in self.original.nodes() {
                if self.state.node_mapping[u] == a {
                    result.move_to_subset(1, u);
                }
            }
            self.state.merge(a, t);
            return result;
        }

        let range = KeyRange::from_graph(current);
        // Nodes with no weight to the grown set sit at the range bound so
        // they never preempt an already-connected node.
        let unconnected = range.max();
        let mut pq = BucketQueue::new(current.upper_node_id_bound(), range);
        for u in current.nodes() {
            if u == a {
                continue;
            }
            let w = current.weight(a, u);
            let key = if w > 0.0 { -(w as i64) } else { unconnected };
            pq.insert(key, u);
        }

        let mut in_set = vec![false; current.upper_node_id_bound()];
        in_set[a] = true;

        while pq.len() > 2 {
            let (_, u) = pq.extract_min();
            in_set[u] = true;
            Self::update_keys(current, &mut pq, &in_set, unconnected, u);
        }
        let (_, s) = pq.extract_min();
        in_set[s] = true;
        Self::update_keys(current, &mut pq, &in_set, unconnected, s);
        let (_, t) = pq.extract_min();

        let mut result = Partition::new(ub);
        for u in self.original.nodes() {
            if in_set[self.state.node_mapping[u]] {
                result.move_to_subset(1, u);
            }
        }

        self.state.merge(s, t);
        result
    }

    /// Decrease the key of every still-outside neighbor of `u` by the
    /// connecting edge weight.
    fn update_keys(
        graph: &Graph,
        pq: &mut BucketQueue,
        in_set: &[bool],
        unconnected: i64,
        u: NodeId,
    ) {
        for (v, w) in graph.neighbors(u) {
            if !in_set[v] {
                let old = pq.key_of(v);
                let old = if old == unconnected { 0 } else { old };
                pq.change_key(old - w as i64, v);
            }
        }
    }
}

impl fmt::Display for StoerWagner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.terminals {
            Some((s, t)) => write!(f, "StoerWagner(source={s}, sink={t})"),
            None => write!(f, "StoerWagner"),
        }
    }
}
