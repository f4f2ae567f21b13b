//! Quotient-score refinement of a two-way partition
//!
//! Starting from a seed bipartition, the loop repeatedly reweights the
//! flow network's terminal arcs by the best quotient score seen so far,
//! recomputes a minimum s,t-cut, and accepts the resulting side only on
//! strict improvement. The reference side `A` and its balance ratio are
//! frozen from the seed; the accepted side is the loop's only moving part.
//!
//! For a candidate side `S` the quotient score is
//!
//! ```text
//! d(A,S) = Σ_{n in S} (1 if n in A else -f_a)
//! q(S)   = edge_cut(S, complement) / d(A,S)    if d(A,S) > 0
//!        = +∞                                  otherwise (saturating)
//! ```
//!
//! with the cut weight always taken on the original graph.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{CutError, Result};
use crate::flow::{AugmentingPathSolver, FlowNetwork, SourceSinkSolver};
use crate::graph::{Graph, NodeId};
use crate::partition::Partition;
use crate::quality;

/// Configuration of the refinement loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinementConfig {
    /// Unconditional iteration bound of the reweighting loop.
    pub max_iter: usize,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self { max_iter: 10 }
    }
}

/// Per-run statistics of the refinement loop.
///
/// Observability only; the algorithm never reads these back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefinementStats {
    /// Iterations entered before stopping.
    pub iterations: usize,
    /// Candidates accepted as strict improvements.
    pub accepted: usize,
    /// Quotient score of the seed partition.
    pub initial_score: f64,
    /// Quotient score of the returned partition.
    pub final_score: f64,
}

/// Frozen reference data of a refinement run: the seed's smaller side and
/// its balance ratio. Immutable once the run is constructed; only the
/// accepted side and its score move between iterations.
#[derive(Debug, Clone)]
struct QuotientState {
    /// Reference side `A` from the seed.
    side_a: BTreeSet<NodeId>,
    /// Balance ratio `|A| / (|V| - |A|)`.
    f_a: f64,
}

impl QuotientState {
    /// Quotient score of a candidate side, saturating to `+∞` when the
    /// balance denominator is not positive.
    fn quotient(&self, graph: &Graph, side: &BTreeSet<NodeId>) -> f64 {
        let d: f64 = side
            .iter()
            .map(|n| if self.side_a.contains(n) { 1.0 } else { -self.f_a })
            .sum();
        if d <= 0.0 {
            warn!(side = side.len(), d, "quotient denominator not positive, saturating");
            return f64::INFINITY;
        }

        let mut p = Partition::new(graph.upper_node_id_bound());
        for &u in side {
            p.move_to_subset(1, u);
        }
        quality::edge_cut(&p, graph) / d
    }
}

/// Flow-based local improvement of a two-way partition.
///
/// The engine deep-copies the input graph at construction. Call
/// [`run`](ImproveClustering::run) exactly once, then read the improved
/// bipartition through [`partition`](ImproveClustering::partition); its
/// quotient score is never worse than the seed's.
pub struct ImproveClustering {
    graph: Graph,
    network: FlowNetwork,
    state: QuotientState,
    config: RefinementConfig,
    solver: Box<dyn SourceSinkSolver>,
    result: Option<Partition>,
    stats: RefinementStats,
    has_run: bool,
}

impl fmt::Debug for ImproveClustering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImproveClustering")
            .field("solver", &self.solver.name())
            .field("has_run", &self.has_run)
            .finish()
    }
}

impl ImproveClustering {
    /// Create a refinement run with the default configuration and the
    /// augmenting-path solver.
    ///
    /// # Errors
    ///
    /// [`CutError::InvalidPartition`] if the seed is not a proper two-way
    /// clustering; [`CutError::InvalidParameter`] for a directed or holey
    /// graph.
    pub fn new(graph: &Graph, seed: &Partition) -> Result<Self> {
        Self::with_config(graph, seed, RefinementConfig::default())
    }

    /// Create a refinement run with an explicit configuration.
    ///
    /// # Errors
    ///
    /// As [`new`](ImproveClustering::new), plus
    /// [`CutError::InvalidParameter`] when `max_iter` is zero.
    pub fn with_config(graph: &Graph, seed: &Partition, config: RefinementConfig) -> Result<Self> {
        if config.max_iter == 0 {
            return Err(CutError::InvalidParameter(
                "max_iter must be at least 1".to_string(),
            ));
        }
        let network = FlowNetwork::from_seed(graph, seed)?;
        let state = QuotientState {
            side_a: network.side_a().clone(),
            f_a: network.f_a(),
        };

        Ok(Self {
            graph: graph.clone(),
            network,
            state,
            config,
            solver: Box::new(AugmentingPathSolver),
            result: None,
            stats: RefinementStats::default(),
            has_run: false,
        })
    }

    /// Replace the minimum s,t-cut solver.
    pub fn with_solver(mut self, solver: Box<dyn SourceSinkSolver>) -> Self {
        self.solver = solver;
        self
    }

    /// Run the refinement loop to completion. Call exactly once.
    ///
    /// # Errors
    ///
    /// [`CutError::InvalidParameter`] on a repeated call; any error of the
    /// configured solver aborts the run.
    pub fn run(&mut self) -> Result<()> {
        if self.has_run {
            return Err(CutError::InvalidParameter(
                "run() may only be called once per instance".to_string(),
            ));
        }

        let mut accepted = self.state.side_a.clone();
        let mut alpha = self.state.quotient(&self.graph, &accepted);
        self.stats.initial_score = alpha;
        debug!(
            solver = self.solver.name(),
            side_a = self.state.side_a.len(),
            f_a = self.state.f_a,
            alpha,
            max_iter = self.config.max_iter,
            "starting refinement"
        );

        for i in 1..=self.config.max_iter {
            self.stats.iterations = i;
            self.network
                .set_terminal_weights(alpha, alpha * self.state.f_a);

            let cut = self.solver.min_cut(&self.network)?;
            let alpha_new = self.state.quotient(&self.graph, &cut.source_side);
            trace!(
                iteration = i,
                flow = cut.value,
                candidate = cut.source_side.len(),
                alpha_new,
                "candidate scored"
            );

            if alpha_new < alpha {
                accepted = cut.source_side;
                alpha = alpha_new;
                self.stats.accepted += 1;
                debug!(iteration = i, alpha, "candidate accepted");
            } else {
                debug!(iteration = i, "no strict improvement, stopping");
                break;
            }
        }

        self.stats.final_score = alpha;
        let mut partition = Partition::new(self.graph.upper_node_id_bound());
        for &u in &accepted {
            partition.move_to_subset(1, u);
        }
        self.result = Some(partition);
        self.has_run = true;
        debug!(
            iterations = self.stats.iterations,
            accepted = self.stats.accepted,
            score = alpha,
            "refinement finished"
        );
        Ok(())
    }

    /// The refined bipartition over original node ids: subset 1 holds the
    /// accepted side, subset 0 the rest. The virtual terminals never appear.
    ///
    /// # Errors
    ///
    /// [`CutError::NotRun`] before [`run`](ImproveClustering::run) completed.
    pub fn partition(&self) -> Result<Partition> {
        match (&self.result, self.has_run) {
            (Some(p), true) => Ok(p.clone()),
            _ => Err(CutError::NotRun),
        }
    }

    /// Quotient score of the returned partition.
    ///
    /// # Errors
    ///
    /// [`CutError::NotRun`] before [`run`](ImproveClustering::run) completed.
    pub fn quotient_score(&self) -> Result<f64> {
        if self.has_run {
            Ok(self.stats.final_score)
        } else {
            Err(CutError::NotRun)
        }
    }

    /// Per-run statistics.
    pub fn stats(&self) -> &RefinementStats {
        &self.stats
    }
}

impl fmt::Display for ImproveClustering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ImproveClustering(max_iter={}, solver={})",
            self.config.max_iter,
            self.solver.name()
        )
    }
}
