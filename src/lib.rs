//! # Cutflow
//!
//! Contraction-based global minimum cuts and flow-based quotient refinement
//! for weighted graphs.
//!
//! This crate provides two cooperating engines:
//!
//! - **Global minimum cut**: repeated maximum-adjacency phases over a
//!   shrinking contracted graph, keeping the best cut-of-the-phase.
//! - **Quotient refinement**: local improvement of an existing two-way
//!   partition by iteratively reweighting a source/sink flow network and
//!   recomputing minimum s,t-cuts.
//!
//! ## Quick Start
//!
//! ```rust
//! use cutflow::{Graph, StoerWagner};
//!
//! // Two triangles joined by a single bridge; the bridge is the minimum cut.
//! let mut g = Graph::undirected(6);
//! for (u, v) in [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)] {
//!     g.add_edge(u, v, 1.0);
//! }
//! g.add_edge(2, 3, 1.0);
//!
//! let mut mincut = StoerWagner::new(&g).expect("valid graph");
//! mincut.run().expect("first run");
//!
//! assert_eq!(mincut.cut_value().unwrap(), 1.0);
//! let partition = mincut.partition().unwrap();
//! assert_eq!(partition.number_of_subsets(), 2);
//! assert_ne!(partition.subset_of(2), partition.subset_of(3));
//! ```
//!
//! ## Refining an existing bipartition
//!
//! ```rust
//! use cutflow::{Graph, ImproveClustering, Partition};
//!
//! let mut g = Graph::undirected(4);
//! g.add_edge(0, 1, 1.0);
//! g.add_edge(1, 2, 1.0);
//! g.add_edge(2, 3, 1.0);
//!
//! let seed = Partition::from_vec(vec![0, 0, 1, 1]);
//! let mut refine = ImproveClustering::new(&g, &seed).unwrap();
//! refine.run().unwrap();
//!
//! let improved = refine.partition().unwrap();
//! assert_eq!(improved.number_of_subsets(), 2);
//! ```
//!
//! ## Architecture
//!
//! - [`graph`]: weighted graph with dense node ids (undirected and directed)
//! - [`partition`]: node → subset mapping with compaction and membership
//! - [`pq`]: bucket-keyed priority queue backing maximum-adjacency search
//! - [`quality`]: edge-cut quality function
//! - [`contraction`]: the global min-cut engine and its terminal-constrained
//!   variant
//! - [`flow`]: flow-network construction plus the [`SourceSinkSolver`] seam
//!   and its implementations
//! - [`refine`]: the quotient-score refinement loop
//!
//! All engines are single-threaded and own a deep copy of their input for
//! the duration of one `run()`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod contraction;
pub mod error;
pub mod flow;
pub mod graph;
pub mod partition;
pub mod pq;
pub mod quality;
pub mod refine;

pub use contraction::{ContractionStats, StoerWagner};
pub use error::{CutError, Result};
pub use flow::{AugmentingPathSolver, ContractionStCut, FlowNetwork, SourceSinkSolver, StCut};
pub use graph::{Graph, NodeId, Weight};
pub use partition::{Partition, SubsetId};
pub use pq::{BucketQueue, KeyRange};
pub use quality::edge_cut;
pub use refine::{ImproveClustering, RefinementConfig, RefinementStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports
pub mod prelude {
    //! Commonly used types

    pub use crate::{
        edge_cut, AugmentingPathSolver, BucketQueue, ContractionStCut, ContractionStats, CutError,
        FlowNetwork, Graph, ImproveClustering, KeyRange, NodeId, Partition, RefinementConfig,
        RefinementStats, Result, SourceSinkSolver, StCut, StoerWagner, SubsetId, Weight,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "cutflow");
    }

    #[test]
    fn test_basic_workflow() {
        let mut g = Graph::undirected(4);
        g.add_edge(0, 1, 2.0);
        g.add_edge(1, 2, 1.0);
        g.add_edge(2, 3, 2.0);

        let mut mincut = StoerWagner::new(&g).unwrap();
        mincut.run().unwrap();

        assert_eq!(mincut.cut_value().unwrap(), 1.0);
        let p = mincut.partition().unwrap();
        assert_ne!(p.subset_of(1), p.subset_of(2));
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let mut g = Graph::undirected(2);
        g.add_edge(0, 1, 1.0);
        let mut mincut = StoerWagner::new(&g).unwrap();
        mincut.run().unwrap();
        assert_eq!(mincut.cut_value().unwrap(), 1.0);
    }
}
