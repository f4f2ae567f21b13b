//! Weighted graph representation for cut algorithms
//!
//! Provides the minimal graph surface the cut engines run on:
//! - Dense node ids in `[0, n)`; removal leaves a hole, ids are never reused
//! - O(1) weight lookup and update
//! - O(deg(v)) neighbor iteration
//! - Undirected mode (contraction) and directed mode (flow networks)

use std::collections::HashMap;

/// Node identifier, dense in `[0, upper_node_id_bound)`
pub type NodeId = usize;

/// Edge weight type
pub type Weight = f64;

/// A weighted graph with dense node ids.
///
/// The directed flag distinguishes contraction use (undirected) from
/// flow-network use (directed). An undirected edge is stored in both
/// endpoints' adjacency maps; a directed arc only in its tail's.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Adjacency maps indexed by node id; `adjacency[u][v]` is the weight of
    /// the edge (or arc) from `u` to `v`.
    adjacency: Vec<HashMap<NodeId, Weight>>,
    /// Liveness per id slot; removed nodes stay as holes.
    alive: Vec<bool>,
    /// Number of live nodes.
    num_nodes: usize,
    /// Whether edges are directed arcs.
    directed: bool,
}

impl Graph {
    /// Create an undirected graph with nodes `0..n` and no edges.
    pub fn undirected(n: usize) -> Self {
        Self::new(n, false)
    }

    /// Create a directed graph with nodes `0..n` and no edges.
    pub fn directed(n: usize) -> Self {
        Self::new(n, true)
    }

    fn new(n: usize, directed: bool) -> Self {
        Self {
            adjacency: vec![HashMap::new(); n],
            alive: vec![true; n],
            num_nodes: n,
            directed,
        }
    }

    /// Whether edges are directed arcs.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Append a fresh node and return its id.
    pub fn add_node(&mut self) -> NodeId {
        let id = self.adjacency.len();
        self.adjacency.push(HashMap::new());
        self.alive.push(true);
        self.num_nodes += 1;
        id
    }

    /// Whether `u` is a live node of this graph.
    pub fn has_node(&self, u: NodeId) -> bool {
        u < self.alive.len() && self.alive[u]
    }

    /// Add the weight `w` onto the edge `(u, v)`, creating it if absent.
    ///
    /// In an undirected graph the edge is visible from both endpoints; in a
    /// directed graph only the arc `u -> v` is created. Parallel additions
    /// accumulate.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is not a live node.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, w: Weight) {
        assert!(self.has_node(u), "add_edge: node {u} does not exist");
        assert!(self.has_node(v), "add_edge: node {v} does not exist");
        *self.adjacency[u].entry(v).or_insert(0.0) += w;
        if !self.directed && u != v {
            *self.adjacency[v].entry(u).or_insert(0.0) += w;
        }
    }

    /// Set the weight of the edge `(u, v)`, creating it if absent.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is not a live node.
    pub fn set_weight(&mut self, u: NodeId, v: NodeId, w: Weight) {
        assert!(self.has_node(u), "set_weight: node {u} does not exist");
        assert!(self.has_node(v), "set_weight: node {v} does not exist");
        self.adjacency[u].insert(v, w);
        if !self.directed && u != v {
            self.adjacency[v].insert(u, w);
        }
    }

    /// Weight of the edge (or arc) from `u` to `v`; 0.0 for non-adjacent pairs.
    pub fn weight(&self, u: NodeId, v: NodeId) -> Weight {
        if u >= self.adjacency.len() {
            return 0.0;
        }
        self.adjacency[u].get(&v).copied().unwrap_or(0.0)
    }

    /// Remove a node and all its incident edges. The id becomes a hole and is
    /// never reused; `upper_node_id_bound` is unaffected.
    ///
    /// # Panics
    ///
    /// Panics if `u` is not a live node.
    pub fn remove_node(&mut self, u: NodeId) {
        assert!(self.has_node(u), "remove_node: node {u} does not exist");
        let neighbors: Vec<NodeId> = self.adjacency[u].keys().copied().collect();
        for v in neighbors {
            if v != u {
                self.adjacency[v].remove(&u);
            }
        }
        self.adjacency[u].clear();
        self.alive[u] = false;
        self.num_nodes -= 1;
    }

    /// Number of live nodes.
    pub fn number_of_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of edges (arcs in directed mode; undirected edges counted once).
    pub fn number_of_edges(&self) -> usize {
        self.edges().count()
    }

    /// One past the largest id ever handed out. Valid ids are below this
    /// bound, though some may have been removed.
    pub fn upper_node_id_bound(&self) -> usize {
        self.adjacency.len()
    }

    /// Iterate over the live node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, &a)| a)
            .map(|(u, _)| u)
    }

    /// Iterate over the neighbors of `u` with edge weights.
    pub fn neighbors(&self, u: NodeId) -> impl Iterator<Item = (NodeId, Weight)> + '_ {
        self.adjacency
            .get(u)
            .into_iter()
            .flat_map(|m| m.iter().map(|(&v, &w)| (v, w)))
    }

    /// Iterate over all edges as `(u, v, weight)`.
    ///
    /// Undirected edges are reported once with `u <= v`; directed graphs
    /// report every arc.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, Weight)> + '_ {
        let directed = self.directed;
        self.nodes().flat_map(move |u| {
            self.neighbors(u)
                .filter(move |&(v, _)| directed || u <= v)
                .map(move |(v, w)| (u, v, w))
        })
    }

    /// Number of neighbors of `u`.
    pub fn degree(&self, u: NodeId) -> usize {
        self.adjacency.get(u).map(|m| m.len()).unwrap_or(0)
    }

    /// Sum of the weights of all edges incident to `u`.
    pub fn weighted_degree(&self, u: NodeId) -> Weight {
        self.neighbors(u).map(|(_, w)| w).sum()
    }

    /// Sum of all edge weights (each undirected edge counted once).
    pub fn total_edge_weight(&self) -> Weight {
        self.edges().map(|(_, _, w)| w).sum()
    }

    /// Largest weighted degree over all live nodes; 0.0 for the empty graph.
    pub fn max_weighted_degree(&self) -> Weight {
        self.nodes()
            .map(|u| self.weighted_degree(u))
            .fold(0.0, f64::max)
    }

    /// Copy of this graph with all self-loops dropped.
    pub fn without_self_loops(&self) -> Graph {
        let mut g = self.clone();
        for u in 0..g.adjacency.len() {
            g.adjacency[u].remove(&u);
        }
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_graph() {
        let g = Graph::undirected(0);
        assert_eq!(g.number_of_nodes(), 0);
        assert_eq!(g.upper_node_id_bound(), 0);
        assert_eq!(g.total_edge_weight(), 0.0);
        assert_eq!(g.max_weighted_degree(), 0.0);
    }

    #[test]
    fn test_add_edge_undirected() {
        let mut g = Graph::undirected(3);
        g.add_edge(0, 1, 2.0);
        assert_eq!(g.weight(0, 1), 2.0);
        assert_eq!(g.weight(1, 0), 2.0);
        assert_eq!(g.weight(0, 2), 0.0);
        assert_eq!(g.number_of_edges(), 1);
    }

    #[test]
    fn test_add_edge_accumulates() {
        let mut g = Graph::undirected(2);
        g.add_edge(0, 1, 1.5);
        g.add_edge(0, 1, 2.5);
        assert_eq!(g.weight(0, 1), 4.0);
        assert_eq!(g.number_of_edges(), 1);
    }

    #[test]
    fn test_add_edge_directed() {
        let mut g = Graph::directed(2);
        g.add_edge(0, 1, 1.0);
        assert_eq!(g.weight(0, 1), 1.0);
        assert_eq!(g.weight(1, 0), 0.0);
    }

    #[test]
    fn test_set_weight() {
        let mut g = Graph::undirected(2);
        g.add_edge(0, 1, 1.0);
        g.set_weight(0, 1, 5.0);
        assert_eq!(g.weight(0, 1), 5.0);
        assert_eq!(g.weight(1, 0), 5.0);
    }

    #[test]
    fn test_set_weight_creates_edge() {
        let mut g = Graph::undirected(2);
        g.set_weight(0, 1, 3.0);
        assert_eq!(g.weight(1, 0), 3.0);
    }

    #[test]
    fn test_add_node() {
        let mut g = Graph::undirected(2);
        let id = g.add_node();
        assert_eq!(id, 2);
        assert_eq!(g.number_of_nodes(), 3);
        assert_eq!(g.upper_node_id_bound(), 3);
        assert!(g.has_node(2));
    }

    #[test]
    fn test_remove_node() {
        let mut g = Graph::undirected(3);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 1.0);
        g.remove_node(1);

        assert!(!g.has_node(1));
        assert_eq!(g.number_of_nodes(), 2);
        assert_eq!(g.upper_node_id_bound(), 3);
        assert_eq!(g.weight(0, 1), 0.0);
        assert_eq!(g.weight(2, 1), 0.0);
        assert_eq!(g.degree(0), 0);
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    #[should_panic(expected = "does not exist")]
    fn test_remove_node_twice_panics() {
        let mut g = Graph::undirected(2);
        g.remove_node(0);
        g.remove_node(0);
    }

    #[test]
    fn test_neighbors() {
        let mut g = Graph::undirected(4);
        g.add_edge(0, 1, 1.0);
        g.add_edge(0, 2, 2.0);
        g.add_edge(0, 3, 3.0);

        let mut neighbors: Vec<(NodeId, Weight)> = g.neighbors(0).collect();
        neighbors.sort_by_key(|&(v, _)| v);
        assert_eq!(neighbors, vec![(1, 1.0), (2, 2.0), (3, 3.0)]);
    }

    #[test]
    fn test_edges_undirected_reported_once() {
        let mut g = Graph::undirected(3);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 2.0);

        let mut edges: Vec<_> = g.edges().collect();
        edges.sort_by_key(|&(u, v, _)| (u, v));
        assert_eq!(edges, vec![(0, 1, 1.0), (1, 2, 2.0)]);
    }

    #[test]
    fn test_edges_directed_reports_arcs() {
        let mut g = Graph::directed(2);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 0, 2.0);
        assert_eq!(g.number_of_edges(), 2);
    }

    #[test]
    fn test_weighted_degree_and_total_weight() {
        let mut g = Graph::undirected(3);
        g.add_edge(0, 1, 1.0);
        g.add_edge(0, 2, 2.0);
        g.add_edge(1, 2, 4.0);

        assert_eq!(g.weighted_degree(0), 3.0);
        assert_eq!(g.weighted_degree(2), 6.0);
        assert_eq!(g.total_edge_weight(), 7.0);
        assert_eq!(g.max_weighted_degree(), 6.0);
    }

    #[test]
    fn test_without_self_loops() {
        let mut g = Graph::undirected(2);
        g.add_edge(0, 0, 5.0);
        g.add_edge(0, 1, 1.0);

        let stripped = g.without_self_loops();
        assert_eq!(stripped.weight(0, 0), 0.0);
        assert_eq!(stripped.weight(0, 1), 1.0);
        assert_eq!(g.weight(0, 0), 5.0);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut g = Graph::undirected(2);
        g.add_edge(0, 1, 1.0);
        let mut g2 = g.clone();
        g2.set_weight(0, 1, 9.0);
        assert_eq!(g.weight(0, 1), 1.0);
    }
}
