//! Low-level graph data structures and primitives.
//!
//! This module provides the arena that backs the DMN [`Graph`](super::Graph).
//! Nodes are stored by [`Id`] in insertion order and edges in a vector
//! addressed by [`EdgeIndex`]. Edges keep the ids of their endpoints instead
//! of references, so the cyclic DMN graph never needs shared ownership.
//!
//! # Architecture
//!
//! The module provides:
//! - [`EdgeIndex`]: Type-safe edge indices
//! - [`Edge`]: Edge structure storing an id, optional endpoints and associated data
//! - [`GraphInternal`]: Core graph implementation with nodes and edges
//!
//! Capabilities:
//! - Node storage via `IndexMap` (iteration follows insertion order)
//! - Tracking of both incoming and outgoing edges per node
//! - Dangling edges: either endpoint may be absent
//! - Root detection (nodes with no incoming edges)

use std::collections::HashMap;

use indexmap::IndexMap;

use dmnkit_core::identifier::Id;

// =============================================================================
// Low-level primitive types
// =============================================================================

/// Type-safe index for edges in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeIndex(usize);

impl EdgeIndex {
    /// Creates a new edge index with the given numeric index.
    fn new(index: usize) -> Self {
        EdgeIndex(index)
    }

    /// Returns the position of the edge in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed edge in the graph.
///
/// Either endpoint may be absent: an edge whose required element could not
/// be resolved is still kept, connected only on the side that resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<E> {
    id: Id,
    source: Option<Id>,
    target: Option<Id>,
    content: E,
}

impl<E> Edge<E> {
    /// Creates a new edge with the given id, endpoints and content.
    pub fn new(id: Id, source: Option<Id>, target: Option<Id>, content: E) -> Self {
        Edge {
            id,
            source,
            target,
            content,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the id of the source node, if connected.
    pub fn source(&self) -> Option<Id> {
        self.source
    }

    /// Returns the id of the target node, if connected.
    pub fn target(&self) -> Option<Id> {
        self.target
    }

    pub fn content(&self) -> &E {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut E {
        &mut self.content
    }
}

// =============================================================================
// Core internal graph structure
// =============================================================================

/// Core graph data structure.
///
/// This generic graph implementation provides:
/// - Node storage by ID with generic node data type `N`
/// - Edge storage with generic edge data type `E`
/// - Tracking of incoming and outgoing edges for each node
///
/// The graph is directed and allows self-loops and multiple edges between nodes.
#[derive(Debug, Clone)]
pub(super) struct GraphInternal<N, E> {
    nodes: IndexMap<Id, N>,
    edges: Vec<Edge<E>>,
    income_edges: HashMap<Id, Vec<EdgeIndex>>,
    outgoing_edges: HashMap<Id, Vec<EdgeIndex>>,
}

impl<N, E> GraphInternal<N, E> {
    /// Creates a new empty graph.
    pub(super) fn new() -> Self {
        GraphInternal {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            income_edges: HashMap::new(),
            outgoing_edges: HashMap::new(),
        }
    }

    /// Returns the node data for the given ID, if it exists.
    pub(super) fn node(&self, id: Id) -> Option<&N> {
        self.nodes.get(&id)
    }

    pub(super) fn node_mut(&mut self, id: Id) -> Option<&mut N> {
        self.nodes.get_mut(&id)
    }

    /// Returns an iterator over all node data in insertion order.
    pub(super) fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.values()
    }

    /// Returns an iterator over all node ids in insertion order.
    pub(super) fn node_ids(&self) -> impl Iterator<Item = Id> {
        self.nodes.keys().copied()
    }

    /// Returns the total number of nodes in the graph.
    pub(super) fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if a node with the given ID exists in the graph.
    pub(super) fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns the edge for the given index, if it exists.
    pub(super) fn edge(&self, idx: EdgeIndex) -> Option<&Edge<E>> {
        self.edges.get(idx.0)
    }

    pub(super) fn edge_mut(&mut self, idx: EdgeIndex) -> Option<&mut Edge<E>> {
        self.edges.get_mut(idx.0)
    }

    /// Returns an iterator over all edges with their indices, in insertion order.
    pub(super) fn edges(&self) -> impl Iterator<Item = (EdgeIndex, &Edge<E>)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(idx, edge)| (EdgeIndex::new(idx), edge))
    }

    pub(super) fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the indices of the edges whose target is the given node.
    pub(super) fn incoming_edges(&self, id: Id) -> impl Iterator<Item = EdgeIndex> {
        self.income_edges.get(&id).into_iter().flatten().copied()
    }

    /// Returns the indices of the edges whose source is the given node.
    pub(super) fn outgoing_edges(&self, id: Id) -> impl Iterator<Item = EdgeIndex> {
        self.outgoing_edges.get(&id).into_iter().flatten().copied()
    }

    /// Returns an iterator over root node ids (nodes with no incoming edges).
    pub(super) fn roots(&self) -> impl Iterator<Item = Id> {
        self.nodes
            .keys()
            .filter(|node_id| !self.income_edges.contains_key(*node_id))
            .copied()
    }

    /// Adds a node to the graph with the given ID and data.
    ///
    /// If a node with the same ID already exists, it will be replaced in place.
    pub(super) fn add_node(&mut self, id: Id, node: N) {
        self.nodes.insert(id, node);
    }

    /// Adds an edge to the graph.
    ///
    /// Updates both the edge storage and the incoming/outgoing edge indices for
    /// the endpoints that are present.
    ///
    /// # Returns
    /// The index of the newly added edge.
    ///
    /// # Panics
    /// Panics in debug mode if a present endpoint does not exist in the graph.
    /// In a release build, this check is optimized away.
    pub(super) fn add_edge(&mut self, edge: Edge<E>) -> EdgeIndex {
        #[cfg(debug_assertions)]
        {
            if let Some(source_id) = edge.source {
                assert!(
                    self.nodes.contains_key(&source_id),
                    "Adding edge {}: Source node {source_id} does not exist",
                    edge.id,
                );
            }
            if let Some(target_id) = edge.target {
                assert!(
                    self.nodes.contains_key(&target_id),
                    "Adding edge {}: Target node {target_id} does not exist",
                    edge.id,
                );
            }
        }

        let source = edge.source;
        let target = edge.target;
        self.edges.push(edge);

        let idx = EdgeIndex::new(self.edges.len() - 1);
        if let Some(source_id) = source {
            self.outgoing_edges.entry(source_id).or_default().push(idx);
        }
        if let Some(target_id) = target {
            self.income_edges.entry(target_id).or_default().push(idx);
        }
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test node data structure with a simple numeric value
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct TestNode {
        value: u32,
    }

    /// Test edge data structure with a weight attribute
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct TestEdge {
        weight: i32,
    }

    fn edge(name: &str, source: Option<Id>, target: Option<Id>, weight: i32) -> Edge<TestEdge> {
        Edge::new(Id::new(name), source, target, TestEdge { weight })
    }

    #[test]
    fn test_edge_index_creation() {
        let idx1 = EdgeIndex::new(5);
        let idx2 = EdgeIndex::new(5);
        let idx3 = EdgeIndex::new(10);

        assert_eq!(idx1, idx2);
        assert_ne!(idx1, idx3);
        assert_eq!(idx1.index(), 5);
        assert_eq!(idx3.index(), 10);
    }

    #[test]
    fn test_graph_new() {
        let graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();

        assert_eq!(graph.nodes_count(), 0);
        assert_eq!(graph.nodes().count(), 0);
        assert_eq!(graph.edges_count(), 0);
        assert_eq!(graph.roots().count(), 0);
    }

    #[test]
    fn test_add_node() {
        let mut graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        let id1 = Id::new("node1");
        let id2 = Id::new("node2");

        graph.add_node(id1, TestNode { value: 10 });
        graph.add_node(id2, TestNode { value: 20 });

        assert_eq!(graph.nodes_count(), 2);
        assert!(graph.contains_node(id1));
        assert!(graph.contains_node(id2));
        assert_eq!(graph.node(id1), Some(&TestNode { value: 10 }));
        assert_eq!(graph.node(id2), Some(&TestNode { value: 20 }));
    }

    #[test]
    fn test_node_returns_none_for_missing() {
        let graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        assert_eq!(graph.node(Id::new("missing")), None);
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let mut graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        for (name, value) in [("c", 3), ("a", 1), ("b", 2)] {
            graph.add_node(Id::new(name), TestNode { value });
        }

        let values: Vec<u32> = graph.nodes().map(|node| node.value).collect();
        assert_eq!(values, vec![3, 1, 2]);

        let ids: Vec<Id> = graph.node_ids().collect();
        assert_eq!(ids, vec![Id::new("c"), Id::new("a"), Id::new("b")]);
    }

    #[test]
    fn test_node_mut() {
        let mut graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        let id = Id::new("node");
        graph.add_node(id, TestNode { value: 1 });

        if let Some(node) = graph.node_mut(id) {
            node.value = 42;
        }

        assert_eq!(graph.node(id), Some(&TestNode { value: 42 }));
    }

    #[test]
    fn test_add_edge() {
        let mut graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        let id1 = Id::new("source");
        let id2 = Id::new("target");

        graph.add_node(id1, TestNode { value: 10 });
        graph.add_node(id2, TestNode { value: 20 });
        let edge_idx = graph.add_edge(edge("e1", Some(id1), Some(id2), 5));

        let stored = graph.edge(edge_idx).expect("edge exists");
        assert_eq!(stored.content(), &TestEdge { weight: 5 });
        assert_eq!(stored.source(), Some(id1));
        assert_eq!(stored.target(), Some(id2));
        assert_eq!(graph.edges_count(), 1);
        assert_eq!(graph.outgoing_edges(id1).collect::<Vec<_>>(), vec![edge_idx]);
        assert_eq!(graph.incoming_edges(id2).collect::<Vec<_>>(), vec![edge_idx]);
    }

    #[test]
    fn test_dangling_edge() {
        let mut graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        let target = Id::new("target");
        graph.add_node(target, TestNode { value: 1 });

        // Only the target side resolved
        let idx = graph.add_edge(edge("dangling", None, Some(target), 1));

        assert_eq!(graph.edge(idx).and_then(Edge::source), None);
        assert_eq!(graph.incoming_edges(target).count(), 1);
        assert_eq!(graph.roots().count(), 0);
    }

    #[test]
    fn test_edge_mut() {
        let mut graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        let id = Id::new("node");
        graph.add_node(id, TestNode { value: 1 });
        let idx = graph.add_edge(edge("e", Some(id), None, 1));

        if let Some(edge) = graph.edge_mut(idx) {
            edge.content_mut().weight = 9;
        }

        assert_eq!(graph.edge(idx).map(|e| e.content().weight), Some(9));
    }

    #[test]
    fn test_roots() {
        let mut graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        let id1 = Id::new("root1");
        let id2 = Id::new("root2");
        let id3 = Id::new("child");

        graph.add_node(id1, TestNode { value: 10 });
        graph.add_node(id2, TestNode { value: 20 });
        graph.add_node(id3, TestNode { value: 30 });
        graph.add_edge(edge("e", Some(id1), Some(id3), 1));

        let roots: Vec<Id> = graph.roots().collect();
        assert_eq!(roots, vec![id1, id2]); // id3 has an incoming edge
    }

    #[test]
    fn test_self_loop() {
        let mut graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        let id = Id::new("self_loop");

        graph.add_node(id, TestNode { value: 10 });
        graph.add_edge(edge("loop", Some(id), Some(id), 1));

        // Node with self-loop is not a root (has incoming edge from itself)
        assert_eq!(graph.roots().count(), 0);
        assert_eq!(graph.outgoing_edges(id).count(), 1);
        assert_eq!(graph.incoming_edges(id).count(), 1);
    }

    #[test]
    fn test_multiple_edges_between_same_nodes() {
        let mut graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        let id1 = Id::new("source");
        let id2 = Id::new("target");

        graph.add_node(id1, TestNode { value: 10 });
        graph.add_node(id2, TestNode { value: 20 });

        graph.add_edge(edge("e1", Some(id1), Some(id2), 1));
        graph.add_edge(edge("e2", Some(id1), Some(id2), 2));
        graph.add_edge(edge("e3", Some(id2), Some(id1), 3)); // Reverse direction

        assert_eq!(graph.edges_count(), 3);
        assert_eq!(graph.outgoing_edges(id1).count(), 2);
        assert_eq!(graph.outgoing_edges(id2).count(), 1);
        assert_eq!(graph.incoming_edges(id2).count(), 2);

        let weights: Vec<i32> = graph.edges().map(|(_, e)| e.content().weight).collect();
        assert_eq!(weights, vec![1, 2, 3]);
    }

    #[test]
    fn test_node_replacement() {
        let mut graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        let id = Id::new("node");

        graph.add_node(id, TestNode { value: 10 });
        graph.add_node(id, TestNode { value: 20 });

        assert_eq!(graph.node(id), Some(&TestNode { value: 20 }));
        assert_eq!(graph.nodes_count(), 1); // Still only one node
    }

    #[test]
    fn test_empty_graph_edges_for_missing_node() {
        let graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        let id = Id::new("nonexistent");

        assert_eq!(graph.outgoing_edges(id).count(), 0);
        assert_eq!(graph.incoming_edges(id).count(), 0);
    }
}
