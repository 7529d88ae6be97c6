//! The DMN graph: nodes with views, edges with containment or connectors.

use dmnkit_core::identifier::Id;

use super::{
    EdgeContent, Node,
    graph_base::{self, EdgeIndex, GraphInternal},
};

/// A graph edge carrying [`EdgeContent`].
pub type Edge = graph_base::Edge<EdgeContent>;

/// The in-memory DMN graph.
///
/// Holds one diagram root node, one node per shape and the edges between
/// them. Nodes iterate in insertion order.
#[derive(Debug, Clone)]
pub struct Graph {
    inner: GraphInternal<Node, EdgeContent>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            inner: GraphInternal::new(),
        }
    }

    /// Adds a node, replacing any node with the same id.
    pub fn add_node(&mut self, node: Node) {
        self.inner.add_node(node.id(), node);
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.inner.node(id)
    }

    pub fn node_mut(&mut self, id: Id) -> Option<&mut Node> {
        self.inner.node_mut(id)
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.inner.contains_node(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.inner.nodes()
    }

    /// Snapshot of the node ids, for loops that mutate nodes.
    pub fn node_ids(&self) -> Vec<Id> {
        self.inner.node_ids().collect()
    }

    pub fn nodes_count(&self) -> usize {
        self.inner.nodes_count()
    }

    pub fn add_edge(&mut self, edge: Edge) -> EdgeIndex {
        self.inner.add_edge(edge)
    }

    pub fn edge(&self, idx: EdgeIndex) -> Option<&Edge> {
        self.inner.edge(idx)
    }

    pub fn edge_mut(&mut self, idx: EdgeIndex) -> Option<&mut Edge> {
        self.inner.edge_mut(idx)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.inner.edges().map(|(_, edge)| edge)
    }

    pub fn edges_count(&self) -> usize {
        self.inner.edges_count()
    }

    /// Edges whose target is the node `id`, in insertion order.
    pub fn incoming_edges(&self, id: Id) -> impl Iterator<Item = &Edge> {
        self.inner
            .incoming_edges(id)
            .filter_map(|idx| self.inner.edge(idx))
    }

    /// Edges whose source is the node `id`, in insertion order.
    pub fn outgoing_edges(&self, id: Id) -> impl Iterator<Item = &Edge> {
        self.inner
            .outgoing_edges(id)
            .filter_map(|idx| self.inner.edge(idx))
    }

    /// Ids of the nodes without any incoming edge.
    pub fn roots(&self) -> impl Iterator<Item = Id> {
        self.inner.roots()
    }

    /// Returns the diagram root node, if the graph has one.
    pub fn diagram_root(&self) -> Option<&Node> {
        self.nodes()
            .find(|node| node.content().definition().as_diagram_root().is_some())
    }

    /// Returns the source of the `Child` edge pointing at `id`.
    pub fn parent(&self, id: Id) -> Option<Id> {
        self.incoming_edges(id)
            .find(|edge| edge.content().is_child())
            .and_then(|edge| edge.source())
    }

    /// Returns the targets of the `Child` edges leaving `id`.
    pub fn children(&self, id: Id) -> impl Iterator<Item = Id> {
        self.outgoing_edges(id)
            .filter(|edge| edge.content().is_child())
            .filter_map(|edge| edge.target())
    }

    /// Returns the node whose DMN element has the given id.
    pub fn node_by_element_id(&self, element_id: &str) -> Option<&Node> {
        self.nodes()
            .find(|node| node.element_id() == Some(element_id))
    }

    /// Every node drawing the DMN element, one per diagram showing it.
    pub fn nodes_by_element_id<'a>(
        &'a self,
        element_id: &'a str,
    ) -> impl Iterator<Item = &'a Node> {
        self.nodes()
            .filter(move |node| node.element_id() == Some(element_id))
    }
}
