//! Creation of graph nodes and edges during unmarshalling.

use uuid::Uuid;

use dmnkit_core::{
    dmn::{Definitions, DmnShape},
    geometry::Bounds,
    identifier::Id,
};

use super::node_entry::NodeEntry;
use crate::structure::{
    ConnectorKind, DmnDiagramRoot, DrgNode, Edge, EdgeContent, Node, NodeDefinition, View,
    ViewConnector,
};

/// Creates graph nodes.
pub trait NodeFactory: Send + Sync {
    /// Creates the diagram root holding the document header.
    fn create_root(&self, definitions: &Definitions) -> Node;

    /// Creates the node for a shape entry, in absolute coordinates.
    fn create_node(&self, entry: &NodeEntry) -> Node;
}

/// Creates connector edges.
pub trait EdgeFactory: Send + Sync {
    fn create_edge(
        &self,
        kind: ConnectorKind,
        edge_id: Id,
        source: Option<Id>,
        target: Option<Id>,
    ) -> Edge;
}

fn fresh_node_id() -> Id {
    Id::new(&Uuid::new_v4().to_string())
}

/// Divider offset from the top of the shape, read from the first divider point.
fn divider_line_y(shape: &DmnShape) -> Option<f64> {
    shape
        .decision_service_divider_line
        .as_ref()
        .and_then(|points| points.first())
        .map(|point| point.y() - shape.bounds.min_y())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNodeFactory;

impl NodeFactory for DefaultNodeFactory {
    fn create_root(&self, definitions: &Definitions) -> Node {
        let root = DmnDiagramRoot::new(definitions);
        Node::new(
            fresh_node_id(),
            View::new(NodeDefinition::DiagramRoot(root), Bounds::default()),
        )
    }

    fn create_node(&self, entry: &NodeEntry) -> Node {
        let shape = entry.shape();
        let element = entry.element().to_dmn_element().without_relations();
        let dmn_element_ref = entry
            .is_included()
            .then(|| shape.dmn_element_ref.clone());

        let drg_node = DrgNode::new(element, entry.diagram_id())
            .with_allow_only_visual_change(entry.is_included())
            .with_dmn_element_ref(dmn_element_ref)
            .with_style(shape.style.clone())
            .with_label(shape.label.clone())
            .with_collapsed(shape.is_collapsed)
            .with_divider_line_y(divider_line_y(shape));

        Node::new(
            fresh_node_id(),
            View::new(NodeDefinition::Element(drg_node), shape.bounds),
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEdgeFactory;

impl EdgeFactory for DefaultEdgeFactory {
    fn create_edge(
        &self,
        kind: ConnectorKind,
        edge_id: Id,
        source: Option<Id>,
        target: Option<Id>,
    ) -> Edge {
        Edge::new(
            edge_id,
            source,
            target,
            EdgeContent::Connector(ViewConnector::new(kind)),
        )
    }
}
