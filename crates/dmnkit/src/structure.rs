//! In-memory graph representation of a DMN model.
//!
//! The unmarshaller turns a [`Definitions`](dmnkit_core::dmn::Definitions)
//! document into a [`Graph`] and the marshaller walks it back. The module is
//! organized into several layers:
//! - **Arena**: node and edge storage addressed by ids ([`EdgeIndex`], [`Edge`])
//! - **Nodes**: [`Node`] with its [`View`] (definition, bounds and framing)
//! - **Definitions**: [`NodeDefinition`], either the [`DmnDiagramRoot`] or a [`DrgNode`]
//! - **Edges**: [`EdgeContent`], either containment or a [`ViewConnector`]

use dmnkit_core::{
    geometry::{Bounds, Point},
    identifier::Id,
};

mod connector;
mod definition;
mod graph;
mod graph_base;

pub use connector::{AssociationDef, ConnectorKind, EdgeContent, MagnetConnection, ViewConnector};
pub use definition::{DmnDiagramRoot, DmnElement, DrgNode, NodeDefinition};
pub use graph::{Edge, Graph};
pub use graph_base::EdgeIndex;

/// The coordinate frame a node's bounds are expressed in.
///
/// Nodes inside a decision service are stored relative to the service's
/// upper-left corner in the [`Relative`](CoordinateFrame::Relative) frame;
/// every other node reads the same in both frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoordinateFrame {
    #[default]
    Absolute,
    Relative,
}

/// The visual content of a node: its definition and where it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    definition: NodeDefinition,
    bounds: Bounds,
    frame: CoordinateFrame,
}

impl View {
    /// Creates a view whose bounds are absolute.
    pub fn new(definition: NodeDefinition, bounds: Bounds) -> Self {
        Self {
            definition,
            bounds,
            frame: CoordinateFrame::Absolute,
        }
    }

    pub fn definition(&self) -> &NodeDefinition {
        &self.definition
    }

    pub fn definition_mut(&mut self) -> &mut NodeDefinition {
        &mut self.definition
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn frame(&self) -> CoordinateFrame {
        self.frame
    }

    /// Moves the view so its upper-left corner is at `location`, keeping the frame.
    pub fn set_location(&mut self, location: Point) {
        self.bounds = Bounds::new_from_top_left(location, self.bounds.to_size());
    }

    pub(crate) fn set_bounds(&mut self, bounds: Bounds, frame: CoordinateFrame) {
        self.bounds = bounds;
        self.frame = frame;
    }
}

/// A graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    content: View,
}

impl Node {
    pub fn new(id: Id, content: View) -> Self {
        Self { id, content }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn content(&self) -> &View {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut View {
        &mut self.content
    }

    /// The DRG element or text annotation behind this node, if any.
    pub fn drg_node(&self) -> Option<&DrgNode> {
        self.content.definition.as_drg_node()
    }

    pub fn drg_node_mut(&mut self) -> Option<&mut DrgNode> {
        self.content.definition.as_drg_node_mut()
    }

    /// The id of the DMN element behind this node, if any.
    pub fn element_id(&self) -> Option<&str> {
        self.drg_node().map(|node| node.element().id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use dmnkit_core::{
        dmn::{Definitions, InputData},
        geometry::Size,
    };

    #[test]
    fn test_view_set_location_keeps_size() {
        let root = NodeDefinition::DiagramRoot(DmnDiagramRoot::new(&Definitions::default()));
        let mut view = View::new(
            root,
            Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(100.0, 50.0)),
        );

        view.set_location(Point::new(30.0, 40.0));

        assert_eq!(view.bounds().min_point(), Point::new(30.0, 40.0));
        assert_eq!(view.bounds().to_size(), Size::new(100.0, 50.0));
        assert_eq!(view.frame(), CoordinateFrame::Absolute);
    }

    #[test]
    fn test_node_element_id() {
        let mut input = InputData::default();
        input.header.id = "_i1".to_string();
        let node = Node::new(
            Id::new("node"),
            View::new(
                NodeDefinition::Element(DrgNode::new(DmnElement::InputData(input), "_d")),
                Bounds::default(),
            ),
        );

        assert_eq!(node.element_id(), Some("_i1"));
        assert_eq!(node.id(), "node");
    }
}
