//! Edge content: containment edges and view connectors with magnets.

use dmnkit_core::{
    dmn::{Association, AssociationDirection, DmnElementReference},
    geometry::{Bounds, Point},
};

/// Where an edge end attaches to its node.
///
/// `location` is relative to the upper-left corner of the node bounds. A
/// centred connection follows the node centre and may be re-routed freely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnetConnection {
    location: Option<Point>,
    centered: bool,
    auto: bool,
}

impl MagnetConnection {
    /// Attaches to the centre of the given bounds.
    pub fn at_center(bounds: Bounds) -> Self {
        Self {
            location: Some(Point::new(bounds.width() / 2.0, bounds.height() / 2.0)),
            centered: true,
            auto: true,
        }
    }

    /// Attaches at a fixed offset from the upper-left corner.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            location: Some(Point::new(x, y)),
            centered: false,
            auto: false,
        }
    }

    /// A connection without a location; it resolves to the node centre.
    pub fn unlocated() -> Self {
        Self {
            location: None,
            centered: true,
            auto: true,
        }
    }

    pub fn with_auto(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }

    pub fn location(&self) -> Option<Point> {
        self.location
    }

    pub fn is_centered(&self) -> bool {
        self.centered
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }
}

/// The definition carried by an association edge.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationDef {
    id: String,
    direction: AssociationDirection,
    description: Option<String>,
}

impl AssociationDef {
    pub fn new(id: impl Into<String>, direction: AssociationDirection) -> Self {
        Self {
            id: id.into(),
            direction,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn direction(&self) -> AssociationDirection {
        self.direction
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Builds the DMN artifact between the two element ids.
    pub fn to_association(&self, source_id: &str, target_id: &str) -> Association {
        Association {
            id: self.id.clone(),
            source_ref: DmnElementReference::local(source_id),
            target_ref: DmnElementReference::local(target_id),
            association_direction: self.direction,
            description: self.description.clone(),
        }
    }
}

/// The relationship a connector edge stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorKind {
    InformationRequirement,
    KnowledgeRequirement,
    AuthorityRequirement,
    Association(AssociationDef),
}

impl ConnectorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InformationRequirement => "InformationRequirement",
            Self::KnowledgeRequirement => "KnowledgeRequirement",
            Self::AuthorityRequirement => "AuthorityRequirement",
            Self::Association(_) => "Association",
        }
    }

    pub fn as_association(&self) -> Option<&AssociationDef> {
        match self {
            Self::Association(def) => Some(def),
            _ => None,
        }
    }
}

/// A visible connector between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConnector {
    kind: ConnectorKind,
    source_connection: Option<MagnetConnection>,
    target_connection: Option<MagnetConnection>,
    control_points: Vec<Point>,
}

impl ViewConnector {
    pub fn new(kind: ConnectorKind) -> Self {
        Self {
            kind,
            source_connection: None,
            target_connection: None,
            control_points: Vec::new(),
        }
    }

    pub fn with_source_connection(mut self, connection: MagnetConnection) -> Self {
        self.source_connection = Some(connection);
        self
    }

    pub fn with_target_connection(mut self, connection: MagnetConnection) -> Self {
        self.target_connection = Some(connection);
        self
    }

    /// Control points in absolute coordinates, in order from source to target.
    pub fn with_control_points(mut self, control_points: Vec<Point>) -> Self {
        self.control_points = control_points;
        self
    }

    pub fn kind(&self) -> &ConnectorKind {
        &self.kind
    }

    pub fn source_connection(&self) -> Option<&MagnetConnection> {
        self.source_connection.as_ref()
    }

    pub fn target_connection(&self) -> Option<&MagnetConnection> {
        self.target_connection.as_ref()
    }

    pub fn control_points(&self) -> &[Point] {
        &self.control_points
    }

    pub fn set_source_connection(&mut self, connection: Option<MagnetConnection>) {
        self.source_connection = connection;
    }

    pub fn set_target_connection(&mut self, connection: Option<MagnetConnection>) {
        self.target_connection = connection;
    }

    pub fn set_control_points(&mut self, control_points: Vec<Point>) {
        self.control_points = control_points;
    }
}

/// The content of a graph edge.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeContent {
    /// Containment: diagram root to node, or decision service to decision.
    Child,
    Connector(ViewConnector),
}

impl EdgeContent {
    pub fn is_child(&self) -> bool {
        matches!(self, Self::Child)
    }

    pub fn as_connector(&self) -> Option<&ViewConnector> {
        match self {
            Self::Connector(connector) => Some(connector),
            Self::Child => None,
        }
    }

    pub fn as_connector_mut(&mut self) -> Option<&mut ViewConnector> {
        match self {
            Self::Connector(connector) => Some(connector),
            Self::Child => None,
        }
    }
}
