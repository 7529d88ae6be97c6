//! Connection of the nodes of one diagram.
//!
//! Requirements and associations become connector edges, decision service
//! membership becomes `Child` edges. References resolve only against nodes
//! of the same diagram; an unresolved side leaves the edge end absent.

use indexmap::IndexMap;
use log::{debug, trace, warn};

use dmnkit_core::{
    dmn::{
        Association, AuthorityRequirement, DmnDiagram, DmnElementReference, DmnEdge, DrgElement,
    },
    identifier::Id,
};

use super::{
    factory::EdgeFactory,
    id_utils::unique_id,
    node_entry::{EntryElement, NodeEntry},
    point_utils::magnet_for,
};
use crate::structure::{AssociationDef, ConnectorKind, Edge, EdgeContent, Graph, MagnetConnection};

/// Separator of the ids of decision service containment edges.
const CHILD_EDGE_SEPARATOR: &str = "er";

/// Finds the node of the element `id`.
///
/// An exact key wins; otherwise the first key, in entry order, containing
/// `id`.
///
/// # Examples
///
/// ```
/// use indexmap::IndexMap;
/// use dmnkit::identifier::Id;
/// use dmnkit::marshaller::connector::get_required_node;
///
/// let mut nodes = IndexMap::new();
/// nodes.insert("ns_d1", Id::new("n1"));
/// nodes.insert("_d1", Id::new("n2"));
///
/// assert_eq!(get_required_node(&nodes, "_d1"), Some(Id::new("n2")));
/// assert_eq!(get_required_node(&nodes, "d1"), Some(Id::new("n1")));
/// assert_eq!(get_required_node(&nodes, "_x"), None);
/// ```
pub fn get_required_node(nodes: &IndexMap<&str, Id>, id: &str) -> Option<Id> {
    if id.is_empty() {
        return None;
    }
    nodes.get(id).copied().or_else(|| {
        nodes
            .iter()
            .find(|(key, _)| key.contains(id))
            .map(|(_, node_id)| *node_id)
    })
}

/// Element id to node id for the given entries; the first entry of an element wins.
fn node_lookup<'e>(entries: &[&'e NodeEntry]) -> IndexMap<&'e str, Id> {
    let mut nodes = IndexMap::new();
    for entry in entries.iter().copied() {
        if let Some(node_id) = entry.node_id() {
            nodes.entry(entry.element_id()).or_insert(node_id);
        }
    }
    nodes
}

/// Connects the nodes created from the entries of one diagram.
pub struct NodeConnector<'a> {
    edge_factory: &'a dyn EdgeFactory,
}

impl<'a> NodeConnector<'a> {
    pub fn new(edge_factory: &'a dyn EdgeFactory) -> Self {
        Self { edge_factory }
    }

    /// Adds connector edges for the requirements of every local entry and
    /// for the associations touching the diagram.
    ///
    /// `entries` must all belong to `diagram`. Edge magnets come from the
    /// diagram's `DMNEdge` of the same id; without one, both ends attach to
    /// the node centres.
    pub fn connect(
        &self,
        graph: &mut Graph,
        entries: &[&NodeEntry],
        diagram: Option<&DmnDiagram>,
        associations: &[&Association],
    ) {
        let nodes = node_lookup(entries);

        for entry in entries {
            if entry.is_included() {
                continue;
            }
            let (Some(target), EntryElement::Drg(element)) = (entry.node_id(), entry.element())
            else {
                continue;
            };

            match element {
                DrgElement::Decision(decision) => {
                    for requirement in &decision.information_requirements {
                        let references =
                            [&requirement.required_input, &requirement.required_decision];
                        for reference in references.into_iter().flatten() {
                            self.connect_requirement(
                                graph,
                                &nodes,
                                diagram,
                                ConnectorKind::InformationRequirement,
                                requirement.id.as_deref(),
                                reference,
                                target,
                            );
                        }
                    }
                    for requirement in &decision.knowledge_requirements {
                        if let Some(reference) = &requirement.required_knowledge {
                            self.connect_requirement(
                                graph,
                                &nodes,
                                diagram,
                                ConnectorKind::KnowledgeRequirement,
                                requirement.id.as_deref(),
                                reference,
                                target,
                            );
                        }
                    }
                    for requirement in &decision.authority_requirements {
                        self.connect_authority(graph, &nodes, diagram, requirement, target);
                    }
                }
                DrgElement::BusinessKnowledgeModel(bkm) => {
                    for requirement in &bkm.knowledge_requirements {
                        if let Some(reference) = &requirement.required_knowledge {
                            self.connect_requirement(
                                graph,
                                &nodes,
                                diagram,
                                ConnectorKind::KnowledgeRequirement,
                                requirement.id.as_deref(),
                                reference,
                                target,
                            );
                        }
                    }
                    for requirement in &bkm.authority_requirements {
                        self.connect_authority(graph, &nodes, diagram, requirement, target);
                    }
                }
                DrgElement::KnowledgeSource(source) => {
                    for requirement in &source.authority_requirements {
                        self.connect_authority(graph, &nodes, diagram, requirement, target);
                    }
                }
                DrgElement::InputData(_) | DrgElement::DecisionService(_) => {}
            }
        }

        for association in associations {
            self.connect_association(graph, &nodes, diagram, association);
        }
    }

    /// Adds a `Child` edge from every decision service to each of its
    /// output and encapsulated decisions shown on the same diagram.
    ///
    /// A decision already contained by another service keeps its first parent.
    pub fn connect_decision_service_children(&self, graph: &mut Graph, entries: &[&NodeEntry]) {
        let nodes = node_lookup(entries);

        for entry in entries {
            let (Some(service_id), EntryElement::Drg(DrgElement::DecisionService(service))) =
                (entry.node_id(), entry.element())
            else {
                continue;
            };

            let decisions = service
                .output_decisions
                .iter()
                .chain(&service.encapsulated_decisions);
            for reference in decisions {
                let Some(child_id) = get_required_node(&nodes, reference.fragment()) else {
                    debug!(
                        service_id = entry.element_id(),
                        decision = reference.fragment();
                        "Decision service child not on diagram"
                    );
                    continue;
                };
                if child_id == service_id {
                    continue;
                }
                if graph.parent(child_id).is_some() {
                    warn!(
                        service_id = entry.element_id(),
                        decision = reference.fragment();
                        "Decision already belongs to a decision service"
                    );
                    continue;
                }

                graph.add_edge(Edge::new(
                    service_id.join(CHILD_EDGE_SEPARATOR, child_id),
                    Some(service_id),
                    Some(child_id),
                    EdgeContent::Child,
                ));
            }
        }
    }

    fn connect_authority(
        &self,
        graph: &mut Graph,
        nodes: &IndexMap<&str, Id>,
        diagram: Option<&DmnDiagram>,
        requirement: &AuthorityRequirement,
        target: Id,
    ) {
        let references = [
            &requirement.required_input,
            &requirement.required_decision,
            &requirement.required_authority,
        ];
        for reference in references.into_iter().flatten() {
            self.connect_requirement(
                graph,
                nodes,
                diagram,
                ConnectorKind::AuthorityRequirement,
                requirement.id.as_deref(),
                reference,
                target,
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn connect_requirement(
        &self,
        graph: &mut Graph,
        nodes: &IndexMap<&str, Id>,
        diagram: Option<&DmnDiagram>,
        kind: ConnectorKind,
        requirement_id: Option<&str>,
        reference: &DmnElementReference,
        target: Id,
    ) {
        let source = get_required_node(nodes, reference.fragment());
        if source.is_none() {
            debug!(
                requirement = reference.href.as_str(),
                kind = kind.name();
                "Requirement source not on diagram"
            );
        }

        let edge_id = edge_id_for(requirement_id);
        let mut edge = self
            .edge_factory
            .create_edge(kind, edge_id, source, Some(target));
        set_connection_magnets(graph, &mut edge, requirement_id, diagram);
        graph.add_edge(edge);
    }

    fn connect_association(
        &self,
        graph: &mut Graph,
        nodes: &IndexMap<&str, Id>,
        diagram: Option<&DmnDiagram>,
        association: &Association,
    ) {
        let source = get_required_node(nodes, association.source_ref.fragment());
        let target = get_required_node(nodes, association.target_ref.fragment());
        if source.is_none() && target.is_none() {
            warn!(
                association_id = association.id.as_str();
                "Skipping association with no resolved end"
            );
            return;
        }

        let definition = AssociationDef::new(&association.id, association.association_direction)
            .with_description(association.description.clone());
        let id = Some(association.id.as_str()).filter(|id| !id.is_empty());
        let mut edge = self.edge_factory.create_edge(
            ConnectorKind::Association(definition),
            edge_id_for(id),
            source,
            target,
        );
        set_connection_magnets(graph, &mut edge, id, diagram);
        graph.add_edge(edge);
    }
}

fn edge_id_for(requirement_id: Option<&str>) -> Id {
    match requirement_id {
        Some(id) if !id.is_empty() => Id::new(id),
        _ => Id::new(&unique_id()),
    }
}

fn find_dmn_edge<'d>(diagram: Option<&'d DmnDiagram>, id: Option<&str>) -> Option<&'d DmnEdge> {
    let id = id?;
    diagram?
        .edges()
        .find(|edge| edge.dmn_element_ref.local_part == id && !edge.waypoints.is_empty())
}

/// Sets the magnets and control points of `edge` from its `DMNEdge`.
///
/// Waypoint 0 attaches to the source, the last waypoint to the target and
/// the waypoints in between become control points.
fn set_connection_magnets(
    graph: &Graph,
    edge: &mut Edge,
    id: Option<&str>,
    diagram: Option<&DmnDiagram>,
) {
    let source_view = edge
        .source()
        .and_then(|source| graph.node(source))
        .map(|node| node.content());
    let target_view = edge
        .target()
        .and_then(|target| graph.node(target))
        .map(|node| node.content());
    let dmn_edge = find_dmn_edge(diagram, id);

    let Some(connector) = edge.content_mut().as_connector_mut() else {
        return;
    };

    match dmn_edge {
        Some(dmn_edge) => {
            let waypoints = &dmn_edge.waypoints;
            let first = waypoints.first().copied();
            let last = waypoints.last().copied();

            connector.set_source_connection(
                source_view
                    .zip(first)
                    .map(|(view, point)| magnet_for(view, point)),
            );
            connector.set_target_connection(
                target_view
                    .zip(last)
                    .map(|(view, point)| magnet_for(view, point)),
            );
            if waypoints.len() > 2 {
                connector.set_control_points(waypoints[1..waypoints.len() - 1].to_vec());
            }
            trace!(dmn_edge = dmn_edge.id.as_str(); "Magnets read from DMNEdge");
        }
        None => {
            connector.set_source_connection(
                source_view.map(|view| MagnetConnection::at_center(view.bounds())),
            );
            connector.set_target_connection(
                target_view.map(|view| MagnetConnection::at_center(view.bounds())),
            );
        }
    }
}
