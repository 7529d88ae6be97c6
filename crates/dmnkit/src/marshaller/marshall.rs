//! Graph to DMN document.
//!
//! Elements are rebuilt from the nodes and their relations from the edges:
//! requirements from incoming connectors, decision service membership from
//! containment edges and associations from the edges touching text
//! annotations.

use std::collections::HashSet;

use log::{debug, info, trace};

use dmnkit_core::{
    dmn::{
        Artifact, Association, AuthorityRequirement, ComponentWidths, Definitions, DiagramElement,
        DmnEdge, DmnElementReference, DmnShape, DrgElement, InformationRequirement,
        KnowledgeRequirement, QName,
    },
    geometry::Point,
    identifier::Id,
};

use super::{
    id_utils::{edge_id, get_raw_id, shape_id},
    point_utils::{connection_point, convert_all},
};
use crate::{
    DmnError,
    config::MarshallerConfig,
    structure::{CoordinateFrame, DmnElement, DrgNode, Edge, Graph, Node},
};

/// Builds DMN documents from graphs.
///
/// Marshalling is strict: a graph that no document could produce is an
/// error rather than a partial document.
#[derive(Debug, Clone, Default)]
pub struct DmnMarshaller {
    config: MarshallerConfig,
}

impl DmnMarshaller {
    pub fn new(config: MarshallerConfig) -> Self {
        Self { config }
    }

    /// Converts the graph to a document.
    ///
    /// Node bounds are made absolute while the document is built and made
    /// relative again before returning, whatever the outcome; the graph is
    /// otherwise left untouched and repeated calls give the same document.
    ///
    /// # Errors
    ///
    /// Returns [`DmnError::Marshall`] when the graph has no diagram root,
    /// when a node belongs to a diagram the root does not know, or when an
    /// edge connects element kinds no requirement exists for.
    pub fn marshall(&self, graph: &mut Graph) -> Result<Definitions, DmnError> {
        convert_all(graph, CoordinateFrame::Absolute);
        let result = self.marshall_absolute(graph);
        convert_all(graph, CoordinateFrame::Relative);
        result
    }

    fn marshall_absolute(&self, graph: &Graph) -> Result<Definitions, DmnError> {
        let root = graph
            .diagram_root()
            .and_then(|node| node.content().definition().as_diagram_root())
            .ok_or_else(|| DmnError::Marshall("graph has no diagram root".to_string()))?;

        let mut definitions = root.definitions().clone();
        definitions.item_definitions.retain(|item| !item.read_only);
        definitions.drg_elements.clear();
        definitions.artifacts.clear();

        let mut diagrams = definitions
            .dmndi
            .as_ref()
            .map(|dmndi| dmndi.diagrams.clone())
            .unwrap_or_default();

        for node in graph.nodes() {
            let Some(drg_node) = node.drg_node() else {
                continue;
            };
            if !diagrams
                .iter()
                .any(|diagram| diagram.id == drg_node.dmn_diagram_id())
            {
                return Err(DmnError::Marshall(format!(
                    "element `{}` is on unknown diagram `{}`",
                    drg_node.element().id(),
                    drg_node.dmn_diagram_id()
                )));
            }
        }

        let mut emitted = HashSet::new();
        for diagram in &mut diagrams {
            let diagram_id = diagram.id.clone();
            diagram.elements.clear();
            diagram.extension.components_widths.clear();

            let mut edges = Vec::new();
            for node in graph.nodes() {
                let Some(drg_node) = node.drg_node() else {
                    continue;
                };
                if drg_node.dmn_diagram_id() != diagram_id {
                    continue;
                }

                diagram
                    .elements
                    .push(DiagramElement::Shape(to_shape(&diagram_id, node, drg_node)));

                if !drg_node.allow_only_visual_change() {
                    emit_element(graph, node, drg_node, &mut definitions, &mut emitted)?;

                    if self.config.emit_components_widths() {
                        for (key, widths) in drg_node.component_widths() {
                            let known = diagram
                                .extension
                                .components_widths
                                .iter()
                                .any(|entry| entry.dmn_element_ref.local_part == *key);
                            if !widths.is_empty() && !known {
                                diagram.extension.components_widths.push(ComponentWidths {
                                    dmn_element_ref: QName::new(key.as_str()),
                                    widths: widths.clone(),
                                });
                            }
                        }
                    }
                }

                for edge in graph.incoming_edges(node.id()) {
                    if let Some(dmn_edge) = to_dmn_edge(graph, &diagram_id, edge) {
                        edges.push(DiagramElement::Edge(dmn_edge));
                    }
                }
            }

            debug!(
                diagram_id = diagram_id.as_str(),
                elements_count = diagram.elements.len(),
                edges_count = edges.len();
                "Diagram marshalled"
            );
            diagram.elements.extend(edges);
        }

        if let Some(dmndi) = definitions.dmndi.as_mut() {
            dmndi.diagrams = diagrams;
        }

        info!(
            drg_elements_count = definitions.drg_elements.len(),
            artifacts_count = definitions.artifacts.len();
            "Graph marshalled"
        );
        Ok(definitions)
    }
}

fn to_shape(diagram_id: &str, node: &Node, drg_node: &DrgNode) -> DmnShape {
    let bounds = node.content().bounds();
    let divider = match (drg_node.element(), drg_node.divider_line_y()) {
        (DmnElement::DecisionService(_), Some(offset)) => {
            let y = bounds.min_y() + offset;
            Some(vec![
                Point::new(bounds.min_x(), y),
                Point::new(bounds.max_x(), y),
            ])
        }
        _ => None,
    };

    DmnShape {
        id: shape_id(diagram_id, drg_node.element().id()),
        dmn_element_ref: drg_node.dmn_element_ref(),
        bounds,
        is_collapsed: drg_node.is_collapsed(),
        style: drg_node.style().cloned(),
        label: drg_node.label().cloned(),
        decision_service_divider_line: divider,
    }
}

/// The `DMNEdge` of a connector with both ends attached.
fn to_dmn_edge(graph: &Graph, diagram_id: &str, edge: &Edge) -> Option<DmnEdge> {
    let connector = edge.content().as_connector()?;
    let source_connection = connector.source_connection()?;
    let target_connection = connector.target_connection()?;
    let source = graph.node(edge.source()?)?;
    let target = graph.node(edge.target()?)?;

    let mut waypoints = vec![connection_point(source.content(), source_connection)];
    waypoints.extend_from_slice(connector.control_points());
    waypoints.push(connection_point(target.content(), target_connection));

    let element_ref = match connector.kind().as_association() {
        Some(association) => association.id().to_string(),
        None => raw_id(edge.id()),
    };
    let shape_ref = |node: &Node| {
        node.drg_node()
            .filter(|drg_node| drg_node.dmn_diagram_id() == diagram_id)
            .map(|drg_node| QName::new(shape_id(diagram_id, drg_node.element().id())))
    };

    trace!(edge_id:? = edge.id(), waypoints_count = waypoints.len(); "DMNEdge built");
    Some(DmnEdge {
        id: edge_id(diagram_id, &element_ref),
        dmn_element_ref: QName::new(element_ref),
        waypoints,
        source_element: shape_ref(source),
        target_element: shape_ref(target),
        ..Default::default()
    })
}

fn raw_id(id: Id) -> String {
    get_raw_id(&id.to_string()).to_string()
}

fn requirement_id(edge: &Edge) -> Option<String> {
    Some(raw_id(edge.id())).filter(|id| !id.is_empty())
}

/// Appends the node's element, or its artifacts, unless already emitted.
fn emit_element(
    graph: &Graph,
    node: &Node,
    drg_node: &DrgNode,
    definitions: &mut Definitions,
    emitted: &mut HashSet<String>,
) -> Result<(), DmnError> {
    if let DmnElement::TextAnnotation(annotation) = drg_node.element() {
        if emitted.insert(annotation.id.clone()) {
            definitions
                .artifacts
                .push(Artifact::TextAnnotation(annotation.clone()));
        }
        for association in associations_of(graph, node.id()) {
            if emitted.insert(association.id.clone()) {
                definitions.artifacts.push(Artifact::Association(association));
            }
        }
        return Ok(());
    }

    let id = drg_node.element().id();
    if emitted.contains(id) {
        return Ok(());
    }
    let drawings: Vec<&Node> = graph.nodes_by_element_id(id).collect();
    let element = rebuild_element(graph, &drawings, drg_node)?;
    emitted.insert(id.to_string());
    definitions.drg_elements.push(element);
    Ok(())
}

/// Associations for every association edge touching the node with both ends attached.
fn associations_of(graph: &Graph, id: Id) -> Vec<Association> {
    graph
        .incoming_edges(id)
        .chain(graph.outgoing_edges(id))
        .filter_map(|edge| {
            let association = edge.content().as_connector()?.kind().as_association()?;
            let source = graph.node(edge.source()?)?.element_id()?;
            let target = graph.node(edge.target()?)?.element_id()?;
            Some(association.to_association(source, target))
        })
        .collect()
}

/// Incoming requirement edges of every drawing of an element, with the
/// element at their source.
///
/// Each diagram resolves requirements against its own nodes only, so a
/// requirement may be attached on one drawing and dangling on another; it is
/// kept once. Association and containment edges and edges without a source
/// are skipped.
fn requirement_sources<'g>(
    graph: &'g Graph,
    drawings: &[&'g Node],
) -> Result<Vec<(&'g Edge, &'g DmnElement)>, DmnError> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for node in drawings {
        for edge in graph.incoming_edges(node.id()) {
            let Some(connector) = edge.content().as_connector() else {
                continue;
            };
            if connector.kind().as_association().is_some() {
                continue;
            }
            let Some(source_id) = edge.source() else {
                continue;
            };
            let element = graph
                .node(source_id)
                .and_then(Node::drg_node)
                .map(DrgNode::element)
                .ok_or_else(|| {
                    DmnError::Marshall(format!(
                        "edge `{}` has no element at its source",
                        edge.id()
                    ))
                })?;
            if seen.insert((requirement_id(edge), element.id())) {
                sources.push((edge, element));
            }
        }
    }
    Ok(sources)
}

fn unsupported(source: &DmnElement, target: &DmnElement) -> DmnError {
    DmnError::Marshall(format!(
        "no requirement connects {} `{}` to {} `{}`",
        source.kind_name(),
        source.id(),
        target.kind_name(),
        target.id()
    ))
}

/// Rebuilds the element of `drg_node` with the relations carried by the
/// edges of all its drawings.
fn rebuild_element(
    graph: &Graph,
    drawings: &[&Node],
    drg_node: &DrgNode,
) -> Result<DrgElement, DmnError> {
    let target = drg_node.element();
    let sources = requirement_sources(graph, drawings)?;

    match target {
        DmnElement::InputData(input) => Ok(DrgElement::InputData(input.clone())),
        DmnElement::Decision(decision) => {
            let mut decision = decision.clone();
            for (edge, source) in sources {
                let id = requirement_id(edge);
                let reference = DmnElementReference::local(source.id());
                match source {
                    DmnElement::Decision(_) => {
                        decision
                            .information_requirements
                            .push(InformationRequirement {
                                id,
                                required_decision: Some(reference),
                                required_input: None,
                            })
                    }
                    DmnElement::InputData(_) => {
                        decision
                            .information_requirements
                            .push(InformationRequirement {
                                id,
                                required_decision: None,
                                required_input: Some(reference),
                            })
                    }
                    DmnElement::BusinessKnowledgeModel(_) | DmnElement::DecisionService(_) => {
                        decision.knowledge_requirements.push(KnowledgeRequirement {
                            id,
                            required_knowledge: Some(reference),
                        })
                    }
                    DmnElement::KnowledgeSource(_) => {
                        decision.authority_requirements.push(AuthorityRequirement {
                            id,
                            required_authority: Some(reference),
                            ..Default::default()
                        })
                    }
                    DmnElement::TextAnnotation(_) => return Err(unsupported(source, target)),
                }
            }
            Ok(DrgElement::Decision(decision))
        }
        DmnElement::BusinessKnowledgeModel(bkm) => {
            let mut bkm = bkm.clone();
            for (edge, source) in sources {
                let id = requirement_id(edge);
                let reference = DmnElementReference::local(source.id());
                match source {
                    DmnElement::BusinessKnowledgeModel(_) | DmnElement::DecisionService(_) => {
                        bkm.knowledge_requirements.push(KnowledgeRequirement {
                            id,
                            required_knowledge: Some(reference),
                        })
                    }
                    DmnElement::KnowledgeSource(_) => {
                        bkm.authority_requirements.push(AuthorityRequirement {
                            id,
                            required_authority: Some(reference),
                            ..Default::default()
                        })
                    }
                    _ => return Err(unsupported(source, target)),
                }
            }
            Ok(DrgElement::BusinessKnowledgeModel(bkm))
        }
        DmnElement::KnowledgeSource(knowledge_source) => {
            let mut knowledge_source = knowledge_source.clone();
            for (edge, source) in sources {
                let id = requirement_id(edge);
                let reference = Some(DmnElementReference::local(source.id()));
                let requirement = match source {
                    DmnElement::Decision(_) => AuthorityRequirement {
                        id,
                        required_decision: reference,
                        ..Default::default()
                    },
                    DmnElement::InputData(_) => AuthorityRequirement {
                        id,
                        required_input: reference,
                        ..Default::default()
                    },
                    DmnElement::KnowledgeSource(_) => AuthorityRequirement {
                        id,
                        required_authority: reference,
                        ..Default::default()
                    },
                    _ => return Err(unsupported(source, target)),
                };
                knowledge_source.authority_requirements.push(requirement);
            }
            Ok(DrgElement::KnowledgeSource(knowledge_source))
        }
        DmnElement::DecisionService(service) => {
            let mut service = service.clone();
            for (_, source) in sources {
                let reference = DmnElementReference::local(source.id());
                match source {
                    DmnElement::Decision(_) => service.input_decisions.push(reference),
                    DmnElement::InputData(_) => service.input_data.push(reference),
                    _ => return Err(unsupported(source, target)),
                }
            }

            // Decisions above the divider are outputs, the others are encapsulated
            let mut members = HashSet::new();
            for node in drawings {
                let bounds = node.content().bounds();
                let divider_y = node
                    .drg_node()
                    .and_then(DrgNode::divider_line_y)
                    .map(|offset| bounds.min_y() + offset);
                for child_id in graph.children(node.id()) {
                    let child = graph.node(child_id);
                    let element = child
                        .and_then(Node::drg_node)
                        .map(DrgNode::element)
                        .filter(|element| matches!(element, DmnElement::Decision(_)))
                        .ok_or_else(|| {
                            DmnError::Marshall(format!(
                                "decision service `{}` contains a node that is not a decision",
                                target.id()
                            ))
                        })?;
                    if !members.insert(element.id()) {
                        continue;
                    }
                    let child_top = child
                        .map(|child| child.content().bounds().min_y())
                        .unwrap_or_default();
                    let reference = DmnElementReference::local(element.id());

                    if divider_y.is_none_or(|y| child_top < y) {
                        service.output_decisions.push(reference);
                    } else {
                        service.encapsulated_decisions.push(reference);
                    }
                }
            }
            Ok(DrgElement::DecisionService(service))
        }
        DmnElement::TextAnnotation(_) => Err(DmnError::Marshall(format!(
            "text annotation `{}` is not a DRG element",
            target.id()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use dmnkit_core::{
        dmn::{Decision, DecisionService, DmnDiagram, Dmndi, DrgElementHeader, InputData},
        geometry::{Bounds, Size},
    };

    use crate::structure::{
        ConnectorKind, DmnDiagramRoot, EdgeContent, MagnetConnection, NodeDefinition, View,
        ViewConnector,
    };

    fn root_node(diagram_ids: &[&str]) -> Node {
        let definitions = Definitions {
            dmndi: Some(Dmndi {
                diagrams: diagram_ids
                    .iter()
                    .map(|id| DmnDiagram::new(*id, *id))
                    .collect(),
                styles: Vec::new(),
            }),
            ..Default::default()
        };
        Node::new(
            Id::new("root"),
            View::new(
                NodeDefinition::DiagramRoot(DmnDiagramRoot::new(&definitions)),
                Bounds::default(),
            ),
        )
    }

    fn element_node(id: &str, element: DmnElement, x: f64, y: f64) -> Node {
        Node::new(
            Id::new(id),
            View::new(
                NodeDefinition::Element(DrgNode::new(element, "_drg")),
                Bounds::new_from_top_left(Point::new(x, y), Size::new(100.0, 50.0)),
            ),
        )
    }

    fn child(graph: &mut Graph, parent: &str, child: &str) {
        graph.add_edge(Edge::new(
            Id::new(&format!("{parent}-{child}")),
            Some(Id::new(parent)),
            Some(Id::new(child)),
            EdgeContent::Child,
        ));
    }

    fn requirement(graph: &mut Graph, id: &str, source: &str, target: &str) {
        let connector = ViewConnector::new(ConnectorKind::InformationRequirement)
            .with_source_connection(MagnetConnection::unlocated())
            .with_target_connection(MagnetConnection::unlocated());
        graph.add_edge(Edge::new(
            Id::new(id),
            Some(Id::new(source)),
            Some(Id::new(target)),
            EdgeContent::Connector(connector),
        ));
    }

    fn input(id: &str) -> DmnElement {
        DmnElement::InputData(InputData {
            header: DrgElementHeader::new(id, id),
        })
    }

    fn decision(id: &str) -> DmnElement {
        DmnElement::Decision(Decision {
            header: DrgElementHeader::new(id, id),
            ..Default::default()
        })
    }

    fn drawn_node(id: &str, element: DmnElement, diagram_id: &str) -> Node {
        Node::new(
            Id::new(id),
            View::new(
                NodeDefinition::Element(DrgNode::new(element, diagram_id)),
                Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0)),
            ),
        )
    }

    fn dangling_requirement(graph: &mut Graph, id: &str, target: &str) {
        graph.add_edge(Edge::new(
            Id::new(id),
            None,
            Some(Id::new(target)),
            EdgeContent::Connector(ViewConnector::new(ConnectorKind::InformationRequirement)),
        ));
    }

    fn only_decision(definitions: &Definitions) -> &Decision {
        let mut decisions = definitions
            .drg_elements
            .iter()
            .filter_map(|element| match element {
                DrgElement::Decision(decision) => Some(decision),
                _ => None,
            });
        let decision = decisions.next().expect("decision");
        assert!(decisions.next().is_none());
        decision
    }

    #[test]
    fn test_marshall_without_root_fails() {
        let mut graph = Graph::new();
        let result = DmnMarshaller::default().marshall(&mut graph);
        assert!(matches!(result, Err(DmnError::Marshall(_))));
    }

    #[test]
    fn test_requirement_and_dmn_edge() {
        let mut graph = Graph::new();
        graph.add_node(root_node(&["_drg"]));
        graph.add_node(element_node("i1", input("_i1"), 0.0, 0.0));
        graph.add_node(element_node("d1", decision("_d1"), 0.0, 200.0));
        child(&mut graph, "root", "i1");
        child(&mut graph, "root", "d1");
        requirement(&mut graph, "_r1", "i1", "d1");

        let definitions = DmnMarshaller::default()
            .marshall(&mut graph)
            .expect("marshalled");

        assert_eq!(definitions.drg_elements.len(), 2);
        let DrgElement::Decision(decision) = &definitions.drg_elements[1] else {
            panic!("Expected decision");
        };
        let requirement = &decision.information_requirements[0];
        assert_eq!(requirement.id.as_deref(), Some("_r1"));
        assert_eq!(
            requirement.required_input,
            Some(DmnElementReference::local("_i1"))
        );

        let diagram = &definitions.dmndi.as_ref().expect("DMNDI").diagrams[0];
        let edge = diagram.edges().next().expect("DMNEdge");
        assert_eq!(edge.id, "dmnedge-_drg#_r1");
        assert_eq!(edge.dmn_element_ref.local_part, "_r1");
        // Unlocated magnets resolve to the node centres
        assert_eq!(
            edge.waypoints,
            vec![Point::new(50.0, 25.0), Point::new(50.0, 225.0)]
        );
        let shape = diagram.shapes().next().expect("DMNShape");
        assert_eq!(shape.id, "dmnshape-_drg#_i1");
    }

    #[test]
    fn test_requirement_resolved_on_later_diagram_is_kept() {
        let mut graph = Graph::new();
        graph.add_node(root_node(&["_page_a", "_drg"]));
        graph.add_node(drawn_node("_page_a#_d1", decision("_d1"), "_page_a"));
        graph.add_node(drawn_node("_drg#_i1", input("_i1"), "_drg"));
        graph.add_node(drawn_node("_drg#_d1", decision("_d1"), "_drg"));
        // Page A does not show the input
        dangling_requirement(&mut graph, "_ir1", "_page_a#_d1");
        requirement(&mut graph, "_ir1", "_drg#_i1", "_drg#_d1");

        let definitions = DmnMarshaller::default()
            .marshall(&mut graph)
            .expect("marshalled");

        assert_eq!(definitions.drg_elements.len(), 2);
        let decision = only_decision(&definitions);
        assert_eq!(decision.information_requirements.len(), 1);
        let requirement = &decision.information_requirements[0];
        assert_eq!(requirement.id.as_deref(), Some("_ir1"));
        assert_eq!(
            requirement.required_input,
            Some(DmnElementReference::local("_i1"))
        );
    }

    #[test]
    fn test_requirement_drawn_twice_is_emitted_once() {
        let mut graph = Graph::new();
        graph.add_node(root_node(&["_page_a", "_page_b"]));
        for page in ["_page_a", "_page_b"] {
            let input_node = format!("{page}#_i1");
            let decision_node = format!("{page}#_d1");
            graph.add_node(drawn_node(&input_node, input("_i1"), page));
            graph.add_node(drawn_node(&decision_node, decision("_d1"), page));
            requirement(&mut graph, "_ir1", &input_node, &decision_node);
        }

        let definitions = DmnMarshaller::default()
            .marshall(&mut graph)
            .expect("marshalled");

        assert_eq!(only_decision(&definitions).information_requirements.len(), 1);
        let dmndi = definitions.dmndi.as_ref().expect("DMNDI");
        for diagram in &dmndi.diagrams {
            assert_eq!(diagram.edges().count(), 1);
        }
    }

    #[test]
    fn test_text_annotation_source_is_rejected() {
        let mut graph = Graph::new();
        graph.add_node(root_node(&["_drg"]));
        let annotation = DmnElement::TextAnnotation(Default::default());
        graph.add_node(element_node("t1", annotation, 0.0, 0.0));
        graph.add_node(element_node("d1", decision("_d1"), 0.0, 200.0));
        requirement(&mut graph, "_r1", "t1", "d1");

        let result = DmnMarshaller::default().marshall(&mut graph);

        assert!(matches!(result, Err(DmnError::Marshall(_))));
    }

    #[test]
    fn test_unknown_diagram_is_rejected() {
        let mut graph = Graph::new();
        graph.add_node(root_node(&["_other"]));
        graph.add_node(element_node("i1", input("_i1"), 0.0, 0.0));

        let result = DmnMarshaller::default().marshall(&mut graph);

        assert!(matches!(result, Err(DmnError::Marshall(_))));
    }

    #[test]
    fn test_decision_service_split_by_divider() {
        let mut graph = Graph::new();
        graph.add_node(root_node(&["_drg"]));
        let service = DmnElement::DecisionService(DecisionService {
            header: DrgElementHeader::new("_ds", "Service"),
            ..Default::default()
        });
        graph.add_node(Node::new(
            Id::new("ds"),
            View::new(
                NodeDefinition::Element(
                    DrgNode::new(service, "_drg").with_divider_line_y(Some(100.0)),
                ),
                Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(300.0, 300.0)),
            ),
        ));
        graph.add_node(element_node("out", decision("_out"), 10.0, 10.0));
        graph.add_node(element_node("enc", decision("_enc"), 10.0, 150.0));
        child(&mut graph, "root", "ds");
        child(&mut graph, "ds", "out");
        child(&mut graph, "ds", "enc");

        let definitions = DmnMarshaller::default()
            .marshall(&mut graph)
            .expect("marshalled");

        let DrgElement::DecisionService(service) = &definitions.drg_elements[0] else {
            panic!("Expected decision service");
        };
        assert_eq!(service.output_decisions, vec![DmnElementReference::local("_out")]);
        assert_eq!(
            service.encapsulated_decisions,
            vec![DmnElementReference::local("_enc")]
        );

        let diagram = &definitions.dmndi.as_ref().expect("DMNDI").diagrams[0];
        let shape = diagram.shapes().next().expect("service shape");
        assert_eq!(
            shape.decision_service_divider_line,
            Some(vec![Point::new(0.0, 100.0), Point::new(300.0, 100.0)])
        );
    }
}
