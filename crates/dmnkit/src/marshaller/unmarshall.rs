//! DMN document to graph.

use log::{debug, info};

use dmnkit_core::{
    dmn::{Association, Definitions, DmnDiagram},
    identifier::Id,
};

use super::{
    connector::NodeConnector,
    diagram_utils::{ensure_drg_element_exists, synthesize_missing_shapes},
    factory::{DefaultEdgeFactory, DefaultNodeFactory, EdgeFactory, NodeFactory},
    id_utils::unique_id,
    imports::{ImportResolver, ImportedModels, Metadata, NoImports},
    node_entry::{NodeEntriesBuilder, NodeEntry},
    point_utils::convert_all,
};
use crate::{
    DmnError,
    config::UnmarshallerConfig,
    structure::{CoordinateFrame, Edge, EdgeContent, Graph, Node},
};

/// Returns the diagram of a document that has exactly one.
pub fn find_diagram(definitions: &Definitions) -> Option<&DmnDiagram> {
    match definitions.dmndi.as_ref()?.diagrams.as_slice() {
        [diagram] => Some(diagram),
        _ => None,
    }
}

/// Builds graphs from DMN documents.
///
/// Unmarshalling is lenient: shapes and references that resolve to nothing
/// are logged and skipped. Only import resolution can fail.
pub struct DmnUnmarshaller {
    config: UnmarshallerConfig,
    import_resolver: Box<dyn ImportResolver>,
    node_factory: Box<dyn NodeFactory>,
    edge_factory: Box<dyn EdgeFactory>,
}

impl Default for DmnUnmarshaller {
    fn default() -> Self {
        Self::new(UnmarshallerConfig::default())
    }
}

impl DmnUnmarshaller {
    /// Creates an unmarshaller that ignores imports.
    pub fn new(config: UnmarshallerConfig) -> Self {
        Self {
            config,
            import_resolver: Box::new(NoImports),
            node_factory: Box::new(DefaultNodeFactory),
            edge_factory: Box::new(DefaultEdgeFactory),
        }
    }

    pub fn with_import_resolver(mut self, resolver: impl ImportResolver + 'static) -> Self {
        self.import_resolver = Box::new(resolver);
        self
    }

    pub fn with_node_factory(mut self, factory: impl NodeFactory + 'static) -> Self {
        self.node_factory = Box::new(factory);
        self
    }

    pub fn with_edge_factory(mut self, factory: impl EdgeFactory + 'static) -> Self {
        self.edge_factory = Box::new(factory);
        self
    }

    /// Resolves the document's imports, then builds its graph.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error; no graph is built in that case.
    pub async fn unmarshall(
        &self,
        metadata: &Metadata,
        definitions: Definitions,
    ) -> Result<Graph, DmnError> {
        let imports = self
            .import_resolver
            .resolve(metadata, &definitions.imports)
            .await?;
        debug!(imports_count = imports.len(); "Imports resolved");

        Ok(self.build_graph(definitions, &imports))
    }

    /// Builds the graph of a document whose imports are already resolved.
    ///
    /// The returned graph holds one diagram root, one node per resolvable
    /// shape and every node except the root has exactly one parent. Node
    /// bounds are relative to their decision service.
    pub fn build_graph(&self, mut definitions: Definitions, imports: &ImportedModels) -> Graph {
        if let Some(diagram) = find_diagram(&definitions) {
            debug!(diagram_id = diagram.id.as_str(); "Document has a single diagram");
        }

        ensure_drg_element_exists(&mut definitions);
        let synthesized = synthesize_missing_shapes(&mut definitions, &self.config);
        if synthesized > 0 {
            info!(shapes_count = synthesized; "Synthesized shapes for elements without one");
        }

        let mut entries = NodeEntriesBuilder::new(&definitions, imports).make_entries();

        let mut graph = Graph::new();
        let root = self.node_factory.create_root(&definitions);
        let root_id = root.id();
        graph.add_node(root);
        for entry in &mut entries {
            let node = self.node_factory.create_node(entry);
            entry.set_node_id(node.id());
            graph.add_node(node);
        }

        let diagrams = definitions
            .dmndi
            .as_ref()
            .map(|dmndi| dmndi.diagrams.as_slice())
            .unwrap_or_default();
        let associations: Vec<&Association> = definitions.associations().collect();
        let connector = NodeConnector::new(self.edge_factory.as_ref());

        for diagram in diagrams {
            let diagram_entries = entries_of(&entries, diagram);
            debug!(
                diagram_id = diagram.id.as_str(),
                entries_count = diagram_entries.len();
                "Connecting diagram nodes"
            );
            connector.connect(&mut graph, &diagram_entries, Some(diagram), &associations);
        }
        for diagram in diagrams {
            let diagram_entries = entries_of(&entries, diagram);
            connector.connect_decision_service_children(&mut graph, &diagram_entries);
        }

        attach_to_root(&mut graph, root_id);
        restore_component_widths(&mut graph, diagrams);

        let item_definitions = imports.item_definitions();
        if let Some(root) = graph
            .node_mut(root_id)
            .and_then(|node| node.content_mut().definition_mut().as_diagram_root_mut())
        {
            root.definitions_mut()
                .item_definitions
                .extend(item_definitions);
        }

        convert_all(&mut graph, CoordinateFrame::Relative);

        info!(
            nodes_count = graph.nodes_count(),
            edges_count = graph.edges_count();
            "Graph built"
        );
        graph
    }
}

fn entries_of<'e>(entries: &'e [NodeEntry], diagram: &DmnDiagram) -> Vec<&'e NodeEntry> {
    entries
        .iter()
        .filter(|entry| entry.diagram_id() == diagram.id)
        .collect()
}

/// Adds a `Child` edge from the root to every node without a parent.
fn attach_to_root(graph: &mut Graph, root_id: Id) {
    for id in graph.node_ids() {
        if id == root_id || graph.parent(id).is_some() {
            continue;
        }
        graph.add_edge(Edge::new(
            Id::new(&unique_id()),
            Some(root_id),
            Some(id),
            EdgeContent::Child,
        ));
    }
}

/// Applies every diagram's component widths to the nodes owning the keyed logic.
fn restore_component_widths(graph: &mut Graph, diagrams: &[DmnDiagram]) {
    let node_ids = graph.node_ids();

    for widths in diagrams
        .iter()
        .flat_map(|diagram| &diagram.extension.components_widths)
    {
        let key = widths.dmn_element_ref.local_part.as_str();
        let mut applied = false;
        for id in &node_ids {
            if let Some(drg_node) = graph.node_mut(*id).and_then(Node::drg_node_mut) {
                applied |= drg_node.set_component_widths(key, &widths.widths);
            }
        }
        if !applied {
            debug!(key; "Component widths without matching logic");
        }
    }
}
