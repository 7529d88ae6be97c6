//! Node definitions: what a graph node stands for in the DMN model.

use indexmap::IndexMap;

use dmnkit_core::dmn::{
    BusinessKnowledgeModel, Decision, DecisionService, Definitions, DmnLabel, DmnStyle,
    DrgElement, InputData, KnowledgeSource, QName, RawElement, TextAnnotation,
};

/// The definition held by the diagram root node.
///
/// Keeps the document header (namespaces, imports, item definitions and the
/// diagram headers) without DRG elements or artifacts, which live on the
/// nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct DmnDiagramRoot {
    definitions: Definitions,
}

impl DmnDiagramRoot {
    pub fn new(definitions: &Definitions) -> Self {
        Self {
            definitions: definitions.header(),
        }
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn definitions_mut(&mut self) -> &mut Definitions {
        &mut self.definitions
    }
}

/// The DMN element kinds a graph node can represent.
#[derive(Debug, Clone, PartialEq)]
pub enum DmnElement {
    InputData(InputData),
    Decision(Decision),
    BusinessKnowledgeModel(BusinessKnowledgeModel),
    KnowledgeSource(KnowledgeSource),
    DecisionService(DecisionService),
    TextAnnotation(TextAnnotation),
}

impl DmnElement {
    pub fn id(&self) -> &str {
        match self {
            Self::InputData(e) => &e.header.id,
            Self::Decision(e) => &e.header.id,
            Self::BusinessKnowledgeModel(e) => &e.header.id,
            Self::KnowledgeSource(e) => &e.header.id,
            Self::DecisionService(e) => &e.header.id,
            Self::TextAnnotation(e) => &e.id,
        }
    }

    /// The element name; text annotations have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::InputData(e) => Some(&e.header.name),
            Self::Decision(e) => Some(&e.header.name),
            Self::BusinessKnowledgeModel(e) => Some(&e.header.name),
            Self::KnowledgeSource(e) => Some(&e.header.name),
            Self::DecisionService(e) => Some(&e.header.name),
            Self::TextAnnotation(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::InputData(_) => "InputData",
            Self::Decision(_) => "Decision",
            Self::BusinessKnowledgeModel(_) => "BusinessKnowledgeModel",
            Self::KnowledgeSource(_) => "KnowledgeSource",
            Self::DecisionService(_) => "DecisionService",
            Self::TextAnnotation(_) => "TextAnnotation",
        }
    }

    /// Decision logic that component widths are attached to.
    pub fn logic(&self) -> Option<&RawElement> {
        match self {
            Self::Decision(e) => e.expression.as_ref(),
            Self::BusinessKnowledgeModel(e) => e.encapsulated_logic.as_ref(),
            Self::InputData(_)
            | Self::KnowledgeSource(_)
            | Self::DecisionService(_)
            | Self::TextAnnotation(_) => None,
        }
    }

    /// Returns a copy without relations that the graph carries as edges.
    ///
    /// Requirements and decision service membership are rebuilt from the
    /// edges when the graph is marshalled.
    pub fn without_relations(&self) -> Self {
        let mut element = self.clone();
        match &mut element {
            Self::Decision(e) => {
                e.information_requirements.clear();
                e.knowledge_requirements.clear();
                e.authority_requirements.clear();
            }
            Self::BusinessKnowledgeModel(e) => {
                e.knowledge_requirements.clear();
                e.authority_requirements.clear();
            }
            Self::KnowledgeSource(e) => e.authority_requirements.clear(),
            Self::DecisionService(e) => {
                e.output_decisions.clear();
                e.encapsulated_decisions.clear();
                e.input_decisions.clear();
                e.input_data.clear();
            }
            Self::InputData(_) | Self::TextAnnotation(_) => {}
        }
        element
    }
}

impl From<DrgElement> for DmnElement {
    fn from(element: DrgElement) -> Self {
        match element {
            DrgElement::InputData(e) => Self::InputData(e),
            DrgElement::Decision(e) => Self::Decision(e),
            DrgElement::BusinessKnowledgeModel(e) => Self::BusinessKnowledgeModel(e),
            DrgElement::KnowledgeSource(e) => Self::KnowledgeSource(e),
            DrgElement::DecisionService(e) => Self::DecisionService(e),
        }
    }
}

impl From<TextAnnotation> for DmnElement {
    fn from(annotation: TextAnnotation) -> Self {
        Self::TextAnnotation(annotation)
    }
}

/// A DRG element or text annotation placed on a diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct DrgNode {
    element: DmnElement,
    dmn_diagram_id: String,
    allow_only_visual_change: bool,
    dmn_element_ref: Option<QName>,
    style: Option<DmnStyle>,
    label: Option<DmnLabel>,
    is_collapsed: bool,
    divider_line_y: Option<f64>,
    component_widths: IndexMap<String, Vec<f64>>,
}

impl DrgNode {
    /// Creates a node for `element` shown on the diagram `dmn_diagram_id`.
    ///
    /// Every id inside the element's decision logic gets an empty
    /// component-width slot.
    pub fn new(element: DmnElement, dmn_diagram_id: impl Into<String>) -> Self {
        let component_widths = element
            .logic()
            .map(|logic| {
                logic
                    .contained_ids()
                    .into_iter()
                    .map(|id| (id.to_string(), Vec::new()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            element,
            dmn_diagram_id: dmn_diagram_id.into(),
            allow_only_visual_change: false,
            dmn_element_ref: None,
            style: None,
            label: None,
            is_collapsed: false,
            divider_line_y: None,
            component_widths,
        }
    }

    pub fn with_allow_only_visual_change(mut self, allow: bool) -> Self {
        self.allow_only_visual_change = allow;
        self
    }

    /// Keeps the shape reference of an imported element, prefix included.
    pub fn with_dmn_element_ref(mut self, dmn_element_ref: Option<QName>) -> Self {
        self.dmn_element_ref = dmn_element_ref;
        self
    }

    pub fn with_style(mut self, style: Option<DmnStyle>) -> Self {
        self.style = style;
        self
    }

    pub fn with_label(mut self, label: Option<DmnLabel>) -> Self {
        self.label = label;
        self
    }

    pub fn with_collapsed(mut self, is_collapsed: bool) -> Self {
        self.is_collapsed = is_collapsed;
        self
    }

    /// Sets the divider line offset, relative to the top of the node.
    pub fn with_divider_line_y(mut self, divider_line_y: Option<f64>) -> Self {
        self.divider_line_y = divider_line_y;
        self
    }

    pub fn element(&self) -> &DmnElement {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut DmnElement {
        &mut self.element
    }

    pub fn dmn_diagram_id(&self) -> &str {
        &self.dmn_diagram_id
    }

    /// True for elements owned by an imported model: only their shape may change.
    pub fn allow_only_visual_change(&self) -> bool {
        self.allow_only_visual_change
    }

    /// The reference a shape of this node points at.
    ///
    /// Imported elements keep the qualified reference they were read with.
    pub fn dmn_element_ref(&self) -> QName {
        self.dmn_element_ref
            .clone()
            .unwrap_or_else(|| QName::new(self.element.id()))
    }

    pub fn style(&self) -> Option<&DmnStyle> {
        self.style.as_ref()
    }

    pub fn label(&self) -> Option<&DmnLabel> {
        self.label.as_ref()
    }

    pub fn is_collapsed(&self) -> bool {
        self.is_collapsed
    }

    pub fn divider_line_y(&self) -> Option<f64> {
        self.divider_line_y
    }

    /// Column widths keyed by the id of an expression inside the decision logic.
    pub fn component_widths(&self) -> &IndexMap<String, Vec<f64>> {
        &self.component_widths
    }

    /// Replaces the widths for `expression_id` if the logic contains it.
    ///
    /// Returns `false` when the id is not part of this node's logic.
    pub fn set_component_widths(&mut self, expression_id: &str, widths: &[f64]) -> bool {
        match self.component_widths.get_mut(expression_id) {
            Some(current) => {
                current.clear();
                current.extend_from_slice(widths);
                true
            }
            None => false,
        }
    }
}

/// What a graph node stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeDefinition {
    DiagramRoot(DmnDiagramRoot),
    Element(DrgNode),
}

impl NodeDefinition {
    pub fn as_diagram_root(&self) -> Option<&DmnDiagramRoot> {
        match self {
            Self::DiagramRoot(root) => Some(root),
            Self::Element(_) => None,
        }
    }

    pub fn as_diagram_root_mut(&mut self) -> Option<&mut DmnDiagramRoot> {
        match self {
            Self::DiagramRoot(root) => Some(root),
            Self::Element(_) => None,
        }
    }

    pub fn as_drg_node(&self) -> Option<&DrgNode> {
        match self {
            Self::Element(node) => Some(node),
            Self::DiagramRoot(_) => None,
        }
    }

    pub fn as_drg_node_mut(&mut self) -> Option<&mut DrgNode> {
        match self {
            Self::Element(node) => Some(node),
            Self::DiagramRoot(_) => None,
        }
    }

    pub fn is_decision_service(&self) -> bool {
        matches!(
            self,
            Self::Element(DrgNode {
                element: DmnElement::DecisionService(_),
                ..
            })
        )
    }
}
