//! Pairing of diagram shapes with the elements they show.

use log::{debug, warn};

use dmnkit_core::{
    dmn::{Definitions, DmnShape, DrgElement, TextAnnotation},
    identifier::Id,
};

use super::imports::ImportedModels;
use crate::structure::DmnElement;

/// The element a node entry stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryElement {
    Drg(DrgElement),
    TextAnnotation(TextAnnotation),
}

impl EntryElement {
    pub fn id(&self) -> &str {
        match self {
            Self::Drg(element) => element.id(),
            Self::TextAnnotation(annotation) => &annotation.id,
        }
    }

    pub fn to_dmn_element(&self) -> DmnElement {
        match self {
            Self::Drg(element) => DmnElement::from(element.clone()),
            Self::TextAnnotation(annotation) => DmnElement::from(annotation.clone()),
        }
    }
}

/// One shape of one diagram, resolved to its element.
///
/// Entries only live while the graph is assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEntry {
    diagram_id: String,
    element: EntryElement,
    shape: DmnShape,
    is_included: bool,
    node_id: Option<Id>,
}

impl NodeEntry {
    pub fn new(
        diagram_id: impl Into<String>,
        element: EntryElement,
        shape: DmnShape,
        is_included: bool,
    ) -> Self {
        Self {
            diagram_id: diagram_id.into(),
            element,
            shape,
            is_included,
            node_id: None,
        }
    }

    pub fn diagram_id(&self) -> &str {
        &self.diagram_id
    }

    pub fn element(&self) -> &EntryElement {
        &self.element
    }

    pub fn element_id(&self) -> &str {
        self.element.id()
    }

    pub fn shape(&self) -> &DmnShape {
        &self.shape
    }

    /// True when the element comes from an imported model.
    pub fn is_included(&self) -> bool {
        self.is_included
    }

    /// The graph node created for this entry, once there is one.
    pub fn node_id(&self) -> Option<Id> {
        self.node_id
    }

    pub fn set_node_id(&mut self, node_id: Id) {
        self.node_id = Some(node_id);
    }
}

/// Builds one [`NodeEntry`] per resolvable shape.
pub struct NodeEntriesBuilder<'a> {
    definitions: &'a Definitions,
    imported: Vec<DrgElement>,
}

impl<'a> NodeEntriesBuilder<'a> {
    pub fn new(definitions: &'a Definitions, imports: &ImportedModels) -> Self {
        Self {
            definitions,
            imported: imports.drg_elements(),
        }
    }

    /// Walks every shape of every diagram in document order.
    ///
    /// A shape resolves against local DRG elements first, then imported DRG
    /// elements, then text annotations. Shapes that resolve to nothing are
    /// skipped.
    pub fn make_entries(&self) -> Vec<NodeEntry> {
        let Some(dmndi) = self.definitions.dmndi.as_ref() else {
            return Vec::new();
        };

        let mut entries = Vec::new();
        for diagram in &dmndi.diagrams {
            for shape in diagram.shapes() {
                match self.resolve(shape) {
                    Some((element, is_included)) => {
                        entries.push(NodeEntry::new(
                            &diagram.id,
                            element,
                            shape.clone(),
                            is_included,
                        ));
                    }
                    None => {
                        warn!(
                            diagram_id = diagram.id.as_str(),
                            shape_id = shape.id.as_str(),
                            element_ref = shape.dmn_element_ref.local_part.as_str();
                            "Skipping shape without element"
                        );
                    }
                }
            }
        }

        debug!(entries_count = entries.len(); "Node entries built");
        entries
    }

    fn resolve(&self, shape: &DmnShape) -> Option<(EntryElement, bool)> {
        let reference = shape.dmn_element_ref.local_part.as_str();

        let local = &self.definitions.drg_elements;
        if let Some(element) = find_by_ref(local, reference, DrgElement::id) {
            return Some((EntryElement::Drg(element.clone()), false));
        }
        if let Some(element) = find_by_ref(&self.imported, reference, DrgElement::id) {
            return Some((EntryElement::Drg(element.clone()), true));
        }

        let annotations: Vec<&TextAnnotation> = self.definitions.text_annotations().collect();
        find_by_ref(&annotations, reference, |annotation| annotation.id.as_str()).map(|annotation| {
            let annotation = TextAnnotation::clone(annotation);
            (EntryElement::TextAnnotation(annotation), false)
        })
    }
}

/// Finds the element a shape reference points at.
///
/// An exact id match wins; otherwise the first element whose id ends the
/// reference, which covers prefixed references such as `include:_id`.
fn find_by_ref<'e, T>(
    elements: &'e [T],
    reference: &str,
    id: impl Fn(&T) -> &str,
) -> Option<&'e T> {
    elements
        .iter()
        .find(|element| id(element) == reference)
        .or_else(|| {
            elements.iter().find(|element| {
                let element_id = id(element);
                !element_id.is_empty() && reference.ends_with(element_id)
            })
        })
}
