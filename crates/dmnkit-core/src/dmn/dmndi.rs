//! DMN diagram interchange (DMNDI).
//!
//! A document may carry several diagrams; each lists shapes and edges that
//! point at model elements through a [`QName`] `dmnElementRef`.

use std::fmt::{self, Display};

use crate::{
    color::Color,
    dmn::RawElement,
    geometry::{Bounds, Point, Size},
};

/// A qualified name such as `include1:_3C7F...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QName {
    pub prefix: Option<String>,
    pub local_part: String,
}

impl QName {
    pub fn new(local_part: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local_part: local_part.into(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            local_part: local_part.into(),
        }
    }

    /// Parses `prefix:local` or `local`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dmnkit_core::dmn::QName;
    ///
    /// let qname = QName::parse("include1:_d1");
    /// assert_eq!(qname.prefix.as_deref(), Some("include1"));
    /// assert_eq!(qname.local_part, "_d1");
    /// assert_eq!(qname.to_string(), "include1:_d1");
    /// ```
    pub fn parse(value: &str) -> Self {
        match value.split_once(':') {
            Some((prefix, local)) => Self::with_prefix(prefix, local),
            None => Self::new(value),
        }
    }
}

impl Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local_part),
            None => write!(f, "{}", self.local_part),
        }
    }
}

/// `dmndi:DMNStyle`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DmnStyle {
    pub id: Option<String>,
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub font_color: Option<Color>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_bold: Option<bool>,
    pub font_italic: Option<bool>,
}

/// `dmndi:DMNLabel`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DmnLabel {
    pub bounds: Option<Bounds>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DmnShape {
    pub id: String,
    pub dmn_element_ref: QName,
    pub bounds: Bounds,
    pub is_collapsed: bool,
    pub style: Option<DmnStyle>,
    pub label: Option<DmnLabel>,
    /// Waypoints of the line splitting a decision service into output and
    /// encapsulated sections.
    pub decision_service_divider_line: Option<Vec<Point>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DmnEdge {
    pub id: String,
    pub dmn_element_ref: QName,
    pub waypoints: Vec<Point>,
    pub source_element: Option<QName>,
    pub target_element: Option<QName>,
    pub style: Option<DmnStyle>,
    pub label: Option<DmnLabel>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagramElement {
    Shape(DmnShape),
    Edge(DmnEdge),
}

impl DiagramElement {
    pub fn id(&self) -> &str {
        match self {
            Self::Shape(shape) => &shape.id,
            Self::Edge(edge) => &edge.id,
        }
    }

    pub fn dmn_element_ref(&self) -> &QName {
        match self {
            Self::Shape(shape) => &shape.dmn_element_ref,
            Self::Edge(edge) => &edge.dmn_element_ref,
        }
    }
}

/// Column widths of an expression editor, `kie:ComponentWidths`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentWidths {
    pub dmn_element_ref: QName,
    pub widths: Vec<f64>,
}

/// The diagram's `extension` container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiagramExtension {
    /// Entries of `kie:ComponentsWidthsExtension`.
    pub components_widths: Vec<ComponentWidths>,
    /// Any other extension content, kept verbatim.
    pub others: Vec<RawElement>,
}

impl DiagramExtension {
    pub fn is_empty(&self) -> bool {
        self.components_widths.is_empty() && self.others.is_empty()
    }
}

/// `dmndi:DMNDiagram`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DmnDiagram {
    pub id: String,
    pub name: String,
    pub size: Option<Size>,
    pub extension: DiagramExtension,
    pub elements: Vec<DiagramElement>,
}

impl DmnDiagram {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn shapes(&self) -> impl Iterator<Item = &DmnShape> {
        self.elements.iter().filter_map(|element| match element {
            DiagramElement::Shape(shape) => Some(shape),
            DiagramElement::Edge(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &DmnEdge> {
        self.elements.iter().filter_map(|element| match element {
            DiagramElement::Edge(edge) => Some(edge),
            DiagramElement::Shape(_) => None,
        })
    }
}

/// The `dmndi:DMNDI` container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dmndi {
    pub diagrams: Vec<DmnDiagram>,
    /// Shared styles declared at DMNDI level.
    pub styles: Vec<DmnStyle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_without_prefix() {
        let qname = QName::parse("_d1");
        assert_eq!(qname.prefix, None);
        assert_eq!(qname.local_part, "_d1");
        assert_eq!(qname.to_string(), "_d1");
    }

    #[test]
    fn test_diagram_shapes_and_edges() {
        let mut diagram = DmnDiagram::new("_diagram", "DRG");
        diagram.elements.push(DiagramElement::Shape(DmnShape {
            id: "dmnshape-_d1".to_string(),
            dmn_element_ref: QName::new("_d1"),
            ..Default::default()
        }));
        diagram.elements.push(DiagramElement::Edge(DmnEdge {
            id: "dmnedge-_r1".to_string(),
            dmn_element_ref: QName::new("_r1"),
            ..Default::default()
        }));

        assert_eq!(diagram.shapes().count(), 1);
        assert_eq!(diagram.edges().count(), 1);
        assert_eq!(diagram.elements[1].id(), "dmnedge-_r1");
        assert_eq!(diagram.elements[0].dmn_element_ref().local_part, "_d1");
    }

    #[test]
    fn test_extension_is_empty() {
        let mut extension = DiagramExtension::default();
        assert!(extension.is_empty());

        extension.components_widths.push(ComponentWidths {
            dmn_element_ref: QName::new("_table"),
            widths: vec![50.0, 100.0],
        });
        assert!(!extension.is_empty());
    }
}
