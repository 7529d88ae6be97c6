//! Serializes the DMN document model to XML.
//!
//! The writer keeps the document's own namespace prefixes so verbatim
//! subtrees (decision logic, extension elements) stay valid, and declares the
//! DMNDI, DC, DI and vendor namespaces only when the document needs them.
//! DMN 1.1 documents are written as DMN 1.2.

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use dmnkit_core::{
    color::Color,
    dmn::{
        Artifact, Association, AuthorityRequirement, Definitions, DiagramElement,
        DiagramExtension, DmnDiagram, DmnEdge, DmnElementReference, DmnLabel, DmnShape, DmnStyle,
        DmnVersion, Dmndi, DrgElement, DrgElementHeader, InformationItem, InformationRequirement,
        ItemDefinition, KnowledgeRequirement, RawElement, RawNode, TextAnnotation,
    },
    geometry::{Bounds, Point},
};

use crate::error::{WriteError, xml_error};

/// DMNDI namespace used by DMN 1.2 documents.
pub const DMNDI_12_NAMESPACE: &str = "http://www.omg.org/spec/DMN/20180521/DMNDI/";
/// DMNDI namespace used by DMN 1.3 documents.
pub const DMNDI_13_NAMESPACE: &str = "https://www.omg.org/spec/DMN/20191111/DMNDI/";
/// Diagram Common namespace (DMN 1.2 and 1.3).
pub const DC_NAMESPACE: &str = "http://www.omg.org/spec/DMN/20180521/DC/";
/// Diagram Interchange namespace (DMN 1.2 and 1.3).
pub const DI_NAMESPACE: &str = "http://www.omg.org/spec/DMN/20180521/DI/";
/// Vendor namespace of the component widths extension.
pub const KIE_NAMESPACE: &str = "http://www.drools.org/kie/dmn/1.2";

type Result<T> = std::result::Result<T, WriteError>;

/// Output settings for [`write_definitions`].
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    indent: usize,
}

impl WriteOptions {
    /// Creates options with the given indentation width; `0` writes everything on one line.
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Writes a document as DMN XML.
///
/// # Errors
///
/// Returns a [`WriteError`] if the XML writer fails.
///
/// # Examples
///
/// ```
/// use dmnkit_core::dmn::{Definitions, DrgElement, DrgElementHeader, InputData};
/// use dmnkit_xml::{WriteOptions, read_definitions, write_definitions};
///
/// let defs = Definitions {
///     name: "loan".to_string(),
///     namespace: "urn:loan".to_string(),
///     drg_elements: vec![DrgElement::InputData(InputData {
///         header: DrgElementHeader::new("_i1", "Age"),
///     })],
///     ..Default::default()
/// };
///
/// let xml = write_definitions(&defs, &WriteOptions::default()).unwrap();
/// let back = read_definitions(&xml).unwrap();
/// assert_eq!(back.drg_elements, defs.drg_elements);
/// ```
pub fn write_definitions(defs: &Definitions, options: &WriteOptions) -> Result<String> {
    let version = match defs.version {
        DmnVersion::V1_1 => DmnVersion::V1_2,
        other => other,
    };
    let (declarations, prefixes) = Prefixes::resolve(defs, version);

    let writer = if options.indent() > 0 {
        Writer::new_with_indent(Vec::new(), b' ', options.indent())
    } else {
        Writer::new(Vec::new())
    };
    let mut out = DocumentWriter { writer, prefixes };

    out.writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    out.definitions(defs, &declarations)?;

    let bytes = out.writer.into_inner();
    Ok(String::from_utf8(bytes)?)
}

/// Prefixes chosen for each namespace the writer emits elements in.
#[derive(Debug, Clone, PartialEq)]
struct Prefixes {
    model: String,
    dmndi: String,
    dc: String,
    di: String,
    kie: String,
}

impl Prefixes {
    fn resolve(defs: &Definitions, version: DmnVersion) -> (Vec<(String, String)>, Self) {
        let mut declarations: Vec<(String, String)> = defs
            .namespaces
            .iter()
            .map(|(prefix, uri)| {
                let uri = match DmnVersion::from_namespace(uri) {
                    Some(DmnVersion::V1_1) => version.namespace().to_string(),
                    _ => uri.clone(),
                };
                (prefix.clone(), uri)
            })
            .collect();

        let model = match declarations.iter().find(|(_, uri)| uri == version.namespace()) {
            Some((prefix, _)) => prefix.clone(),
            None if !declarations.iter().any(|(prefix, _)| prefix.is_empty()) => {
                declarations.push((String::new(), version.namespace().to_string()));
                String::new()
            }
            None => declare(&mut declarations, version.namespace(), "dmn"),
        };

        let dmndi_namespace = match version {
            DmnVersion::V1_3 => DMNDI_13_NAMESPACE,
            DmnVersion::V1_1 | DmnVersion::V1_2 => DMNDI_12_NAMESPACE,
        };
        let mut prefixes = Self {
            model,
            dmndi: "dmndi".to_string(),
            dc: "dc".to_string(),
            di: "di".to_string(),
            kie: "kie".to_string(),
        };

        if let Some(dmndi) = &defs.dmndi {
            prefixes.dmndi = declare(&mut declarations, dmndi_namespace, "dmndi");
            prefixes.dc = declare(&mut declarations, DC_NAMESPACE, "dc");
            prefixes.di = declare(&mut declarations, DI_NAMESPACE, "di");
            let has_widths = dmndi
                .diagrams
                .iter()
                .any(|diagram| !diagram.extension.components_widths.is_empty());
            if has_widths {
                prefixes.kie = declare(&mut declarations, KIE_NAMESPACE, "kie");
            }
        }

        (declarations, prefixes)
    }
}

/// Returns the prefix bound to `uri`, declaring `preferred` (or a numbered variant) if unbound.
fn declare(declarations: &mut Vec<(String, String)>, uri: &str, preferred: &str) -> String {
    if let Some((prefix, _)) = declarations.iter().find(|(_, u)| u == uri) {
        return prefix.clone();
    }
    let mut prefix = preferred.to_string();
    let mut counter = 1;
    while declarations.iter().any(|(p, _)| *p == prefix) {
        prefix = format!("{preferred}{counter}");
        counter += 1;
    }
    declarations.push((prefix.clone(), uri.to_string()));
    prefix
}

fn qualify(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{prefix}:{local}")
    }
}

/// Shortest text that parses back to the same `f64`.
fn number(value: f64) -> String {
    format!("{value}")
}

type Attrs<'a> = Vec<(&'a str, String)>;

struct DocumentWriter {
    writer: Writer<Vec<u8>>,
    prefixes: Prefixes,
}

impl DocumentWriter {
    // ========================================================================
    // Low level events
    // ========================================================================

    fn element(name: &str, attrs: &Attrs<'_>) -> BytesStart<'static> {
        let mut start = BytesStart::new(name.to_string());
        for (key, value) in attrs {
            start.push_attribute((*key, value.as_str()));
        }
        start
    }

    fn start(&mut self, name: &str, attrs: &Attrs<'_>) -> Result<()> {
        self.writer
            .write_event(Event::Start(Self::element(name, attrs)))
            .map_err(xml_error)
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    fn empty(&mut self, name: &str, attrs: &Attrs<'_>) -> Result<()> {
        self.writer
            .write_event(Event::Empty(Self::element(name, attrs)))
            .map_err(xml_error)
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name, &Vec::new())?;
        self.text(text)?;
        self.end(name)
    }

    fn raw(&mut self, raw: &RawElement) -> Result<()> {
        let attrs: Attrs<'_> = raw
            .attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect();
        if raw.children.is_empty() {
            return self.empty(&raw.name, &attrs);
        }
        self.start(&raw.name, &attrs)?;
        for child in &raw.children {
            match child {
                RawNode::Element(element) => self.raw(element)?,
                RawNode::Text(text) => self.text(text)?,
            }
        }
        self.end(&raw.name)
    }

    fn model(&self, local: &str) -> String {
        qualify(&self.prefixes.model, local)
    }

    // ========================================================================
    // Definitions
    // ========================================================================

    fn definitions(&mut self, defs: &Definitions, declarations: &[(String, String)]) -> Result<()> {
        let name = self.model("definitions");
        let namespace_keys: Vec<String> = declarations
            .iter()
            .map(|(prefix, _)| {
                if prefix.is_empty() {
                    "xmlns".to_string()
                } else {
                    format!("xmlns:{prefix}")
                }
            })
            .collect();
        let mut attrs: Attrs<'_> = Vec::new();
        for (key, (_, uri)) in namespace_keys.iter().zip(declarations) {
            attrs.push((key.as_str(), uri.clone()));
        }
        if let Some(id) = &defs.id {
            attrs.push(("id", id.clone()));
        }
        attrs.push(("name", defs.name.clone()));
        attrs.push(("namespace", defs.namespace.clone()));
        push_opt(&mut attrs, "expressionLanguage", &defs.expression_language);
        push_opt(&mut attrs, "typeLanguage", &defs.type_language);
        push_opt(&mut attrs, "exporter", &defs.exporter);
        push_opt(&mut attrs, "exporterVersion", &defs.exporter_version);
        self.start(&name, &attrs)?;

        if let Some(description) = &defs.description {
            self.text_element(&self.model("description"), description)?;
        }
        if let Some(extension) = &defs.extension_elements {
            self.raw(extension)?;
        }
        for import in &defs.imports {
            let mut attrs: Attrs<'_> = vec![("namespace", import.namespace.clone())];
            push_opt(&mut attrs, "locationURI", &import.location_uri);
            attrs.push(("importType", import.import_type.clone()));
            attrs.push(("name", import.name.clone()));
            self.empty(&self.model("import"), &attrs)?;
        }
        for item in defs.item_definitions.iter().filter(|item| !item.read_only) {
            self.item_definition(item, "itemDefinition")?;
        }
        for element in &defs.drg_elements {
            self.drg_element(element)?;
        }
        for artifact in &defs.artifacts {
            match artifact {
                Artifact::TextAnnotation(annotation) => self.text_annotation(annotation)?,
                Artifact::Association(association) => self.association(association)?,
            }
        }
        if let Some(dmndi) = &defs.dmndi {
            self.dmndi(dmndi)?;
        }

        self.end(&name)
    }

    fn item_definition(&mut self, item: &ItemDefinition, tag: &str) -> Result<()> {
        let name = self.model(tag);
        let mut attrs: Attrs<'_> = Vec::new();
        push_opt(&mut attrs, "id", &item.id);
        attrs.push(("name", item.name.clone()));
        push_opt(&mut attrs, "label", &item.label);
        push_opt(&mut attrs, "typeLanguage", &item.type_language);
        attrs.push(("isCollection", item.is_collection.to_string()));

        let has_children = item.type_ref.is_some()
            || item.allowed_values.is_some()
            || !item.item_components.is_empty();
        if !has_children {
            return self.empty(&name, &attrs);
        }
        self.start(&name, &attrs)?;
        if let Some(type_ref) = &item.type_ref {
            self.text_element(&self.model("typeRef"), type_ref)?;
        }
        if let Some(allowed_values) = &item.allowed_values {
            self.raw(allowed_values)?;
        }
        for component in &item.item_components {
            self.item_definition(component, "itemComponent")?;
        }
        self.end(&name)
    }

    // ========================================================================
    // DRG elements
    // ========================================================================

    fn drg_element(&mut self, element: &DrgElement) -> Result<()> {
        let name = self.model(element.tag_name());
        let header = element.header();
        let mut attrs: Attrs<'_> = vec![("id", header.id.clone()), ("name", header.name.clone())];
        push_opt(&mut attrs, "label", &header.label);
        self.start(&name, &attrs)?;
        self.header_children(header)?;

        match element {
            DrgElement::InputData(_) => self.variable(&header.variable)?,
            DrgElement::Decision(decision) => {
                if let Some(question) = &decision.question {
                    self.text_element(&self.model("question"), question)?;
                }
                if let Some(answers) = &decision.allowed_answers {
                    self.text_element(&self.model("allowedAnswers"), answers)?;
                }
                self.variable(&header.variable)?;
                self.information_requirements(&decision.information_requirements)?;
                self.knowledge_requirements(&decision.knowledge_requirements)?;
                self.authority_requirements(&decision.authority_requirements)?;
                if let Some(expression) = &decision.expression {
                    self.raw(expression)?;
                }
            }
            DrgElement::BusinessKnowledgeModel(bkm) => {
                self.variable(&header.variable)?;
                if let Some(logic) = &bkm.encapsulated_logic {
                    self.raw(logic)?;
                }
                self.knowledge_requirements(&bkm.knowledge_requirements)?;
                self.authority_requirements(&bkm.authority_requirements)?;
            }
            DrgElement::KnowledgeSource(source) => {
                self.authority_requirements(&source.authority_requirements)?;
                if let Some(kind) = &source.r#type {
                    self.text_element(&self.model("type"), kind)?;
                }
                if let Some(owner) = &source.owner {
                    self.reference("owner", owner)?;
                }
            }
            DrgElement::DecisionService(service) => {
                self.variable(&header.variable)?;
                self.references("outputDecision", &service.output_decisions)?;
                self.references("encapsulatedDecision", &service.encapsulated_decisions)?;
                self.references("inputDecision", &service.input_decisions)?;
                self.references("inputData", &service.input_data)?;
            }
        }

        self.end(&name)
    }

    fn header_children(&mut self, header: &DrgElementHeader) -> Result<()> {
        if let Some(description) = &header.description {
            self.text_element(&self.model("description"), description)?;
        }
        if let Some(extension) = &header.extension_elements {
            self.raw(extension)?;
        }
        Ok(())
    }

    fn variable(&mut self, variable: &Option<InformationItem>) -> Result<()> {
        let Some(variable) = variable else {
            return Ok(());
        };
        let mut attrs: Attrs<'_> = Vec::new();
        push_opt(&mut attrs, "id", &variable.id);
        attrs.push(("name", variable.name.clone()));
        push_opt(&mut attrs, "typeRef", &variable.type_ref);
        self.empty(&self.model("variable"), &attrs)
    }

    fn reference(&mut self, tag: &str, reference: &DmnElementReference) -> Result<()> {
        self.empty(&self.model(tag), &vec![("href", reference.href.clone())])
    }

    fn references(&mut self, tag: &str, references: &[DmnElementReference]) -> Result<()> {
        for reference in references {
            self.reference(tag, reference)?;
        }
        Ok(())
    }

    fn requirement_start(&mut self, tag: &str, id: &Option<String>) -> Result<String> {
        let name = self.model(tag);
        let mut attrs: Attrs<'_> = Vec::new();
        push_opt(&mut attrs, "id", id);
        self.start(&name, &attrs)?;
        Ok(name)
    }

    fn information_requirements(&mut self, requirements: &[InformationRequirement]) -> Result<()> {
        for requirement in requirements {
            let name = self.requirement_start("informationRequirement", &requirement.id)?;
            if let Some(decision) = &requirement.required_decision {
                self.reference("requiredDecision", decision)?;
            }
            if let Some(input) = &requirement.required_input {
                self.reference("requiredInput", input)?;
            }
            self.end(&name)?;
        }
        Ok(())
    }

    fn knowledge_requirements(&mut self, requirements: &[KnowledgeRequirement]) -> Result<()> {
        for requirement in requirements {
            let name = self.requirement_start("knowledgeRequirement", &requirement.id)?;
            if let Some(knowledge) = &requirement.required_knowledge {
                self.reference("requiredKnowledge", knowledge)?;
            }
            self.end(&name)?;
        }
        Ok(())
    }

    fn authority_requirements(&mut self, requirements: &[AuthorityRequirement]) -> Result<()> {
        for requirement in requirements {
            let name = self.requirement_start("authorityRequirement", &requirement.id)?;
            if let Some(decision) = &requirement.required_decision {
                self.reference("requiredDecision", decision)?;
            }
            if let Some(input) = &requirement.required_input {
                self.reference("requiredInput", input)?;
            }
            if let Some(authority) = &requirement.required_authority {
                self.reference("requiredAuthority", authority)?;
            }
            self.end(&name)?;
        }
        Ok(())
    }

    // ========================================================================
    // Artifacts
    // ========================================================================

    fn text_annotation(&mut self, annotation: &TextAnnotation) -> Result<()> {
        let name = self.model("textAnnotation");
        let mut attrs: Attrs<'_> = vec![("id", annotation.id.clone())];
        push_opt(&mut attrs, "textFormat", &annotation.text_format);
        self.start(&name, &attrs)?;
        if let Some(description) = &annotation.description {
            self.text_element(&self.model("description"), description)?;
        }
        self.text_element(&self.model("text"), &annotation.text)?;
        self.end(&name)
    }

    fn association(&mut self, association: &Association) -> Result<()> {
        let name = self.model("association");
        let attrs: Attrs<'_> = vec![
            ("id", association.id.clone()),
            (
                "associationDirection",
                association.association_direction.to_string(),
            ),
        ];
        self.start(&name, &attrs)?;
        if let Some(description) = &association.description {
            self.text_element(&self.model("description"), description)?;
        }
        self.reference("sourceRef", &association.source_ref)?;
        self.reference("targetRef", &association.target_ref)?;
        self.end(&name)
    }

    // ========================================================================
    // DMNDI
    // ========================================================================

    fn dmndi(&mut self, dmndi: &Dmndi) -> Result<()> {
        let name = qualify(&self.prefixes.dmndi, "DMNDI");
        self.start(&name, &Vec::new())?;
        for diagram in &dmndi.diagrams {
            self.diagram(diagram)?;
        }
        for style in &dmndi.styles {
            self.style(style)?;
        }
        self.end(&name)
    }

    fn diagram(&mut self, diagram: &DmnDiagram) -> Result<()> {
        let name = qualify(&self.prefixes.dmndi, "DMNDiagram");
        let attrs: Attrs<'_> = vec![("id", diagram.id.clone()), ("name", diagram.name.clone())];
        self.start(&name, &attrs)?;

        self.extension(&diagram.extension)?;
        if let Some(size) = diagram.size {
            let attrs: Attrs<'_> = vec![
                ("width", number(size.width())),
                ("height", number(size.height())),
            ];
            self.empty(&qualify(&self.prefixes.dmndi, "Size"), &attrs)?;
        }
        for element in &diagram.elements {
            match element {
                DiagramElement::Shape(shape) => self.shape(shape)?,
                DiagramElement::Edge(edge) => self.edge(edge)?,
            }
        }

        self.end(&name)
    }

    fn extension(&mut self, extension: &DiagramExtension) -> Result<()> {
        if extension.is_empty() {
            return Ok(());
        }
        let name = qualify(&self.prefixes.di, "extension");
        self.start(&name, &Vec::new())?;

        if !extension.components_widths.is_empty() {
            let container = qualify(&self.prefixes.kie, "ComponentsWidthsExtension");
            let entry = qualify(&self.prefixes.kie, "ComponentWidths");
            let width = qualify(&self.prefixes.kie, "width");
            self.start(&container, &Vec::new())?;
            for widths in &extension.components_widths {
                let attrs: Attrs<'_> = vec![("dmnElementRef", widths.dmn_element_ref.to_string())];
                if widths.widths.is_empty() {
                    self.empty(&entry, &attrs)?;
                    continue;
                }
                self.start(&entry, &attrs)?;
                for value in &widths.widths {
                    self.text_element(&width, &number(*value))?;
                }
                self.end(&entry)?;
            }
            self.end(&container)?;
        }
        for other in &extension.others {
            self.raw(other)?;
        }

        self.end(&name)
    }

    fn bounds(&mut self, bounds: Bounds) -> Result<()> {
        let attrs: Attrs<'_> = vec![
            ("x", number(bounds.min_x())),
            ("y", number(bounds.min_y())),
            ("width", number(bounds.width())),
            ("height", number(bounds.height())),
        ];
        self.empty(&qualify(&self.prefixes.dc, "Bounds"), &attrs)
    }

    fn waypoints(&mut self, points: &[Point]) -> Result<()> {
        let name = qualify(&self.prefixes.di, "waypoint");
        for point in points {
            let attrs: Attrs<'_> = vec![("x", number(point.x())), ("y", number(point.y()))];
            self.empty(&name, &attrs)?;
        }
        Ok(())
    }

    fn shape(&mut self, shape: &DmnShape) -> Result<()> {
        let name = qualify(&self.prefixes.dmndi, "DMNShape");
        let attrs: Attrs<'_> = vec![
            ("id", shape.id.clone()),
            ("dmnElementRef", shape.dmn_element_ref.to_string()),
            ("isCollapsed", shape.is_collapsed.to_string()),
        ];
        self.start(&name, &attrs)?;
        if let Some(style) = &shape.style {
            self.style(style)?;
        }
        self.bounds(shape.bounds)?;
        if let Some(label) = &shape.label {
            self.label(label)?;
        }
        if let Some(line) = &shape.decision_service_divider_line {
            let divider = qualify(&self.prefixes.dmndi, "DMNDecisionServiceDividerLine");
            self.start(&divider, &Vec::new())?;
            self.waypoints(line)?;
            self.end(&divider)?;
        }
        self.end(&name)
    }

    fn edge(&mut self, edge: &DmnEdge) -> Result<()> {
        let name = qualify(&self.prefixes.dmndi, "DMNEdge");
        let mut attrs: Attrs<'_> = vec![
            ("id", edge.id.clone()),
            ("dmnElementRef", edge.dmn_element_ref.to_string()),
        ];
        if let Some(source) = &edge.source_element {
            attrs.push(("sourceElement", source.to_string()));
        }
        if let Some(target) = &edge.target_element {
            attrs.push(("targetElement", target.to_string()));
        }
        self.start(&name, &attrs)?;
        if let Some(style) = &edge.style {
            self.style(style)?;
        }
        self.waypoints(&edge.waypoints)?;
        if let Some(label) = &edge.label {
            self.label(label)?;
        }
        self.end(&name)
    }

    fn label(&mut self, label: &DmnLabel) -> Result<()> {
        let name = qualify(&self.prefixes.dmndi, "DMNLabel");
        if label.bounds.is_none() && label.text.is_none() {
            return self.empty(&name, &Vec::new());
        }
        self.start(&name, &Vec::new())?;
        if let Some(bounds) = label.bounds {
            self.bounds(bounds)?;
        }
        if let Some(text) = &label.text {
            self.text_element(&qualify(&self.prefixes.dmndi, "Text"), text)?;
        }
        self.end(&name)
    }

    fn style(&mut self, style: &DmnStyle) -> Result<()> {
        let name = qualify(&self.prefixes.dmndi, "DMNStyle");
        let mut attrs: Attrs<'_> = Vec::new();
        push_opt(&mut attrs, "id", &style.id);
        push_opt(&mut attrs, "fontFamily", &style.font_family);
        if let Some(size) = style.font_size {
            attrs.push(("fontSize", number(size)));
        }
        if let Some(italic) = style.font_italic {
            attrs.push(("fontItalic", italic.to_string()));
        }
        if let Some(bold) = style.font_bold {
            attrs.push(("fontBold", bold.to_string()));
        }

        let colors = [
            ("FillColor", style.fill_color),
            ("StrokeColor", style.stroke_color),
            ("FontColor", style.font_color),
        ];
        if colors.iter().all(|(_, color)| color.is_none()) {
            return self.empty(&name, &attrs);
        }
        self.start(&name, &attrs)?;
        for (tag, color) in colors {
            if let Some(color) = color {
                self.color(tag, color)?;
            }
        }
        self.end(&name)
    }

    fn color(&mut self, tag: &str, color: Color) -> Result<()> {
        let (red, green, blue) = color.to_rgb8();
        let attrs: Attrs<'_> = vec![
            ("red", red.to_string()),
            ("green", green.to_string()),
            ("blue", blue.to_string()),
        ];
        self.empty(&qualify(&self.prefixes.dmndi, tag), &attrs)
    }
}

fn push_opt<'a>(attrs: &mut Attrs<'a>, key: &'a str, value: &Option<String>) {
    if let Some(value) = value {
        attrs.push((key, value.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_definitions;
    use dmnkit_core::dmn::{DMN_11_NAMESPACE, DMN_12_NAMESPACE, InputData};

    fn input(id: &str) -> DrgElement {
        DrgElement::InputData(InputData {
            header: DrgElementHeader::new(id, id),
        })
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(100.0), "100");
        assert_eq!(number(0.5), "0.5");
        assert_eq!(number(-12.25), "-12.25");
    }

    #[test]
    fn test_declare_reuses_and_numbers() {
        let mut declarations = vec![
            ("dc".to_string(), "urn:other".to_string()),
            ("x".to_string(), DC_NAMESPACE.to_string()),
        ];
        assert_eq!(declare(&mut declarations, DC_NAMESPACE, "dc"), "x");
        assert_eq!(declare(&mut declarations, DI_NAMESPACE, "dc"), "dc1");
        assert_eq!(declarations.len(), 3);
    }

    #[test]
    fn test_prefixes_default_model_namespace() {
        let defs = Definitions::default();
        let (declarations, prefixes) = Prefixes::resolve(&defs, DmnVersion::V1_2);

        assert_eq!(prefixes.model, "");
        assert_eq!(declarations, vec![(String::new(), DMN_12_NAMESPACE.to_string())]);
    }

    #[test]
    fn test_prefixes_keep_document_prefix() {
        let defs = Definitions {
            namespaces: vec![
                (String::new(), "urn:model".to_string()),
                ("dmn".to_string(), DMN_11_NAMESPACE.to_string()),
            ],
            version: DmnVersion::V1_1,
            dmndi: Some(Dmndi::default()),
            ..Default::default()
        };
        let (declarations, prefixes) = Prefixes::resolve(&defs, DmnVersion::V1_2);

        assert_eq!(prefixes.model, "dmn");
        assert_eq!(prefixes.dmndi, "dmndi");
        assert!(declarations.contains(&("dmn".to_string(), DMN_12_NAMESPACE.to_string())));
        assert!(!declarations.iter().any(|(_, uri)| uri == DMN_11_NAMESPACE));
        assert!(!declarations.iter().any(|(_, uri)| uri == KIE_NAMESPACE));
    }

    #[test]
    fn test_write_upgrades_dmn_11() {
        let defs = Definitions {
            name: "old".to_string(),
            version: DmnVersion::V1_1,
            namespaces: vec![(String::new(), DMN_11_NAMESPACE.to_string())],
            drg_elements: vec![input("_i1")],
            ..Default::default()
        };

        let xml = write_definitions(&defs, &WriteOptions::default()).unwrap();
        assert!(xml.contains(DMN_12_NAMESPACE));
        assert!(!xml.contains(DMN_11_NAMESPACE));

        let back = read_definitions(&xml).unwrap();
        assert_eq!(back.version, DmnVersion::V1_2);
        assert_eq!(back.drg_elements, defs.drg_elements);
    }

    #[test]
    fn test_write_without_indent_is_single_line() {
        let defs = Definitions {
            drg_elements: vec![input("_i1")],
            ..Default::default()
        };
        let xml = write_definitions(&defs, &WriteOptions::new(0)).unwrap();
        assert!(!xml.contains('\n'));
    }

    #[test]
    fn test_write_escapes_text() {
        let defs = Definitions {
            name: "a < b & c".to_string(),
            artifacts: vec![Artifact::TextAnnotation(TextAnnotation {
                id: "_t".to_string(),
                text: "x > \"y\"".to_string(),
                ..Default::default()
            })],
            ..Default::default()
        };
        let xml = write_definitions(&defs, &WriteOptions::default()).unwrap();
        let back = read_definitions(&xml).unwrap();

        assert_eq!(back.name, "a < b & c");
        assert_eq!(back.text_annotations().next().map(|t| t.text.as_str()), Some("x > \"y\""));
    }

    #[test]
    fn test_read_only_item_definitions_are_not_written() {
        let defs = Definitions {
            item_definitions: vec![
                ItemDefinition {
                    name: "Local".to_string(),
                    ..Default::default()
                },
                ItemDefinition {
                    name: "Imported".to_string(),
                    read_only: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let xml = write_definitions(&defs, &WriteOptions::default()).unwrap();

        assert!(xml.contains("Local"));
        assert!(!xml.contains("Imported"));
    }
}
