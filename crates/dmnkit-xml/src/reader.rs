//! Maps an XML element tree onto the DMN document model.
//!
//! Elements are matched by local name so documents using any prefix for the
//! DMN, DMNDI, DC, DI and vendor namespaces are accepted. Unknown elements are
//! skipped. Recoverable problems (bad numbers, missing ids) are collected so a
//! single [`ParseError`] reports all of them.

use log::{debug, trace};

use dmnkit_core::{
    color::Color,
    dmn::{
        Artifact, Association, AssociationDirection, AuthorityRequirement,
        BusinessKnowledgeModel, ComponentWidths, Decision, DecisionService, Definitions,
        DiagramElement, DiagramExtension, DmnDiagram, DmnEdge, DmnElementReference, DmnLabel,
        DmnShape, DmnStyle, DmnVersion, Dmndi, DrgElement, DrgElementHeader, Import,
        InformationItem, InformationRequirement, InputData, ItemDefinition, KnowledgeRequirement,
        KnowledgeSource, QName, TextAnnotation,
    },
    geometry::{Bounds, Point, Size},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    tree::{XmlElement, parse_tree},
};

/// Local names of the expression kinds a decision may hold as its logic.
const EXPRESSION_KINDS: &[&str] = &[
    "literalExpression",
    "decisionTable",
    "context",
    "invocation",
    "functionDefinition",
    "relation",
    "list",
    "conditional",
    "filter",
    "for",
    "every",
    "some",
];

/// Reads a DMN 1.1, 1.2 or 1.3 document.
///
/// # Errors
///
/// Returns a [`ParseError`] holding every diagnostic found: malformed XML,
/// a root that is not `definitions`, missing required attributes and
/// attribute values that are not valid numbers, booleans or colors.
///
/// # Examples
///
/// ```
/// let xml = r##"<definitions xmlns="http://www.omg.org/spec/DMN/20180521/MODEL/"
///                            id="_defs" name="loan" namespace="urn:loan">
///     <inputData id="_i1" name="Age"/>
///     <decision id="_d1" name="Eligible">
///         <informationRequirement id="_r1">
///             <requiredInput href="#_i1"/>
///         </informationRequirement>
///     </decision>
/// </definitions>"##;
///
/// let defs = dmnkit_xml::read_definitions(xml).unwrap();
/// assert_eq!(defs.drg_elements.len(), 2);
/// ```
pub fn read_definitions(xml: &str) -> Result<Definitions, ParseError> {
    let root = parse_tree(xml)?;
    let mut reader = DocumentReader::default();
    let definitions = reader.definitions(&root);
    reader.collector.finish()?;
    debug!(
        drg_elements = definitions.drg_elements.len(),
        artifacts = definitions.artifacts.len(),
        version:% = definitions.version;
        "DMN document read"
    );
    Ok(definitions)
}

#[derive(Default)]
struct DocumentReader {
    collector: DiagnosticCollector,
}

impl DocumentReader {
    // ========================================================================
    // Attribute helpers
    // ========================================================================

    fn required_attr(&mut self, element: &XmlElement, name: &str) -> String {
        match element.attr(name) {
            Some(value) => value.to_string(),
            None => {
                self.collector.emit(
                    Diagnostic::error(format!(
                        "`{}` is missing attribute `{name}`",
                        element.name
                    ))
                    .with_code(ErrorCode::E101)
                    .with_label(element.span, format!("`{name}` expected here")),
                );
                String::new()
            }
        }
    }

    fn number_attr(&mut self, element: &XmlElement, name: &str) -> Option<f64> {
        let value = element.attr(name)?;
        match value.trim().parse::<f64>() {
            Ok(number) => Some(number),
            Err(_) => {
                self.collector.emit(
                    Diagnostic::error(format!(
                        "`{}` attribute `{name}` is not a number",
                        element.name
                    ))
                    .with_code(ErrorCode::E200)
                    .with_label(element.span, format!("invalid value `{value}`"))
                    .with_help("use a plain decimal such as `100.0`"),
                );
                None
            }
        }
    }

    fn required_number_attr(&mut self, element: &XmlElement, name: &str) -> f64 {
        if element.attr(name).is_none() {
            self.required_attr(element, name);
            return 0.0;
        }
        self.number_attr(element, name).unwrap_or_default()
    }

    fn bool_attr(&mut self, element: &XmlElement, name: &str) -> Option<bool> {
        let value = element.attr(name)?;
        match value.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => {
                self.collector.emit(
                    Diagnostic::error(format!(
                        "`{}` attribute `{name}` is not a boolean",
                        element.name
                    ))
                    .with_code(ErrorCode::E201)
                    .with_label(element.span, format!("invalid value `{value}`"))
                    .with_help("use `true` or `false`"),
                );
                None
            }
        }
    }

    fn href(&mut self, element: &XmlElement) -> DmnElementReference {
        DmnElementReference::new(self.required_attr(element, "href"))
    }

    fn child_href(&mut self, element: &XmlElement, local: &str) -> Option<DmnElementReference> {
        let child = element.child(local)?;
        Some(self.href(child))
    }

    fn hrefs(&mut self, element: &XmlElement, local: &str) -> Vec<DmnElementReference> {
        element
            .children_named(local)
            .map(|child| self.href(child))
            .collect()
    }

    // ========================================================================
    // Definitions
    // ========================================================================

    fn definitions(&mut self, root: &XmlElement) -> Definitions {
        let mut defs = Definitions::default();
        if root.local_name() != "definitions" {
            self.collector.emit(
                Diagnostic::error(format!(
                    "document root is `{}`, expected `definitions`",
                    root.name
                ))
                .with_code(ErrorCode::E100)
                .with_label(root.span, "unexpected root")
                .with_help("DMN files start with a `definitions` element"),
            );
            return defs;
        }

        defs.namespaces = root
            .attributes
            .iter()
            .filter_map(|(key, value)| {
                if key == "xmlns" {
                    Some((String::new(), value.clone()))
                } else {
                    key.strip_prefix("xmlns:")
                        .map(|prefix| (prefix.to_string(), value.clone()))
                }
            })
            .collect();

        let model_namespace = defs
            .namespace_uri(root.prefix())
            .unwrap_or_default()
            .to_string();
        defs.version = match DmnVersion::from_namespace(&model_namespace) {
            Some(version) => version,
            None => {
                self.collector.emit(
                    Diagnostic::warning(format!(
                        "unknown DMN model namespace `{model_namespace}`, reading as DMN {}",
                        DmnVersion::default()
                    ))
                    .with_label(root.span, "namespace declared here"),
                );
                DmnVersion::default()
            }
        };

        defs.id = root.attr("id").map(str::to_string);
        defs.name = root.attr("name").unwrap_or_default().to_string();
        defs.namespace = root.attr("namespace").unwrap_or_default().to_string();
        defs.expression_language = root.attr("expressionLanguage").map(str::to_string);
        defs.type_language = root.attr("typeLanguage").map(str::to_string);
        defs.exporter = root.attr("exporter").map(str::to_string);
        defs.exporter_version = root.attr("exporterVersion").map(str::to_string);

        for child in root.child_elements() {
            match child.local_name() {
                "description" => defs.description = Some(child.text()),
                "extensionElements" => defs.extension_elements = Some(child.to_raw()),
                "import" => defs.imports.push(self.import(child)),
                "itemDefinition" => defs.item_definitions.push(self.item_definition(child)),
                "inputData" => defs.drg_elements.push(DrgElement::InputData(InputData {
                    header: self.header(child),
                })),
                "decision" => defs
                    .drg_elements
                    .push(DrgElement::Decision(self.decision(child))),
                "businessKnowledgeModel" => defs
                    .drg_elements
                    .push(DrgElement::BusinessKnowledgeModel(self.bkm(child))),
                "knowledgeSource" => defs
                    .drg_elements
                    .push(DrgElement::KnowledgeSource(self.knowledge_source(child))),
                "decisionService" => defs
                    .drg_elements
                    .push(DrgElement::DecisionService(self.decision_service(child))),
                "textAnnotation" => defs
                    .artifacts
                    .push(Artifact::TextAnnotation(self.text_annotation(child))),
                "association" => defs
                    .artifacts
                    .push(Artifact::Association(self.association(child))),
                "DMNDI" => defs.dmndi = Some(self.dmndi(child)),
                other => debug!(element = other; "Skipping unsupported definitions child"),
            }
        }

        defs
    }

    fn import(&mut self, element: &XmlElement) -> Import {
        Import {
            namespace: self.required_attr(element, "namespace"),
            location_uri: element.attr("locationURI").map(str::to_string),
            import_type: element.attr("importType").unwrap_or_default().to_string(),
            name: element.attr("name").unwrap_or_default().to_string(),
        }
    }

    fn item_definition(&mut self, element: &XmlElement) -> ItemDefinition {
        ItemDefinition {
            id: element.attr("id").map(str::to_string),
            name: element.attr("name").unwrap_or_default().to_string(),
            label: element.attr("label").map(str::to_string),
            type_ref: element.child_text("typeRef"),
            type_language: element.attr("typeLanguage").map(str::to_string),
            is_collection: self.bool_attr(element, "isCollection").unwrap_or(false),
            allowed_values: element.child("allowedValues").map(XmlElement::to_raw),
            item_components: element
                .children_named("itemComponent")
                .map(|component| self.item_definition(component))
                .collect(),
            read_only: false,
        }
    }

    // ========================================================================
    // DRG elements
    // ========================================================================

    fn header(&mut self, element: &XmlElement) -> DrgElementHeader {
        DrgElementHeader {
            id: self.required_attr(element, "id"),
            name: element.attr("name").unwrap_or_default().to_string(),
            label: element.attr("label").map(str::to_string),
            description: element.child_text("description"),
            extension_elements: element.child("extensionElements").map(XmlElement::to_raw),
            variable: element.child("variable").map(|variable| InformationItem {
                id: variable.attr("id").map(str::to_string),
                name: variable.attr("name").unwrap_or_default().to_string(),
                type_ref: variable.attr("typeRef").map(str::to_string),
            }),
        }
    }

    fn information_requirements(&mut self, element: &XmlElement) -> Vec<InformationRequirement> {
        element
            .children_named("informationRequirement")
            .map(|requirement| {
                let parsed = InformationRequirement {
                    id: requirement.attr("id").map(str::to_string),
                    required_decision: self.child_href(requirement, "requiredDecision"),
                    required_input: self.child_href(requirement, "requiredInput"),
                };
                if parsed.required().is_none() {
                    self.missing_reference(
                        element,
                        requirement,
                        "requiredDecision` or `requiredInput",
                    );
                }
                parsed
            })
            .collect()
    }

    fn knowledge_requirements(&mut self, element: &XmlElement) -> Vec<KnowledgeRequirement> {
        element
            .children_named("knowledgeRequirement")
            .map(|requirement| {
                let required_knowledge = self.child_href(requirement, "requiredKnowledge");
                if required_knowledge.is_none() {
                    self.missing_reference(element, requirement, "requiredKnowledge");
                }
                KnowledgeRequirement {
                    id: requirement.attr("id").map(str::to_string),
                    required_knowledge,
                }
            })
            .collect()
    }

    fn authority_requirements(&mut self, element: &XmlElement) -> Vec<AuthorityRequirement> {
        element
            .children_named("authorityRequirement")
            .map(|requirement| {
                let parsed = AuthorityRequirement {
                    id: requirement.attr("id").map(str::to_string),
                    required_decision: self.child_href(requirement, "requiredDecision"),
                    required_input: self.child_href(requirement, "requiredInput"),
                    required_authority: self.child_href(requirement, "requiredAuthority"),
                };
                if parsed.required().is_none() {
                    self.missing_reference(
                        element,
                        requirement,
                        "requiredDecision`, `requiredInput` or `requiredAuthority",
                    );
                }
                parsed
            })
            .collect()
    }

    fn missing_reference(
        &mut self,
        owner: &XmlElement,
        requirement: &XmlElement,
        expected: &str,
    ) {
        self.collector.emit(
            Diagnostic::error(format!("`{}` references nothing", requirement.name))
                .with_code(ErrorCode::E102)
                .with_label(requirement.span, format!("expected a `{expected}` child"))
                .with_secondary_label(
                    owner.span,
                    format!("required by `{}`", owner.attr("id").unwrap_or_default()),
                ),
        );
    }

    fn decision(&mut self, element: &XmlElement) -> Decision {
        Decision {
            header: self.header(element),
            question: element.child_text("question"),
            allowed_answers: element.child_text("allowedAnswers"),
            information_requirements: self.information_requirements(element),
            knowledge_requirements: self.knowledge_requirements(element),
            authority_requirements: self.authority_requirements(element),
            expression: element
                .child_elements()
                .find(|child| EXPRESSION_KINDS.contains(&child.local_name()))
                .map(XmlElement::to_raw),
        }
    }

    fn bkm(&mut self, element: &XmlElement) -> BusinessKnowledgeModel {
        BusinessKnowledgeModel {
            header: self.header(element),
            encapsulated_logic: element.child("encapsulatedLogic").map(XmlElement::to_raw),
            knowledge_requirements: self.knowledge_requirements(element),
            authority_requirements: self.authority_requirements(element),
        }
    }

    fn knowledge_source(&mut self, element: &XmlElement) -> KnowledgeSource {
        KnowledgeSource {
            header: self.header(element),
            authority_requirements: self.authority_requirements(element),
            r#type: element.child_text("type"),
            owner: self.child_href(element, "owner"),
        }
    }

    fn decision_service(&mut self, element: &XmlElement) -> DecisionService {
        DecisionService {
            header: self.header(element),
            output_decisions: self.hrefs(element, "outputDecision"),
            encapsulated_decisions: self.hrefs(element, "encapsulatedDecision"),
            input_decisions: self.hrefs(element, "inputDecision"),
            input_data: self.hrefs(element, "inputData"),
        }
    }

    // ========================================================================
    // Artifacts
    // ========================================================================

    fn text_annotation(&mut self, element: &XmlElement) -> TextAnnotation {
        TextAnnotation {
            id: self.required_attr(element, "id"),
            text: element.child_text("text").unwrap_or_default(),
            text_format: element.attr("textFormat").map(str::to_string),
            description: element.child_text("description"),
        }
    }

    fn association(&mut self, element: &XmlElement) -> Association {
        let association_direction = element
            .attr("associationDirection")
            .and_then(|value| value.parse().ok())
            .unwrap_or(AssociationDirection::None);
        let source_ref = self.child_href(element, "sourceRef");
        let target_ref = self.child_href(element, "targetRef");
        if source_ref.is_none() || target_ref.is_none() {
            self.missing_reference(element, "sourceRef` and `targetRef");
        }
        Association {
            id: self.required_attr(element, "id"),
            source_ref: source_ref.unwrap_or_default(),
            target_ref: target_ref.unwrap_or_default(),
            association_direction,
            description: element.child_text("description"),
        }
    }

    // ========================================================================
    // DMNDI
    // ========================================================================

    fn dmndi(&mut self, element: &XmlElement) -> Dmndi {
        let mut dmndi = Dmndi::default();
        for child in element.child_elements() {
            match child.local_name() {
                "DMNDiagram" => dmndi.diagrams.push(self.diagram(child)),
                "DMNStyle" => dmndi.styles.push(self.style(child)),
                other => debug!(element = other; "Skipping unsupported DMNDI child"),
            }
        }
        dmndi
    }

    fn diagram(&mut self, element: &XmlElement) -> DmnDiagram {
        let mut diagram = DmnDiagram::new(
            element.attr("id").unwrap_or_default(),
            element.attr("name").unwrap_or_default(),
        );
        for child in element.child_elements() {
            match child.local_name() {
                "Size" => {
                    diagram.size = Some(Size::new(
                        self.required_number_attr(child, "width"),
                        self.required_number_attr(child, "height"),
                    ));
                }
                "extension" => diagram.extension = self.extension(child),
                "DMNShape" => diagram
                    .elements
                    .push(DiagramElement::Shape(self.shape(child, element))),
                "DMNEdge" => diagram.elements.push(DiagramElement::Edge(self.edge(child))),
                other => debug!(element = other; "Skipping unsupported DMNDiagram child"),
            }
        }
        trace!(diagram_id = diagram.id.as_str(), elements = diagram.elements.len(); "Read diagram");
        diagram
    }

    fn extension(&mut self, element: &XmlElement) -> DiagramExtension {
        let mut extension = DiagramExtension::default();
        for child in element.child_elements() {
            if child.local_name() != "ComponentsWidthsExtension" {
                extension.others.push(child.to_raw());
                continue;
            }
            for widths in child.children_named("ComponentWidths") {
                let dmn_element_ref = QName::parse(&self.required_attr(widths, "dmnElementRef"));
                let values = widths
                    .children_named("width")
                    .filter_map(|width| self.width_value(width))
                    .collect();
                extension.components_widths.push(ComponentWidths {
                    dmn_element_ref,
                    widths: values,
                });
            }
        }
        extension
    }

    fn width_value(&mut self, element: &XmlElement) -> Option<f64> {
        let text = element.text();
        match text.trim().parse::<f64>() {
            Ok(width) => Some(width),
            Err(_) => {
                self.collector.emit(
                    Diagnostic::error("component width is not a number")
                        .with_code(ErrorCode::E200)
                        .with_label(element.span, format!("invalid value `{text}`")),
                );
                None
            }
        }
    }

    fn bounds(&mut self, element: &XmlElement) -> Bounds {
        let x = self.required_number_attr(element, "x");
        let y = self.required_number_attr(element, "y");
        let width = self.required_number_attr(element, "width");
        let height = self.required_number_attr(element, "height");
        Bounds::new_from_top_left(Point::new(x, y), Size::new(width, height))
    }

    fn waypoints(&mut self, element: &XmlElement) -> Vec<Point> {
        element
            .children_named("waypoint")
            .map(|waypoint| {
                Point::new(
                    self.required_number_attr(waypoint, "x"),
                    self.required_number_attr(waypoint, "y"),
                )
            })
            .collect()
    }

    fn shape(&mut self, element: &XmlElement, diagram: &XmlElement) -> DmnShape {
        let dmn_element_ref = QName::parse(&self.required_attr(element, "dmnElementRef"));
        let bounds = match element.child("Bounds") {
            Some(bounds) => self.bounds(bounds),
            None => {
                self.collector.emit(
                    Diagnostic::error(format!(
                        "shape for `{dmn_element_ref}` has no `dc:Bounds`"
                    ))
                    .with_code(ErrorCode::E102)
                    .with_label(element.span, "shape declared here")
                    .with_secondary_label(
                        diagram.span,
                        format!("in diagram `{}`", diagram.attr("id").unwrap_or_default()),
                    ),
                );
                Bounds::default()
            }
        };
        DmnShape {
            id: element.attr("id").unwrap_or_default().to_string(),
            dmn_element_ref,
            bounds,
            is_collapsed: self.bool_attr(element, "isCollapsed").unwrap_or(false),
            style: element.child("DMNStyle").map(|style| self.style(style)),
            label: element.child("DMNLabel").map(|label| self.label(label)),
            decision_service_divider_line: element
                .child("DMNDecisionServiceDividerLine")
                .map(|line| self.waypoints(line)),
        }
    }

    fn edge(&mut self, element: &XmlElement) -> DmnEdge {
        DmnEdge {
            id: element.attr("id").unwrap_or_default().to_string(),
            dmn_element_ref: QName::parse(&self.required_attr(element, "dmnElementRef")),
            waypoints: self.waypoints(element),
            source_element: element.attr("sourceElement").map(QName::parse),
            target_element: element.attr("targetElement").map(QName::parse),
            style: element.child("DMNStyle").map(|style| self.style(style)),
            label: element.child("DMNLabel").map(|label| self.label(label)),
        }
    }

    fn label(&mut self, element: &XmlElement) -> DmnLabel {
        DmnLabel {
            bounds: element.child("Bounds").map(|bounds| self.bounds(bounds)),
            text: element.child_text("Text"),
        }
    }

    fn style(&mut self, element: &XmlElement) -> DmnStyle {
        DmnStyle {
            id: element.attr("id").map(str::to_string),
            fill_color: element.child("FillColor").and_then(|c| self.color(c)),
            stroke_color: element.child("StrokeColor").and_then(|c| self.color(c)),
            font_color: element.child("FontColor").and_then(|c| self.color(c)),
            font_family: element.attr("fontFamily").map(str::to_string),
            font_size: self.number_attr(element, "fontSize"),
            font_bold: self.bool_attr(element, "fontBold"),
            font_italic: self.bool_attr(element, "fontItalic"),
        }
    }

    fn color(&mut self, element: &XmlElement) -> Option<Color> {
        let red = self.color_component(element, "red")?;
        let green = self.color_component(element, "green")?;
        let blue = self.color_component(element, "blue")?;
        Some(Color::from_rgb8(red, green, blue))
    }

    fn color_component(&mut self, element: &XmlElement, name: &str) -> Option<u8> {
        let value = self.required_attr(element, name);
        match value.trim().parse::<u8>() {
            Ok(component) => Some(component),
            Err(_) => {
                if !value.is_empty() {
                    self.collector.emit(
                        Diagnostic::error(format!(
                            "`{}` component `{name}` is not in 0..=255",
                            element.name
                        ))
                        .with_code(ErrorCode::E202)
                        .with_label(element.span, format!("invalid value `{value}`")),
                    );
                }
                None
            }
        }
    }
}
