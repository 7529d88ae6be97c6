use dmnkit_core::dmn::{
    Artifact, AssociationDirection, DiagramElement, DmnVersion, DrgElement, QName,
};
use dmnkit_xml::{WriteOptions, error::ErrorCode, read_definitions, write_definitions};
use proptest::prelude::*;

const LOAN: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<dmn:definitions xmlns:dmn="http://www.omg.org/spec/DMN/20180521/MODEL/"
                 xmlns:feel="http://www.omg.org/spec/DMN/20180521/FEEL/"
                 xmlns:dmndi="http://www.omg.org/spec/DMN/20180521/DMNDI/"
                 xmlns:dc="http://www.omg.org/spec/DMN/20180521/DC/"
                 xmlns:di="http://www.omg.org/spec/DMN/20180521/DI/"
                 xmlns:kie="http://www.drools.org/kie/dmn/1.2"
                 id="_loan" name="Loan" namespace="urn:loan" exporter="dmnkit">
  <dmn:description>Loan approval</dmn:description>
  <dmn:import namespace="urn:rates" locationURI="rates.dmn" importType="http://www.omg.org/spec/DMN/20180521/MODEL/" name="rates"/>
  <dmn:itemDefinition id="_t_applicant" name="tApplicant" isCollection="false">
    <dmn:itemComponent id="_t_age" name="age" isCollection="false">
      <dmn:typeRef>number</dmn:typeRef>
    </dmn:itemComponent>
  </dmn:itemDefinition>
  <dmn:inputData id="_applicant" name="Applicant">
    <dmn:variable id="_applicant_var" name="Applicant" typeRef="tApplicant"/>
  </dmn:inputData>
  <dmn:businessKnowledgeModel id="_rules" name="Rules">
    <dmn:variable name="Rules"/>
    <dmn:encapsulatedLogic id="_rules_fn">
      <dmn:literalExpression id="_rules_body"><dmn:text>age &gt;= 18</dmn:text></dmn:literalExpression>
    </dmn:encapsulatedLogic>
  </dmn:businessKnowledgeModel>
  <dmn:decision id="_eligible" name="Eligible">
    <dmn:variable name="Eligible" typeRef="boolean"/>
    <dmn:informationRequirement id="_ir1"><dmn:requiredInput href="#_applicant"/></dmn:informationRequirement>
    <dmn:knowledgeRequirement id="_kr1"><dmn:requiredKnowledge href="#_rules"/></dmn:knowledgeRequirement>
    <dmn:decisionTable id="_table" hitPolicy="FIRST">
      <dmn:input id="_in1"><dmn:inputExpression id="_ie1"><dmn:text>Applicant.age</dmn:text></dmn:inputExpression></dmn:input>
      <dmn:output id="_out1"/>
    </dmn:decisionTable>
  </dmn:decision>
  <dmn:textAnnotation id="_note">
    <dmn:text>Checked yearly</dmn:text>
  </dmn:textAnnotation>
  <dmn:association id="_assoc" associationDirection="One">
    <dmn:sourceRef href="#_note"/>
    <dmn:targetRef href="#_eligible"/>
  </dmn:association>
  <dmndi:DMNDI>
    <dmndi:DMNDiagram id="_diagram" name="DRG">
      <di:extension>
        <kie:ComponentsWidthsExtension>
          <kie:ComponentWidths dmnElementRef="_table">
            <kie:width>50</kie:width>
            <kie:width>180.5</kie:width>
          </kie:ComponentWidths>
        </kie:ComponentsWidthsExtension>
      </di:extension>
      <dmndi:Size width="1200" height="800"/>
      <dmndi:DMNShape id="dmnshape-_applicant" dmnElementRef="_applicant" isCollapsed="false">
        <dmndi:DMNStyle fontFamily="Open Sans" fontSize="14" fontBold="true">
          <dmndi:FillColor red="255" green="255" blue="255"/>
          <dmndi:StrokeColor red="0" green="0" blue="0"/>
        </dmndi:DMNStyle>
        <dc:Bounds x="100" y="300" width="100" height="50"/>
        <dmndi:DMNLabel/>
      </dmndi:DMNShape>
      <dmndi:DMNShape id="dmnshape-_eligible" dmnElementRef="_eligible" isCollapsed="false">
        <dc:Bounds x="100" y="100" width="100" height="50"/>
      </dmndi:DMNShape>
      <dmndi:DMNEdge id="dmnedge-_ir1" dmnElementRef="_ir1" sourceElement="dmnshape-_applicant" targetElement="dmnshape-_eligible">
        <di:waypoint x="150" y="325"/>
        <di:waypoint x="150" y="125"/>
      </dmndi:DMNEdge>
    </dmndi:DMNDiagram>
  </dmndi:DMNDI>
</dmn:definitions>
"##;

#[test]
fn test_read_complete_document() {
    let defs = read_definitions(LOAN).expect("Failed to read");

    assert_eq!(defs.version, DmnVersion::V1_2);
    assert_eq!(defs.name, "Loan");
    assert_eq!(defs.description.as_deref(), Some("Loan approval"));
    assert_eq!(defs.imports[0].location_uri.as_deref(), Some("rates.dmn"));
    assert_eq!(defs.item_definitions[0].item_components[0].type_ref.as_deref(), Some("number"));
    assert_eq!(defs.drg_elements.len(), 3);
    assert_eq!(defs.artifacts.len(), 2);

    let eligible = defs.drg_element("_eligible").expect("decision exists");
    assert_eq!(eligible.tag_name(), "decision");
    assert_eq!(
        eligible.logic().map(|logic| logic.contained_ids()),
        Some(vec!["_table", "_in1", "_ie1", "_out1"])
    );

    let association = defs.associations().next().expect("association exists");
    assert_eq!(association.association_direction, AssociationDirection::One);
    assert_eq!(association.source_ref.fragment(), "_note");

    let dmndi = defs.dmndi.as_ref().expect("DMNDI present");
    let diagram = &dmndi.diagrams[0];
    assert_eq!(diagram.shapes().count(), 2);
    assert_eq!(diagram.edges().count(), 1);
    assert_eq!(diagram.extension.components_widths[0].widths, vec![50.0, 180.5]);
    assert_eq!(
        diagram.extension.components_widths[0].dmn_element_ref,
        QName::new("_table")
    );

    let DiagramElement::Shape(applicant) = &diagram.elements[0] else {
        panic!("Expected shape");
    };
    let style = applicant.style.as_ref().expect("style present");
    assert_eq!(style.font_family.as_deref(), Some("Open Sans"));
    assert_eq!(style.font_bold, Some(true));
    assert_eq!(style.fill_color.map(|c| c.to_rgb8()), Some((255, 255, 255)));
    assert_eq!(applicant.bounds.min_y(), 300.0);
}

#[test]
fn test_write_then_read_preserves_document() {
    let defs = read_definitions(LOAN).expect("Failed to read");

    let xml = write_definitions(&defs, &WriteOptions::default()).expect("Failed to write");
    let back = read_definitions(&xml).expect("Failed to read written document");

    assert_eq!(back, defs);
}

#[test]
fn test_written_document_uses_source_prefixes() {
    let defs = read_definitions(LOAN).expect("Failed to read");
    let xml = write_definitions(&defs, &WriteOptions::default()).expect("Failed to write");

    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<dmn:definitions"));
    assert!(xml.contains(r#"xmlns:feel="http://www.omg.org/spec/DMN/20180521/FEEL/""#));
    assert!(xml.contains("<dmndi:DMNShape"));
    assert!(xml.contains(r#"<dc:Bounds x="100" y="300" width="100" height="50"/>"#));
    assert!(xml.contains("<kie:width>180.5</kie:width>"));
}

#[test]
fn test_dmn_13_diagram_namespace() {
    let xml = r#"<definitions xmlns="https://www.omg.org/spec/DMN/20191111/MODEL/" name="m" namespace="urn:m">
        <inputData id="_i" name="I"/>
    </definitions>"#;
    let mut defs = read_definitions(xml).expect("Failed to read");
    defs.dmndi = Some(Default::default());

    let written = write_definitions(&defs, &WriteOptions::default()).expect("Failed to write");
    assert!(written.contains(dmnkit_xml::DMNDI_13_NAMESPACE));
    assert_eq!(
        read_definitions(&written).expect("Failed to read").version,
        DmnVersion::V1_3
    );
}

#[test]
fn test_all_errors_are_reported() {
    let xml = r#"<definitions xmlns="http://www.omg.org/spec/DMN/20180521/MODEL/" name="m">
        <inputData name="no id"/>
        <textAnnotation><text>no id either</text></textAnnotation>
    </definitions>"#;

    let err = read_definitions(xml).expect_err("Expected errors");

    assert_eq!(err.diagnostics().len(), 2);
    assert!(
        err.diagnostics()
            .iter()
            .all(|d| d.code() == Some(ErrorCode::E101))
    );
}

#[test]
fn test_annotation_text_survives_write() {
    let defs = read_definitions(LOAN).expect("Failed to read");
    let xml = write_definitions(&defs, &WriteOptions::new(0)).expect("Failed to write");
    let back = read_definitions(&xml).expect("Failed to read");

    let annotation = back
        .artifacts
        .iter()
        .find_map(Artifact::as_text_annotation)
        .expect("annotation exists");
    assert_eq!(annotation.text, "Checked yearly");
    assert!(matches!(back.drg_elements[1], DrgElement::BusinessKnowledgeModel(_)));
}

proptest! {
    #[test]
    fn prop_names_survive_write(name in "[a-zA-Z<>&\"' ]{1,24}") {
        prop_assume!(!name.trim().is_empty());
        let mut defs = read_definitions(LOAN).expect("Failed to read");
        if let Some(element) = defs.drg_elements.first_mut() {
            element.header_mut().name = name.clone();
        }

        let xml = write_definitions(&defs, &WriteOptions::default()).expect("Failed to write");
        let back = read_definitions(&xml).expect("Failed to read");

        prop_assert_eq!(back.drg_elements[0].name(), name.as_str());
    }
}
